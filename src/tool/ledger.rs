//! Invocation builder for the Solana CLI tools
//!
//! [`LedgerCli`] knows the argument layout of every `solana` and
//! `spl-token` subcommand the crate uses. It only builds
//! [`ToolInvocation`]s; running them is the caller's job.

use super::extract::OutputFormat;
use super::runner::ToolInvocation;
use crate::core::{Authority, Network};
use std::path::Path;

/// Default program name of the wallet CLI
pub const DEFAULT_SOLANA_BIN: &str = "solana";
/// Default program name of the token program CLI
pub const DEFAULT_SPL_TOKEN_BIN: &str = "spl-token";

/// Where to find the two binaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub solana: String,
    pub spl_token: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            solana: DEFAULT_SOLANA_BIN.to_string(),
            spl_token: DEFAULT_SPL_TOKEN_BIN.to_string(),
        }
    }
}

/// Builds invocations for one network and output mode
#[derive(Debug, Clone)]
pub struct LedgerCli {
    paths: ToolPaths,
    network: Network,
    format: OutputFormat,
}

impl LedgerCli {
    /// Create a builder
    pub fn new(paths: ToolPaths, network: Network, format: OutputFormat) -> Self {
        Self {
            paths,
            network,
            format,
        }
    }

    /// Network every invocation targets
    pub fn network(&self) -> Network {
        self.network
    }

    /// Switch the output format requested from extraction commands
    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    fn solana(&self, subcommand: &str) -> ToolInvocation {
        ToolInvocation::new(&self.paths.solana).arg(subcommand)
    }

    fn spl_token(&self, subcommand: &str) -> ToolInvocation {
        ToolInvocation::new(&self.paths.spl_token).arg(subcommand)
    }

    fn finish(&self, invocation: ToolInvocation) -> ToolInvocation {
        invocation.args(["--url", self.network.cluster_moniker()])
    }

    fn with_format(&self, invocation: ToolInvocation) -> ToolInvocation {
        match self.format {
            OutputFormat::Text => invocation,
            OutputFormat::Json => invocation.args(["--output", "json"]),
        }
    }

    fn keypair(invocation: ToolInvocation, wallet: &Path) -> ToolInvocation {
        invocation
            .arg("--keypair")
            .arg(wallet.display().to_string())
    }

    // =========================================================================
    // Wallet
    // =========================================================================

    /// `solana balance`: native balance of the wallet
    pub fn wallet_balance(&self, wallet: &Path) -> ToolInvocation {
        self.finish(Self::keypair(self.solana("balance"), wallet))
    }

    /// `solana account --output json`: raw account state
    pub fn account_info(&self, address: &str) -> ToolInvocation {
        self.finish(self.solana("account").args([address, "--output", "json"]))
    }

    // =========================================================================
    // Token program
    // =========================================================================

    /// `spl-token create-token`: new mint with the given precision
    pub fn create_token(&self, wallet: &Path, decimals: u8) -> ToolInvocation {
        let inv = Self::keypair(self.spl_token("create-token"), wallet)
            .args(["--decimals".to_string(), decimals.to_string()]);
        self.finish(self.with_format(inv))
    }

    /// `spl-token create-account`: holding account for `mint`
    pub fn create_account(&self, wallet: &Path, mint: &str) -> ToolInvocation {
        let inv = Self::keypair(self.spl_token("create-account").arg(mint), wallet);
        self.finish(self.with_format(inv))
    }

    /// `spl-token mint`: issue `amount` into `recipient`
    pub fn mint_to(&self, wallet: &Path, mint: &str, amount: u64, recipient: &str) -> ToolInvocation {
        let inv = self
            .spl_token("mint")
            .args([mint.to_string(), amount.to_string(), recipient.to_string()]);
        self.finish(Self::keypair(inv, wallet))
    }

    /// `spl-token supply`: total supply of `mint`
    pub fn supply(&self, mint: &str) -> ToolInvocation {
        self.finish(self.spl_token("supply").arg(mint))
    }

    /// `spl-token balance --address`: balance of one token account
    pub fn account_balance(&self, account: &str) -> ToolInvocation {
        self.finish(self.spl_token("balance").args(["--address", account]))
    }

    /// `spl-token balance <mint>`: balance held by `owner` (or the default keypair)
    pub fn token_balance(&self, mint: &str, owner: Option<&str>) -> ToolInvocation {
        let mut inv = self.spl_token("balance").arg(mint);
        if let Some(owner) = owner {
            inv = inv.args(["--owner", owner]);
        }
        self.finish(inv)
    }

    /// `spl-token balance <mint> --keypair`: balance held by the wallet
    pub fn wallet_token_balance(&self, wallet: &Path, mint: &str) -> ToolInvocation {
        self.finish(Self::keypair(self.spl_token("balance").arg(mint), wallet))
    }

    /// `spl-token accounts`: every token account of the wallet
    pub fn token_accounts(&self, wallet: &Path) -> ToolInvocation {
        self.finish(Self::keypair(self.spl_token("accounts"), wallet))
    }

    /// `spl-token display`: mint details including authorities
    pub fn display(&self, mint: &str) -> ToolInvocation {
        self.finish(self.spl_token("display").arg(mint))
    }

    /// `spl-token authorize <mint> <authority> --disable`
    pub fn disable_authority(&self, wallet: &Path, mint: &str, authority: Authority) -> ToolInvocation {
        let inv = self
            .spl_token("authorize")
            .args([mint, authority.as_arg(), "--disable"]);
        self.finish(Self::keypair(inv, wallet))
    }
}

/// Parse `solana balance` output ("1.5 SOL") into SOL
pub fn parse_sol_balance(stdout: &str) -> Option<f64> {
    stdout
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|balance| balance.is_finite())
}
