//! Post-creation token operations
//!
//! Inspection and maintenance commands for a mint that already exists.
//! Every address argument is validated before a tool is invoked.

use crate::core::{parse_address, AddressError, Authority};
use crate::provision::{revoke_authority, ExecutionLog, RevocationOutcome};
use crate::storage::{StorageError, Workspace};
use crate::tool::ledger::parse_sol_balance;
use crate::tool::{CommandRunner, LedgerCli, ToolError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Operation errors
#[derive(Error, Debug)]
pub enum OpsError {
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("Wallet file not found: {0}")]
    WalletNotFound(PathBuf),
    #[error("{0}")]
    Tool(#[from] ToolError),
    #[error("Could not read wallet balance from output: {0:?}")]
    BalanceParse(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Combined view of a mint and the wallet that created it
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// `spl-token display` output
    pub mint_info: String,
    /// Token balance held by the wallet
    pub token_balance: String,
    /// Wallet balance in SOL
    pub wallet_balance: f64,
}

/// Runs single operations against existing tokens
pub struct TokenOps<R: CommandRunner> {
    runner: R,
    cli: LedgerCli,
    workspace: Workspace,
}

impl<R: CommandRunner> TokenOps<R> {
    pub fn new(runner: R, cli: LedgerCli, workspace: Workspace) -> Self {
        Self {
            runner,
            cli,
            workspace,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Mint details as printed by `spl-token display`
    pub fn inspect(&mut self, mint: &str) -> Result<String, OpsError> {
        let mint = parse_address(mint)?;
        let output = self.runner.run(&self.cli.display(&mint))?;
        Ok(output.stdout)
    }

    /// Token balance of `owner`, else of `wallet`, else of the tool's default keypair
    pub fn token_balance(
        &mut self,
        mint: &str,
        owner: Option<&str>,
        wallet: Option<&Path>,
    ) -> Result<String, OpsError> {
        let mint = parse_address(mint)?;
        let owner = owner.map(parse_address).transpose()?;

        let invocation = match (owner, wallet) {
            (Some(owner), _) => self.cli.token_balance(&mint, Some(owner.as_str())),
            (None, Some(wallet)) => {
                check_wallet(wallet)?;
                self.cli.wallet_token_balance(wallet, &mint)
            }
            (None, None) => self.cli.token_balance(&mint, None),
        };

        let output = self.runner.run(&invocation)?;
        Ok(output.stdout.trim().to_string())
    }

    /// Native balance of the wallet, in SOL
    pub fn wallet_balance(&mut self, wallet: &Path) -> Result<f64, OpsError> {
        check_wallet(wallet)?;
        let output = self.runner.run(&self.cli.wallet_balance(wallet))?;
        parse_sol_balance(&output.stdout)
            .ok_or_else(|| OpsError::BalanceParse(output.stdout.trim().to_string()))
    }

    /// Every token account the wallet owns, as printed by `spl-token accounts`
    pub fn accounts(&mut self, wallet: &Path) -> Result<String, OpsError> {
        check_wallet(wallet)?;
        let output = self.runner.run(&self.cli.token_accounts(wallet))?;
        Ok(output.stdout)
    }

    /// Mint details, the wallet's token balance and its SOL balance, in that
    /// order. The first failure stops the analysis.
    pub fn analyze(&mut self, mint: &str, wallet: &Path) -> Result<Analysis, OpsError> {
        check_wallet(wallet)?;
        let mint = parse_address(mint)?;

        let mint_info = self.inspect(&mint)?;
        let token_balance = self.token_balance(&mint, None, Some(wallet))?;
        let wallet_balance = self.wallet_balance(wallet)?;

        Ok(Analysis {
            mint_info,
            token_balance,
            wallet_balance,
        })
    }

    /// Disable one authority by hand, appending to the existing execution log.
    ///
    /// A failed revocation is a value, not an error, same as during creation.
    pub fn revoke(
        &mut self,
        wallet: &Path,
        mint: &str,
        authority: Authority,
    ) -> Result<RevocationOutcome, OpsError> {
        check_wallet(wallet)?;
        let mint = parse_address(mint)?;

        let _lock = self.workspace.lock()?;
        let mut log =
            ExecutionLog::append_to(&self.workspace.log_path()).map_err(StorageError::from)?;
        log.record(format!("Manual revocation requested for {}", mint));

        Ok(revoke_authority(
            &mut self.runner,
            &self.cli,
            &mut log,
            wallet,
            &mint,
            authority,
        ))
    }
}

fn check_wallet(wallet: &Path) -> Result<(), OpsError> {
    if wallet.exists() {
        Ok(())
    } else {
        Err(OpsError::WalletNotFound(wallet.to_path_buf()))
    }
}
