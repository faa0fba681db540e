//! CLI commands for token-forge
//!
//! Implements all command handlers for the CLI interface.

use crate::core::{parse_address, Authority, Network};
use crate::ops::TokenOps;
use crate::provision::{
    CreationFailure, CreationResult, CreationSuccess, ProvisionError, ProvisionerConfig,
    TokenProvisioner, MIN_SOL_BALANCE,
};
use crate::report::ReportGenerator;
use crate::storage::{Workspace, LOG_FILE, METADATA_FILE, MINT_FILE};
use crate::token::TokenRequest;
use crate::tool::{CommandRunner, LedgerCli, OutputFormat, SystemRunner, ToolPaths};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct AppContext {
    pub work_dir: PathBuf,
    pub network: Network,
    pub tools: ToolPaths,
    pub output_format: OutputFormat,
}

impl AppContext {
    /// Open (and create if needed) the working directory
    pub fn workspace(&self) -> CliResult<Workspace> {
        Ok(Workspace::new(&self.work_dir)?)
    }

    pub fn ledger(&self) -> LedgerCli {
        LedgerCli::new(self.tools.clone(), self.network, self.output_format)
    }
}

/// Options of `create`
#[derive(Debug, Clone)]
pub struct CreateArgs {
    pub wallet_path: PathBuf,
    pub name: String,
    pub symbol: String,
    pub description: Option<String>,
    pub supply: u64,
    pub decimals: u8,
    pub image_url: Option<String>,
    pub revoke_mint_authority: bool,
    pub revoke_freeze_authority: bool,
    pub json: bool,
}

impl CreateArgs {
    fn to_request(&self) -> TokenRequest {
        let mut request = TokenRequest::new(&self.name, &self.symbol, &self.wallet_path)
            .with_supply(self.supply)
            .with_decimals(self.decimals);
        if let Some(description) = &self.description {
            request = request.with_description(description);
        }
        if let Some(image_url) = &self.image_url {
            request = request.with_image_url(image_url);
        }
        if self.revoke_mint_authority {
            request = request.revoking(Authority::Mint);
        }
        if self.revoke_freeze_authority {
            request = request.revoking(Authority::Freeze);
        }
        request
    }
}

// =============================================================================
// Create
// =============================================================================

/// Create a token and print the outcome; `Ok(false)` when creation failed
pub fn cmd_create(ctx: &AppContext, args: &CreateArgs) -> CliResult<bool> {
    let result = create_token(ctx, args, SystemRunner, &mut io::stdout().lock())?;
    Ok(result.is_success())
}

/// Run the creation workflow with `runner` and write the outcome to `out`.
///
/// A request rejected before the workflow starts is reported as a failure
/// without a step, so `--json` output always has the same shape.
pub fn create_token<R: CommandRunner, W: Write>(
    ctx: &AppContext,
    args: &CreateArgs,
    runner: R,
    out: &mut W,
) -> CliResult<CreationResult> {
    if !args.json {
        writeln!(
            out,
            "🪙 Creating token '{}' ({}) on {}...",
            args.name,
            args.symbol,
            ctx.network.title()
        )?;
    }

    let result = match provision(ctx, &args.to_request(), runner) {
        Ok(result) => result,
        Err(e) => CreationResult::Failure(CreationFailure {
            error: e.to_string(),
            failed_step: None,
            mint_address: None,
            token_account: None,
            network: ctx.network,
        }),
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        match &result {
            CreationResult::Success(success) => {
                print_success(out, success, &args.wallet_path, &ctx.work_dir)?
            }
            CreationResult::Failure(failure) => print_failure(out, failure)?,
        }
    }

    Ok(result)
}

fn provision<R: CommandRunner>(
    ctx: &AppContext,
    request: &TokenRequest,
    runner: R,
) -> Result<CreationResult, ProvisionError> {
    let config = ProvisionerConfig {
        workspace: Workspace::new(&ctx.work_dir)?,
        network: ctx.network,
        tools: ctx.tools.clone(),
        output_format: ctx.output_format,
        min_balance: MIN_SOL_BALANCE,
    };
    TokenProvisioner::new(config, runner).provision(request)
}

fn print_success<W: Write>(
    out: &mut W,
    success: &CreationSuccess,
    wallet: &Path,
    work_dir: &Path,
) -> io::Result<()> {
    writeln!(out, "\n✅ Token created successfully!")?;
    writeln!(out, "   🏷️  Name: {} ({})", success.metadata.name, success.metadata.symbol)?;
    writeln!(out, "   🌐 Network: {}", success.network.title())?;
    writeln!(out, "   🪙 Mint address: {}", success.mint_address)?;
    writeln!(out, "   📦 Token account: {}", success.token_account)?;
    writeln!(out, "   🔢 Decimals: {}", success.metadata.decimals)?;
    writeln!(
        out,
        "   🔗 Explorer: {}",
        success.network.explorer_url(&success.mint_address)
    )?;

    if !success.verified {
        writeln!(out, "   ⚠️  Verification failed; check supply manually")?;
    }

    for authority in [Authority::Mint, Authority::Freeze] {
        if let Some(outcome) = success.authority_revocation.get(authority) {
            if outcome.revoked {
                writeln!(out, "   🔒 {}: revoked", authority.label())?;
            } else {
                writeln!(
                    out,
                    "   ❌ {}: NOT revoked ({})",
                    authority.label(),
                    outcome.error.as_deref().unwrap_or("unknown error")
                )?;
            }
        }
    }

    let failed = success.authority_revocation.failed();
    if !failed.is_empty() {
        writeln!(out, "\n⚠️  Some authorities are still active. Retry with:")?;
        for authority in failed {
            writeln!(
                out,
                "   token-forge --network {} ops revoke --mint {} --wallet {} --authority {}",
                success.network,
                success.mint_address,
                wallet.display(),
                authority
            )?;
        }
    }

    writeln!(out, "\n📁 Artifacts in {}", work_dir.display())?;
    writeln!(out, "   ├─ {}", work_dir.join(METADATA_FILE).display())?;
    writeln!(out, "   ├─ {}", work_dir.join(MINT_FILE).display())?;
    writeln!(out, "   └─ {}", work_dir.join(LOG_FILE).display())?;
    writeln!(out, "\n💡 Generate a report with:")?;
    writeln!(
        out,
        "   token-forge --network {} report --mint-address {}",
        success.network, success.mint_address
    )
}

fn print_failure<W: Write>(out: &mut W, failure: &CreationFailure) -> io::Result<()> {
    writeln!(out, "\n❌ Token creation failed!")?;
    if let Some(step) = failure.failed_step {
        writeln!(out, "   ├─ Step: {}", step)?;
    }
    writeln!(out, "   ├─ Network: {}", failure.network.title())?;
    if let Some(mint) = &failure.mint_address {
        writeln!(out, "   ├─ Mint already created: {}", mint)?;
        writeln!(out, "   ├─ Explorer: {}", failure.network.explorer_url(mint))?;
    }
    if let Some(account) = &failure.token_account {
        writeln!(out, "   ├─ Token account already created: {}", account)?;
    }
    writeln!(out, "   └─ Error: {}", failure.error)
}

// =============================================================================
// Report
// =============================================================================

/// Render `token_report.html` for a mint. The wallet address is display-only.
pub fn cmd_report(ctx: &AppContext, mint_address: &str, wallet_address: Option<&str>) -> CliResult<()> {
    let mint = parse_address(mint_address)?;

    let mut generator = ReportGenerator::new(SystemRunner, ctx.ledger(), ctx.workspace()?);
    let path = generator.save(&mint, wallet_address)?;

    println!("✅ Token report generated successfully!");
    println!("   📄 Report file: {}", path.display());
    println!("   Open the file in a web browser to view the report.");

    Ok(())
}

// =============================================================================
// Operations
// =============================================================================

fn ops(ctx: &AppContext) -> CliResult<TokenOps<SystemRunner>> {
    Ok(TokenOps::new(SystemRunner, ctx.ledger(), ctx.workspace()?))
}

/// Show mint details
pub fn cmd_ops_inspect(ctx: &AppContext, mint: &str) -> CliResult<()> {
    let output = ops(ctx)?.inspect(mint)?;
    println!("🔍 Token {}", mint);
    println!("{}", output.trim_end());
    Ok(())
}

/// Show a token balance
pub fn cmd_ops_balance(
    ctx: &AppContext,
    mint: &str,
    owner: Option<&str>,
    wallet: Option<&Path>,
) -> CliResult<()> {
    let balance = ops(ctx)?.token_balance(mint, owner, wallet)?;
    println!("💰 Token balance: {}", balance);
    Ok(())
}

/// Show the wallet's SOL balance
pub fn cmd_ops_wallet_balance(ctx: &AppContext, wallet: &Path) -> CliResult<()> {
    let balance = ops(ctx)?.wallet_balance(wallet)?;
    println!("💰 Wallet balance: {} SOL", balance);
    if balance < MIN_SOL_BALANCE {
        println!(
            "   ⚠️  Below the {} SOL needed to create a token",
            MIN_SOL_BALANCE
        );
    }
    Ok(())
}

/// List the wallet's token accounts
pub fn cmd_ops_accounts(ctx: &AppContext, wallet: &Path) -> CliResult<()> {
    let output = ops(ctx)?.accounts(wallet)?;
    println!("📋 Token accounts for {}", wallet.display());
    println!("{}", output.trim_end());
    Ok(())
}

/// Mint details plus the wallet's token and SOL balances
pub fn cmd_ops_analyze(ctx: &AppContext, mint: &str, wallet: &Path) -> CliResult<()> {
    let analysis = ops(ctx)?.analyze(mint, wallet)?;

    println!("🔍 Token {}", mint);
    println!("{}", analysis.mint_info.trim_end());
    println!("\n💰 Token balance: {}", analysis.token_balance);
    println!("💰 Wallet balance: {} SOL", analysis.wallet_balance);
    if analysis.wallet_balance < MIN_SOL_BALANCE {
        println!(
            "   ⚠️  Below the {} SOL needed to create a token",
            MIN_SOL_BALANCE
        );
    }
    Ok(())
}

/// Disable one authority by hand; `Ok(false)` when the authority is still active
pub fn cmd_ops_revoke(
    ctx: &AppContext,
    mint: &str,
    wallet: &Path,
    authority: Authority,
) -> CliResult<bool> {
    println!("🔒 Revoking {} for {}...", authority.label().to_lowercase(), mint);
    let outcome = ops(ctx)?.revoke(wallet, mint, authority)?;

    if outcome.revoked {
        println!("✅ {} revoked", authority.label());
    } else {
        println!(
            "❌ {} NOT revoked: {}",
            authority.label(),
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(outcome.revoked)
}
