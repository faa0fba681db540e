//! token-forge CLI Application
//!
//! A command-line interface for provisioning SPL tokens.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use token_forge::cli::{self, AppContext, CliResult, CreateArgs};
use token_forge::core::{Authority, Network};
use token_forge::token::{DEFAULT_DECIMALS, DEFAULT_SUPPLY};
use token_forge::tool::{OutputFormat, ToolPaths};

#[derive(Parser)]
#[command(name = "token-forge")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Create SPL tokens through the Solana CLI tools", long_about = None)]
struct Cli {
    /// Working directory for logs, metadata and reports
    #[arg(long, global = true, default_value = ".")]
    work_dir: PathBuf,

    /// Target cluster
    #[arg(long, global = true, value_enum, default_value_t = Network::Devnet)]
    network: Network,

    /// spl-token executable
    #[arg(long, global = true, env = "SPL_TOKEN_BIN", default_value = "spl-token")]
    spl_token_bin: String,

    /// solana executable
    #[arg(long, global = true, env = "SOLANA_BIN", default_value = "solana")]
    solana_bin: String,

    /// Output format requested from the tools when reading new addresses
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output_format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new token
    Create {
        /// Keypair file paying for and owning the token
        #[arg(long)]
        wallet_path: PathBuf,

        /// Token name
        #[arg(long)]
        name: String,

        /// Token symbol
        #[arg(long)]
        symbol: String,

        /// Token description
        #[arg(long)]
        description: Option<String>,

        /// Initial supply, in whole tokens
        #[arg(long, default_value_t = DEFAULT_SUPPLY)]
        supply: u64,

        /// Decimal places (0-9)
        #[arg(long, default_value_t = DEFAULT_DECIMALS)]
        decimals: u8,

        /// Image URL recorded in the metadata
        #[arg(long)]
        image_url: Option<String>,

        /// Permanently disable minting after the initial supply
        #[arg(long)]
        revoke_mint_authority: bool,

        /// Permanently disable freezing token accounts
        #[arg(long)]
        revoke_freeze_authority: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate an HTML report for a token
    Report {
        /// Token mint address
        #[arg(long)]
        mint_address: String,

        /// Creator wallet address
        #[arg(long)]
        wallet_address: Option<String>,
    },

    /// Operations on an existing token
    Ops {
        #[command(subcommand)]
        action: OpsCommands,
    },
}

#[derive(Subcommand)]
enum OpsCommands {
    /// Show mint details and authorities
    Inspect {
        /// Token mint address
        #[arg(short, long)]
        mint: String,
    },

    /// Show a token balance
    Balance {
        /// Token mint address
        #[arg(short, long)]
        mint: String,

        /// Owner address
        #[arg(short, long)]
        owner: Option<String>,

        /// Keypair file whose balance is shown when no owner is given
        /// (defaults to the configured keypair)
        #[arg(short, long)]
        wallet: Option<PathBuf>,
    },

    /// Show the wallet's SOL balance
    WalletBalance {
        /// Keypair file
        #[arg(short, long)]
        wallet: PathBuf,
    },

    /// List the wallet's token accounts
    Accounts {
        /// Keypair file
        #[arg(short, long)]
        wallet: PathBuf,
    },

    /// Mint details with the wallet's token and SOL balances
    Analyze {
        /// Token mint address
        #[arg(short, long)]
        mint: String,

        /// Keypair file that created the token
        #[arg(short, long)]
        wallet: PathBuf,
    },

    /// Revoke an authority that is still active
    Revoke {
        /// Token mint address
        #[arg(short, long)]
        mint: String,

        /// Keypair file holding the authority
        #[arg(short, long)]
        wallet: PathBuf,

        /// Authority to disable
        #[arg(short, long, value_enum)]
        authority: Authority,
    },
}

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(true) => {}
        // The command already printed why it failed
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Dispatch one command; `Ok(false)` means it ran but did not succeed
fn run(cli: Cli) -> CliResult<bool> {
    let ctx = AppContext {
        work_dir: cli.work_dir,
        network: cli.network,
        tools: ToolPaths {
            solana: cli.solana_bin,
            spl_token: cli.spl_token_bin,
        },
        output_format: cli.output_format,
    };

    // Process commands
    match cli.command {
        Commands::Create {
            wallet_path,
            name,
            symbol,
            description,
            supply,
            decimals,
            image_url,
            revoke_mint_authority,
            revoke_freeze_authority,
            json,
        } => {
            let args = CreateArgs {
                wallet_path,
                name,
                symbol,
                description,
                supply,
                decimals,
                image_url,
                revoke_mint_authority,
                revoke_freeze_authority,
                json,
            };
            return cli::cmd_create(&ctx, &args);
        }

        Commands::Report {
            mint_address,
            wallet_address,
        } => {
            cli::cmd_report(&ctx, &mint_address, wallet_address.as_deref())?;
        }

        Commands::Ops { action } => match action {
            OpsCommands::Inspect { mint } => {
                cli::cmd_ops_inspect(&ctx, &mint)?;
            }
            OpsCommands::Balance {
                mint,
                owner,
                wallet,
            } => {
                cli::cmd_ops_balance(&ctx, &mint, owner.as_deref(), wallet.as_deref())?;
            }
            OpsCommands::WalletBalance { wallet } => {
                cli::cmd_ops_wallet_balance(&ctx, &wallet)?;
            }
            OpsCommands::Accounts { wallet } => {
                cli::cmd_ops_accounts(&ctx, &wallet)?;
            }
            OpsCommands::Analyze { mint, wallet } => {
                cli::cmd_ops_analyze(&ctx, &mint, &wallet)?;
            }
            OpsCommands::Revoke {
                mint,
                wallet,
                authority,
            } => {
                return cli::cmd_ops_revoke(&ctx, &mint, &wallet, authority);
            }
        },
    }

    Ok(true)
}
