//! token-forge: SPL token provisioning on top of the Solana CLI tools
//!
//! This crate sequences calls to the external `solana` and `spl-token`
//! binaries to create a fungible token, and keeps a record of what happened:
//! - Request validation before anything is spawned
//! - Mint creation, holding account, initial supply
//! - Metadata persisted next to an append-only execution log
//! - Optional revocation of the mint and freeze authorities
//! - Static HTML reports combining local artifacts with live chain state
//! - Follow-up operations (inspection, balances, manual revocation)
//!
//! # Example
//!
//! ```ignore
//! use token_forge::provision::{CreationResult, ProvisionerConfig, TokenProvisioner};
//! use token_forge::token::TokenRequest;
//! use token_forge::tool::SystemRunner;
//!
//! let mut provisioner = TokenProvisioner::new(ProvisionerConfig::default(), SystemRunner);
//! let request = TokenRequest::new("Test", "TST", "wallet.json")
//!     .with_supply(500)
//!     .with_decimals(6);
//!
//! match provisioner.provision(&request)? {
//!     CreationResult::Success(s) => println!("Mint: {}", s.mint_address),
//!     CreationResult::Failure(f) => eprintln!("Failed: {}", f.error),
//! }
//! ```

pub mod cli;
pub mod core;
pub mod ops;
pub mod provision;
pub mod report;
pub mod storage;
pub mod token;
pub mod tool;

// Re-export commonly used types
pub use core::{Authority, Network};
pub use ops::{Analysis, OpsError, TokenOps};
pub use provision::{CreationResult, ExecutionLog, ProvisionError, TokenProvisioner};
pub use report::ReportGenerator;
pub use storage::Workspace;
pub use token::{TokenMetadata, TokenRequest};
pub use tool::{CommandRunner, LedgerCli, SystemRunner};
