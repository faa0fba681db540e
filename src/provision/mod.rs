//! Token provisioning workflow
//!
//! Drives the fixed creation sequence against the external tools:
//! balance check, mint creation, account creation, minting, metadata,
//! verification and optional authority revocation. Every step is written
//! to the execution log before the workflow moves on or stops.
//!
//! # Example
//!
//! ```ignore
//! use token_forge::provision::{ProvisionerConfig, TokenProvisioner};
//! use token_forge::tool::SystemRunner;
//! use token_forge::token::TokenRequest;
//!
//! let mut provisioner = TokenProvisioner::new(ProvisionerConfig::default(), SystemRunner);
//! let request = TokenRequest::new("Test", "TST", "wallet.json").with_supply(500);
//! let result = provisioner.provision(&request)?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```

pub mod execution_log;
pub mod provisioner;
pub mod result;

pub use execution_log::{ExecutionLog, COMPLETION_MESSAGE};
pub use provisioner::{
    revoke_authority, run_logged, ProvisionError, ProvisionerConfig, TokenProvisioner,
    WorkflowState, MIN_SOL_BALANCE,
};
pub use result::{
    CreationFailure, CreationResult, CreationSuccess, RevocationOutcome, RevocationResults, Step,
};
