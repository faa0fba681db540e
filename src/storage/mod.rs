//! Working-directory artifacts
//!
//! The provisioner and the report renderer share nothing but files with
//! fixed names inside one working directory.

pub mod workspace;

pub use workspace::{
    RunLock, StorageError, Workspace, LOCK_FILE, LOG_FILE, METADATA_FILE, MINT_FILE, REPORT_FILE,
};
