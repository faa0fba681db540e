//! External ledger tool plumbing
//!
//! Everything that touches the `solana` and `spl-token` binaries lives here:
//! - Invocations and a runner trait that executes them
//! - Address extraction from the tools' human or JSON output
//! - A builder that knows each subcommand's argument layout

pub mod extract;
pub mod ledger;
pub mod runner;

#[cfg(test)]
pub(crate) mod fake;

pub use extract::{
    AddressExtractor, AddressKind, ExtractionError, JsonFieldExtractor, MarkerLineExtractor,
    OutputFormat,
};
pub use ledger::{LedgerCli, ToolPaths};
pub use runner::{CommandRunner, ExitCode, SystemRunner, ToolError, ToolInvocation, ToolOutput};
