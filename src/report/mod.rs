//! Token creation report
//!
//! Combines the artifacts a provisioning run leaves in the working
//! directory with live chain state and writes a static HTML page. Nothing
//! here fails except writing the page itself: every missing input has a
//! placeholder.

pub mod live;
pub mod render;

pub use live::{LiveInfo, UNKNOWN_SUPPLY};
pub use render::{escape_html, render_html, ReportData, LOG_UNAVAILABLE, NOT_AVAILABLE};

use crate::core::parse_address;
use crate::storage::{StorageError, Workspace, METADATA_FILE};
use crate::tool::{CommandRunner, LedgerCli};
use chrono::Utc;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Builds and saves reports for one working directory
pub struct ReportGenerator<R: CommandRunner> {
    runner: R,
    cli: LedgerCli,
    workspace: Workspace,
}

impl<R: CommandRunner> ReportGenerator<R> {
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

    /// Gather everything the report shows.
    ///
    /// Metadata recorded for a different mint is dropped.
    pub fn collect(&mut self, mint_address: &str, wallet_address: Option<&str>) -> ReportData {
        let mut metadata = self.workspace.load_metadata_raw();
        if let Some(recorded) = metadata.get("mint").and_then(Value::as_str) {
            if recorded != mint_address {
                log::warn!(
                    "{} describes mint {}, not {}; ignoring it",
                    METADATA_FILE,
                    recorded,
                    mint_address
                );
                metadata = Map::new();
            }
        }

        ReportData {
            mint_address: mint_address.to_string(),
            network: self.cli.network(),
            wallet_address: creator_wallet(wallet_address),
            metadata,
            live: LiveInfo::fetch(&mut self.runner, &self.cli, mint_address),
            creation_log: self.workspace.read_log(),
        }
    }

    /// Render the report stamped with the current time
    pub fn generate(&mut self, mint_address: &str, wallet_address: Option<&str>) -> String {
        let data = self.collect(mint_address, wallet_address);
        let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        render_html(&data, &generated_at)
    }

    /// Render and write `token_report.html`
    pub fn save(
        &mut self,
        mint_address: &str,
        wallet_address: Option<&str>,
    ) -> Result<PathBuf, StorageError> {
        let html = self.generate(mint_address, wallet_address);
        let path = self.workspace.save_report(&html)?;
        log::info!("Report generated: {}", path.display());
        Ok(path)
    }
}

/// The creator wallet is display-only: a malformed value is shown as given
fn creator_wallet(input: Option<&str>) -> Option<String> {
    let wallet = input.map(str::trim).filter(|w| !w.is_empty())?;
    if let Err(e) = parse_address(wallet) {
        log::warn!("Creator wallet '{}' is not a valid address: {}", wallet, e);
    }
    Some(wallet.to_string())
}
