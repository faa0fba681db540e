//! Address extraction from tool output
//!
//! `spl-token` reports the address it just created only inside its
//! human-readable output. How to find it depends on the tool version and
//! output mode, so extraction sits behind [`AddressExtractor`] with one
//! implementation per format:
//!
//! - [`MarkerLineExtractor`] scans text output for a marker line
//!   (`Creating token <ADDR>`, `Creating account <ADDR>`)
//! - [`JsonFieldExtractor`] reads a field from `--output json`
//!
//! Every extracted value must also be a valid base58 address.

use crate::core::parse_address;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Marker preceding the mint address in `spl-token create-token` text output
pub const CREATE_TOKEN_MARKER: &str = "Creating token";

/// Marker preceding the account address in `spl-token create-account` text output
pub const CREATE_ACCOUNT_MARKER: &str = "Creating account";

/// Field holding the new address in `spl-token --output json` output
pub const JSON_ADDRESS_FIELD: &str = "address";

/// Which address a command is expected to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Mint,
    Account,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressKind::Mint => f.write_str("token mint"),
            AddressKind::Account => f.write_str("token account"),
        }
    }
}

/// Extraction errors
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Could not extract {kind} address from output: marker '{marker}' not found")]
    MarkerNotFound { kind: AddressKind, marker: String },
    #[error("Could not extract {kind} address from output: field '{field}' missing")]
    MissingField { kind: AddressKind, field: String },
    #[error("Could not parse {kind} output as JSON: {source}")]
    MalformedJson {
        kind: AddressKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("Extracted {kind} address '{value}' is not a valid address")]
    InvalidAddress { kind: AddressKind, value: String },
}

/// Output mode requested from `spl-token`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text, scraped for marker lines
    #[default]
    Text,
    /// Machine-readable JSON (`--output json`)
    Json,
}

impl OutputFormat {
    /// Build the matching extraction strategy
    pub fn extractor(&self) -> Box<dyn AddressExtractor> {
        match self {
            OutputFormat::Text => Box::new(MarkerLineExtractor::default()),
            OutputFormat::Json => Box::new(JsonFieldExtractor::default()),
        }
    }
}

/// Strategy for pulling a freshly created address out of tool output
pub trait AddressExtractor {
    /// Output mode the tool must be asked for
    fn format(&self) -> OutputFormat;

    /// Extract the address of `kind` from `stdout`
    fn extract(&self, kind: AddressKind, stdout: &str) -> Result<String, ExtractionError>;
}

fn validated(kind: AddressKind, value: &str) -> Result<String, ExtractionError> {
    parse_address(value).map_err(|_| ExtractionError::InvalidAddress {
        kind,
        value: value.to_string(),
    })
}

/// Finds the first line containing a marker and takes the token after it
#[derive(Debug, Clone)]
pub struct MarkerLineExtractor {
    pub mint_marker: String,
    pub account_marker: String,
}

impl Default for MarkerLineExtractor {
    fn default() -> Self {
        Self {
            mint_marker: CREATE_TOKEN_MARKER.to_string(),
            account_marker: CREATE_ACCOUNT_MARKER.to_string(),
        }
    }
}

impl MarkerLineExtractor {
    fn marker(&self, kind: AddressKind) -> &str {
        match kind {
            AddressKind::Mint => &self.mint_marker,
            AddressKind::Account => &self.account_marker,
        }
    }
}

impl AddressExtractor for MarkerLineExtractor {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn extract(&self, kind: AddressKind, stdout: &str) -> Result<String, ExtractionError> {
        let marker = self.marker(kind);
        let not_found = || ExtractionError::MarkerNotFound {
            kind,
            marker: marker.to_string(),
        };

        let line = stdout
            .lines()
            .find(|line| line.contains(marker))
            .ok_or_else(not_found)?;

        // Older releases end the line with the address; newer ones append
        // "under program <id>", so take the token right after the marker.
        let (_, rest) = line.split_once(marker).ok_or_else(not_found)?;
        let token = rest.split_whitespace().next().ok_or_else(not_found)?;

        validated(kind, token)
    }
}

/// Reads a string field from a JSON object
#[derive(Debug, Clone)]
pub struct JsonFieldExtractor {
    pub field: String,
}

impl Default for JsonFieldExtractor {
    fn default() -> Self {
        Self {
            field: JSON_ADDRESS_FIELD.to_string(),
        }
    }
}

impl AddressExtractor for JsonFieldExtractor {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn extract(&self, kind: AddressKind, stdout: &str) -> Result<String, ExtractionError> {
        let value: serde_json::Value = serde_json::from_str(stdout.trim())
            .map_err(|source| ExtractionError::MalformedJson { kind, source })?;

        let address = value
            .get(&self.field)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ExtractionError::MissingField {
                kind,
                field: self.field.clone(),
            })?;

        validated(kind, address)
    }
}
