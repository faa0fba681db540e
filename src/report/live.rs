//! On-chain state fetched at report time

use crate::tool::{CommandRunner, LedgerCli};
use serde_json::Value;

/// Placeholder when the supply query fails
pub const UNKNOWN_SUPPLY: &str = "Unknown";

/// Current supply and raw account state of a mint
#[derive(Debug, Clone, PartialEq)]
pub struct LiveInfo {
    pub supply: String,
    pub account_info: Value,
}

impl Default for LiveInfo {
    fn default() -> Self {
        Self {
            supply: UNKNOWN_SUPPLY.to_string(),
            account_info: Value::Object(Default::default()),
        }
    }
}

impl LiveInfo {
    /// Query both values. Each failure falls back independently and is
    /// only logged.
    pub fn fetch<R: CommandRunner + ?Sized>(runner: &mut R, cli: &LedgerCli, mint: &str) -> Self {
        let mut info = Self::default();

        match runner.run(&cli.supply(mint)) {
            Ok(output) => info.supply = output.stdout.trim().to_string(),
            Err(e) => log::warn!("Error getting token supply: {}", e),
        }

        match runner.run(&cli.account_info(mint)) {
            Ok(output) => match serde_json::from_str::<Value>(&output.stdout) {
                Ok(value) => info.account_info = value,
                Err(e) => log::warn!("Error parsing account info: {}", e),
            },
            Err(e) => log::warn!("Error getting account info: {}", e),
        }

        info
    }
}
