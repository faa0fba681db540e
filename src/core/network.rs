//! Cluster selection
//!
//! The two networks a token can be provisioned on, and everything that
//! depends on the choice: the moniker handed to the CLI tools and the
//! explorer link printed in banners and reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL of the public block explorer
pub const EXPLORER_BASE_URL: &str = "https://explorer.solana.com/address";

/// Target cluster
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Devnet,
    Mainnet,
}

impl Network {
    /// Short tag recorded in metadata and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Mainnet => "mainnet",
        }
    }

    /// Moniker accepted by `--url` on the `solana` and `spl-token` tools
    pub fn cluster_moniker(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Mainnet => "mainnet-beta",
        }
    }

    /// Capitalised name for display
    pub fn title(&self) -> &'static str {
        match self {
            Network::Devnet => "Devnet",
            Network::Mainnet => "Mainnet",
        }
    }

    /// Explorer link for an address on this network
    pub fn explorer_url(&self, address: &str) -> String {
        match self {
            Network::Mainnet => format!("{}/{}", EXPLORER_BASE_URL, address),
            Network::Devnet => format!("{}/{}?cluster=devnet", EXPLORER_BASE_URL, address),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINT: &str = "So11111111111111111111111111111111111111112";

    #[test]
    fn test_explorer_url_mainnet() {
        assert_eq!(
            Network::Mainnet.explorer_url(MINT),
            "https://explorer.solana.com/address/So11111111111111111111111111111111111111112"
        );
    }

    #[test]
    fn test_explorer_url_devnet() {
        assert_eq!(
            Network::Devnet.explorer_url(MINT),
            "https://explorer.solana.com/address/So11111111111111111111111111111111111111112?cluster=devnet"
        );
    }

    #[test]
    fn test_default_is_devnet() {
        assert_eq!(Network::default(), Network::Devnet);
    }

    #[test]
    fn test_mainnet_moniker() {
        assert_eq!(Network::Mainnet.cluster_moniker(), "mainnet-beta");
        assert_eq!(Network::Mainnet.as_str(), "mainnet");
    }

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_string(&Network::Mainnet).unwrap();
        assert_eq!(json, "\"mainnet\"");
        let back: Network = serde_json::from_str("\"devnet\"").unwrap();
        assert_eq!(back, Network::Devnet);
    }
}
