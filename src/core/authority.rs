//! Mint authorities that can be permanently disabled

use serde::{Deserialize, Serialize};
use std::fmt;

/// A privilege held over a mint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    /// Right to mint further supply
    Mint,
    /// Right to freeze holder accounts
    Freeze,
}

impl Authority {
    /// Authority type argument understood by `spl-token authorize`
    pub fn as_arg(&self) -> &'static str {
        match self {
            Authority::Mint => "mint",
            Authority::Freeze => "freeze",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Authority::Mint => "Mint Authority",
            Authority::Freeze => "Freeze Authority",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}
