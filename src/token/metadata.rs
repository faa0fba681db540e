//! Token metadata record
//!
//! Local bookkeeping only; nothing here is written on-chain.

use crate::core::Network;
use crate::token::TokenRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive record of a created token (immutable after creation)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    /// Token name (e.g., "My Token")
    pub name: String,
    /// Token symbol (e.g., "MTK")
    pub symbol: String,
    /// Free-form description, may be empty
    pub description: String,
    /// Image URL, may be empty
    pub image: String,
    /// Mint address
    pub mint: String,
    /// Decimal places chosen at creation
    pub decimals: u8,
    /// Timestamp when recorded
    pub created_at: DateTime<Utc>,
    /// Network the mint lives on
    pub network: Network,
}

impl TokenMetadata {
    /// Build the record for a freshly created mint
    pub fn from_request(request: &TokenRequest, mint: &str, network: Network) -> Self {
        Self {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            description: request.description.clone(),
            image: request.image_url.clone(),
            mint: mint.to_string(),
            decimals: request.decimals,
            created_at: Utc::now(),
            network,
        }
    }
}
