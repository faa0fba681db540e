//! Token creation parameters
//!
//! Everything is checked before the first external call so that a bad
//! argument never leaves a half-created token behind.

use crate::core::Authority;
use std::path::PathBuf;
use thiserror::Error;

/// Highest decimal precision the token program accepts here
pub const MAX_DECIMALS: u8 = 9;

/// Precision used when none is given
pub const DEFAULT_DECIMALS: u8 = 9;

/// Initial supply used when none is given
pub const DEFAULT_SUPPLY: u64 = 1_000_000;

/// Request validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Wallet file not found: {0}")]
    WalletNotFound(PathBuf),
    #[error("Decimals must be between 0 and 9, got {0}")]
    InvalidDecimals(u8),
    #[error("Supply must be greater than 0")]
    InvalidSupply,
    #[error("Token name must not be empty")]
    EmptyName,
    #[error("Token symbol must not be empty")]
    EmptySymbol,
}

/// Parameters for one token creation run
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRequest {
    pub wallet_path: PathBuf,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image_url: String,
    pub supply: u64,
    pub decimals: u8,
    pub revoke_mint_authority: bool,
    pub revoke_freeze_authority: bool,
}

impl TokenRequest {
    /// Request with default supply, decimals and no revocations
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        wallet_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            wallet_path: wallet_path.into(),
            name: name.into(),
            symbol: symbol.into(),
            description: String::new(),
            image_url: String::new(),
            supply: DEFAULT_SUPPLY,
            decimals: DEFAULT_DECIMALS,
            revoke_mint_authority: false,
            revoke_freeze_authority: false,
        }
    }

    pub fn with_supply(mut self, supply: u64) -> Self {
        self.supply = supply;
        self
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Ask for `authority` to be disabled after creation
    pub fn revoking(mut self, authority: Authority) -> Self {
        match authority {
            Authority::Mint => self.revoke_mint_authority = true,
            Authority::Freeze => self.revoke_freeze_authority = true,
        }
        self
    }

    /// Authorities to disable, mint first
    pub fn revocations(&self) -> Vec<Authority> {
        let mut authorities = Vec::new();
        if self.revoke_mint_authority {
            authorities.push(Authority::Mint);
        }
        if self.revoke_freeze_authority {
            authorities.push(Authority::Freeze);
        }
        authorities
    }

    /// Check every parameter; touches only the filesystem
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.wallet_path.exists() {
            return Err(ValidationError::WalletNotFound(self.wallet_path.clone()));
        }

        if self.decimals > MAX_DECIMALS {
            return Err(ValidationError::InvalidDecimals(self.decimals));
        }

        if self.supply == 0 {
            return Err(ValidationError::InvalidSupply);
        }

        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        if self.symbol.trim().is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        Ok(())
    }
}
