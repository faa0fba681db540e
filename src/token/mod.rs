//! Token descriptions
//!
//! What the operator asks for and what gets recorded once a mint exists:
//! - [`TokenRequest`]: validated creation parameters
//! - [`TokenMetadata`]: the finalized record persisted next to the log
//!
//! # Example
//!
//! ```ignore
//! use token_forge::token::TokenRequest;
//!
//! let request = TokenRequest::new("My Token", "MTK", "wallet.json")
//!     .with_supply(1_000_000)
//!     .with_decimals(6);
//! request.validate()?;
//! ```

pub mod metadata;
pub mod request;

pub use metadata::TokenMetadata;
pub use request::{
    TokenRequest, ValidationError, DEFAULT_DECIMALS, DEFAULT_SUPPLY, MAX_DECIMALS,
};
