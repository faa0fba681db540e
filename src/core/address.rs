//! Address validation
//!
//! Solana addresses are base58 encodings of 32-byte public keys. Anything
//! scraped from tool output or typed on the command line is checked here
//! before it is used as the key for further calls.

use thiserror::Error;

/// Length in bytes of a decoded address
pub const ADDRESS_LEN: usize = 32;

/// Address errors
#[derive(Error, Debug, PartialEq)]
pub enum AddressError {
    #[error("Address is empty")]
    Empty,
    #[error("Address is not valid base58: {0}")]
    InvalidEncoding(String),
    #[error("Address decodes to {0} bytes, expected 32")]
    InvalidLength(usize),
}

/// Parse and validate a base58 address, returning it trimmed
pub fn parse_address(input: &str) -> Result<String, AddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }

    let bytes = bs58::decode(trimmed)
        .into_vec()
        .map_err(|_| AddressError::InvalidEncoding(trimmed.to_string()))?;

    if bytes.len() != ADDRESS_LEN {
        return Err(AddressError::InvalidLength(bytes.len()));
    }

    Ok(trimmed.to_string())
}

/// Check whether a string is a well-formed address
pub fn is_valid_address(input: &str) -> bool {
    parse_address(input).is_ok()
}
