//! Core types shared by every command
//!
//! This module contains the small vocabulary the rest of the crate speaks:
//! - Networks (cluster monikers and explorer links)
//! - Addresses (base58 public key validation)
//! - Authorities (the mint privileges that can be revoked)

pub mod address;
pub mod authority;
pub mod network;

pub use address::{is_valid_address, parse_address, AddressError, ADDRESS_LEN};
pub use authority::Authority;
pub use network::{Network, EXPLORER_BASE_URL};
