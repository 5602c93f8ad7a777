//! # kronos-chain
//!
//! The on-chain boundary of the reward backend: digest construction and
//! ECDSA signing for Relic mint authorizations, plus the read-only chain
//! client trait the authorization service consumes.
//!
//! The digest layout is a bit-exact external contract with the Relics
//! contract's verifier — see [`digest`] before touching any byte of it.
//!
//! ## Modules
//!
//! - [`digest`] — packed-encoding + keccak256 message hash
//! - [`signer`] — [`MintSigner`](signer::MintSigner), the off-chain signing key
//! - [`reader`] — [`ChainReader`](reader::ChainReader) boundary trait + in-memory stub

pub mod digest;
pub mod reader;
pub mod signer;

use std::str::FromStr;

use alloy::primitives::Address;

/// Error types for chain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// A chain read failed or timed out. Transient; the whole request
    /// should be retried by the caller.
    #[error("chain unavailable: {0}")]
    Unavailable(String),

    /// A wallet or contract address string did not parse.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The configured signing key is malformed. The key itself is never
    /// included in the message.
    #[error("invalid signing key")]
    InvalidKey,

    /// Signature production failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Convenience result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Parse a 0x-prefixed EVM address.
pub fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s).map_err(|_| ChainError::InvalidAddress(s.to_string()))
}
