//! The off-chain mint signing key.
//!
//! Wraps a secp256k1 key held in process memory for the process lifetime.
//! Signing follows the contract's expectations: the packed mint digest
//! ([`crate::digest::mint_digest`]) is signed as an EIP-191 personal
//! message, yielding a 65-byte r‖s‖v signature. ECDSA here is RFC 6979
//! deterministic, so identical inputs under the same key always produce
//! the identical signature.
//!
//! The raw key never appears in logs, `Debug` output, or return values.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use kronos_types::RewardId;

use crate::digest::mint_digest;
use crate::{ChainError, Result};

/// Holds the reward backend's signing key and produces mint signatures.
pub struct MintSigner {
    inner: PrivateKeySigner,
}

impl MintSigner {
    /// Load a signer from a 0x-prefixed 32-byte private key hex string.
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let inner: PrivateKeySigner =
            key_hex.parse().map_err(|_| ChainError::InvalidKey)?;
        tracing::info!(signer = %inner.address(), "mint signer loaded");
        Ok(Self { inner })
    }

    /// Generate a random signer (tests and local development).
    pub fn random() -> Self {
        Self {
            inner: PrivateKeySigner::random(),
        }
    }

    /// The EVM address derived from the signing key. The contract holds
    /// this address as its trusted signer.
    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Sign a mint authorization for `(wallet, reward_id, nonce, deadline)`.
    ///
    /// Returns the 0x-prefixed 65-byte r‖s‖v signature hex. Callers must
    /// have verified the on-chain claim state first; this function does
    /// no eligibility checking of its own.
    pub fn sign_mint(
        &self,
        wallet: Address,
        reward_id: RewardId,
        nonce: u64,
        deadline: u64,
    ) -> Result<String> {
        let digest = mint_digest(wallet, reward_id, nonce, deadline);
        let signature = self
            .inner
            .sign_message_sync(digest.as_slice())
            .map_err(|e| ChainError::Signing(e.to_string()))?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}

impl std::fmt::Debug for MintSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MintSigner")
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn wallet() -> Address {
        Address::from_str("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").expect("address")
    }

    #[test]
    fn test_signature_format() {
        let signer = MintSigner::random();
        let sig = signer.sign_mint(wallet(), 1, 0, 1_700_003_600).expect("sign");
        assert!(sig.starts_with("0x"));
        // 65 bytes = 130 hex chars + prefix
        assert_eq!(sig.len(), 132);
    }

    #[test]
    fn test_signature_deterministic() {
        let signer = MintSigner::random();
        let a = signer.sign_mint(wallet(), 2, 5, 1_700_003_600).expect("sign");
        let b = signer.sign_mint(wallet(), 2, 5, 1_700_003_600).expect("sign");
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_varies_with_inputs() {
        let signer = MintSigner::random();
        let a = signer.sign_mint(wallet(), 2, 5, 1_700_003_600).expect("sign");
        let b = signer.sign_mint(wallet(), 2, 6, 1_700_003_600).expect("sign");
        assert_ne!(a, b);
    }

    #[test]
    fn test_bad_key_rejected() {
        assert!(MintSigner::from_hex("0xdeadbeef").is_err());
        assert!(MintSigner::from_hex("not hex at all").is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = MintSigner::random();
        let debug = format!("{signer:?}");
        assert!(debug.contains("address"));
        // The debug form is the derived address only, far shorter than
        // anything that could carry 32 bytes of key material.
        assert!(debug.len() < 100);
    }
}
