//! Read-only chain client boundary.
//!
//! The authorization service needs exactly two reads from the Relics
//! contract: the per-wallet replay nonce and the per-(wallet, tier) claim
//! flag. Both must come from the live chain on every request — a cached
//! nonce produces a signature the contract will reject, and a cached
//! claim flag can authorize a double mint.
//!
//! The real RPC-backed implementation lives with the deployment that owns
//! the RPC endpoint; this crate ships only the trait and an in-memory
//! stub for tests and local development.

use std::collections::HashMap;

use alloy::primitives::Address;
use async_trait::async_trait;
use tokio::sync::Mutex;

use kronos_types::RewardId;

use crate::Result;

/// Read-only view of the Relics contract state.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Current replay nonce for a wallet.
    async fn nonce_of(&self, wallet: Address) -> Result<u64>;

    /// Whether the wallet has already claimed the given Relic tier.
    async fn has_claimed(&self, wallet: Address, reward_id: RewardId) -> Result<bool>;
}

/// An in-memory chain stub for tests and local development.
///
/// Nonces and claim flags are set explicitly; everything defaults to
/// nonce 0 / unclaimed.
#[derive(Debug, Default)]
pub struct StubChain {
    state: Mutex<StubState>,
}

#[derive(Debug, Default)]
struct StubState {
    nonces: HashMap<Address, u64>,
    claimed: HashMap<(Address, RewardId), bool>,
}

impl StubChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the replay nonce for a wallet.
    pub async fn set_nonce(&self, wallet: Address, nonce: u64) {
        self.state.lock().await.nonces.insert(wallet, nonce);
    }

    /// Mark a Relic tier as claimed for a wallet.
    pub async fn set_claimed(&self, wallet: Address, reward_id: RewardId) {
        self.state.lock().await.claimed.insert((wallet, reward_id), true);
    }
}

#[async_trait]
impl ChainReader for StubChain {
    async fn nonce_of(&self, wallet: Address) -> Result<u64> {
        Ok(self.state.lock().await.nonces.get(&wallet).copied().unwrap_or(0))
    }

    async fn has_claimed(&self, wallet: Address, reward_id: RewardId) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .await
            .claimed
            .get(&(wallet, reward_id))
            .copied()
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn wallet() -> Address {
        Address::from_str("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").expect("address")
    }

    #[tokio::test]
    async fn test_stub_defaults() {
        let chain = StubChain::new();
        assert_eq!(chain.nonce_of(wallet()).await.expect("nonce"), 0);
        assert!(!chain.has_claimed(wallet(), 1).await.expect("claimed"));
    }

    #[tokio::test]
    async fn test_stub_set_and_read() {
        let chain = StubChain::new();
        chain.set_nonce(wallet(), 4).await;
        chain.set_claimed(wallet(), 2).await;
        assert_eq!(chain.nonce_of(wallet()).await.expect("nonce"), 4);
        assert!(chain.has_claimed(wallet(), 2).await.expect("claimed"));
        assert!(!chain.has_claimed(wallet(), 3).await.expect("other tier"));
    }
}
