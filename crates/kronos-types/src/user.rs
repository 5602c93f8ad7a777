//! User accrual aggregate and verified identity view.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A user row with their running activity totals.
///
/// `active_seconds` is the cumulative valid activity time that feeds
/// reward-tier eligibility. The reward core only reads and increments it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// 0x-prefixed EVM address, if the user has linked a wallet.
    pub wallet_address: Option<String>,
    pub aura_points: u64,
    pub active_seconds: u64,
    pub created_at: u64,
}

/// The outcome of identity-provider token verification.
///
/// Produced by an external verifier; the reward core treats the provider
/// as an opaque collaborator and only consumes this view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Provider-scoped stable subject id.
    pub subject_id: String,
    pub email: String,
    pub wallet_address: Option<String>,
}
