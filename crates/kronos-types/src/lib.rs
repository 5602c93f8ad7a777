//! # kronos-types
//!
//! Shared domain types used across the Kronos reward backend workspace.
//! All timestamps are Unix epoch seconds (u64); all token amounts are
//! integers in the token's smallest unit (18 decimals), carried as decimal
//! strings once they leave arithmetic code.

pub mod authorization;
pub mod settlement;
pub mod user;

/// Database row id for a user.
pub type UserId = i64;

/// Relic reward tier id (1..=5).
pub type RewardId = u64;

/// Decimal places of the reward token.
pub const TOKEN_DECIMALS: u32 = 18;

/// Lowest valid Relic reward tier.
pub const MIN_REWARD_ID: RewardId = 1;

/// Highest valid Relic reward tier.
pub const MAX_REWARD_ID: RewardId = 5;

/// Default validity window for a mint authorization (1 hour).
pub const DEFAULT_AUTH_WINDOW_SECS: u64 = 3600;

/// Default page size for settlement listings.
pub const DEFAULT_SETTLEMENT_LIMIT: u32 = 50;

/// A stored status string did not match any known variant.
#[derive(Debug, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct InvalidStatus(pub String);
