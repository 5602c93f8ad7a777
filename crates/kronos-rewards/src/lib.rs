//! # kronos-rewards
//!
//! The eligibility evaluator: pure mappings from accumulated activity time
//! to Relic tiers and token payouts. No I/O, no clocks — callers supply
//! the accrued totals.
//!
//! ## Modules
//!
//! - [`tiers`] — Relic tier thresholds and eligibility checks
//! - [`payout`] — exact session-reward arithmetic in smallest token units

pub mod payout;
pub mod tiers;

use kronos_types::RewardId;

/// Error types for reward evaluation.
#[derive(Debug, thiserror::Error)]
pub enum RewardsError {
    /// The reward tier id is outside the supported domain.
    #[error("invalid reward tier: {0}")]
    InvalidTier(RewardId),
}

/// Convenience result type for reward evaluation.
pub type Result<T> = std::result::Result<T, RewardsError>;
