//! Relic tier thresholds.
//!
//! Five collectible tiers, each gated by cumulative valid activity time:
//!
//! | Tier | Relic          | Required |
//! |------|----------------|----------|
//! | 1    | Bronze Shield  | 1 minute |
//! | 2    | Silver Helmet  | 10 minutes |
//! | 3    | Gold Sword     | 1 hour |
//! | 4    | Diamond Crown  | 10 hours |
//! | 5    | Kronos Slayer  | 100 hours |
//!
//! Thresholds are strictly increasing in tier id.

use kronos_types::{RewardId, MAX_REWARD_ID, MIN_REWARD_ID};

use crate::{Result, RewardsError};

/// Required activity seconds per tier, indexed by `tier - 1`.
pub const TIER_THRESHOLDS: [u64; 5] = [60, 600, 3_600, 36_000, 360_000];

/// Whether a tier id is in the supported domain.
pub fn is_valid_tier(reward_id: RewardId) -> bool {
    (MIN_REWARD_ID..=MAX_REWARD_ID).contains(&reward_id)
}

/// Seconds of valid activity required to unlock a tier.
pub fn required_seconds(reward_id: RewardId) -> Result<u64> {
    if !is_valid_tier(reward_id) {
        return Err(RewardsError::InvalidTier(reward_id));
    }
    Ok(TIER_THRESHOLDS[(reward_id - 1) as usize])
}

/// Whether the accumulated activity time unlocks the given tier.
pub fn is_eligible(reward_id: RewardId, accumulated_seconds: u64) -> Result<bool> {
    Ok(accumulated_seconds >= required_seconds(reward_id)?)
}
