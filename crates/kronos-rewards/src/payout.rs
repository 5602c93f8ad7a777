//! Session payout arithmetic.
//!
//! One whole reward token per [`SECONDS_PER_TOKEN`] seconds of valid
//! activity, paid in smallest units (18 decimals). Amounts feed on-chain
//! balances, so the math is exact U256 throughout: multiply by the unit
//! scale before dividing by the cadence, never floating point.

use alloy::primitives::U256;

/// Seconds of valid activity per whole reward token.
pub const SECONDS_PER_TOKEN: u64 = 20;

/// Smallest units per whole token (10^18).
pub const TOKEN_UNIT: u64 = 1_000_000_000_000_000_000;

/// Reward for a completed session, in smallest token units.
///
/// Fractional tokens are preserved exactly: `TOKEN_UNIT` is divisible by
/// `SECONDS_PER_TOKEN`, so `seconds * TOKEN_UNIT / SECONDS_PER_TOKEN`
/// never truncates.
pub fn session_reward_wei(valid_seconds: u64) -> U256 {
    U256::from(valid_seconds) * U256::from(TOKEN_UNIT) / U256::from(SECONDS_PER_TOKEN)
}
