//! Reward settlement queue entries.

use serde::{Deserialize, Serialize};

use crate::{InvalidStatus, UserId};

/// Queue state of a reward settlement.
///
/// The core only ever creates `Pending` rows; the external relayer owns
/// every later transition (`Pending → Processing → Completed | Failed`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl SettlementStatus {
    /// Stable string form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for SettlementStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Why a settlement was queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementReason {
    SessionReward,
    StreakBonus,
    GymBonus,
}

impl SettlementReason {
    /// Stable string form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionReward => "session_reward",
            Self::StreakBonus => "streak_bonus",
            Self::GymBonus => "gym_bonus",
        }
    }
}

impl std::str::FromStr for SettlementReason {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session_reward" => Ok(Self::SessionReward),
            "streak_bonus" => Ok(Self::StreakBonus),
            "gym_bonus" => Ok(Self::GymBonus),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// One payout intent awaiting blockchain submission.
///
/// `amount` is an exact base-10 integer in smallest token units, kept as a
/// string end to end — U256-range values do not fit native integer columns
/// and must never pass through floating point.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewardSettlement {
    pub id: i64,
    pub user_id: UserId,
    pub wallet_address: String,
    pub amount: String,
    pub reason: SettlementReason,
    /// Optional link to the originating activity record.
    pub origin_ref: Option<i64>,
    pub status: SettlementStatus,
    pub created_at: u64,
    pub processed_at: Option<u64>,
    pub tx_ref: Option<String>,
    pub error_detail: Option<String>,
    pub retry_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            SettlementStatus::Pending,
            SettlementStatus::Processing,
            SettlementStatus::Completed,
            SettlementStatus::Failed,
        ] {
            let parsed: SettlementStatus =
                status.as_str().parse().expect("parse status");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_reason_roundtrip() {
        for reason in [
            SettlementReason::SessionReward,
            SettlementReason::StreakBonus,
            SettlementReason::GymBonus,
        ] {
            let parsed: SettlementReason =
                reason.as_str().parse().expect("parse reason");
            assert_eq!(parsed, reason);
        }
    }
}
