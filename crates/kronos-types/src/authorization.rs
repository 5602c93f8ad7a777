//! Mint authorization records and views.

use serde::{Deserialize, Serialize};

use crate::{InvalidStatus, RewardId, UserId};

/// Lifecycle state of a mint authorization.
///
/// `Pending` is the only live state. `Used` and `Expired` are terminal;
/// no transition leaves either of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    Pending,
    Used,
    Expired,
}

impl AuthorizationStatus {
    /// Stable string form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Used => "used",
            Self::Expired => "expired",
        }
    }
}

impl std::str::FromStr for AuthorizationStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "used" => Ok(Self::Used),
            "expired" => Ok(Self::Expired),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// A durable record of an issued mint signature.
///
/// At most one `pending` authorization may exist per `(user_id, reward_id)`
/// at any time; the storage layer enforces this with a partial unique index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MintAuthorization {
    pub id: i64,
    pub user_id: UserId,
    /// 0x-prefixed EVM address the signature is bound to.
    pub wallet_address: String,
    pub reward_id: RewardId,
    /// On-chain replay counter value at issuance time.
    pub nonce: u64,
    /// Absolute expiry, Unix epoch seconds.
    pub deadline: u64,
    /// 0x-prefixed 65-byte r‖s‖v signature hex.
    pub signature: String,
    pub status: AuthorizationStatus,
    pub created_at: u64,
    pub used_at: Option<u64>,
    /// Transaction reference reported by the client on confirmation.
    pub tx_ref: Option<String>,
}

/// The caller-facing slice of an authorization: everything the client
/// needs to submit the mint transaction, nothing else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintGrant {
    pub signature: String,
    pub nonce: u64,
    pub deadline: u64,
    pub reward_id: RewardId,
}

impl From<&MintAuthorization> for MintGrant {
    fn from(auth: &MintAuthorization) -> Self {
        Self {
            signature: auth.signature.clone(),
            nonce: auth.nonce,
            deadline: auth.deadline,
            reward_id: auth.reward_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            AuthorizationStatus::Pending,
            AuthorizationStatus::Used,
            AuthorizationStatus::Expired,
        ] {
            let parsed: AuthorizationStatus =
                status.as_str().parse().expect("parse status");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("revoked".parse::<AuthorizationStatus>().is_err());
    }
}
