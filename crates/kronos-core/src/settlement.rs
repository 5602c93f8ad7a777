//! Settlement enqueuer and activity-session completion.
//!
//! The queue is append-only from this side: these services create
//! `pending` rows and read them back for status reporting. Every later
//! transition belongs to the external relayer (see
//! `kronos_db::queries::settlements`).

use std::sync::Arc;

use alloy::primitives::U256;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use kronos_db::queries::{settlements, users};
use kronos_rewards::payout;
use kronos_types::settlement::{RewardSettlement, SettlementReason};
use kronos_types::{UserId, DEFAULT_SETTLEMENT_LIMIT};

use crate::{CoreError, Result};

/// Outcome of a completed activity session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Queued reward in smallest token units, exact decimal string.
    pub reward_wei: String,
    /// Row id of the queued settlement.
    pub settlement_id: i64,
}

/// Appends reward payout intents to the settlement queue.
pub struct SettlementService {
    db: Arc<Mutex<Connection>>,
}

impl SettlementService {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    /// Queue a reward payout for the relayer.
    ///
    /// Rejects non-positive amounts; everything else is a pure append.
    pub async fn enqueue(
        &self,
        user_id: UserId,
        wallet_address: &str,
        amount: U256,
        reason: SettlementReason,
        origin_ref: Option<i64>,
        now: u64,
    ) -> Result<i64> {
        if amount.is_zero() {
            return Err(CoreError::Validation("amount must be positive".into()));
        }

        let conn = self.db.lock().await;
        let id = settlements::insert(
            &conn,
            user_id,
            wallet_address,
            &amount.to_string(),
            reason,
            origin_ref,
            now,
        )?;
        tracing::info!(user_id, settlement_id = id, reason = reason.as_str(), "settlement queued");
        Ok(id)
    }

    /// Complete an activity session: record the accruals and queue the
    /// session reward.
    pub async fn complete_session(
        &self,
        user_id: UserId,
        valid_seconds: u64,
        points: u64,
        now: u64,
    ) -> Result<SessionOutcome> {
        if valid_seconds == 0 {
            return Err(CoreError::Validation("invalid session duration".into()));
        }

        let reward = payout::session_reward_wei(valid_seconds);

        let conn = self.db.lock().await;
        let user = users::find_by_id(&conn, user_id)?
            .ok_or(CoreError::UserNotFound(user_id))?;
        let wallet = user
            .wallet_address
            .ok_or(CoreError::WalletNotLinked(user_id))?;

        users::add_accruals(&conn, user_id, points, valid_seconds)?;
        let settlement_id = settlements::insert(
            &conn,
            user_id,
            &wallet,
            &reward.to_string(),
            SettlementReason::SessionReward,
            None,
            now,
        )?;

        tracing::info!(user_id, valid_seconds, settlement_id, "session completed");
        Ok(SessionOutcome {
            reward_wei: reward.to_string(),
            settlement_id,
        })
    }

    /// A user's settlements, newest first. `limit` defaults to 50.
    pub async fn list_settlements(
        &self,
        user_id: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<RewardSettlement>> {
        let conn = self.db.lock().await;
        Ok(settlements::list_for_user(
            &conn,
            user_id,
            limit.unwrap_or(DEFAULT_SETTLEMENT_LIMIT),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kronos_types::settlement::SettlementStatus;

    const WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    async fn fixture() -> (SettlementService, Arc<Mutex<Connection>>, UserId) {
        let conn = kronos_db::open_memory().expect("open db");
        let user = users::create(&conn, "a@example.com", Some(WALLET), 0).expect("user");
        let db = Arc::new(Mutex::new(conn));
        (SettlementService::new(db.clone()), db, user.id)
    }

    #[tokio::test]
    async fn test_enqueue_rejects_zero_amount() {
        let (service, _db, user_id) = fixture().await;
        assert!(matches!(
            service
                .enqueue(user_id, WALLET, U256::ZERO, SettlementReason::StreakBonus, None, 100)
                .await,
            Err(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_enqueue_appends_pending_row() {
        let (service, _db, user_id) = fixture().await;
        let id = service
            .enqueue(
                user_id,
                WALLET,
                U256::from(5u64),
                SettlementReason::GymBonus,
                Some(77),
                100,
            )
            .await
            .expect("enqueue");

        let rows = service.list_settlements(user_id, None).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].status, SettlementStatus::Pending);
        assert_eq!(rows[0].origin_ref, Some(77));
    }

    #[tokio::test]
    async fn test_session_reward_is_exact() {
        let (service, _db, user_id) = fixture().await;
        // 20 seconds = exactly one token
        let outcome = service
            .complete_session(user_id, 20, 10, 100)
            .await
            .expect("session");
        assert_eq!(outcome.reward_wei, "1000000000000000000");

        let rows = service.list_settlements(user_id, None).await.expect("list");
        assert_eq!(rows[0].amount, "1000000000000000000");
        assert_eq!(rows[0].reason, SettlementReason::SessionReward);
    }

    #[tokio::test]
    async fn test_session_updates_accruals() {
        let (service, db, user_id) = fixture().await;
        service.complete_session(user_id, 90, 12, 100).await.expect("session");

        let conn = db.lock().await;
        let user = users::find_by_id(&conn, user_id).expect("query").expect("user");
        assert_eq!(user.active_seconds, 90);
        assert_eq!(user.aura_points, 12);
    }

    #[tokio::test]
    async fn test_zero_length_session_rejected() {
        let (service, _db, user_id) = fixture().await;
        assert!(matches!(
            service.complete_session(user_id, 0, 5, 100).await,
            Err(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_session_requires_wallet() {
        let (service, db, _user_id) = fixture().await;
        let bare = {
            let conn = db.lock().await;
            users::create(&conn, "nowallet@example.com", None, 0).expect("user")
        };
        assert!(matches!(
            service.complete_session(bare.id, 20, 0, 100).await,
            Err(CoreError::WalletNotLinked(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_respects_limit_and_order() {
        let (service, _db, user_id) = fixture().await;
        for i in 0..4u64 {
            service
                .enqueue(
                    user_id,
                    WALLET,
                    U256::from(i + 1),
                    SettlementReason::SessionReward,
                    None,
                    100 + i,
                )
                .await
                .expect("enqueue");
        }

        let rows = service.list_settlements(user_id, Some(2)).await.expect("list");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].created_at, 103);
        assert_eq!(rows[1].created_at, 102);
    }
}
