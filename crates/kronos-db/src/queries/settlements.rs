//! Reward settlement queue query functions.
//!
//! The reward core only appends `pending` rows and reads them back for
//! status reporting. The claim/complete/fail transitions live here too
//! because the external relayer drains the queue through this crate, but
//! nothing in the core services calls them.

use rusqlite::{Connection, OptionalExtension, Row};

use kronos_types::settlement::{RewardSettlement, SettlementReason, SettlementStatus};
use kronos_types::UserId;

use crate::{DbError, Result};

const SETTLEMENT_COLUMNS: &str = "id, user_id, wallet_address, amount, reason, origin_ref, \
     status, created_at, processed_at, tx_ref, error_detail, retry_count";

fn row_to_settlement(row: &Row) -> rusqlite::Result<RewardSettlement> {
    let reason: String = row.get(4)?;
    let reason: SettlementReason = reason.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let status: String = row.get(6)?;
    let status: SettlementStatus = status.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(RewardSettlement {
        id: row.get(0)?,
        user_id: row.get(1)?,
        wallet_address: row.get(2)?,
        amount: row.get(3)?,
        reason,
        origin_ref: row.get(5)?,
        status,
        created_at: row.get::<_, i64>(7)? as u64,
        processed_at: row.get::<_, Option<i64>>(8)?.map(|t| t as u64),
        tx_ref: row.get(9)?,
        error_detail: row.get(10)?,
        retry_count: row.get::<_, i64>(11)? as u32,
    })
}

/// Append a `pending` settlement and return its row id.
///
/// `amount` is an exact base-10 integer string in smallest token units.
/// Positivity is validated by the enqueuing service, not here.
pub fn insert(
    conn: &Connection,
    user_id: UserId,
    wallet_address: &str,
    amount: &str,
    reason: SettlementReason,
    origin_ref: Option<i64>,
    created_at: u64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO reward_settlements
             (user_id, wallet_address, amount, reason, origin_ref, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)",
        rusqlite::params![
            user_id,
            wallet_address,
            amount,
            reason.as_str(),
            origin_ref,
            created_at as i64,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetch a settlement by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<RewardSettlement>> {
    let row = conn
        .query_row(
            &format!("SELECT {SETTLEMENT_COLUMNS} FROM reward_settlements WHERE id = ?1"),
            [id],
            row_to_settlement,
        )
        .optional()?;
    Ok(row)
}

/// List a user's settlements, newest first, up to `limit`.
pub fn list_for_user(
    conn: &Connection,
    user_id: UserId,
    limit: u32,
) -> Result<Vec<RewardSettlement>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SETTLEMENT_COLUMNS} FROM reward_settlements
         WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2"
    ))?;

    let rows = stmt
        .query_map(rusqlite::params![user_id, limit], row_to_settlement)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Claim the oldest `pending` settlement for processing (relayer side).
///
/// Returns `None` when the queue is empty.
pub fn claim_next_pending(conn: &Connection) -> Result<Option<RewardSettlement>> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM reward_settlements WHERE status = 'pending'
             ORDER BY created_at ASC, id ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let Some(id) = id else {
        return Ok(None);
    };

    let updated = conn.execute(
        "UPDATE reward_settlements SET status = 'processing'
         WHERE id = ?1 AND status = 'pending'",
        [id],
    )?;
    if updated == 0 {
        // Another consumer claimed it between the two statements
        return Ok(None);
    }
    get(conn, id)
}

/// Terminal success: `processing → completed`, stamping `processed_at`
/// and the transaction reference (relayer side).
pub fn mark_completed(conn: &Connection, id: i64, tx_ref: &str, processed_at: u64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE reward_settlements SET status = 'completed', tx_ref = ?1, processed_at = ?2
         WHERE id = ?3 AND status = 'processing'",
        rusqlite::params![tx_ref, processed_at as i64, id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("processing settlement {id}")));
    }
    Ok(())
}

/// Terminal failure: `processing → failed`, recording the error and
/// incrementing the retry counter (relayer side).
pub fn mark_failed(conn: &Connection, id: i64, error_detail: &str, processed_at: u64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE reward_settlements
         SET status = 'failed', error_detail = ?1, processed_at = ?2,
             retry_count = retry_count + 1
         WHERE id = ?3 AND status = 'processing'",
        rusqlite::params![error_detail, processed_at as i64, id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("processing settlement {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users;

    const WALLET: &str = "0xabc0000000000000000000000000000000000abc";

    fn test_db() -> (Connection, UserId) {
        let conn = crate::open_memory().expect("open test db");
        let user = users::create(&conn, "a@example.com", Some(WALLET), 0).expect("create user");
        (conn, user.id)
    }

    #[test]
    fn test_insert_and_get() {
        let (conn, user_id) = test_db();
        let id = insert(
            &conn,
            user_id,
            WALLET,
            "1000000000000000000",
            SettlementReason::SessionReward,
            None,
            100,
        )
        .expect("insert");

        let row = get(&conn, id).expect("query").expect("found");
        assert_eq!(row.status, SettlementStatus::Pending);
        assert_eq!(row.amount, "1000000000000000000");
        assert_eq!(row.retry_count, 0);
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let (conn, user_id) = test_db();
        for i in 0..5u64 {
            insert(
                &conn,
                user_id,
                WALLET,
                "1",
                SettlementReason::SessionReward,
                None,
                100 + i,
            )
            .expect("insert");
        }

        let rows = list_for_user(&conn, user_id, 3).expect("list");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].created_at, 104);
        assert!(rows.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_claim_takes_oldest() {
        let (conn, user_id) = test_db();
        let first = insert(&conn, user_id, WALLET, "1", SettlementReason::SessionReward, None, 100)
            .expect("insert");
        insert(&conn, user_id, WALLET, "2", SettlementReason::SessionReward, None, 200)
            .expect("insert");

        let claimed = claim_next_pending(&conn).expect("claim").expect("row");
        assert_eq!(claimed.id, first);
        assert_eq!(claimed.status, SettlementStatus::Processing);
    }

    #[test]
    fn test_claim_empty_queue() {
        let (conn, _) = test_db();
        assert!(claim_next_pending(&conn).expect("claim").is_none());
    }

    #[test]
    fn test_complete_stamps_terminal_fields() {
        let (conn, user_id) = test_db();
        let id = insert(&conn, user_id, WALLET, "1", SettlementReason::SessionReward, None, 100)
            .expect("insert");
        claim_next_pending(&conn).expect("claim").expect("row");
        mark_completed(&conn, id, "0xtx", 150).expect("complete");

        let row = get(&conn, id).expect("query").expect("found");
        assert_eq!(row.status, SettlementStatus::Completed);
        assert_eq!(row.processed_at, Some(150));
        assert_eq!(row.tx_ref.as_deref(), Some("0xtx"));
    }

    #[test]
    fn test_failure_increments_retry_count() {
        let (conn, user_id) = test_db();
        let id = insert(&conn, user_id, WALLET, "1", SettlementReason::SessionReward, None, 100)
            .expect("insert");
        claim_next_pending(&conn).expect("claim").expect("row");
        mark_failed(&conn, id, "rpc timeout", 150).expect("fail");

        let row = get(&conn, id).expect("query").expect("found");
        assert_eq!(row.status, SettlementStatus::Failed);
        assert_eq!(row.retry_count, 1);
        assert_eq!(row.error_detail.as_deref(), Some("rpc timeout"));
    }

    #[test]
    fn test_terminal_transitions_require_processing() {
        let (conn, user_id) = test_db();
        let id = insert(&conn, user_id, WALLET, "1", SettlementReason::SessionReward, None, 100)
            .expect("insert");
        // Still pending: neither terminal transition applies
        assert!(mark_completed(&conn, id, "0xtx", 150).is_err());
        assert!(mark_failed(&conn, id, "boom", 150).is_err());
    }

    #[test]
    fn test_huge_amount_preserved_exactly() {
        let (conn, user_id) = test_db();
        // 10^60 smallest units, far beyond any native integer column
        let amount = format!("1{}", "0".repeat(60));
        let id = insert(&conn, user_id, WALLET, &amount, SettlementReason::StreakBonus, None, 100)
            .expect("insert");
        let row = get(&conn, id).expect("query").expect("found");
        assert_eq!(row.amount, amount);
    }
}
