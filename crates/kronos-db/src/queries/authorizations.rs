//! Mint authorization query functions.
//!
//! The partial unique index `idx_auth_one_pending` guarantees at most one
//! `pending` row per `(user_id, reward_id)`. [`insert_pending`] surfaces a
//! lost race as [`DbError::Constraint`] so the service layer can re-read
//! the winning row instead of failing the request.

use rusqlite::{Connection, OptionalExtension, Row};

use kronos_types::authorization::{AuthorizationStatus, MintAuthorization};
use kronos_types::{RewardId, UserId};

use crate::{DbError, Result};

const AUTH_COLUMNS: &str = "id, user_id, wallet_address, reward_id, nonce, deadline, \
     signature, status, created_at, used_at, tx_ref";

fn row_to_auth(row: &Row) -> rusqlite::Result<MintAuthorization> {
    let status: String = row.get(7)?;
    let status: AuthorizationStatus = status.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(MintAuthorization {
        id: row.get(0)?,
        user_id: row.get(1)?,
        wallet_address: row.get(2)?,
        reward_id: row.get::<_, i64>(3)? as RewardId,
        nonce: row.get::<_, i64>(4)? as u64,
        deadline: row.get::<_, i64>(5)? as u64,
        signature: row.get(6)?,
        status,
        created_at: row.get::<_, i64>(8)? as u64,
        used_at: row.get::<_, Option<i64>>(9)?.map(|t| t as u64),
        tx_ref: row.get(10)?,
    })
}

/// Fields of a new pending authorization.
#[derive(Debug)]
pub struct NewAuthorization<'a> {
    pub user_id: UserId,
    pub wallet_address: &'a str,
    pub reward_id: RewardId,
    pub nonce: u64,
    pub deadline: u64,
    pub signature: &'a str,
    pub created_at: u64,
}

/// Insert a fresh `pending` authorization and return the stored row.
///
/// Fails with [`DbError::Constraint`] if another `pending` row already
/// exists for the same `(user_id, reward_id)`.
pub fn insert_pending(conn: &Connection, auth: &NewAuthorization) -> Result<MintAuthorization> {
    conn.execute(
        "INSERT INTO mint_authorizations
             (user_id, wallet_address, reward_id, nonce, deadline, signature, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7)",
        rusqlite::params![
            auth.user_id,
            auth.wallet_address,
            auth.reward_id as i64,
            auth.nonce as i64,
            auth.deadline as i64,
            auth.signature,
            auth.created_at as i64,
        ],
    )
    .map_err(|e| crate::map_insert_err(e, "pending authorization already exists"))?;

    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {AUTH_COLUMNS} FROM mint_authorizations WHERE id = ?1"),
        [id],
        row_to_auth,
    )
    .map_err(DbError::Sqlite)
}

/// Find the live `pending` authorization for `(user_id, reward_id)`, if any.
pub fn find_pending(
    conn: &Connection,
    user_id: UserId,
    reward_id: RewardId,
) -> Result<Option<MintAuthorization>> {
    let auth = conn
        .query_row(
            &format!(
                "SELECT {AUTH_COLUMNS} FROM mint_authorizations
                 WHERE user_id = ?1 AND reward_id = ?2 AND status = 'pending'"
            ),
            rusqlite::params![user_id, reward_id as i64],
            row_to_auth,
        )
        .optional()?;
    Ok(auth)
}

/// Transition a stale `pending` authorization to `expired` (terminal).
pub fn mark_expired(conn: &Connection, auth_id: i64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE mint_authorizations SET status = 'expired'
         WHERE id = ?1 AND status = 'pending'",
        [auth_id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!(
            "pending authorization {auth_id}"
        )));
    }
    Ok(())
}

/// Transition the `pending` authorization for `(user_id, reward_id)` to
/// `used` (terminal), stamping `used_at` and the transaction reference.
pub fn mark_used(
    conn: &Connection,
    user_id: UserId,
    reward_id: RewardId,
    tx_ref: &str,
    used_at: u64,
) -> Result<()> {
    let updated = conn.execute(
        "UPDATE mint_authorizations SET status = 'used', used_at = ?1, tx_ref = ?2
         WHERE user_id = ?3 AND reward_id = ?4 AND status = 'pending'",
        rusqlite::params![used_at as i64, tx_ref, user_id, reward_id as i64],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!(
            "pending authorization for user {user_id} reward {reward_id}"
        )));
    }
    Ok(())
}

/// List all authorizations for a user, newest first.
pub fn list_for_user(conn: &Connection, user_id: UserId) -> Result<Vec<MintAuthorization>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {AUTH_COLUMNS} FROM mint_authorizations
         WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;

    let rows = stmt
        .query_map([user_id], row_to_auth)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
