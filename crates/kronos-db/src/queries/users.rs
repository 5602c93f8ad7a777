//! User query functions.

use rusqlite::{Connection, OptionalExtension, Row};

use kronos_types::user::User;
use kronos_types::UserId;

use crate::{DbError, Result};

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        wallet_address: row.get(2)?,
        aura_points: row.get::<_, i64>(3)? as u64,
        active_seconds: row.get::<_, i64>(4)? as u64,
        created_at: row.get::<_, i64>(5)? as u64,
    })
}

const USER_COLUMNS: &str =
    "id, email, wallet_address, aura_points, active_seconds, created_at";

/// Insert a new user and return the stored row.
pub fn create(
    conn: &Connection,
    email: &str,
    wallet_address: Option<&str>,
    created_at: u64,
) -> Result<User> {
    conn.execute(
        "INSERT INTO users (email, wallet_address, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![email, wallet_address, created_at as i64],
    )
    .map_err(|e| crate::map_insert_err(e, "user email already exists"))?;

    find_by_id(conn, conn.last_insert_rowid())?
        .ok_or_else(|| DbError::NotFound("user just created".into()))
}

/// Look up a user by row id.
pub fn find_by_id(conn: &Connection, user_id: UserId) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            [user_id],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

/// Look up a user by email.
pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            [email],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

/// Update a user's linked wallet address.
pub fn set_wallet(conn: &Connection, user_id: UserId, wallet_address: &str) -> Result<()> {
    let updated = conn.execute(
        "UPDATE users SET wallet_address = ?1 WHERE id = ?2",
        rusqlite::params![wallet_address, user_id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("user {user_id}")));
    }
    Ok(())
}

/// Increment a user's running activity totals.
pub fn add_accruals(
    conn: &Connection,
    user_id: UserId,
    points_delta: u64,
    seconds_delta: u64,
) -> Result<()> {
    let updated = conn.execute(
        "UPDATE users
         SET aura_points = aura_points + ?1,
             active_seconds = active_seconds + ?2
         WHERE id = ?3",
        rusqlite::params![points_delta as i64, seconds_delta as i64, user_id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("user {user_id}")));
    }
    Ok(())
}
