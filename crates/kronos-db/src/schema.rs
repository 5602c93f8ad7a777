//! SQL schema definitions.

/// Complete schema for the Kronos reward database v1.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Users & accruals
-- ============================================================

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    wallet_address TEXT,
    aura_points INTEGER NOT NULL DEFAULT 0,
    active_seconds INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

-- ============================================================
-- Mint authorizations (signature-gated Relic mints)
-- ============================================================

CREATE TABLE IF NOT EXISTS mint_authorizations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    wallet_address TEXT NOT NULL,
    reward_id INTEGER NOT NULL,
    nonce INTEGER NOT NULL,
    deadline INTEGER NOT NULL,
    signature TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at INTEGER NOT NULL,
    used_at INTEGER,
    tx_ref TEXT
);

-- At most one live authorization per (user, reward tier). Concurrent
-- issuers race on this index; the loser re-reads the winner's row.
CREATE UNIQUE INDEX IF NOT EXISTS idx_auth_one_pending
    ON mint_authorizations(user_id, reward_id) WHERE status = 'pending';

CREATE INDEX IF NOT EXISTS idx_auth_status ON mint_authorizations(status);
CREATE INDEX IF NOT EXISTS idx_auth_wallet ON mint_authorizations(wallet_address);

-- ============================================================
-- Reward settlement queue (drained by the external relayer)
-- ============================================================

CREATE TABLE IF NOT EXISTS reward_settlements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    wallet_address TEXT NOT NULL,
    amount TEXT NOT NULL,
    reason TEXT NOT NULL,
    origin_ref INTEGER,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at INTEGER NOT NULL,
    processed_at INTEGER,
    tx_ref TEXT,
    error_detail TEXT,
    retry_count INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_settlements_pending
    ON reward_settlements(status) WHERE status = 'pending';
CREATE INDEX IF NOT EXISTS idx_settlements_user ON reward_settlements(user_id);
"#;
