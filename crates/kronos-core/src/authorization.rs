//! The mint authorization service.
//!
//! State machine over [`MintAuthorization`]: `pending → used` and
//! `pending → expired`, both terminal. Expiry is lazy — a stale pending
//! row is transitioned when the same `(user, reward)` pair is re-requested;
//! no background sweep runs.
//!
//! Ordering inside [`AuthorizationService::request_authorization`] is
//! security-relevant: the on-chain claim check always precedes signing,
//! and the nonce read happens immediately before signing so the signature
//! binds the freshest replay counter the service can observe. All writes
//! happen after every read has succeeded, so a failed chain read leaves
//! no partial record.

use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use kronos_chain::parse_address;
use kronos_chain::reader::ChainReader;
use kronos_chain::signer::MintSigner;
use kronos_db::queries::{authorizations, users};
use kronos_db::DbError;
use kronos_rewards::tiers;
use kronos_types::authorization::{MintAuthorization, MintGrant};
use kronos_types::{RewardId, UserId};

use crate::{CoreError, Result};

/// Issues, confirms, and lists signature-gated mint authorizations.
pub struct AuthorizationService {
    db: Arc<Mutex<Connection>>,
    chain: Arc<dyn ChainReader>,
    signer: MintSigner,
    auth_window_secs: u64,
}

impl AuthorizationService {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        chain: Arc<dyn ChainReader>,
        signer: MintSigner,
        auth_window_secs: u64,
    ) -> Self {
        Self {
            db,
            chain,
            signer,
            auth_window_secs,
        }
    }

    /// Request a mint authorization for `(user_id, reward_id)`.
    ///
    /// Re-requests before the stored deadline are idempotent: the caller
    /// gets the identical signature and nonce back, so a dropped response
    /// never mints a second live authorization. A stale pending row is
    /// expired first and replaced with a freshly signed one.
    pub async fn request_authorization(
        &self,
        user_id: UserId,
        reward_id: RewardId,
        now: u64,
    ) -> Result<MintGrant> {
        if !tiers::is_valid_tier(reward_id) {
            return Err(CoreError::InvalidReward(reward_id));
        }

        let (wallet_str, active_seconds) = {
            let conn = self.db.lock().await;
            let user = users::find_by_id(&conn, user_id)?
                .ok_or(CoreError::UserNotFound(user_id))?;
            let wallet = user
                .wallet_address
                .ok_or(CoreError::WalletNotLinked(user_id))?;
            (wallet, user.active_seconds)
        };

        let required = tiers::required_seconds(reward_id)
            .map_err(|_| CoreError::InvalidReward(reward_id))?;
        if active_seconds < required {
            return Err(CoreError::NotEligible {
                required,
                current: active_seconds,
            });
        }

        let wallet = parse_address(&wallet_str)?;

        // Fresh on-chain read on every request; a cached claim flag could
        // authorize a double mint.
        if self.chain.has_claimed(wallet, reward_id).await? {
            return Err(CoreError::AlreadyClaimed { reward_id });
        }

        {
            let conn = self.db.lock().await;
            if let Some(existing) = authorizations::find_pending(&conn, user_id, reward_id)? {
                if existing.deadline > now {
                    tracing::debug!(user_id, reward_id, "reusing live authorization");
                    return Ok(MintGrant::from(&existing));
                }
                tracing::info!(user_id, reward_id, auth_id = existing.id, "expiring stale authorization");
                authorizations::mark_expired(&conn, existing.id)?;
            }
        }

        // Two attempts: a lost insert race re-reads the winner's row; if
        // that row vanished again in the meantime, one full re-issue.
        for attempt in 0..2 {
            let nonce = self.chain.nonce_of(wallet).await?;
            let deadline = now + self.auth_window_secs;
            let signature = self.signer.sign_mint(wallet, reward_id, nonce, deadline)?;

            let conn = self.db.lock().await;
            let inserted = authorizations::insert_pending(
                &conn,
                &authorizations::NewAuthorization {
                    user_id,
                    wallet_address: &wallet_str,
                    reward_id,
                    nonce,
                    deadline,
                    signature: &signature,
                    created_at: now,
                },
            );
            match inserted {
                Ok(auth) => {
                    tracing::info!(user_id, reward_id, nonce, deadline, "issued mint authorization");
                    return Ok(MintGrant::from(&auth));
                }
                Err(DbError::Constraint(_)) => {
                    // A concurrent request for the same pair won the race;
                    // its authorization is just as valid for this caller.
                    if let Some(existing) =
                        authorizations::find_pending(&conn, user_id, reward_id)?
                    {
                        tracing::debug!(user_id, reward_id, attempt, "lost insert race, reusing winner");
                        return Ok(MintGrant::from(&existing));
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CoreError::Db(DbError::Constraint(
            "pending authorization kept vanishing between attempts".into(),
        )))
    }

    /// Confirm a successful on-chain mint, transitioning the pending
    /// authorization to `used`.
    ///
    /// The transaction reference is recorded as supplied; it is not
    /// verified against the chain. A deployment wanting stronger
    /// guarantees should check the receipt before calling this.
    pub async fn confirm_usage(
        &self,
        user_id: UserId,
        reward_id: RewardId,
        tx_ref: &str,
        now: u64,
    ) -> Result<()> {
        if tx_ref.is_empty() {
            return Err(CoreError::Validation("missing transaction reference".into()));
        }

        let conn = self.db.lock().await;
        authorizations::mark_used(&conn, user_id, reward_id, tx_ref, now).map_err(|e| match e {
            DbError::NotFound(_) => CoreError::SignatureNotFound,
            other => CoreError::Db(other),
        })?;
        tracing::info!(user_id, reward_id, tx_ref, "mint confirmed");
        Ok(())
    }

    /// All authorizations ever issued to a user, newest first.
    pub async fn list_authorizations(&self, user_id: UserId) -> Result<Vec<MintAuthorization>> {
        let conn = self.db.lock().await;
        Ok(authorizations::list_for_user(&conn, user_id)?)
    }
}
