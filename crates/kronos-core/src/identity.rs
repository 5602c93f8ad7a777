//! Identity-provider boundary and user resolution.
//!
//! Token verification itself is an external collaborator — the provider's
//! SDK lives with the HTTP layer. This module defines the boundary trait
//! the core consumes and the find-or-create resolution that maps a
//! verified identity onto a local user row, refreshing the linked wallet
//! when the provider reports a new one.

use std::collections::HashMap;

use async_trait::async_trait;
use rusqlite::Connection;

use kronos_db::queries::users;
use kronos_types::user::{User, VerifiedIdentity};

use crate::{CoreError, Result};

/// Verifies a bearer token with the identity provider.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a token and return the provider's view of the subject.
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedIdentity>;
}

/// Map a verified identity onto a local user row.
///
/// Finds the user by email, creating the row on first sight. When the
/// provider reports a wallet that differs from the stored one, the stored
/// address is refreshed.
pub fn resolve_user(conn: &Connection, identity: &VerifiedIdentity, now: u64) -> Result<User> {
    match users::find_by_email(conn, &identity.email)? {
        Some(user) => {
            if let Some(wallet) = &identity.wallet_address {
                if user.wallet_address.as_deref() != Some(wallet.as_str()) {
                    tracing::info!(user_id = user.id, "refreshing linked wallet");
                    users::set_wallet(conn, user.id, wallet)?;
                    return users::find_by_id(conn, user.id)?
                        .ok_or(CoreError::UserNotFound(user.id));
                }
            }
            Ok(user)
        }
        None => {
            tracing::info!(email = %identity.email, "creating user on first sight");
            Ok(users::create(
                conn,
                &identity.email,
                identity.wallet_address.as_deref(),
                now,
            )?)
        }
    }
}

/// A fixed-token verifier for tests and local development.
#[derive(Debug, Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
}

impl StaticVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token that verifies to the given identity.
    pub fn insert(&mut self, token: &str, identity: VerifiedIdentity) {
        self.tokens.insert(token.to_string(), identity);
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedIdentity> {
        self.tokens
            .get(bearer_token)
            .cloned()
            .ok_or_else(|| CoreError::Unauthorized("invalid token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    fn identity(wallet: Option<&str>) -> VerifiedIdentity {
        VerifiedIdentity {
            subject_id: "did:provider:abc".into(),
            email: "a@example.com".into(),
            wallet_address: wallet.map(String::from),
        }
    }

    #[test]
    fn test_first_sight_creates_user() {
        let conn = kronos_db::open_memory().expect("open");
        let user = resolve_user(&conn, &identity(Some(WALLET)), 100).expect("resolve");
        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.wallet_address.as_deref(), Some(WALLET));
    }

    #[test]
    fn test_resolve_is_stable() {
        let conn = kronos_db::open_memory().expect("open");
        let first = resolve_user(&conn, &identity(None), 100).expect("first");
        let second = resolve_user(&conn, &identity(None), 200).expect("second");
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_wallet_refresh() {
        let conn = kronos_db::open_memory().expect("open");
        resolve_user(&conn, &identity(None), 100).expect("create");
        let user = resolve_user(&conn, &identity(Some(WALLET)), 200).expect("refresh");
        assert_eq!(user.wallet_address.as_deref(), Some(WALLET));
    }

    #[tokio::test]
    async fn test_static_verifier() {
        let mut verifier = StaticVerifier::new();
        verifier.insert("good-token", identity(Some(WALLET)));

        let verified = verifier.verify("good-token").await.expect("verify");
        assert_eq!(verified.email, "a@example.com");
        assert!(matches!(
            verifier.verify("bad-token").await,
            Err(CoreError::Unauthorized(_))
        ));
    }
}
