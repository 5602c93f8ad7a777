//! # kronos-core
//!
//! The reward backend's service layer: the signature-gated mint
//! authorization state machine and the settlement enqueuer, composed over
//! the evaluator, signer, chain reader, and database crates.
//!
//! Request handlers (the HTTP layer, external to this workspace) call in
//! here after identity verification; the external relayer drains the
//! settlement queue these services append to.
//!
//! ## Modules
//!
//! - [`authorization`] — request/confirm/list mint authorizations
//! - [`settlement`] — session completion and the settlement queue
//! - [`identity`] — identity-provider boundary and user resolution
//! - [`config`] — deployment configuration

pub mod authorization;
pub mod config;
pub mod identity;
pub mod settlement;

use kronos_chain::ChainError;
use kronos_db::DbError;
use kronos_types::{RewardId, UserId};

/// Error taxonomy for the reward core.
///
/// Business-rule rejections (`NotEligible`, `AlreadyClaimed`) carry their
/// diagnostic context; `ChainUnavailable` is the only transient variant —
/// callers may retry the whole request, and no partial state is left
/// behind. Storage uniqueness races are consumed internally and never
/// appear here.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The reward tier id is outside 1..=5.
    #[error("invalid reward tier: {0}")]
    InvalidReward(RewardId),

    /// No user row for the given id.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The user has no wallet on file.
    #[error("wallet not linked for user {0}")]
    WalletNotLinked(UserId),

    /// Activity total below the tier threshold.
    #[error("not eligible: need {required} seconds, have {current}")]
    NotEligible { required: u64, current: u64 },

    /// The wallet already claimed this Relic on-chain.
    #[error("relic {reward_id} already claimed on-chain")]
    AlreadyClaimed { reward_id: RewardId },

    /// No pending authorization matched a confirmation.
    #[error("no pending authorization found")]
    SignatureNotFound,

    /// A chain read failed or timed out. Transient; safe to retry.
    #[error("chain unavailable: {0}")]
    ChainUnavailable(String),

    /// Request-level input rejection.
    #[error("validation error: {0}")]
    Validation(String),

    /// Identity verification failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Signature production failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Configuration loading or parsing failed.
    #[error("config error: {0}")]
    Config(String),

    /// Storage failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ChainError> for CoreError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Unavailable(msg) => Self::ChainUnavailable(msg),
            ChainError::InvalidAddress(addr) => {
                Self::Validation(format!("invalid address: {addr}"))
            }
            ChainError::InvalidKey => Self::Signing("invalid signing key".into()),
            ChainError::Signing(msg) => Self::Signing(msg),
        }
    }
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
