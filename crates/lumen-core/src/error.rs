//! Error types for the LUMEN hub

use thiserror::Error;

use crate::ParticipantId;

/// Core hub errors
#[derive(Error, Debug)]
pub enum HubError {
    // Registry errors
    #[error("participant already registered: {0}")]
    DuplicateParticipant(ParticipantId),

    #[error("unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    // Economy errors
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    #[error("insufficient points for {effect}: required {required}, current {current}")]
    InsufficientPoints {
        effect: String,
        required: i64,
        current: i64,
    },

    // Invariant violations - the operation is rejected and state left
    // unchanged, never a process abort
    #[error("balance underflow for {participant}: would reach {balance}")]
    BalanceUnderflow {
        participant: ParticipantId,
        balance: i64,
    },

    // Catalog errors
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    // Runtime errors
    #[error("hub runtime is no longer running")]
    RuntimeClosed,
}

/// Result type for hub operations
pub type HubResult<T> = Result<T, HubError>;
