//! Error types for the collaborators at the edge of the core.
//!
//! Gameplay itself never fails: malformed chat input degrades to a no-op.
//! Only persistence and chat polling can report errors, and the driver
//! decides how to recover from them.

/// Errors raised while loading or saving the persisted game state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while polling a live-chat source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source could not be reached or read.
    #[error("chat source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with data that could not be understood.
    #[error("malformed chat payload: {0}")]
    Malformed(String),
}
