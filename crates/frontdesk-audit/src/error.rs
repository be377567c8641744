//! Audit error types.

/// Errors raised by audit logging.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("failed to serialize audit event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write audit event: {0}")]
    Io(#[from] std::io::Error),
}
