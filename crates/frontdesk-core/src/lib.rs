//! Core types shared across all Frontdesk crates.
//!
//! The assistant is organized around a closed set of [`Intent`]s. Each intent
//! carries static configuration (who may invoke it, which fields it may
//! disclose, how it is described to the classifier) defined once in
//! [`catalog`] and never mutated at runtime.

pub mod catalog;
pub mod intent;
pub mod role;
pub mod settings;

pub use catalog::IntentSpec;
pub use intent::{ActionIntent, Intent};
pub use role::Role;
pub use settings::{
    AssistantConfig, AuditBackend, AuditConfig, ConfigError, ConfirmationConfig, OracleConfig,
};

use serde::{Deserialize, Serialize};

/// The authenticated caller of the assistant, as supplied by the session
/// layer. The core never authenticates; it only authorizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Stable user identifier from the auth system.
    pub id: String,
    /// Raw role string from the session. Parsed (case-insensitively) into a
    /// [`Role`] at the access gate; unknown strings fail closed.
    pub role: String,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
        }
    }
}
