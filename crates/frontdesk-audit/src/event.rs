//! Audit event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// A confirmation-gated action was executed against a record.
    ActionExecuted,
    /// An action was requested but the executor declined it (wrong state).
    ActionDeclined,
    /// The access gate denied a request.
    AuthorizationDenied,
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditEventType::ActionExecuted => "action_executed",
            AuditEventType::ActionDeclined => "action_declined",
            AuditEventType::AuthorizationDenied => "authorization_denied",
        };
        f.write_str(s)
    }
}

/// A single structured audit entry. Write-only from the core's perspective;
/// nothing in the assistant reads these back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: Uuid,
    /// UTC timestamp (RFC3339).
    pub occurred_at: DateTime<Utc>,
    pub event_type: AuditEventType,

    /// Acting principal id.
    pub principal_id: String,
    /// Role string as presented by the session.
    pub role: String,
    /// Action name, e.g. `CHECK_IN_PATIENT`.
    pub action: String,

    /// Target record id, when the event concerns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Record state before the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    /// Record state after the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status: Option<String>,
    /// Denial or decline reason, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuditEvent {
    /// Start building an event of the given type.
    pub fn builder(
        event_type: AuditEventType,
        principal_id: impl Into<String>,
        role: impl Into<String>,
        action: impl Into<String>,
    ) -> AuditEventBuilder {
        AuditEventBuilder {
            event: AuditEvent {
                event_id: Uuid::new_v4(),
                occurred_at: Utc::now(),
                event_type,
                principal_id: principal_id.into(),
                role: role.into(),
                action: action.into(),
                target_id: None,
                previous_status: None,
                new_status: None,
                reason: None,
            },
        }
    }
}

/// Fluent builder for [`AuditEvent`].
pub struct AuditEventBuilder {
    event: AuditEvent,
}

impl AuditEventBuilder {
    pub fn target_id(mut self, id: impl Into<String>) -> Self {
        self.event.target_id = Some(id.into());
        self
    }

    pub fn previous_status(mut self, status: impl Into<String>) -> Self {
        self.event.previous_status = Some(status.into());
        self
    }

    pub fn new_status(mut self, status: impl Into<String>) -> Self {
        self.event.new_status = Some(status.into());
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.event.reason = Some(reason.into());
        self
    }

    pub fn build(self) -> AuditEvent {
        self.event
    }
}
