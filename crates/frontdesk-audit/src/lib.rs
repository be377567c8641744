//! Audit logging for Frontdesk assistant actions.
//!
//! Every executed (or declined) state mutation and every authorization denial
//! produces a structured [`AuditEvent`]. The sink is write-only: the
//! assistant never reads entries back.

pub mod error;
pub mod event;
pub mod storage;

pub use error::AuditError;
pub use event::{AuditEvent, AuditEventBuilder, AuditEventType};
pub use storage::{AuditStorage, ConsoleStorage, FileStorage, NullStorage};

use frontdesk_core::settings::{AuditBackend, AuditConfig};
use std::sync::Arc;

/// The main audit logger. Thin facade over a storage backend with helpers
/// for the event shapes the orchestrator and executors emit.
#[derive(Clone)]
pub struct AuditLogger {
    storage: Arc<dyn AuditStorage>,
}

impl AuditLogger {
    /// Build a logger from configuration.
    pub fn from_config(config: &AuditConfig) -> Self {
        let storage: Arc<dyn AuditStorage> = if !config.enabled {
            Arc::new(NullStorage)
        } else {
            match config.backend {
                AuditBackend::Console => Arc::new(ConsoleStorage),
                AuditBackend::File => Arc::new(FileStorage::new(&config.file_path)),
                AuditBackend::Null => Arc::new(NullStorage),
            }
        };
        Self { storage }
    }

    /// Logger with a custom storage backend.
    pub fn with_storage(storage: Arc<dyn AuditStorage>) -> Self {
        Self { storage }
    }

    /// Disabled (no-op) logger.
    pub fn disabled() -> Self {
        Self {
            storage: Arc::new(NullStorage),
        }
    }

    /// Record an event. Failures are logged and swallowed: an audit write
    /// must never fail the action it describes.
    pub async fn record(&self, event: AuditEvent) {
        tracing::debug!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            principal = %event.principal_id,
            role = %event.role,
            action = %event.action,
            "audit event"
        );

        if let Err(error) = self.storage.store(event).await {
            tracing::error!(%error, "failed to store audit event");
        }
    }

    /// Record an executed state transition.
    pub async fn log_action_executed(
        &self,
        principal_id: &str,
        role: &str,
        action: &str,
        target_id: &str,
        previous_status: &str,
        new_status: &str,
    ) {
        let event = AuditEvent::builder(AuditEventType::ActionExecuted, principal_id, role, action)
            .target_id(target_id)
            .previous_status(previous_status)
            .new_status(new_status)
            .build();
        self.record(event).await;
    }

    /// Record an action declined by its state precondition.
    pub async fn log_action_declined(
        &self,
        principal_id: &str,
        role: &str,
        action: &str,
        target_id: &str,
        reason: &str,
    ) {
        let event = AuditEvent::builder(AuditEventType::ActionDeclined, principal_id, role, action)
            .target_id(target_id)
            .reason(reason)
            .build();
        self.record(event).await;
    }

    /// Record an authorization denial.
    pub async fn log_authorization_denied(
        &self,
        principal_id: &str,
        role: &str,
        action: &str,
        reason: &str,
    ) {
        let event =
            AuditEvent::builder(AuditEventType::AuthorizationDenied, principal_id, role, action)
                .reason(reason)
                .build();
        self.record(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Capturing sink for assertions.
    pub struct MemoryStorage {
        pub events: Mutex<Vec<AuditEvent>>,
    }

    #[async_trait::async_trait]
    impl AuditStorage for MemoryStorage {
        async fn store(&self, event: AuditEvent) -> Result<(), AuditError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    #[tokio::test]
    async fn disabled_logger_swallows_events() {
        let logger = AuditLogger::disabled();
        logger
            .log_action_executed("u", "cro", "CHECK_IN_PATIENT", "a1", "Scheduled", "Checked-In")
            .await;
    }

    #[tokio::test]
    async fn executed_action_carries_the_transition() {
        let storage = Arc::new(MemoryStorage {
            events: Mutex::new(Vec::new()),
        });
        let logger = AuditLogger::with_storage(storage.clone());

        logger
            .log_action_executed(
                "user-1",
                "cro",
                "MARK_APPOINTMENT_COMPLETED",
                "appt-3",
                "Checked-In",
                "Completed",
            )
            .await;

        let events = storage.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AuditEventType::ActionExecuted);
        assert_eq!(events[0].previous_status.as_deref(), Some("Checked-In"));
        assert_eq!(events[0].new_status.as_deref(), Some("Completed"));
    }

    #[tokio::test]
    async fn from_config_respects_disabled_flag() {
        let config = AuditConfig {
            enabled: false,
            ..Default::default()
        };
        // No panic, no output.
        AuditLogger::from_config(&config)
            .log_authorization_denied("u", "doctor", "CHECK_IN_PATIENT", "not allowed")
            .await;
    }
}
