//! Guarded action execution.
//!
//! Each action fetches the target's current state, evaluates its
//! precondition, and only then performs the single-field status transition.
//! A failed precondition is a *declined outcome* with an explanatory message,
//! not an error; "wrong state" is business logic. Only infrastructural
//! failures (store unreachable) propagate as `Err`.

use crate::store::{AppointmentSnapshot, AppointmentStatus, RecordStore};
use chrono::Utc;
use frontdesk_audit::AuditLogger;
use frontdesk_core::{ActionIntent, Principal};
use std::sync::Arc;

/// Human-readable result of one execution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn declined(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Executes confirmed actions against the record store.
pub struct ActionExecutor {
    store: Arc<dyn RecordStore>,
    audit: AuditLogger,
}

impl ActionExecutor {
    pub fn new(store: Arc<dyn RecordStore>, audit: AuditLogger) -> Self {
        Self { store, audit }
    }

    /// Run `action` against appointment `target_id` on behalf of `principal`.
    pub async fn execute(
        &self,
        action: ActionIntent,
        target_id: &str,
        principal: &Principal,
    ) -> anyhow::Result<ActionOutcome> {
        let Some(appointment) = self.store.appointment(target_id).await? else {
            return Ok(ActionOutcome::declined("Appointment not found."));
        };

        let outcome = match action {
            ActionIntent::CheckIn => self.check_in(&appointment).await?,
            ActionIntent::MarkCompleted => self.mark_completed(&appointment).await?,
            ActionIntent::MarkNoShow => self.mark_no_show(&appointment).await?,
        };

        if outcome.success {
            let new_status = match action {
                ActionIntent::CheckIn => AppointmentStatus::CheckedIn,
                ActionIntent::MarkCompleted => AppointmentStatus::Completed,
                ActionIntent::MarkNoShow => AppointmentStatus::NoShow,
            };
            self.audit
                .log_action_executed(
                    &principal.id,
                    &principal.role,
                    action.audit_name(),
                    target_id,
                    appointment.status.as_str(),
                    new_status.as_str(),
                )
                .await;
        } else {
            tracing::info!(
                action = %action,
                target = target_id,
                status = %appointment.status,
                "action declined by precondition"
            );
            self.audit
                .log_action_declined(
                    &principal.id,
                    &principal.role,
                    action.audit_name(),
                    target_id,
                    &outcome.message,
                )
                .await;
        }

        Ok(outcome)
    }

    /// Check-in requires the patient to not already be on-site.
    async fn check_in(&self, appointment: &AppointmentSnapshot) -> anyhow::Result<ActionOutcome> {
        if matches!(
            appointment.status,
            AppointmentStatus::CheckedIn | AppointmentStatus::Arrived
        ) {
            return Ok(ActionOutcome::declined(format!(
                "Patient {} is already checked in.",
                appointment.patient_name
            )));
        }

        // checked_in_at drives wait-time analytics; set it with the status.
        self.store
            .set_appointment_status(&appointment.id, AppointmentStatus::CheckedIn, Some(Utc::now()))
            .await?;

        Ok(ActionOutcome::done(format!(
            "Patient {} ({} with {}) has been checked in successfully.",
            appointment.patient_name, appointment.time, appointment.doctor_name
        )))
    }

    /// Completion requires the appointment to be exactly Checked-In.
    async fn mark_completed(
        &self,
        appointment: &AppointmentSnapshot,
    ) -> anyhow::Result<ActionOutcome> {
        if appointment.status == AppointmentStatus::Completed {
            return Ok(ActionOutcome::declined(format!(
                "Appointment for {} is already completed.",
                appointment.patient_name
            )));
        }

        if appointment.status != AppointmentStatus::CheckedIn {
            return Ok(ActionOutcome::declined(format!(
                "Cannot complete appointment. Patient status is currently \"{}\", but must be \"Checked-In\".",
                appointment.status
            )));
        }

        self.store
            .set_appointment_status(&appointment.id, AppointmentStatus::Completed, None)
            .await?;

        Ok(ActionOutcome::done(format!(
            "Appointment for {} has been marked as Completed.",
            appointment.patient_name
        )))
    }

    /// No-show requires the appointment to be neither terminal nor already
    /// attended.
    async fn mark_no_show(
        &self,
        appointment: &AppointmentSnapshot,
    ) -> anyhow::Result<ActionOutcome> {
        if matches!(
            appointment.status,
            AppointmentStatus::NoShow | AppointmentStatus::Cancelled
        ) {
            return Ok(ActionOutcome::declined(format!(
                "Appointment for {} is already marked as {}.",
                appointment.patient_name, appointment.status
            )));
        }

        if appointment.status.patient_present() {
            return Ok(ActionOutcome::declined(format!(
                "Cannot mark as No-Show. Patient has already arrived or completed (Status: {}).",
                appointment.status
            )));
        }

        self.store
            .set_appointment_status(&appointment.id, AppointmentStatus::NoShow, None)
            .await?;

        Ok(ActionOutcome::done(format!(
            "Appointment for {} has been marked as No-Show.",
            appointment.patient_name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Candidate, SearchWindow};
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::Mutex;

    /// Store double holding a single appointment and recording updates.
    struct OneAppointmentStore {
        snapshot: Mutex<Option<AppointmentSnapshot>>,
        updates: Mutex<Vec<(String, AppointmentStatus, bool)>>,
    }

    impl OneAppointmentStore {
        fn with_status(status: AppointmentStatus) -> Self {
            Self {
                snapshot: Mutex::new(Some(AppointmentSnapshot {
                    id: "appt-1".to_string(),
                    patient_name: "Anjali Verma".to_string(),
                    time: "10:30".to_string(),
                    doctor_name: "Dr. Rao".to_string(),
                    status,
                })),
                updates: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self {
                snapshot: Mutex::new(None),
                updates: Mutex::new(Vec::new()),
            }
        }

        fn update_count(&self) -> usize {
            self.updates.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RecordStore for OneAppointmentStore {
        async fn search_appointments(
            &self,
            _window: SearchWindow,
            _name_hint: &str,
        ) -> anyhow::Result<Vec<Candidate>> {
            Ok(Vec::new())
        }

        async fn appointment(&self, id: &str) -> anyhow::Result<Option<AppointmentSnapshot>> {
            Ok(self
                .snapshot
                .lock()
                .unwrap()
                .clone()
                .filter(|s| s.id == id))
        }

        async fn set_appointment_status(
            &self,
            id: &str,
            status: AppointmentStatus,
            checked_in_at: Option<DateTime<Utc>>,
        ) -> anyhow::Result<()> {
            self.updates.lock().unwrap().push((
                id.to_string(),
                status.clone(),
                checked_in_at.is_some(),
            ));
            if let Some(snapshot) = self.snapshot.lock().unwrap().as_mut() {
                snapshot.status = status;
            }
            Ok(())
        }

        async fn stalling_leads(&self) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        async fn today_appointments(&self, _principal_id: &str) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        async fn waiting_patients(&self) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        async fn clinic_summary(&self) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    fn cro() -> Principal {
        Principal::new("user-1", "cro")
    }

    async fn run(
        store: Arc<OneAppointmentStore>,
        action: ActionIntent,
    ) -> anyhow::Result<ActionOutcome> {
        let executor = ActionExecutor::new(store, AuditLogger::disabled());
        executor.execute(action, "appt-1", &cro()).await
    }

    #[tokio::test]
    async fn check_in_transitions_scheduled_and_stamps_arrival() {
        let store = Arc::new(OneAppointmentStore::with_status(AppointmentStatus::Scheduled));
        let outcome = run(store.clone(), ActionIntent::CheckIn).await.unwrap();

        assert!(outcome.success);
        assert!(outcome.message.contains("Anjali Verma"));
        let updates = store.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1, AppointmentStatus::CheckedIn);
        assert!(updates[0].2, "check-in must set checked_in_at");
    }

    #[tokio::test]
    async fn check_in_is_idempotent_for_arrived_patients() {
        let store = Arc::new(OneAppointmentStore::with_status(AppointmentStatus::Arrived));
        let outcome = run(store.clone(), ActionIntent::CheckIn).await.unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.contains("already checked in"));
        assert_eq!(store.update_count(), 0, "no update may be issued");
    }

    #[tokio::test]
    async fn mark_completed_requires_checked_in() {
        let store = Arc::new(OneAppointmentStore::with_status(AppointmentStatus::Scheduled));
        let outcome = run(store.clone(), ActionIntent::MarkCompleted).await.unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.contains("Checked-In"));
        assert_eq!(store.update_count(), 0);
    }

    #[tokio::test]
    async fn mark_completed_happy_path() {
        let store = Arc::new(OneAppointmentStore::with_status(AppointmentStatus::CheckedIn));
        let outcome = run(store.clone(), ActionIntent::MarkCompleted).await.unwrap();

        assert!(outcome.success);
        assert!(outcome.message.contains("Completed"));
        assert_eq!(store.update_count(), 1);
    }

    #[tokio::test]
    async fn already_completed_is_reported_specifically() {
        let store = Arc::new(OneAppointmentStore::with_status(AppointmentStatus::Completed));
        let outcome = run(store, ActionIntent::MarkCompleted).await.unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.contains("already completed"));
    }

    #[tokio::test]
    async fn no_show_rejects_terminal_and_attended_states() {
        for status in [
            AppointmentStatus::NoShow,
            AppointmentStatus::Cancelled,
            AppointmentStatus::CheckedIn,
            AppointmentStatus::Completed,
            AppointmentStatus::Arrived,
        ] {
            let store = Arc::new(OneAppointmentStore::with_status(status));
            let outcome = run(store.clone(), ActionIntent::MarkNoShow).await.unwrap();
            assert!(!outcome.success);
            assert_eq!(store.update_count(), 0);
        }
    }

    #[tokio::test]
    async fn no_show_happy_path() {
        let store = Arc::new(OneAppointmentStore::with_status(AppointmentStatus::Scheduled));
        let outcome = run(store.clone(), ActionIntent::MarkNoShow).await.unwrap();

        assert!(outcome.success);
        assert!(outcome.message.contains("No-Show"));
    }

    #[tokio::test]
    async fn missing_appointment_is_a_declined_outcome_not_an_error() {
        let store = Arc::new(OneAppointmentStore::empty());
        let outcome = run(store, ActionIntent::CheckIn).await.unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.contains("not found"));
    }
}
