//! The Record Store boundary.
//!
//! The assistant treats the persistent store as an opaque collaborator behind
//! [`RecordStore`]: filtered reads returning row sets, point lookups
//! returning a typed empty result on absence, and single-row status updates.
//! Query failure is a propagating error; "row not found" never is.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Appointment lifecycle status as the clinic records it.
///
/// Stored as display strings ("Checked-In", "No-Show", ...). Strings outside
/// the known set are preserved in [`AppointmentStatus::Other`] so precondition
/// messages can still quote them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Arrived,
    CheckedIn,
    Completed,
    NoShow,
    Cancelled,
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Arrived => "Arrived",
            AppointmentStatus::CheckedIn => "Checked-In",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::NoShow => "No-Show",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Other(s) => s,
        }
    }

    /// Parse a stored status string. Total: unknown strings become `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "Scheduled" => AppointmentStatus::Scheduled,
            "Arrived" => AppointmentStatus::Arrived,
            "Checked-In" => AppointmentStatus::CheckedIn,
            "Completed" => AppointmentStatus::Completed,
            "No-Show" => AppointmentStatus::NoShow,
            "Cancelled" => AppointmentStatus::Cancelled,
            other => AppointmentStatus::Other(other.to_string()),
        }
    }

    /// Whether the patient is already on-site or seen (arrived, checked in,
    /// or completed).
    pub fn patient_present(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Arrived
                | AppointmentStatus::CheckedIn
                | AppointmentStatus::Completed
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date window an action's candidate search is scoped to, inclusive on both
/// ends. Dates are clinic-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl SearchWindow {
    /// Today only.
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self {
            from: today,
            to: today,
        }
    }

    /// `[today - days, today]`.
    pub fn trailing_days(days: i64) -> Self {
        let today = Local::now().date_naive();
        Self {
            from: today - Duration::days(days),
            to: today,
        }
    }
}

/// A candidate appointment for an ambiguous action request: enough fields for
/// a human to pick, nothing more. Produced fresh per search, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub patient_name: String,
    /// Display start time, e.g. "10:30".
    pub time: String,
    pub doctor_name: String,
    pub status: AppointmentStatus,
}

/// Current state of one appointment, fetched before any transition.
#[derive(Debug, Clone)]
pub struct AppointmentSnapshot {
    pub id: String,
    pub patient_name: String,
    pub time: String,
    pub doctor_name: String,
    pub status: AppointmentStatus,
}

/// Narrow query interface the assistant core calls through.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appointments within `window` whose patient name contains `name_hint`
    /// (case-insensitive). No status filter: already-transitioned matches are
    /// included so the executor can report a clear "already done".
    async fn search_appointments(
        &self,
        window: SearchWindow,
        name_hint: &str,
    ) -> anyhow::Result<Vec<Candidate>>;

    /// Point lookup. `Ok(None)` when the row does not exist.
    async fn appointment(&self, id: &str) -> anyhow::Result<Option<AppointmentSnapshot>>;

    /// Single-row status transition. `checked_in_at`, when given, is recorded
    /// alongside the status (drives wait-time analytics); `updated_at` is
    /// always bumped.
    async fn set_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
        checked_in_at: Option<DateTime<Utc>>,
    ) -> anyhow::Result<()>;

    /// Leads stuck in "New Inquiry" / "Follow Up", oldest first.
    async fn stalling_leads(&self) -> anyhow::Result<serde_json::Value>;

    /// Today's schedule: total, per-status breakdown, and the calling
    /// principal's own appointment count.
    async fn today_appointments(&self, principal_id: &str) -> anyhow::Result<serde_json::Value>;

    /// Today's waiting room: totals and wait-time aggregates.
    async fn waiting_patients(&self) -> anyhow::Result<serde_json::Value>;

    /// High-level counts for today.
    async fn clinic_summary(&self) -> anyhow::Result<serde_json::Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_known_strings() {
        for s in ["Scheduled", "Arrived", "Checked-In", "Completed", "No-Show", "Cancelled"] {
            assert_eq!(AppointmentStatus::parse(s).as_str(), s);
        }
    }

    #[test]
    fn unknown_status_is_preserved_verbatim() {
        let status = AppointmentStatus::parse("Rescheduled");
        assert_eq!(status, AppointmentStatus::Other("Rescheduled".to_string()));
        assert_eq!(status.as_str(), "Rescheduled");
    }

    #[test]
    fn windows_are_inclusive_and_ordered() {
        let today = SearchWindow::today();
        assert_eq!(today.from, today.to);

        let trailing = SearchWindow::trailing_days(3);
        assert_eq!(trailing.to - trailing.from, Duration::days(3));
    }
}
