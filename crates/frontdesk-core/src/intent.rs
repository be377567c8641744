//! The closed intent set.
//!
//! Intents are partitioned into read intents (no side effect) and action
//! intents (state-mutating, always confirmation-gated). Components that
//! dispatch on intent must be total over this enum; there is no catch-all
//! beyond [`Intent::Unknown`], which is the mandatory classification
//! fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic classification of a user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Leads that have sat in "New Inquiry" / "Follow Up" without movement.
    GetStallingLeads,
    /// Today's schedule with a per-status breakdown.
    GetTodayAppointments,
    /// Who is currently in the waiting area and for how long.
    GetWaitingPatients,
    /// High-level overview of the clinic's day.
    GetClinicSummary,
    /// Check in a patient who has arrived (action).
    CheckInPatient,
    /// Mark a checked-in appointment as completed (action).
    MarkAppointmentCompleted,
    /// Mark a scheduled appointment as a no-show (action).
    MarkPatientNoShow,
    /// Classification fallback; permitted for every role, fetches nothing.
    Unknown,
}

impl Intent {
    /// Every member of the closed set, in catalog order.
    pub const ALL: [Intent; 8] = [
        Intent::GetStallingLeads,
        Intent::GetTodayAppointments,
        Intent::GetWaitingPatients,
        Intent::GetClinicSummary,
        Intent::CheckInPatient,
        Intent::MarkAppointmentCompleted,
        Intent::MarkPatientNoShow,
        Intent::Unknown,
    ];

    /// The symbolic label used in classifier prompts and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::GetStallingLeads => "GET_STALLING_LEADS",
            Intent::GetTodayAppointments => "GET_TODAY_APPOINTMENTS",
            Intent::GetWaitingPatients => "GET_WAITING_PATIENTS",
            Intent::GetClinicSummary => "GET_CLINIC_SUMMARY",
            Intent::CheckInPatient => "CHECK_IN_PATIENT",
            Intent::MarkAppointmentCompleted => "MARK_APPOINTMENT_COMPLETED",
            Intent::MarkPatientNoShow => "MARK_PATIENT_NO_SHOW",
            Intent::Unknown => "UNKNOWN",
        }
    }

    /// The state-mutating subset, or `None` for read intents and `Unknown`.
    pub fn as_action(&self) -> Option<ActionIntent> {
        match self {
            Intent::CheckInPatient => Some(ActionIntent::CheckIn),
            Intent::MarkAppointmentCompleted => Some(ActionIntent::MarkCompleted),
            Intent::MarkPatientNoShow => Some(ActionIntent::MarkNoShow),
            _ => None,
        }
    }

    pub fn is_action(&self) -> bool {
        self.as_action().is_some()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Intent::ALL
            .into_iter()
            .find(|i| i.label() == normalized)
            .ok_or_else(|| UnknownIntent(s.trim().to_string()))
    }
}

/// Raised when a string does not name a member of the closed intent set.
/// The resolver maps this to [`Intent::Unknown`]; it never reaches a caller.
#[derive(Debug, Clone, thiserror::Error)]
#[error("'{0}' is not a known intent")]
pub struct UnknownIntent(pub String);

/// The three confirmation-gated mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionIntent {
    CheckIn,
    MarkCompleted,
    MarkNoShow,
}

impl ActionIntent {
    /// The full intent this action corresponds to.
    pub fn intent(&self) -> Intent {
        match self {
            ActionIntent::CheckIn => Intent::CheckInPatient,
            ActionIntent::MarkCompleted => Intent::MarkAppointmentCompleted,
            ActionIntent::MarkNoShow => Intent::MarkPatientNoShow,
        }
    }

    /// Audit-log action name.
    pub fn audit_name(&self) -> &'static str {
        match self {
            ActionIntent::CheckIn => "CHECK_IN_PATIENT",
            ActionIntent::MarkCompleted => "MARK_APPOINTMENT_COMPLETED",
            ActionIntent::MarkNoShow => "MARK_PATIENT_NO_SHOW",
        }
    }
}

impl fmt::Display for ActionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.audit_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(intent.label().parse::<Intent>().unwrap(), intent);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(
            "  get_waiting_patients ".parse::<Intent>().unwrap(),
            Intent::GetWaitingPatients
        );
    }

    #[test]
    fn parse_rejects_strings_outside_the_set() {
        assert!("DROP_ALL_TABLES".parse::<Intent>().is_err());
        assert!("".parse::<Intent>().is_err());
    }

    #[test]
    fn exactly_three_actions() {
        let actions: Vec<_> = Intent::ALL.iter().filter(|i| i.is_action()).collect();
        assert_eq!(actions.len(), 3);
    }

    #[test]
    fn action_intent_maps_back() {
        for intent in Intent::ALL {
            if let Some(action) = intent.as_action() {
                assert_eq!(action.intent(), intent);
            }
        }
    }
}
