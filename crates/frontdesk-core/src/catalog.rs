//! The static intent catalog.
//!
//! One [`IntentSpec`] per intent: who may invoke it, which output fields it
//! may disclose, how the classifier prompt describes it, and whether it must
//! go through the confirmation flow. Defined at compile time and never
//! mutated; every lookup is a total match over the closed [`Intent`] set, so
//! adding an intent without cataloging it is a compile error.

use crate::intent::Intent;
use crate::role::Role;

/// Static configuration for a single intent.
#[derive(Debug, Clone, Copy)]
pub struct IntentSpec {
    pub intent: Intent,
    /// Roles permitted to invoke this intent. Checked case-insensitively by
    /// the access gate; a role absent from this list is denied.
    pub allowed_roles: &'static [Role],
    /// Whitelist of field names the sanitizer lets through. Empty means this
    /// intent discloses no fields at all.
    pub allowed_fields: &'static [&'static str],
    /// One-line description used in the classifier system prompt.
    pub description: &'static str,
    /// Whether execution requires a confirmation token round trip.
    pub confirmation_required: bool,
}

impl Intent {
    /// Catalog entry for this intent.
    pub fn spec(&self) -> &'static IntentSpec {
        match self {
            Intent::GetStallingLeads => &IntentSpec {
                intent: Intent::GetStallingLeads,
                allowed_roles: &[Role::Admin, Role::Cro],
                allowed_fields: &[
                    "leads",
                    "total_count",
                    "status",
                    "reason",
                    "assigned_to_user_id",
                    "date_added",
                    "age",
                    "gender",
                    "inquiry",
                    "source",
                ],
                description:
                    "Fetch leads that are stalling or have not been followed up recently.",
                confirmation_required: false,
            },
            Intent::GetTodayAppointments => &IntentSpec {
                intent: Intent::GetTodayAppointments,
                allowed_roles: &[Role::Admin, Role::Cro, Role::Doctor, Role::FrontDesk],
                allowed_fields: &["total_count", "breakdown", "my_appointments_count"],
                description:
                    "Check schedule, count appointments, or see what is coming up today.",
                confirmation_required: false,
            },
            Intent::GetWaitingPatients => &IntentSpec {
                intent: Intent::GetWaitingPatients,
                allowed_roles: &[Role::Admin, Role::Cro, Role::FrontDesk],
                allowed_fields: &["total_waiting", "max_wait_time_minutes", "long_wait_count"],
                description: "Check if anyone is waiting, who is waiting, or queue status.",
                confirmation_required: false,
            },
            Intent::GetClinicSummary => &IntentSpec {
                intent: Intent::GetClinicSummary,
                allowed_roles: &[Role::Admin, Role::Cro],
                allowed_fields: &[
                    "total_leads_today",
                    "total_appointments_today",
                    "total_waiting_patients",
                    "stalling_leads_count",
                ],
                description:
                    "Get a high-level overview or summary of the clinic status today.",
                confirmation_required: false,
            },
            Intent::CheckInPatient => &IntentSpec {
                intent: Intent::CheckInPatient,
                // Deliberately narrow: not admin, not doctor.
                allowed_roles: &[Role::Cro, Role::FrontDesk],
                allowed_fields: &["id", "patient_name", "time", "doctor_name"],
                description: "Check in a patient who has arrived for their appointment.",
                confirmation_required: true,
            },
            Intent::MarkAppointmentCompleted => &IntentSpec {
                intent: Intent::MarkAppointmentCompleted,
                allowed_roles: &[Role::Cro],
                allowed_fields: &["id", "patient_name", "time", "doctor_name"],
                description: "Mark a checked-in appointment as completed.",
                confirmation_required: true,
            },
            Intent::MarkPatientNoShow => &IntentSpec {
                intent: Intent::MarkPatientNoShow,
                allowed_roles: &[Role::Cro],
                allowed_fields: &["id", "patient_name", "time", "doctor_name"],
                description: "Mark a scheduled appointment as a no-show.",
                confirmation_required: true,
            },
            Intent::Unknown => &IntentSpec {
                intent: Intent::Unknown,
                // Everyone may receive the "I don't understand" reply.
                allowed_roles: &[Role::Admin, Role::Cro, Role::Doctor, Role::FrontDesk],
                allowed_fields: &[],
                description: "Fallback when the intent is not recognized.",
                confirmation_required: false,
            },
        }
    }
}

/// Specs for every intent the classifier may return by name, i.e. everything
/// except [`Intent::Unknown`]. Used to build the classifier system prompt.
pub fn classifiable_specs() -> impl Iterator<Item = &'static IntentSpec> {
    Intent::ALL
        .iter()
        .filter(|i| **i != Intent::Unknown)
        .map(|i| i.spec())
}
