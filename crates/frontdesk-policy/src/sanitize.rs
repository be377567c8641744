//! Field-level sanitization.
//!
//! Projects raw record-store payloads onto the originating intent's field
//! whitelist before they can reach the Text Oracle or the caller. Keys absent
//! from the source are simply omitted (no null-filling), so re-sanitizing an
//! already-sanitized value is a no-op.

use frontdesk_core::Intent;
use serde_json::Value;

/// Restrict `data` to the fields whitelisted for `intent`.
///
/// Objects are projected key-by-key; arrays are sanitized element-wise;
/// scalars pass through untouched (there is nothing to project). An intent
/// with an empty whitelist sanitizes every object to `{}`; intentional for
/// intents never meant to disclose fields.
pub fn sanitize(data: &Value, intent: Intent) -> Value {
    let allowed = intent.spec().allowed_fields;
    project(data, allowed)
}

fn project(value: &Value, allowed: &[&str]) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| project(v, allowed)).collect()),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for field in allowed {
                if let Some(v) = map.get(*field) {
                    out.insert((*field).to_string(), v.clone());
                }
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_exactly_the_whitelist_intersection() {
        let raw = json!({
            "total_waiting": 4,
            "max_wait_time_minutes": 35,
            "patient_internal_uuid": "f2a9...",
            "phone": "9999999999"
        });
        let clean = sanitize(&raw, Intent::GetWaitingPatients);
        assert_eq!(
            clean,
            json!({ "total_waiting": 4, "max_wait_time_minutes": 35 })
        );
    }

    #[test]
    fn arrays_are_sanitized_element_wise() {
        let raw = json!([
            { "id": "a1", "patient_name": "Anjali", "ssn": "x" },
            { "id": "a2", "doctor_name": "Dr. Rao" }
        ]);
        let clean = sanitize(&raw, Intent::CheckInPatient);
        assert_eq!(
            clean,
            json!([
                { "id": "a1", "patient_name": "Anjali" },
                { "id": "a2", "doctor_name": "Dr. Rao" }
            ])
        );
    }

    #[test]
    fn missing_whitelisted_keys_are_omitted_not_nulled() {
        let raw = json!({ "total_count": 7 });
        let clean = sanitize(&raw, Intent::GetTodayAppointments);
        assert_eq!(clean, json!({ "total_count": 7 }));
        assert!(clean.get("breakdown").is_none());
    }

    #[test]
    fn sanitizing_twice_is_idempotent() {
        let raw = json!({
            "total_leads_today": 3,
            "total_appointments_today": 9,
            "secret": true
        });
        let once = sanitize(&raw, Intent::GetClinicSummary);
        let twice = sanitize(&once, Intent::GetClinicSummary);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_whitelist_yields_empty_object() {
        let raw = json!({ "anything": 1, "at": 2, "all": 3 });
        assert_eq!(sanitize(&raw, Intent::Unknown), json!({}));
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(sanitize(&json!(42), Intent::GetClinicSummary), json!(42));
        assert_eq!(sanitize(&Value::Null, Intent::Unknown), Value::Null);
    }
}
