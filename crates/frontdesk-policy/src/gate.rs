//! Role-based access gate.
//!
//! Pure function from `(role string, intent)` to an allow/deny decision,
//! backed by the static per-intent allow-lists in the catalog. Fail-closed:
//! a role string that does not parse into a known [`Role`] is denied for
//! every intent.

use frontdesk_core::{Intent, Role};

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Human-readable denial reason; `None` when allowed.
    pub reason: Option<String>,
}

impl Decision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// The access gate. Stateless; all configuration lives in the catalog.
pub struct AccessGate;

impl AccessGate {
    /// Check whether `role` may invoke `intent`.
    ///
    /// Must be evaluated before any data access, on every request. The role
    /// string comes straight from the session layer and is matched
    /// case-insensitively.
    pub fn authorize(role: &str, intent: Intent) -> Decision {
        let parsed: Role = match role.parse() {
            Ok(r) => r,
            Err(_) => {
                tracing::warn!(role, intent = %intent, "unrecognized role denied");
                return Decision::deny(format!(
                    "Access denied. Role '{}' is not recognized.",
                    role.trim()
                ));
            }
        };

        if intent.spec().allowed_roles.contains(&parsed) {
            Decision::allow()
        } else {
            Decision::deny(format!(
                "Access denied. Role '{}' is not authorized for '{}'.",
                parsed, intent
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exhaustive over the fixed role x intent table: the gate must agree
    /// with the catalog on every pair.
    #[test]
    fn gate_matches_catalog_for_every_pair() {
        for intent in Intent::ALL {
            for role in Role::ALL {
                let expected = intent.spec().allowed_roles.contains(&role);
                let decision = AccessGate::authorize(role.as_str(), intent);
                assert_eq!(
                    decision.allowed, expected,
                    "mismatch for ({role}, {intent})"
                );
                assert_eq!(decision.reason.is_none(), expected);
            }
        }
    }

    #[test]
    fn role_matching_is_case_insensitive() {
        assert!(AccessGate::authorize("CRO", Intent::MarkPatientNoShow).allowed);
        assert!(AccessGate::authorize("Front_Desk", Intent::CheckInPatient).allowed);
    }

    #[test]
    fn unknown_roles_fail_closed() {
        for intent in Intent::ALL {
            let decision = AccessGate::authorize("superuser", intent);
            assert!(!decision.allowed);
        }
    }

    #[test]
    fn unknown_intent_is_universally_permitted() {
        for role in Role::ALL {
            assert!(AccessGate::authorize(role.as_str(), Intent::Unknown).allowed);
        }
    }

    #[test]
    fn admin_cannot_check_in_patients() {
        let decision = AccessGate::authorize("admin", Intent::CheckInPatient);
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains("not authorized"));
    }
}
