//! Intent resolution.
//!
//! Maps a free-text message onto the closed [`Intent`] set via the Text
//! Oracle. The contract with the oracle is a single line: the intent label,
//! optionally followed by `|` and a patient-name search hint for action
//! intents. Oracle failure, empty output, or an unknown label all
//! resolve to [`Intent::Unknown`]. Resolution never errors.

use frontdesk_core::catalog::classifiable_specs;
use frontdesk_core::Intent;
use frontdesk_oracle::TextOracle;
use std::fmt::Write;
use std::sync::Arc;

/// Outcome of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub intent: Intent,
    /// Free-text target hint extracted from the message, present only for
    /// action intents (e.g. a patient name fragment).
    pub search_hint: Option<String>,
}

impl Resolution {
    fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            search_hint: None,
        }
    }
}

/// Classifier facade over the Text Oracle.
pub struct IntentResolver {
    oracle: Arc<dyn TextOracle>,
}

impl IntentResolver {
    pub fn new(oracle: Arc<dyn TextOracle>) -> Self {
        Self { oracle }
    }

    /// Classify `message`. Infallible by contract: any failure is `Unknown`.
    pub async fn resolve(&self, message: &str) -> Resolution {
        let system = classification_prompt();

        match self.oracle.complete(&system, message).await {
            Ok(reply) => parse_oracle_reply(&reply),
            Err(error) => {
                tracing::warn!(%error, "intent classification failed; falling back to UNKNOWN");
                Resolution::unknown()
            }
        }
    }
}

/// System prompt enumerating every classifiable intent and its description.
fn classification_prompt() -> String {
    let mut prompt = String::from(
        "You are an intent classifier for a clinic front-desk assistant.\n\
         Map the user's message to exactly one of these intents:\n\n",
    );
    for spec in classifiable_specs() {
        let _ = writeln!(prompt, "- {}: {}", spec.intent.label(), spec.description);
    }
    prompt.push_str(
        "- UNKNOWN: if the message matches none of the above.\n\n\
         Output ONLY the intent name. For the three action intents, append a pipe \
         and the patient name mentioned in the message, e.g. \
         CHECK_IN_PATIENT|Anjali. No explanation.",
    );
    prompt
}

/// Parse the oracle's one-line reply. Total: malformed input is `Unknown`.
fn parse_oracle_reply(reply: &str) -> Resolution {
    let line = reply.lines().next().unwrap_or("").trim();
    let (label, hint) = match line.split_once('|') {
        Some((label, hint)) => (label, Some(hint.trim())),
        None => (line, None),
    };

    let Ok(intent) = label.parse::<Intent>() else {
        return Resolution::unknown();
    };

    // Hints only make sense for action intents; drop them otherwise.
    let search_hint = if intent.is_action() {
        hint.filter(|h| !h.is_empty()).map(str::to_string)
    } else {
        None
    };

    Resolution {
        intent,
        search_hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_oracle::ScriptedOracle;

    #[tokio::test]
    async fn resolves_a_read_intent() {
        let resolver =
            IntentResolver::new(Arc::new(ScriptedOracle::always("GET_WAITING_PATIENTS")));
        let resolution = resolver.resolve("is anyone waiting?").await;
        assert_eq!(resolution.intent, Intent::GetWaitingPatients);
        assert!(resolution.search_hint.is_none());
    }

    #[tokio::test]
    async fn resolves_an_action_intent_with_hint() {
        let resolver =
            IntentResolver::new(Arc::new(ScriptedOracle::always("CHECK_IN_PATIENT|Anjali")));
        let resolution = resolver.resolve("check in anjali please").await;
        assert_eq!(resolution.intent, Intent::CheckInPatient);
        assert_eq!(resolution.search_hint.as_deref(), Some("Anjali"));
    }

    #[tokio::test]
    async fn oracle_failure_falls_back_to_unknown() {
        let resolver = IntentResolver::new(Arc::new(ScriptedOracle::failing()));
        assert_eq!(resolver.resolve("anything").await, Resolution::unknown());
    }

    #[test]
    fn labels_outside_the_closed_set_are_unknown() {
        assert_eq!(parse_oracle_reply("DELETE_EVERYTHING"), Resolution::unknown());
        assert_eq!(parse_oracle_reply(""), Resolution::unknown());
        assert_eq!(
            parse_oracle_reply("The intent is GET_CLINIC_SUMMARY."),
            Resolution::unknown()
        );
    }

    #[test]
    fn hint_on_a_read_intent_is_dropped() {
        let resolution = parse_oracle_reply("GET_CLINIC_SUMMARY|bogus");
        assert_eq!(resolution.intent, Intent::GetClinicSummary);
        assert!(resolution.search_hint.is_none());
    }

    #[test]
    fn empty_hint_is_none() {
        let resolution = parse_oracle_reply("MARK_PATIENT_NO_SHOW|  ");
        assert_eq!(resolution.intent, Intent::MarkPatientNoShow);
        assert!(resolution.search_hint.is_none());
    }

    #[test]
    fn only_the_first_line_counts() {
        let resolution = parse_oracle_reply("CHECK_IN_PATIENT|Rita\nextra commentary");
        assert_eq!(resolution.intent, Intent::CheckInPatient);
        assert_eq!(resolution.search_hint.as_deref(), Some("Rita"));
    }

    #[test]
    fn prompt_lists_every_classifiable_intent() {
        let prompt = classification_prompt();
        for intent in Intent::ALL {
            if intent != Intent::Unknown {
                assert!(prompt.contains(intent.label()), "missing {intent}");
            }
        }
    }
}
