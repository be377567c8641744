//! Response composition.
//!
//! Turns sanitized data into a natural-language reply via the Text Oracle.
//! Every failure mode has a canned fallback; composition never errors and
//! never sees unsanitized data.

use frontdesk_core::Intent;
use frontdesk_oracle::TextOracle;
use serde_json::Value;
use std::sync::Arc;

/// Reply for the classification fallback.
pub const UNKNOWN_REPLY: &str = "I'm sorry, I didn't understand that request. I can help you \
     with stalling leads, today's appointments, waiting patients, or a clinic summary.";

/// Reply when a read intent produced no data.
pub const NO_DATA_REPLY: &str = "I found no data matching your request.";

/// Reply when the oracle fails during composition.
const COMPOSE_FALLBACK_REPLY: &str = "I encountered an error while composing the response.";

/// Composes user-facing replies from sanitized payloads.
pub struct Responder {
    oracle: Arc<dyn TextOracle>,
}

impl Responder {
    pub fn new(oracle: Arc<dyn TextOracle>) -> Self {
        Self { oracle }
    }

    /// Compose a reply for `intent` from already-sanitized `data`.
    pub async fn compose(&self, intent: Intent, data: &Value, user_message: &str) -> String {
        if intent == Intent::Unknown {
            return UNKNOWN_REPLY.to_string();
        }

        if is_empty(data) {
            return NO_DATA_REPLY.to_string();
        }

        let system = composition_prompt();
        let user = format!(
            "Original Question: \"{}\"\nIntent: {}\nData: {}",
            user_message, intent, data
        );

        match self.oracle.complete(&system, &user).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(%error, intent = %intent, "response composition failed");
                COMPOSE_FALLBACK_REPLY.to_string()
            }
        }
    }
}

fn composition_prompt() -> String {
    "You are a helpful internal assistant for a clinic.\n\
     Answer the user's question based ONLY on the provided JSON data.\n\n\
     Rules:\n\
     1. Do NOT make up facts.\n\
     2. Do NOT infer information not present in the data.\n\
     3. Keep the response natural, concise, and professional.\n\
     4. If the data is empty or indicates \"0\", state that clearly.\n\
     5. Do not expose internal identifiers unless the data presents them as display fields."
        .to_string()
}

fn is_empty(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
