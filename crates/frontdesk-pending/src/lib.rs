//! Pending action tokens.
//!
//! When an action request is ambiguous, the orchestrator presents the caller
//! with candidate targets, each bound to an opaque token. Presenting the
//! token back confirms exactly one candidate. Tokens are:
//!
//! - single-use: consumption removes the entry regardless of outcome,
//! - time-limited: a token older than its TTL consumes as "not found",
//! - principal-bound: the owning principal id travels with the entry so the
//!   caller can reject a token presented by someone else.
//!
//! The store is in-memory and advisory: a process restart invalidates all
//! outstanding tokens, which is acceptable given the short expiry window.

use chrono::{DateTime, Duration, Utc};
use frontdesk_core::settings::ConfirmationConfig;
use frontdesk_core::ActionIntent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// A proposed state mutation awaiting confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    /// Opaque unguessable token identifying this entry.
    pub token: String,
    /// Principal the token was minted for. Consumption by anyone else must be
    /// rejected by the caller.
    pub principal_id: String,
    /// The confirmation-gated action to perform.
    pub action: ActionIntent,
    /// Action payload, e.g. `{ "appointment_id": "..." }`.
    pub payload: serde_json::Value,
    /// Issuance timestamp; expiry is measured from here.
    pub created_at: DateTime<Utc>,
}

/// Interchangeable token store abstraction.
///
/// The default is a mutex-guarded map; a shared external store can replace it
/// for multi-process deployments without touching the orchestrator.
pub trait PendingActionStore: Send + Sync {
    /// Mint a token binding `(principal, action, payload)`. Returns the
    /// opaque token string.
    fn issue(&self, principal_id: &str, action: ActionIntent, payload: serde_json::Value)
        -> String;

    /// Retrieve AND remove the entry for `token`.
    ///
    /// Destructive regardless of outcome: a valid entry is returned once and
    /// never again, an expired entry is discarded and reported as `None`, an
    /// unknown token is `None`. At most one concurrent caller can observe a
    /// successful consumption.
    fn consume(&self, token: &str) -> Option<PendingAction>;

    /// Drop expired entries. Optional housekeeping for an external scheduler;
    /// consumption already discards expired tokens lazily.
    fn sweep(&self);
}

/// Mutex-guarded in-memory store.
pub struct InMemoryPendingStore {
    entries: Mutex<HashMap<String, PendingAction>>,
    ttl: Duration,
}

impl InMemoryPendingStore {
    /// Create a store whose tokens expire `ttl` after issuance.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Store with the configured token TTL.
    pub fn from_config(config: &ConfirmationConfig) -> Self {
        Self::new(Duration::seconds(config.token_ttl_secs))
    }

    /// Number of live entries, expired or not. Test/diagnostic aid.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryPendingStore {
    fn default() -> Self {
        // 5-minute confirmation window.
        Self::new(Duration::minutes(5))
    }
}

impl PendingActionStore for InMemoryPendingStore {
    fn issue(
        &self,
        principal_id: &str,
        action: ActionIntent,
        payload: serde_json::Value,
    ) -> String {
        let token = Uuid::new_v4().to_string();
        let entry = PendingAction {
            token: token.clone(),
            principal_id: principal_id.to_string(),
            action,
            payload,
            created_at: Utc::now(),
        };
        self.entries.lock().unwrap().insert(token.clone(), entry);
        token
    }

    fn consume(&self, token: &str) -> Option<PendingAction> {
        // Single lock for the whole check-and-remove, so two concurrent
        // confirmations of the same token cannot both succeed.
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.remove(token)?;

        if Utc::now() - entry.created_at > self.ttl {
            return None;
        }

        Some(entry)
    }

    fn sweep(&self) {
        let now = Utc::now();
        let ttl = self.ttl;
        self.entries
            .lock()
            .unwrap()
            .retain(|_, entry| now - entry.created_at <= ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn consume_succeeds_at_most_once() {
        let store = InMemoryPendingStore::default();
        let token = store.issue("user-1", ActionIntent::CheckIn, json!({"appointment_id": "a1"}));

        let first = store.consume(&token).expect("first consume must succeed");
        assert_eq!(first.principal_id, "user-1");
        assert_eq!(first.action, ActionIntent::CheckIn);
        assert_eq!(first.payload["appointment_id"], "a1");

        assert!(store.consume(&token).is_none(), "token must be single-use");
    }

    #[test]
    fn from_config_honors_the_ttl() {
        let store = InMemoryPendingStore::from_config(&ConfirmationConfig { token_ttl_secs: -1 });
        let token = store.issue("u", ActionIntent::CheckIn, json!({}));
        assert!(store.consume(&token).is_none());
    }

    #[test]
    fn unknown_token_is_none() {
        let store = InMemoryPendingStore::default();
        assert!(store.consume("not-a-token").is_none());
    }

    #[test]
    fn expired_token_consumes_as_not_found_and_is_destroyed() {
        // Negative TTL: every token is born expired.
        let store = InMemoryPendingStore::new(Duration::seconds(-1));
        let token = store.issue("user-1", ActionIntent::MarkNoShow, json!({}));

        assert!(store.consume(&token).is_none());
        // The failed consumption removed the entry.
        assert!(store.is_empty());
    }

    #[test]
    fn tokens_are_opaque_and_distinct() {
        let store = InMemoryPendingStore::default();
        let a = store.issue("u", ActionIntent::CheckIn, json!({"appointment_id": "a1"}));
        let b = store.issue("u", ActionIntent::CheckIn, json!({"appointment_id": "a2"}));
        assert_ne!(a, b);
    }

    #[test]
    fn sweep_drops_only_expired_entries() {
        let fresh = InMemoryPendingStore::default();
        fresh.issue("u", ActionIntent::MarkCompleted, json!({}));
        fresh.sweep();
        assert_eq!(fresh.len(), 1);

        let stale = InMemoryPendingStore::new(Duration::seconds(-1));
        stale.issue("u", ActionIntent::MarkCompleted, json!({}));
        stale.sweep();
        assert!(stale.is_empty());
    }

    #[test]
    fn concurrent_consumption_admits_one_winner() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryPendingStore::default());
        let token = store.issue("u", ActionIntent::CheckIn, json!({"appointment_id": "a1"}));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let token = token.clone();
            handles.push(std::thread::spawn(move || store.consume(&token).is_some()));
        }

        let wins: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(wins, 1);
    }
}
