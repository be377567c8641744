//! The composition root.
//!
//! Sequences the pipeline for one inbound request along one of two paths:
//!
//! - **token path**: consume the confirmation token, check ownership,
//!   execute, report the outcome;
//! - **message path**: classify, authorize, then either search-and-offer
//!   (action intents) or fetch-sanitize-compose (read intents).
//!
//! Infrastructure failures are caught here, logged with their detail, and
//! surfaced to the caller as one generic message; store- or oracle-specific
//! error text never reaches the end user. Every request emits a structured
//! trace event with principal, role, intent, allowed flag and duration;
//! message content is never logged.

use crate::executor::ActionExecutor;
use crate::resolver::IntentResolver;
use crate::responder::Responder;
use crate::search::CandidateSearch;
use crate::store::{Candidate, RecordStore};
use frontdesk_audit::AuditLogger;
use frontdesk_core::{ActionIntent, AssistantConfig, Intent, Principal};
use frontdesk_oracle::TextOracle;
use frontdesk_pending::PendingActionStore;
use frontdesk_policy::{sanitize, AccessGate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// Generic reply for infrastructure failures.
const INTERNAL_ERROR_REPLY: &str = "An internal error occurred while processing your request.";

/// Reply for an unknown, expired, or already-used confirmation token.
const STALE_TOKEN_REPLY: &str =
    "That confirmation has expired or was already used. Please start over.";

/// Reply when a token is presented by someone other than its owner.
const FOREIGN_TOKEN_REPLY: &str = "You are not authorized to confirm this action.";

/// One selectable confirmation option presented to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationOption {
    /// Human-readable description of the candidate.
    pub label: String,
    /// Opaque single-use token confirming this candidate.
    pub token: String,
}

/// Terminal state of one processed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    /// Resolved intent, for the HTTP layer's diagnostics. Absent on the
    /// token path (classification is bypassed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    /// When true, the caller should present `options` for confirmation.
    #[serde(default)]
    pub action_required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ConfirmationOption>,
}

impl ChatReply {
    fn plain(reply: impl Into<String>, intent: Option<Intent>) -> Self {
        Self {
            reply: reply.into(),
            intent,
            action_required: false,
            options: Vec::new(),
        }
    }
}

/// Caller errors, rejected before the pipeline runs.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("the assistant is disabled")]
    Disabled,

    #[error("a message or a confirmation token is required")]
    MissingInput,
}

/// The assistant core. One instance serves all requests; per-request state
/// lives on the stack, shared state only in the pending action store.
pub struct Assistant {
    config: AssistantConfig,
    store: Arc<dyn RecordStore>,
    pending: Arc<dyn PendingActionStore>,
    audit: AuditLogger,
    resolver: IntentResolver,
    search: CandidateSearch,
    executor: ActionExecutor,
    responder: Responder,
}

impl Assistant {
    pub fn new(
        config: AssistantConfig,
        store: Arc<dyn RecordStore>,
        oracle: Arc<dyn TextOracle>,
        pending: Arc<dyn PendingActionStore>,
        audit: AuditLogger,
    ) -> Self {
        Self {
            config,
            pending,
            audit: audit.clone(),
            resolver: IntentResolver::new(Arc::clone(&oracle)),
            search: CandidateSearch::new(Arc::clone(&store)),
            executor: ActionExecutor::new(Arc::clone(&store), audit),
            responder: Responder::new(oracle),
            store,
        }
    }

    /// Process one inbound request. `confirmation_token`, when present,
    /// bypasses classification entirely. Absence of both a usable message
    /// and a token is a caller error.
    pub async fn process(
        &self,
        principal: &Principal,
        message: Option<&str>,
        confirmation_token: Option<&str>,
    ) -> Result<ChatReply, ProcessError> {
        if !self.config.enabled {
            return Err(ProcessError::Disabled);
        }

        let started = Instant::now();

        if let Some(token) = confirmation_token {
            let (reply, intent, executed) = self.run_token_path(principal, token).await;
            tracing::info!(
                principal = %principal.id,
                role = %principal.role,
                path = "token",
                intent = intent.map(|i| i.label()).unwrap_or("-"),
                executed,
                duration_ms = started.elapsed().as_millis() as u64,
                "request processed"
            );
            return Ok(reply);
        }

        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Err(ProcessError::MissingInput),
        };

        let (reply, intent, allowed) = self.run_message_path(principal, message).await;
        tracing::info!(
            principal = %principal.id,
            role = %principal.role,
            intent = %intent,
            allowed,
            action_required = reply.action_required,
            duration_ms = started.elapsed().as_millis() as u64,
            "request processed"
        );
        Ok(reply)
    }

    /// Token path: consume → ownership check → execute → outcome text.
    /// Also reports the intent (once known) and whether the action actually
    /// executed, for the per-request trace.
    async fn run_token_path(
        &self,
        principal: &Principal,
        token: &str,
    ) -> (ChatReply, Option<Intent>, bool) {
        // Consumption is destructive whatever happens next.
        let Some(pending) = self.pending.consume(token) else {
            return (ChatReply::plain(STALE_TOKEN_REPLY, None), None, false);
        };

        let intent = pending.action.intent();

        if pending.principal_id != principal.id {
            tracing::warn!(
                principal = %principal.id,
                owner = %pending.principal_id,
                action = %pending.action,
                "confirmation token presented by non-owner; token destroyed"
            );
            self.audit
                .log_authorization_denied(
                    &principal.id,
                    &principal.role,
                    pending.action.audit_name(),
                    "confirmation token owned by another principal",
                )
                .await;
            return (
                ChatReply::plain(FOREIGN_TOKEN_REPLY, None),
                Some(intent),
                false,
            );
        }

        let Some(target_id) = pending
            .payload
            .get("appointment_id")
            .and_then(Value::as_str)
        else {
            tracing::error!(action = %pending.action, "pending action payload missing appointment_id");
            return (
                ChatReply::plain(INTERNAL_ERROR_REPLY, None),
                Some(intent),
                false,
            );
        };

        match self
            .executor
            .execute(pending.action, target_id, principal)
            .await
        {
            Ok(outcome) => (
                ChatReply::plain(outcome.message, Some(intent)),
                Some(intent),
                outcome.success,
            ),
            Err(error) => {
                tracing::error!(%error, action = %pending.action, "action execution failed");
                (
                    ChatReply::plain(INTERNAL_ERROR_REPLY, Some(intent)),
                    Some(intent),
                    false,
                )
            }
        }
    }

    /// Message path: classify → authorize → search/offer or fetch/compose.
    async fn run_message_path(
        &self,
        principal: &Principal,
        message: &str,
    ) -> (ChatReply, Intent, bool) {
        let resolution = self.resolver.resolve(message).await;
        let intent = resolution.intent;

        let decision = AccessGate::authorize(&principal.role, intent);
        if !decision.allowed {
            let reason = decision
                .reason
                .unwrap_or_else(|| "You are not authorized to perform this action.".to_string());
            self.audit
                .log_authorization_denied(&principal.id, &principal.role, intent.label(), &reason)
                .await;
            return (ChatReply::plain(reason, Some(intent)), intent, false);
        }

        let reply = if intent == Intent::Unknown {
            // No data fetch for the fallback intent.
            ChatReply::plain(
                self.responder.compose(intent, &Value::Null, message).await,
                Some(intent),
            )
        } else if let Some(action) = intent.as_action() {
            self.offer_candidates(principal, action, resolution.search_hint.as_deref())
                .await
        } else {
            self.answer_read_intent(principal, intent, message).await
        };

        (reply, intent, true)
    }

    /// Action intents: search for candidates and mint one token per match.
    async fn offer_candidates(
        &self,
        principal: &Principal,
        action: ActionIntent,
        name_hint: Option<&str>,
    ) -> ChatReply {
        let hint = name_hint.unwrap_or_default();
        let intent = action.intent();

        let candidates = match self.search.search(action, hint).await {
            Ok(candidates) => candidates,
            Err(error) => {
                tracing::error!(%error, action = %action, "candidate search failed");
                return ChatReply::plain(INTERNAL_ERROR_REPLY, Some(intent));
            }
        };

        if candidates.is_empty() {
            return ChatReply::plain(
                "I couldn't find any relevant appointments matching that request.",
                Some(intent),
            );
        }

        let options: Vec<ConfirmationOption> = candidates
            .iter()
            .map(|candidate| {
                let token = self.pending.issue(
                    &principal.id,
                    action,
                    json!({ "appointment_id": candidate.id }),
                );
                ConfirmationOption {
                    label: candidate_label(candidate),
                    token,
                }
            })
            .collect();

        ChatReply {
            reply: format!(
                "I found {} matching appointment{}. Please confirm which one you mean.",
                options.len(),
                if options.len() == 1 { "" } else { "s" }
            ),
            intent: Some(intent),
            action_required: true,
            options,
        }
    }

    /// Read intents: fetch → sanitize → compose.
    async fn answer_read_intent(
        &self,
        principal: &Principal,
        intent: Intent,
        message: &str,
    ) -> ChatReply {
        let raw = match self.fetch(intent, principal).await {
            Ok(raw) => raw,
            Err(error) => {
                tracing::error!(%error, intent = %intent, "record store fetch failed");
                return ChatReply::plain(INTERNAL_ERROR_REPLY, Some(intent));
            }
        };

        // Privacy boundary: only whitelisted fields may reach composition.
        let sanitized = sanitize(&raw, intent);
        let reply = self.responder.compose(intent, &sanitized, message).await;
        ChatReply::plain(reply, Some(intent))
    }

    async fn fetch(&self, intent: Intent, principal: &Principal) -> anyhow::Result<Value> {
        match intent {
            Intent::GetStallingLeads => self.store.stalling_leads().await,
            Intent::GetTodayAppointments => {
                self.store.today_appointments(&principal.id).await
            }
            Intent::GetWaitingPatients => self.store.waiting_patients().await,
            Intent::GetClinicSummary => self.store.clinic_summary().await,
            // Action intents and Unknown never fetch.
            _ => Ok(Value::Null),
        }
    }
}

fn candidate_label(candidate: &Candidate) -> String {
    format!(
        "{} at {} with {} ({})",
        candidate.patient_name, candidate.time, candidate.doctor_name, candidate.status
    )
}
