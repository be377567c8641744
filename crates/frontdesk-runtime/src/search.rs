//! Candidate search for action intents.
//!
//! Each action defines its own eligible record window:
//!
//! - check-in: today's appointments only,
//! - mark-completed / mark-no-show: the trailing three days plus today, so
//!   retrospective cleanup is possible.
//!
//! No status filter is applied. A candidate in the "wrong" state is still
//! shown; the executor's precondition check turns it into a clear
//! "already done" / "wrong state" message instead of silently hiding it.

use crate::store::{Candidate, RecordStore, SearchWindow};
use frontdesk_core::ActionIntent;
use std::sync::Arc;

/// How far back mark-completed and mark-no-show may reach.
const RETROSPECTIVE_DAYS: i64 = 3;

/// The search window for one action type.
pub fn window_for(action: ActionIntent) -> SearchWindow {
    match action {
        ActionIntent::CheckIn => SearchWindow::today(),
        ActionIntent::MarkCompleted | ActionIntent::MarkNoShow => {
            SearchWindow::trailing_days(RETROSPECTIVE_DAYS)
        }
    }
}

/// Candidate search over the record store.
pub struct CandidateSearch {
    store: Arc<dyn RecordStore>,
}

impl CandidateSearch {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Find candidate targets for `action` matching `name_hint`. An empty
    /// result is not an error; the orchestrator reports "no match" without
    /// minting any tokens.
    pub async fn search(
        &self,
        action: ActionIntent,
        name_hint: &str,
    ) -> anyhow::Result<Vec<Candidate>> {
        let window = window_for(action);
        let candidates = self.store.search_appointments(window, name_hint).await?;
        tracing::debug!(
            action = %action,
            candidates = candidates.len(),
            "candidate search completed"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn check_in_is_scoped_to_today() {
        let window = window_for(ActionIntent::CheckIn);
        assert_eq!(window.from, window.to);
    }

    #[test]
    fn retrospective_actions_reach_back_three_days() {
        for action in [ActionIntent::MarkCompleted, ActionIntent::MarkNoShow] {
            let window = window_for(action);
            assert_eq!(window.to - window.from, Duration::days(3));
        }
    }
}
