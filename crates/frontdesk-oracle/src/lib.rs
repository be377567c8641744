//! The Text Oracle boundary.
//!
//! The assistant delegates all language understanding to an external
//! generative service behind the [`TextOracle`] trait: one method, a system
//! instruction plus a user message in, a plain text completion out. The two
//! call sites (intent classification and response composition) own their
//! prompts and their fallbacks; this crate owns only the transport.
//!
//! Oracle failures are ordinary `Err` values here. Callers must degrade to
//! their documented defaults; nothing past the orchestrator boundary ever
//! sees an oracle error.

use async_trait::async_trait;

mod http;

pub use http::HttpOracle;

/// Capability interface for the external text service.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Produce a completion for `user` under the given `system` instruction.
    async fn complete(&self, system: &str, user: &str) -> anyhow::Result<String>;
}

/// Deterministic oracle for tests: replays a fixed sequence of responses.
pub struct ScriptedOracle {
    responses: std::sync::Mutex<std::collections::VecDeque<anyhow::Result<String>>>,
}

impl ScriptedOracle {
    /// Oracle that answers each call with the next scripted response and
    /// errors once the script runs out.
    pub fn new(responses: impl IntoIterator<Item = anyhow::Result<String>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into_iter().collect()),
        }
    }

    /// Oracle that always answers with the same text.
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(std::iter::repeat_with(move || Ok(text.clone())).take(64))
    }

    /// Oracle that always fails, for exercising fallbacks.
    pub fn failing() -> Self {
        Self::new(std::iter::empty())
    }
}

#[async_trait]
impl TextOracle for ScriptedOracle {
    async fn complete(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("scripted oracle exhausted")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_oracle_replays_in_order() {
        let oracle = ScriptedOracle::new([Ok("first".to_string()), Ok("second".to_string())]);
        assert_eq!(oracle.complete("s", "u").await.unwrap(), "first");
        assert_eq!(oracle.complete("s", "u").await.unwrap(), "second");
        assert!(oracle.complete("s", "u").await.is_err());
    }

    #[tokio::test]
    async fn failing_oracle_always_errors() {
        let oracle = ScriptedOracle::failing();
        assert!(oracle.complete("s", "u").await.is_err());
    }
}
