//! Deterministic `Oracle` test double.
//!
//! Reference: spec.md Section 9 — "this keeps tests deterministic by
//! swapping the oracle for a scripted stub".

use crate::errors::OracleError;
use crate::oracle::Oracle;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Returns canned responses in order, one per call. Once exhausted, returns
/// `fallback` forever (default: the literal string the malformed-oracle
/// test scenario expects, spec.md Section 8 scenario 4).
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<String>>,
    fallback: String,
    calls: Mutex<u64>,
}

impl ScriptedOracle {
    #[must_use]
    pub fn new(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            fallback: "garbage".to_string(),
            calls: Mutex::new(0),
        }
    }

    /// An oracle that always returns the same response.
    #[must_use]
    pub fn repeating(response: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: response.into(),
            calls: Mutex::new(0),
        }
    }

    /// An oracle returning malformed, unparseable text every time (spec.md
    /// Section 8 scenario 4).
    #[must_use]
    pub fn garbage() -> Self {
        Self::repeating("garbage")
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    #[must_use]
    pub fn calls_made(&self) -> u64 {
        *self.calls.lock()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn ask(&self, _prompt: &str) -> Result<String, OracleError> {
        *self.calls.lock() += 1;
        let next = self.responses.lock().pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_scripted_responses_in_order() {
        let oracle = ScriptedOracle::new(["first", "second"]);
        assert_eq!(oracle.ask("p").await.unwrap(), "first");
        assert_eq!(oracle.ask("p").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn falls_back_once_script_is_exhausted() {
        let oracle = ScriptedOracle::new(["only"]).with_fallback("done");
        oracle.ask("p").await.unwrap();
        assert_eq!(oracle.ask("p").await.unwrap(), "done");
        assert_eq!(oracle.ask("p").await.unwrap(), "done");
    }

    #[tokio::test]
    async fn tracks_call_count() {
        let oracle = ScriptedOracle::repeating(r#"{"stance":"SUPPORT","reason":"r"}"#);
        oracle.ask("p").await.unwrap();
        oracle.ask("p").await.unwrap();
        assert_eq!(oracle.calls_made(), 2);
    }
}
