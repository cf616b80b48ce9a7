//! Shared test doubles for orchestrator and retry tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::adapter::ProviderAdapter;
use crate::error::RawProviderError;
use crate::orchestrator::AttemptObserver;
use crate::registry::ProviderSpec;
use crate::request::{AttemptRecord, CallRequest, CallResult};

/// Adapter that plays back scripted outcomes and counts its calls.
///
/// The last outcome repeats once the script runs out, so a single-entry
/// script behaves as "always succeed" / "always fail".
pub(crate) struct ScriptedAdapter {
    name: &'static str,
    outcomes: Mutex<VecDeque<Result<String, RawProviderError>>>,
    calls: AtomicUsize,
}

impl ScriptedAdapter {
    pub fn script(
        name: &'static str,
        outcomes: Vec<Result<String, RawProviderError>>,
    ) -> Self {
        assert!(!outcomes.is_empty(), "script needs at least one outcome");
        Self {
            name,
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding(name: &'static str, content: &str) -> Self {
        Self::script(name, vec![Ok(content.to_string())])
    }

    pub fn failing(name: &'static str, error: RawProviderError) -> Self {
        Self::script(name, vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn name(&self) -> &str {
        self.name
    }

    async fn complete(
        &self,
        _spec: &ProviderSpec,
        _credential: &str,
        _request: &CallRequest,
    ) -> Result<String, RawProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.len() > 1 {
            outcomes.pop_front().unwrap()
        } else {
            outcomes.front().cloned().unwrap()
        }
    }
}

/// Observer that captures everything it is told.
#[derive(Default)]
pub(crate) struct RecordingObserver {
    pub skipped: Mutex<Vec<AttemptRecord>>,
    pub attempts: Mutex<Vec<String>>,
    pub failures: Mutex<Vec<AttemptRecord>>,
    pub successes: Mutex<Vec<CallResult>>,
}

impl AttemptObserver for RecordingObserver {
    fn on_skipped(&self, record: &AttemptRecord) {
        self.skipped.lock().unwrap().push(record.clone());
    }

    fn on_attempt(&self, provider_name: &str, _model_name: &str) {
        self.attempts.lock().unwrap().push(provider_name.to_string());
    }

    fn on_failure(&self, record: &AttemptRecord) {
        self.failures.lock().unwrap().push(record.clone());
    }

    fn on_success(&self, result: &CallResult) {
        self.successes.lock().unwrap().push(result.clone());
    }
}
