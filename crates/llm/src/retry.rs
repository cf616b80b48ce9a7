//! Sweep-level retry with randomized exponential backoff.
//!
//! A provider never gets retried inside a sweep; the only thing worth
//! retrying is the whole sweep, when the aggregated failure looks like a
//! transient, system-wide condition (a burst of rate limiting, a shared
//! credential store not yet populated). Which failure kinds trigger that is
//! configurable policy, not a fixed law.

use log::warn;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{ErrorKind, LlmError};
use crate::orchestrator::Orchestrator;
use crate::request::{CallRequest, CallResult};

/// Classifier rule order, reused to break dominance ties.
const KIND_ORDER: [ErrorKind; 4] = [
    ErrorKind::RateLimited,
    ErrorKind::Unavailable,
    ErrorKind::CredentialMissing,
    ErrorKind::Generic,
];

// ============================================================================
// Retry Policy
// ============================================================================

/// Policy for retrying whole sweeps.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total sweeps allowed, including the first (minimum 1).
    pub max_sweeps: u32,
    /// Lower bound of the backoff wait.
    pub min_backoff: Duration,
    /// Upper bound of the backoff wait.
    pub max_backoff: Duration,
    /// Dominant failure kinds that trigger a fresh sweep.
    pub retry_on: Vec<ErrorKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_sweeps: 3,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            retry_on: vec![ErrorKind::RateLimited, ErrorKind::CredentialMissing],
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_sweeps: 1,
            ..Self::default()
        }
    }

    /// Decide whether a failed sweep should be retried.
    pub fn should_retry(&self, error: &LlmError) -> bool {
        dominant_kind(error).is_some_and(|kind| self.retry_on.contains(&kind))
    }

    /// Randomized exponential backoff delay before sweep `attempt` (0-based
    /// count of sweeps already failed): uniform over
    /// `[min_backoff, min(max_backoff, min_backoff * 2^attempt)]`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let min_ms = self.min_backoff.as_millis().min(u64::MAX as u128) as u64;
        let cap_ms = self.max_backoff.as_millis().min(u64::MAX as u128) as u64;
        if cap_ms == 0 {
            return Duration::ZERO;
        }
        let multiplier = 1_u64 << attempt.min(10);
        let high = min_ms.saturating_mul(multiplier).clamp(min_ms.min(cap_ms), cap_ms);
        let low = min_ms.min(high);
        let ms = rand::thread_rng().gen_range(low..=high);
        Duration::from_millis(ms)
    }
}

/// The failure kind that dominates an aggregated sweep error.
///
/// `NoCredentials` is missing-credentials by definition; for `Exhausted`
/// sweeps it is the most frequent kind across the failure records, ties
/// broken by classifier rule order. Configuration failures and internal
/// errors have no dominant kind and are never retried.
pub fn dominant_kind(error: &LlmError) -> Option<ErrorKind> {
    match error {
        LlmError::NoCredentials { .. } => Some(ErrorKind::CredentialMissing),
        LlmError::Exhausted { attempts } => {
            let mut counts: HashMap<ErrorKind, usize> = HashMap::new();
            for kind in attempts.iter().filter_map(|record| record.kind()) {
                *counts.entry(kind).or_insert(0) += 1;
            }
            let mut best: Option<(usize, ErrorKind)> = None;
            for kind in KIND_ORDER {
                let count = counts.get(&kind).copied().unwrap_or(0);
                if count > 0 && best.map_or(true, |(c, _)| count > c) {
                    best = Some((count, kind));
                }
            }
            best.map(|(_, kind)| kind)
        }
        LlmError::EmptyRegistry
        | LlmError::RetriesExhausted { .. }
        | LlmError::Internal(_) => None,
    }
}

/// Fold a final failed sweep into the budget-exceeded error.
fn into_retries_exhausted(error: LlmError, sweeps: u32) -> LlmError {
    match error {
        LlmError::NoCredentials { attempts } | LlmError::Exhausted { attempts } => {
            LlmError::RetriesExhausted { sweeps, attempts }
        }
        other => other,
    }
}

// ============================================================================
// Retry Controller
// ============================================================================

impl Orchestrator {
    /// Run sweeps under `policy` until one succeeds, a non-retryable failure
    /// occurs, or the sweep budget runs out.
    ///
    /// The backoff wait blocks only this invocation.
    pub async fn call_with_retry(
        &self,
        request: &CallRequest,
        preference: Option<&[String]>,
        policy: &RetryPolicy,
    ) -> Result<CallResult, LlmError> {
        let max_sweeps = policy.max_sweeps.max(1);
        let mut failed_sweeps = 0;
        loop {
            let error = match self.call(request, preference).await {
                Ok(result) => return Ok(result),
                Err(error) => error,
            };
            failed_sweeps += 1;

            if !policy.should_retry(&error) {
                return Err(error);
            }
            if failed_sweeps >= max_sweeps {
                return Err(into_retries_exhausted(error, max_sweeps));
            }

            let delay = policy.backoff_delay(failed_sweeps - 1);
            warn!(
                "Sweep {}/{} failed ({}); retrying in {:?}",
                failed_sweeps,
                max_sweeps,
                error.code(),
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AdapterRegistry;
    use crate::error::RawProviderError;
    use crate::registry::{ProviderRegistry, ProviderSpec};
    use crate::request::AttemptRecord;
    use crate::testing::ScriptedAdapter;
    use litrev_core::MemoryCredentialStore;
    use std::sync::Arc;

    fn single_provider_orchestrator(
        adapter: Arc<ScriptedAdapter>,
        credentials: MemoryCredentialStore,
    ) -> Orchestrator {
        let registry = ProviderRegistry::new(vec![ProviderSpec::new(
            "openai",
            "OPENAI_API_KEY",
            "gpt-4o",
        )]);
        let mut table = AdapterRegistry::new();
        table.register(adapter);
        Orchestrator::new(registry, table, Arc::new(credentials))
    }

    fn rate_limited() -> RawProviderError {
        RawProviderError::new(Some(429), "rate limit exceeded")
    }

    #[test]
    fn test_dominant_kind_of_no_credentials() {
        let error = LlmError::NoCredentials { attempts: vec![] };
        assert_eq!(dominant_kind(&error), Some(ErrorKind::CredentialMissing));
    }

    #[test]
    fn test_dominant_kind_most_frequent_wins() {
        let error = LlmError::Exhausted {
            attempts: vec![
                AttemptRecord::failure("a", ErrorKind::Generic, "x"),
                AttemptRecord::failure("b", ErrorKind::Generic, "y"),
                AttemptRecord::failure("c", ErrorKind::RateLimited, "z"),
            ],
        };
        assert_eq!(dominant_kind(&error), Some(ErrorKind::Generic));
    }

    #[test]
    fn test_dominant_kind_tie_breaks_by_rule_order() {
        let error = LlmError::Exhausted {
            attempts: vec![
                AttemptRecord::failure("a", ErrorKind::Generic, "x"),
                AttemptRecord::failure("b", ErrorKind::RateLimited, "y"),
            ],
        };
        assert_eq!(dominant_kind(&error), Some(ErrorKind::RateLimited));
    }

    #[test]
    fn test_empty_registry_has_no_dominant_kind() {
        assert_eq!(dominant_kind(&LlmError::EmptyRegistry), None);
    }

    #[test]
    fn test_backoff_delay_stays_within_bounds() {
        let policy = RetryPolicy::default();
        for attempt in 0..8 {
            let delay = policy.backoff_delay(attempt);
            assert!(delay >= policy.min_backoff, "attempt {attempt}: {delay:?}");
            assert!(delay <= policy.max_backoff, "attempt {attempt}: {delay:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_sweeps_retried_up_to_budget() {
        let adapter = Arc::new(ScriptedAdapter::failing("openai", rate_limited()));
        let credentials = MemoryCredentialStore::with_values([("OPENAI_API_KEY", "sk")]);
        let orchestrator = single_provider_orchestrator(adapter.clone(), credentials);

        let err = orchestrator
            .call_with_retry(&CallRequest::new("x"), None, &RetryPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "RETRIES_EXHAUSTED");
        assert_eq!(adapter.call_count(), 3);
        // Diagnostics from the last sweep survive.
        assert_eq!(err.attempts().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generic_exhaustion_not_retried() {
        let adapter = Arc::new(ScriptedAdapter::failing(
            "openai",
            RawProviderError::new(Some(500), "boom"),
        ));
        let credentials = MemoryCredentialStore::with_values([("OPENAI_API_KEY", "sk")]);
        let orchestrator = single_provider_orchestrator(adapter.clone(), credentials);

        let err = orchestrator
            .call_with_retry(&CallRequest::new("x"), None, &RetryPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EXHAUSTED");
        assert_eq!(adapter.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_second_sweep() {
        let adapter = Arc::new(ScriptedAdapter::script(
            "openai",
            vec![Err(rate_limited()), Ok("recovered".to_string())],
        ));
        let credentials = MemoryCredentialStore::with_values([("OPENAI_API_KEY", "sk")]);
        let orchestrator = single_provider_orchestrator(adapter.clone(), credentials);

        let result = orchestrator
            .call_with_retry(&CallRequest::new("x"), None, &RetryPolicy::default())
            .await
            .unwrap();
        assert_eq!(result.content, "recovered");
        assert_eq!(adapter.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_credentials_sweeps_retried() {
        let adapter = Arc::new(ScriptedAdapter::succeeding("openai", "never"));
        let orchestrator =
            single_provider_orchestrator(adapter.clone(), MemoryCredentialStore::new());

        let policy = RetryPolicy {
            max_sweeps: 2,
            ..RetryPolicy::default()
        };
        let err = orchestrator
            .call_with_retry(&CallRequest::new("x"), None, &policy)
            .await
            .unwrap_err();
        match err {
            LlmError::RetriesExhausted { sweeps, attempts } => {
                assert_eq!(sweeps, 2);
                assert_eq!(attempts.len(), 1);
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(adapter.call_count(), 0);
    }

    #[tokio::test]
    async fn test_custom_trigger_set_disables_retry() {
        let adapter = Arc::new(ScriptedAdapter::failing("openai", rate_limited()));
        let credentials = MemoryCredentialStore::with_values([("OPENAI_API_KEY", "sk")]);
        let orchestrator = single_provider_orchestrator(adapter.clone(), credentials);

        let policy = RetryPolicy {
            retry_on: vec![],
            ..RetryPolicy::default()
        };
        let err = orchestrator
            .call_with_retry(&CallRequest::new("x"), None, &policy)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EXHAUSTED");
        assert_eq!(adapter.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_registry_never_retried() {
        let orchestrator = Orchestrator::new(
            ProviderRegistry::default(),
            AdapterRegistry::new(),
            Arc::new(MemoryCredentialStore::new()),
        );
        let err = orchestrator
            .call_with_retry(&CallRequest::new("x"), None, &RetryPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EMPTY_REGISTRY");
    }
}
