//! The fallback sweep: try providers in order until one succeeds.
//!
//! One sweep walks the computed attempt order, skips providers with no
//! credential, calls each remaining adapter at most once, and returns the
//! first success. Per-provider failures are classified and recorded, never
//! propagated on their own; only configuration and full-exhaustion failures
//! cross this boundary. Sweep-level retry lives in [`crate::retry`].

use log::{debug, info, warn};
use std::sync::Arc;

use litrev_core::CredentialStore;

use crate::adapter::AdapterRegistry;
use crate::error::{classify, ErrorKind, LlmError};
use crate::registry::{partition_by_credential, ProviderRegistry};
use crate::request::{AttemptRecord, CallRequest, CallResult};

// ============================================================================
// Attempt Observer
// ============================================================================

/// Structured progress reporting for a sweep.
///
/// Injected into the orchestrator so callers can capture attempt records
/// instead of scraping logs; every hook has a no-op default.
pub trait AttemptObserver: Send + Sync {
    /// A provider was skipped for a missing credential.
    fn on_skipped(&self, _record: &AttemptRecord) {}

    /// An adapter call is about to be issued.
    fn on_attempt(&self, _provider_name: &str, _model_name: &str) {}

    /// An adapter call failed (already classified).
    fn on_failure(&self, _record: &AttemptRecord) {}

    /// A provider produced the result; the sweep is over.
    fn on_success(&self, _result: &CallResult) {}
}

/// Default observer: forwards progress to the `log` facade.
#[derive(Debug, Default, Clone)]
pub struct LogObserver;

impl AttemptObserver for LogObserver {
    fn on_skipped(&self, record: &AttemptRecord) {
        debug!("Skipping provider with missing API key: {}", record.provider_name);
    }

    fn on_attempt(&self, provider_name: &str, model_name: &str) {
        info!("Trying provider: {} with model: {}", provider_name, model_name);
    }

    fn on_failure(&self, record: &AttemptRecord) {
        warn!(
            "Error with provider {}: {:?}, trying next provider",
            record.provider_name, record.outcome
        );
    }

    fn on_success(&self, result: &CallResult) {
        info!("Successfully received response from {}", result.provider_name);
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// The fallback orchestrator.
///
/// Holds read-only registry data plus the adapter table and credential
/// store; individual calls share no mutable state, so one orchestrator can
/// serve many concurrent invocations.
pub struct Orchestrator {
    registry: ProviderRegistry,
    adapters: AdapterRegistry,
    credentials: Arc<dyn CredentialStore>,
    observer: Arc<dyn AttemptObserver>,
}

impl Orchestrator {
    pub fn new(
        registry: ProviderRegistry,
        adapters: AdapterRegistry,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            registry,
            adapters,
            credentials,
            observer: Arc::new(LogObserver),
        }
    }

    /// Replace the default log observer.
    pub fn with_observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Run one sweep: first success wins, or an aggregated failure carrying
    /// one [`AttemptRecord`] per provider in the final order.
    ///
    /// `preference` promotes named providers to the front of the attempt
    /// order; unknown names are ignored. A provider gets exactly one adapter
    /// call per sweep.
    pub async fn call(
        &self,
        request: &CallRequest,
        preference: Option<&[String]>,
    ) -> Result<CallResult, LlmError> {
        if self.registry.is_empty() {
            return Err(LlmError::EmptyRegistry);
        }

        let ordered = self.registry.ordered(preference);
        let (available, unavailable) =
            partition_by_credential(&ordered, self.credentials.as_ref());

        let mut attempts: Vec<AttemptRecord> = Vec::with_capacity(ordered.len());
        for spec in &unavailable {
            let record = AttemptRecord::failure(
                &spec.name,
                ErrorKind::CredentialMissing,
                format!("API key not configured ({})", spec.credential_ref),
            );
            self.observer.on_skipped(&record);
            attempts.push(record);
        }

        if available.is_empty() {
            return Err(LlmError::NoCredentials { attempts });
        }

        debug!(
            "Attempting providers in order: {:?}",
            available.iter().map(|s| s.name.as_str()).collect::<Vec<_>>()
        );

        for spec in &available {
            let Some(adapter) = self.adapters.get(&spec.name) else {
                let record = AttemptRecord::failure(
                    &spec.name,
                    ErrorKind::Generic,
                    "no adapter registered for this provider",
                );
                self.observer.on_failure(&record);
                attempts.push(record);
                continue;
            };

            // The environment can change between the partition and the
            // attempt; a credential that vanished is recorded as a skip.
            let Some(credential) = self.credentials.get(&spec.credential_ref) else {
                let record = AttemptRecord::failure(
                    &spec.name,
                    ErrorKind::CredentialMissing,
                    format!("API key not configured ({})", spec.credential_ref),
                );
                self.observer.on_skipped(&record);
                attempts.push(record);
                continue;
            };

            self.observer.on_attempt(&spec.name, &spec.default_model);
            match adapter.complete(spec, &credential, request).await {
                Ok(content) => {
                    let result = CallResult {
                        content,
                        provider_name: spec.name.clone(),
                        model_name: spec.default_model.clone(),
                    };
                    self.observer.on_success(&result);
                    return Ok(result);
                }
                Err(raw) => {
                    let record =
                        AttemptRecord::failure(&spec.name, classify(&raw), raw.to_string());
                    self.observer.on_failure(&record);
                    attempts.push(record);
                }
            }
        }

        Err(LlmError::Exhausted { attempts })
    }
}
