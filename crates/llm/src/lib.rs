//! Litrev LLM - multi-provider fallback orchestration.
//!
//! This crate accepts a single generation request and tries a prioritized
//! list of LLM backends, skipping the ones with no credential, classifying
//! failures, and returning a uniform result from the first backend that
//! succeeds - or an aggregated diagnostic when none do.
//!
//! # Architecture
//!
//! - `registry`: provider catalog, attempt ordering, credential availability
//! - `request`: the call contract (`CallRequest` in, `CallResult` out) and
//!   the per-provider `AttemptRecord` diagnostics
//! - `error`: failure taxonomy and the heuristic raw-error classifier
//! - `adapter`: the per-backend capability trait and the name-keyed table
//!   of built-in adapters
//! - `orchestrator`: the sweep loop (first success wins)
//! - `retry`: sweep-level retry with randomized exponential backoff
//!
//! # Example
//!
//! ```ignore
//! use litrev_core::EnvCredentialStore;
//! use litrev_llm::{AdapterRegistry, CallRequest, Orchestrator, ProviderRegistry, RetryPolicy};
//! use std::sync::Arc;
//!
//! let registry = ProviderRegistry::embedded_default();
//! let orchestrator = Orchestrator::new(
//!     registry,
//!     AdapterRegistry::standard(reqwest::Client::new()),
//!     Arc::new(EnvCredentialStore),
//! );
//!
//! let request = CallRequest::new("Explain quicksort in two sentences.");
//! let result = orchestrator
//!     .call_with_retry(&request, None, &RetryPolicy::default())
//!     .await?;
//! println!("{} said: {}", result.provider_name, result.content);
//! ```

pub mod adapter;
pub mod adapters;
pub mod error;
pub mod orchestrator;
pub mod registry;
pub mod request;
pub mod retry;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use adapter::{AdapterRegistry, ProviderAdapter};
pub use error::{classify, ErrorKind, LlmError, RawProviderError};
pub use orchestrator::{AttemptObserver, LogObserver, Orchestrator};
pub use registry::{ProviderRegistry, ProviderSpec};
pub use request::{AttemptOutcome, AttemptRecord, CallRequest, CallResult};
pub use retry::RetryPolicy;
