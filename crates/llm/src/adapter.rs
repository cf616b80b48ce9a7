//! The per-backend adapter capability and the adapter table.
//!
//! Each backend implements [`ProviderAdapter`] once and registers under its
//! provider name; the orchestrator looks adapters up by name and treats them
//! as interchangeable. Adapters shape requests for their backend and report
//! raw failures - fallback is exclusively the orchestrator's job.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::{AnthropicAdapter, GeminiAdapter, OpenAiCompatAdapter};
use crate::error::RawProviderError;
use crate::registry::ProviderSpec;
use crate::request::CallRequest;

/// The common capability every backend adapter provides: send one request
/// with a resolved credential, get text back or a raw classified-later
/// failure.
///
/// Adapters must not retry or fall back on their own; one call in, one
/// outcome out.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider name this adapter serves (the registry key).
    fn name(&self) -> &str;

    /// Send the request to the backend using `spec.default_model`.
    async fn complete(
        &self,
        spec: &ProviderSpec,
        credential: &str,
        request: &CallRequest,
    ) -> Result<String, RawProviderError>;
}

/// Name-keyed table of adapters.
///
/// Adding a backend means adding one adapter implementation and one
/// [`register`](Self::register) call; nothing else changes.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in backends, sharing one HTTP client.
    pub fn standard(http: reqwest::Client) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(OpenAiCompatAdapter::openai(http.clone())));
        registry.register(Arc::new(AnthropicAdapter::new(http.clone())));
        registry.register(Arc::new(GeminiAdapter::new(http.clone())));
        registry.register(Arc::new(OpenAiCompatAdapter::mistral(http.clone())));
        registry.register(Arc::new(OpenAiCompatAdapter::groq(http.clone())));
        registry.register(Arc::new(OpenAiCompatAdapter::openrouter(http.clone())));
        registry.register(Arc::new(OpenAiCompatAdapter::deepseek(http)));
        registry
    }

    /// Register an adapter under its own name, replacing any previous one.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    /// Look up the adapter for a provider name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
