//! Credential resolution for LLM providers.
//!
//! Providers name the environment variable holding their API key in
//! configuration (`credential_ref`); this module is the seam through which
//! that name is resolved to a value. The orchestrator only ever asks two
//! questions: "is it present and non-blank?" and "what is it?".

use std::collections::HashMap;
use std::sync::RwLock;

/// Read-only access to named credentials.
///
/// The process environment is the production source; tests inject an
/// in-memory store instead.
pub trait CredentialStore: Send + Sync {
    /// Resolve a credential by name. Returns `None` when the credential is
    /// absent or blank (whitespace-only values count as absent).
    fn get(&self, name: &str) -> Option<String>;

    /// Check whether a credential is present and non-blank.
    fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Credential store backed by the process environment.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn get(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Some(value),
            _ => None,
        }
    }
}

/// In-memory credential store for tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential value under a name.
    pub fn set(&self, name: &str, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    /// Build a store from `(name, value)` pairs.
    pub fn with_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (name, value) in pairs {
            store.set(name, value);
        }
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .read()
            .unwrap()
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}
