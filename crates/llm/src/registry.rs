//! Provider registry: catalog loading, attempt ordering, availability.
//!
//! The registry is an ordered list of provider descriptors. Insertion order
//! is the default attempt priority; a caller-supplied preference list can
//! promote providers to the front. The registry is read-only for the
//! duration of an orchestrator call.

use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use litrev_core::CredentialStore;

/// Default provider catalog embedded at compile time.
static EMBEDDED_CATALOG: Lazy<ProviderRegistry> = Lazy::new(|| {
    let json = include_str!("providers.json");
    ProviderRegistry::from_json(json).expect("Failed to parse providers.json")
});

// ============================================================================
// Provider Spec
// ============================================================================

/// One configured LLM backend.
///
/// `credential_ref` names the environment variable holding the API key.
/// Immutable once loaded; `name` is unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub name: String,
    pub credential_ref: String,
    pub default_model: String,
}

impl ProviderSpec {
    pub fn new(
        name: impl Into<String>,
        credential_ref: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            credential_ref: credential_ref.into(),
            default_model: default_model.into(),
        }
    }
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Wire shape of a providers config file.
#[derive(Debug, Deserialize)]
struct ProviderConfigFile {
    #[serde(default)]
    providers: Vec<ProviderSpec>,
}

/// Ordered collection of provider specs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderRegistry {
    specs: Vec<ProviderSpec>,
}

impl ProviderRegistry {
    /// Build a registry from specs, dropping duplicate names (first wins).
    pub fn new(specs: Vec<ProviderSpec>) -> Self {
        let mut seen: Vec<String> = Vec::new();
        let specs = specs
            .into_iter()
            .filter(|spec| {
                if seen.contains(&spec.name) {
                    warn!("Duplicate provider '{}' in registry, ignoring", spec.name);
                    false
                } else {
                    seen.push(spec.name.clone());
                    true
                }
            })
            .collect();
        Self { specs }
    }

    /// Parse a registry from providers-config JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: ProviderConfigFile = serde_json::from_str(json)?;
        Ok(Self::new(file.providers))
    }

    /// Load a registry from a providers-config file.
    ///
    /// Load or parse errors are logged and surface as an empty registry;
    /// the orchestrator then reports the configuration failure.
    pub fn from_path(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                warn!("Error reading provider config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(registry) => registry,
            Err(e) => {
                warn!("Error parsing provider config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// The built-in catalog shipped with the binary.
    pub fn embedded_default() -> Self {
        EMBEDDED_CATALOG.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn specs(&self) -> &[ProviderSpec] {
        &self.specs
    }

    /// Look up a spec by provider name.
    pub fn get(&self, name: &str) -> Option<&ProviderSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Compute the attempt order.
    ///
    /// Without a preference list this is registry order. With one, each
    /// preferred name that exists in the registry comes first (once, in
    /// preference order), followed by every remaining provider in registry
    /// order. Unknown preference names are silently ignored. The result is
    /// always a permutation of the registry.
    pub fn ordered(&self, preference: Option<&[String]>) -> Vec<ProviderSpec> {
        let Some(preference) = preference else {
            return self.specs.clone();
        };

        let mut ordered: Vec<ProviderSpec> = Vec::with_capacity(self.specs.len());
        for name in preference {
            if ordered.iter().any(|s| &s.name == name) {
                continue;
            }
            if let Some(spec) = self.get(name) {
                ordered.push(spec.clone());
            }
        }
        for spec in &self.specs {
            if !preference.contains(&spec.name) {
                ordered.push(spec.clone());
            }
        }
        ordered
    }
}

// ============================================================================
// Availability Filter
// ============================================================================

/// Partition ordered specs into those with a usable credential and those
/// without, preserving relative order in both halves.
///
/// Presence of a non-blank credential is the only signal; no network calls.
pub fn partition_by_credential(
    specs: &[ProviderSpec],
    credentials: &dyn CredentialStore,
) -> (Vec<ProviderSpec>, Vec<ProviderSpec>) {
    specs
        .iter()
        .cloned()
        .partition(|spec| credentials.is_present(&spec.credential_ref))
}

#[cfg(test)]
mod tests {
    use super::*;
    use litrev_core::MemoryCredentialStore;

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new(vec![
            ProviderSpec::new("openai", "OPENAI_API_KEY", "gpt-4o"),
            ProviderSpec::new("anthropic", "ANTHROPIC_API_KEY", "claude-3-sonnet-20240229"),
            ProviderSpec::new("gemini", "GEMINI_API_KEY", "gemini-1.5-pro"),
        ])
    }

    fn names(specs: &[ProviderSpec]) -> Vec<&str> {
        specs.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_embedded_catalog_parses() {
        let registry = ProviderRegistry::embedded_default();
        assert!(!registry.is_empty());
        assert_eq!(registry.specs()[0].name, "openai");
    }

    #[test]
    fn test_duplicate_names_dropped() {
        let registry = ProviderRegistry::new(vec![
            ProviderSpec::new("openai", "OPENAI_API_KEY", "gpt-4o"),
            ProviderSpec::new("openai", "OTHER_KEY", "gpt-4o-mini"),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.specs()[0].credential_ref, "OPENAI_API_KEY");
    }

    #[test]
    fn test_ordered_without_preference_is_registry_order() {
        let registry = registry();
        assert_eq!(
            names(&registry.ordered(None)),
            vec!["openai", "anthropic", "gemini"]
        );
    }

    #[test]
    fn test_ordered_preference_comes_first() {
        // Scenario B: registry [openai, anthropic, gemini], preference
        // [gemini, openai] -> [gemini, openai, anthropic].
        let registry = registry();
        let preference = vec!["gemini".to_string(), "openai".to_string()];
        assert_eq!(
            names(&registry.ordered(Some(&preference))),
            vec!["gemini", "openai", "anthropic"]
        );
    }

    #[test]
    fn test_ordered_ignores_unknown_names() {
        let registry = registry();
        let preference = vec!["nope".to_string(), "anthropic".to_string()];
        assert_eq!(
            names(&registry.ordered(Some(&preference))),
            vec!["anthropic", "openai", "gemini"]
        );
    }

    #[test]
    fn test_ordered_deduplicates_preference() {
        let registry = registry();
        let preference = vec!["gemini".to_string(), "gemini".to_string()];
        assert_eq!(
            names(&registry.ordered(Some(&preference))),
            vec!["gemini", "openai", "anthropic"]
        );
    }

    #[test]
    fn test_ordered_is_permutation() {
        let registry = registry();
        let preference = vec!["gemini".to_string(), "unknown".to_string()];
        let ordered = registry.ordered(Some(&preference));
        assert_eq!(ordered.len(), registry.len());
        for spec in registry.specs() {
            assert_eq!(ordered.iter().filter(|s| s.name == spec.name).count(), 1);
        }
    }

    #[test]
    fn test_ordering_is_idempotent() {
        let registry = registry();
        let preference = vec!["gemini".to_string(), "openai".to_string()];
        let once = registry.ordered(Some(&preference));
        let twice = ProviderRegistry::new(once.clone()).ordered(Some(&preference));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_partition_preserves_order() {
        let registry = registry();
        let credentials = MemoryCredentialStore::with_values([
            ("OPENAI_API_KEY", "sk-1"),
            ("GEMINI_API_KEY", "g-1"),
        ]);
        let (available, unavailable) =
            partition_by_credential(registry.specs(), &credentials);
        assert_eq!(names(&available), vec!["openai", "gemini"]);
        assert_eq!(names(&unavailable), vec!["anthropic"]);
    }

    #[test]
    fn test_partition_blank_credential_is_unavailable() {
        // Scenario A setup: only the anthropic credential is usable.
        let registry = ProviderRegistry::new(vec![
            ProviderSpec::new("openai", "OPENAI_API_KEY", "gpt-4o"),
            ProviderSpec::new("anthropic", "ANTHROPIC_API_KEY", "claude-3-sonnet-20240229"),
        ]);
        let credentials = MemoryCredentialStore::with_values([
            ("OPENAI_API_KEY", "  "),
            ("ANTHROPIC_API_KEY", "sk-ant"),
        ]);
        let (available, unavailable) =
            partition_by_credential(registry.specs(), &credentials);
        assert_eq!(names(&available), vec!["anthropic"]);
        assert_eq!(names(&unavailable), vec!["openai"]);
    }

    #[test]
    fn test_from_json_missing_providers_key_is_empty() {
        let registry = ProviderRegistry::from_json("{}").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_from_path_missing_file_is_empty() {
        let registry = ProviderRegistry::from_path(Path::new("/nonexistent/providers.json"));
        assert!(registry.is_empty());
    }
}
