//! The call contract: what goes into a sweep and what comes back out.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

// ============================================================================
// Call Request / Result
// ============================================================================

/// One generation request, constructed once per call and immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    /// The user prompt sent to the model.
    pub prompt: String,
    /// System message for chat models.
    pub system_message: String,
    /// Maximum number of tokens to generate, at least 1.
    pub max_tokens: u32,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Ask the backend for structured (JSON) output where supported.
    pub structured_output: bool,
}

impl CallRequest {
    /// Create a request with the default generation parameters.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_message: "You are a helpful assistant.".to_string(),
            max_tokens: 3000,
            temperature: 0.7,
            structured_output: false,
        }
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens.max(1);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    pub fn with_structured_output(mut self, structured_output: bool) -> Self {
        self.structured_output = structured_output;
        self
    }
}

/// A successful generation from one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResult {
    /// The generated text.
    pub content: String,
    /// Name of the provider that produced it.
    pub provider_name: String,
    /// Model used for the generation.
    pub model_name: String,
}

// ============================================================================
// Attempt Records
// ============================================================================

/// Outcome of considering one provider within a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AttemptOutcome {
    /// The provider returned text.
    Success,
    /// The provider was skipped or its call failed.
    Failure { kind: ErrorKind, message: String },
}

/// The recorded outcome for one provider within a sweep.
///
/// Every provider in the final attempt order gets exactly one record,
/// whether it was skipped for a missing credential or actually called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub provider_name: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

impl AttemptRecord {
    pub fn success(provider_name: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            outcome: AttemptOutcome::Success,
        }
    }

    pub fn failure(
        provider_name: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            outcome: AttemptOutcome::Failure {
                kind,
                message: message.into(),
            },
        }
    }

    /// The classified failure kind, if this record is a failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            AttemptOutcome::Success => None,
            AttemptOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Render attempt records as one human-readable line per provider.
pub(crate) fn render_attempts(attempts: &[AttemptRecord]) -> String {
    attempts
        .iter()
        .map(|record| match &record.outcome {
            AttemptOutcome::Success => format!("{}: ok", record.provider_name),
            AttemptOutcome::Failure { kind, message } => {
                format!("{}: {} ({})", record.provider_name, message, kind)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
