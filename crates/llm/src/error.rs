//! Failure taxonomy and the raw-error classifier.
//!
//! Backend error payloads are not standardized, so adapters hand back a raw
//! status/message pair and the classifier maps it into a closed set of kinds
//! with ordered, first-match-wins string heuristics. Classification is lossy
//! by design: it only routes the fallback decision and must never be treated
//! as authoritative beyond that.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::request::{render_attempts, AttemptRecord};

// ============================================================================
// Error Kind + Classifier
// ============================================================================

/// Closed classification of a single provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The provider signaled rate limiting (HTTP 429 or equivalent).
    RateLimited,
    /// The provider or the connection to it is down.
    Unavailable,
    /// No credential, or the credential was rejected.
    CredentialMissing,
    /// Anything else.
    Generic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::CredentialMissing => "credential_missing",
            ErrorKind::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// A raw failure as reported by an adapter: enough information for
/// classification, nothing more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProviderError {
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    /// Free-text error message.
    pub message: String,
}

impl RawProviderError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A failure with no HTTP status (transport error, bad payload, ...).
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }
}

impl fmt::Display for RawProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "status {}: {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Map a raw adapter failure to an [`ErrorKind`].
///
/// Rules are applied in order, first match wins:
/// 1. 429, "too many requests", or "rate" + "limit" -> `RateLimited`
/// 2. 401/403, "auth", or "key" -> `CredentialMissing`
/// 3. "unavailable" or "connect" -> `Unavailable`
/// 4. otherwise `Generic`
pub fn classify(raw: &RawProviderError) -> ErrorKind {
    let message = raw.message.to_lowercase();

    if raw.status == Some(429)
        || message.contains("too many requests")
        || (message.contains("rate") && message.contains("limit"))
    {
        return ErrorKind::RateLimited;
    }
    if matches!(raw.status, Some(401) | Some(403))
        || message.contains("auth")
        || message.contains("key")
    {
        return ErrorKind::CredentialMissing;
    }
    if message.contains("unavailable") || message.contains("connect") {
        return ErrorKind::Unavailable;
    }
    ErrorKind::Generic
}

// ============================================================================
// Orchestrator Errors
// ============================================================================

/// Failures that cross the orchestrator boundary.
///
/// Per-provider failures never surface on their own; they are classified,
/// recorded and folded into one of the aggregated variants below.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The registry had no providers at all.
    #[error("No providers configured. Please check your configuration file.")]
    EmptyRegistry,

    /// Every configured provider lacked a usable credential.
    #[error("No API keys found for any provider. Please set at least one of:\n{}", render_attempts(.attempts))]
    NoCredentials { attempts: Vec<AttemptRecord> },

    /// Every available provider was attempted and failed.
    #[error("All providers failed. Details:\n{}", render_attempts(.attempts))]
    Exhausted { attempts: Vec<AttemptRecord> },

    /// The sweep retry budget ran out; diagnostics are from the last sweep.
    #[error("All providers failed after {sweeps} sweeps. Last sweep:\n{}", render_attempts(.attempts))]
    RetriesExhausted {
        sweeps: u32,
        attempts: Vec<AttemptRecord>,
    },

    /// Internal error (misconfigured orchestrator, poisoned state, ...).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LlmError {
    /// The ordered per-provider diagnostics, when this error carries them.
    pub fn attempts(&self) -> Option<&[AttemptRecord]> {
        match self {
            LlmError::NoCredentials { attempts }
            | LlmError::Exhausted { attempts }
            | LlmError::RetriesExhausted { attempts, .. } => Some(attempts),
            LlmError::EmptyRegistry | LlmError::Internal(_) => None,
        }
    }

    /// Error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LlmError::EmptyRegistry => "EMPTY_REGISTRY",
            LlmError::NoCredentials { .. } => "NO_CREDENTIALS",
            LlmError::Exhausted { .. } => "EXHAUSTED",
            LlmError::RetriesExhausted { .. } => "RETRIES_EXHAUSTED",
            LlmError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
