//! Built-in backend adapters.
//!
//! OpenAI, Mistral, Groq, OpenRouter and DeepSeek all speak the
//! chat-completions wire shape and share one adapter parameterized by
//! endpoint and headers; Anthropic and Gemini have their own shapes.

mod anthropic;
mod gemini;
mod openai_compat;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use openai_compat::OpenAiCompatAdapter;

use crate::error::RawProviderError;

/// Longest error-body excerpt carried into a [`RawProviderError`].
const MAX_BODY_EXCERPT: usize = 300;

/// Turn a non-success HTTP response into a raw error with status and a
/// bounded body excerpt.
pub(crate) async fn error_from_response(
    provider: &str,
    response: reqwest::Response,
) -> RawProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(MAX_BODY_EXCERPT).collect();
    let message = if excerpt.trim().is_empty() {
        format!("{} returned status {}", provider, status)
    } else {
        format!("{} error: {}", provider, excerpt.trim())
    };
    RawProviderError::new(Some(status), message)
}

/// Turn a transport-level failure into a raw error. The "connection error"
/// prefix keys the classifier's `Unavailable` rule.
pub(crate) fn error_from_transport(provider: &str, err: reqwest::Error) -> RawProviderError {
    RawProviderError::message_only(format!("{} connection error: {}", provider, err))
}

/// A response that parsed but did not contain the expected content path.
pub(crate) fn error_bad_payload(provider: &str, detail: &str) -> RawProviderError {
    RawProviderError::message_only(format!(
        "unexpected response from {}: {}",
        provider, detail
    ))
}
