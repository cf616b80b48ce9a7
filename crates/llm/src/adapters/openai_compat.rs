//! Adapter for backends speaking the OpenAI chat-completions shape.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{error_bad_payload, error_from_response, error_from_transport};
use crate::adapter::ProviderAdapter;
use crate::error::RawProviderError;
use crate::registry::ProviderSpec;
use crate::request::CallRequest;

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const MISTRAL_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";
const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";

/// One adapter for every OpenAI-compatible backend, parameterized by
/// endpoint, extra headers, and whether the backend honors
/// `response_format: json_object`.
pub struct OpenAiCompatAdapter {
    name: &'static str,
    endpoint: String,
    http: reqwest::Client,
    extra_headers: Vec<(&'static str, &'static str)>,
    supports_json_mode: bool,
}

impl OpenAiCompatAdapter {
    pub fn openai(http: reqwest::Client) -> Self {
        Self {
            name: "openai",
            endpoint: OPENAI_ENDPOINT.to_string(),
            http,
            extra_headers: Vec::new(),
            supports_json_mode: true,
        }
    }

    pub fn mistral(http: reqwest::Client) -> Self {
        Self {
            name: "mistral",
            endpoint: MISTRAL_ENDPOINT.to_string(),
            http,
            extra_headers: Vec::new(),
            supports_json_mode: false,
        }
    }

    pub fn groq(http: reqwest::Client) -> Self {
        Self {
            name: "groq",
            endpoint: GROQ_ENDPOINT.to_string(),
            http,
            extra_headers: Vec::new(),
            supports_json_mode: true,
        }
    }

    pub fn openrouter(http: reqwest::Client) -> Self {
        Self {
            name: "openrouter",
            endpoint: OPENROUTER_ENDPOINT.to_string(),
            http,
            // OpenRouter asks callers to identify themselves.
            extra_headers: vec![
                ("HTTP-Referer", "https://litrev.local"),
                ("X-Title", "litrev literature review generator"),
            ],
            supports_json_mode: true,
        }
    }

    pub fn deepseek(http: reqwest::Client) -> Self {
        Self {
            name: "deepseek",
            endpoint: DEEPSEEK_ENDPOINT.to_string(),
            http,
            extra_headers: Vec::new(),
            supports_json_mode: false,
        }
    }

    /// Point the adapter at a different endpoint (self-hosted gateways).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_body(&self, spec: &ProviderSpec, request: &CallRequest) -> Value {
        let mut body = json!({
            "model": spec.default_model,
            "messages": [
                {"role": "system", "content": request.system_message},
                {"role": "user", "content": request.prompt}
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });
        if request.structured_output && self.supports_json_mode {
            body["response_format"] = json!({"type": "json_object"});
        }
        body
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatAdapter {
    fn name(&self) -> &str {
        self.name
    }

    async fn complete(
        &self,
        spec: &ProviderSpec,
        credential: &str,
        request: &CallRequest,
    ) -> Result<String, RawProviderError> {
        let mut builder = self
            .http
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(&self.request_body(spec, request));
        for (name, value) in &self.extra_headers {
            builder = builder.header(*name, *value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| error_from_transport(self.name, e))?;
        if !response.status().is_success() {
            return Err(error_from_response(self.name, response).await);
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| error_bad_payload(self.name, &e.to_string()))?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| error_bad_payload(self.name, "missing choices[0].message.content"))
    }
}
