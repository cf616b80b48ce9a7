//! Anthropic Messages API adapter.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{error_bad_payload, error_from_response, error_from_transport};
use crate::adapter::ProviderAdapter;
use crate::error::RawProviderError;
use crate::registry::ProviderSpec;
use crate::request::CallRequest;

const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic Messages API.
pub struct AnthropicAdapter {
    endpoint: String,
    http: reqwest::Client,
}

impl AnthropicAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            endpoint: ANTHROPIC_ENDPOINT.to_string(),
            http,
        }
    }

    fn request_body(&self, spec: &ProviderSpec, request: &CallRequest) -> Value {
        // There is no JSON response mode on this API; when structured output
        // is requested the system message carries the formatting contract.
        json!({
            "model": spec.default_model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "system": request.system_message,
            "messages": [
                {"role": "user", "content": request.prompt}
            ],
        })
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(
        &self,
        spec: &ProviderSpec,
        credential: &str,
        request: &CallRequest,
    ) -> Result<String, RawProviderError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", credential)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(spec, request))
            .send()
            .await
            .map_err(|e| error_from_transport(self.name(), e))?;
        if !response.status().is_success() {
            return Err(error_from_response(self.name(), response).await);
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| error_bad_payload(self.name(), &e.to_string()))?;
        payload["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| error_bad_payload(self.name(), "missing content[0].text"))
    }
}
