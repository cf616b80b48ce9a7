//! Google Gemini generateContent adapter.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{error_bad_payload, error_from_response, error_from_transport};
use crate::adapter::ProviderAdapter;
use crate::error::RawProviderError;
use crate::registry::ProviderSpec;
use crate::request::CallRequest;

const GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Adapter for the Gemini generateContent API.
pub struct GeminiAdapter {
    base: String,
    http: reqwest::Client,
}

impl GeminiAdapter {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            base: GEMINI_BASE.to_string(),
            http,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.base, model)
    }

    fn request_body(&self, request: &CallRequest) -> Value {
        // Gemini has no separate system slot in this shape; the system
        // message is prepended to the prompt.
        let full_prompt = format!("{}\n\n{}", request.system_message, request.prompt);
        let mut config = json!({
            "temperature": request.temperature,
            "maxOutputTokens": request.max_tokens,
            "topP": 0.9,
            "topK": 40,
        });
        if request.structured_output {
            config["responseMimeType"] = json!("application/json");
        }
        json!({
            "contents": [{"parts": [{"text": full_prompt}]}],
            "generationConfig": config,
        })
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        spec: &ProviderSpec,
        credential: &str,
        request: &CallRequest,
    ) -> Result<String, RawProviderError> {
        let response = self
            .http
            .post(self.endpoint(&spec.default_model))
            .header("x-goog-api-key", credential)
            .json(&self.request_body(request))
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
        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error_bad_payload(self.name(), "missing candidates[0].content.parts[0].text")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_model() {
        let adapter = GeminiAdapter::new(reqwest::Client::new());
        assert_eq!(
            adapter.endpoint("gemini-1.5-pro"),
            format!("{}/gemini-1.5-pro:generateContent", GEMINI_BASE)
        );
    }

    #[test]
    fn test_body_prepends_system_message() {
        let adapter = GeminiAdapter::new(reqwest::Client::new());
        let request = CallRequest::new("the paper")
            .with_system_message("You summarize.")
            .with_max_tokens(500);
        let body = adapter.request_body(&request);
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "You summarize.\n\nthe paper"
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 500);
    }

    #[test]
    fn test_structured_output_sets_mime_type() {
        let adapter = GeminiAdapter::new(reqwest::Client::new());
        let request = CallRequest::new("x").with_structured_output(true);
        let body = adapter.request_body(&request);
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }
}
