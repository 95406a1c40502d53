use std::fmt;

use async_trait::async_trait;
use gw_core::{Error, GenerationOptions, Generator, Result};
use serde_json::{json, Value};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

pub struct AnthropicModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for AnthropicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicModel")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicModel {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self> {
        let api_key = api_key
            .ok_or_else(|| Error::Generation("Anthropic API key is required".to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// First text block of a messages-API response, if any.
    fn extract_text(response: &Value) -> Option<String> {
        response["content"]
            .as_array()?
            .iter()
            .find(|block| block["type"] == "text")
            .and_then(|block| block["text"].as_str())
            .map(|text| text.to_string())
    }
}

#[async_trait]
impl Generator for AnthropicModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_text(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        let body = json!({
            "model": self.model,
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
            "system": system_prompt,
            "messages": [{"role": "user", "content": user_prompt}],
        });

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await?;
        if !status.is_success() {
            let message = payload["error"]["message"].as_str().unwrap_or("unknown error");
            return Err(Error::Generation(format!("API returned {status}: {message}")));
        }

        tracing::debug!(
            "Model {} used {} output tokens",
            self.model,
            payload["usage"]["output_tokens"]
        );

        Self::extract_text(&payload)
            .ok_or_else(|| Error::Generation("Response contains no usable text block".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        assert!(AnthropicModel::new(None, None).is_err());
        let model = AnthropicModel::new(Some("test-key".to_string()), None).unwrap();
        assert_eq!(model.name(), DEFAULT_MODEL);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let model = AnthropicModel::new(Some("sk-secret".to_string()), None).unwrap();
        let rendered = format!("{:?}", model);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_extract_text_block() {
        let response = serde_json::json!({
            "content": [
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "hello"}
            ]
        });
        assert_eq!(AnthropicModel::extract_text(&response).unwrap(), "hello");

        let no_text = serde_json::json!({"content": [{"type": "tool_use"}]});
        assert!(AnthropicModel::extract_text(&no_text).is_none());

        let empty = serde_json::json!({"content": []});
        assert!(AnthropicModel::extract_text(&empty).is_none());
    }
}
