use async_trait::async_trait;
use serde_json::Value;

use crate::{Error, Result};

const PARSE_PREVIEW_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// The external LLM seam. Implementations are constructed explicitly and
/// injected by the caller; there is no process-wide client.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Returns the name of the model backing this generator
    fn name(&self) -> &str;

    /// Generate free-form text from a system prompt and a user prompt
    async fn generate_text(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String>;

    /// Generate text and parse it as strict JSON, tolerating a single
    /// code-fence wrapper. Parse failures are not retried.
    async fn generate_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Value> {
        let text = self.generate_text(system_prompt, user_prompt, options).await?;
        parse_json_response(&text)
    }
}

/// Strips one leading/trailing Markdown code fence, if present. Models
/// routinely wrap JSON in ```json fences despite instructions not to.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest.trim(),
    }
}

pub fn parse_json_response(text: &str) -> Result<Value> {
    let cleaned = strip_code_fence(text);
    serde_json::from_str(cleaned).map_err(|_| Error::JsonParse {
        preview: cleaned.chars().take(PARSE_PREVIEW_LEN).collect(),
    })
}
