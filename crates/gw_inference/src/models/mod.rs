use std::sync::Arc;

use gw_core::{Error, Generator, Result};

pub mod anthropic;
pub mod dummy;

pub use anthropic::AnthropicModel;
pub use dummy::DummyModel;

#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
}

/// Builds a generator by short name. The handle is owned by the caller and
/// injected wherever generation happens.
pub fn create_model(name: &str, config: ModelConfig) -> Result<Arc<dyn Generator>> {
    match name {
        "anthropic" | "claude" => Ok(Arc::new(AnthropicModel::new(
            config.api_key,
            config.model_name,
        )?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Generation(format!(
            "Unknown model: {other}. Available models: anthropic, dummy"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model_by_name() {
        assert!(create_model("dummy", ModelConfig::default()).is_ok());
        assert!(create_model("betamax", ModelConfig::default()).is_err());
        // anthropic requires a key
        assert!(create_model("anthropic", ModelConfig::default()).is_err());
        let config = ModelConfig {
            api_key: Some("test-key".to_string()),
            model_name: None,
        };
        assert!(create_model("anthropic", config).is_ok());
    }
}
