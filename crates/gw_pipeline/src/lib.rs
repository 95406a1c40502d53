pub mod analyze;
pub mod discover;
pub mod export;
pub mod generate;
pub mod plan;
pub mod prompts;

use std::time::Duration;

pub use analyze::AnalyzeStage;
pub use discover::DiscoverStage;
pub use generate::GenerateStage;
pub use plan::PlanStage;

/// Knobs shared by the stages. The fetch delay is the politeness pause
/// between consecutive outbound fetches; it is never applied between LLM
/// calls.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fetch_delay: Duration,
    pub max_articles: usize,
    pub generate_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_delay: Duration::from_millis(1000),
            max_articles: 20,
            generate_count: 3,
        }
    }
}

impl PipelineConfig {
    /// Defaults with the fetch delay taken from `GW_FETCH_DELAY_MS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(millis) = std::env::var("GW_FETCH_DELAY_MS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
        {
            config.fetch_delay = Duration::from_millis(millis);
        }
        config
    }
}

/// Truncates on a char boundary. Artifact content fields are capped, prompt
/// bodies likewise.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use gw_core::{Error, Result};
    use gw_scrape::PageFetcher;

    /// Canned-page fetcher for stage tests; unknown URLs fail like a dead
    /// host would.
    #[derive(Default)]
    pub struct FakeFetcher {
        pages: HashMap<String, String>,
    }

    impl FakeFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.pages.get(url).cloned().ok_or_else(|| Error::Fetch {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
        }
    }
}
