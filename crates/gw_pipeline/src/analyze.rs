use std::sync::Arc;

use chrono::Utc;
use gw_core::{BrandVoice, GenerationOptions, Generator, Result, SiteAnalysis, Store, TypedStore};
use gw_scrape::extract::{extract_main_content, extract_metadata};
use gw_scrape::PageFetcher;
use gw_storage::paths;
use serde::Deserialize;

use crate::{prompts, truncate_chars};

/// Page text sent to the model is capped so a long homepage cannot blow the
/// prompt budget.
const PROMPT_BODY_LIMIT: usize = 8000;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AnalysisDraft {
    site_name: String,
    brand_voice: BrandVoice,
    topics: Vec<String>,
    value_props: Vec<String>,
    target_audience: String,
}

/// Fetches the homepage, asks the model for a brand profile and writes
/// `site-analysis.json`. Re-running overwrites the previous analysis.
pub struct AnalyzeStage {
    store: Arc<dyn Store>,
    generator: Arc<dyn Generator>,
    fetcher: Arc<dyn PageFetcher>,
}

impl AnalyzeStage {
    pub fn new(
        store: Arc<dyn Store>,
        generator: Arc<dyn Generator>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            store,
            generator,
            fetcher,
        }
    }

    pub async fn run(&self, site_url: &str) -> Result<SiteAnalysis> {
        let domain = paths::domain_key(site_url)?;
        tracing::info!("🔍 Analyzing {}", site_url);

        let html = self.fetcher.fetch(site_url).await?;
        let metadata = extract_metadata(&html);
        let body = truncate_chars(&extract_main_content(&html), PROMPT_BODY_LIMIT);

        let value = self
            .generator
            .generate_json(
                prompts::ANALYZE_SYSTEM,
                &prompts::analyze(site_url, &metadata.title, &metadata.description, &body),
                &GenerationOptions::default(),
            )
            .await?;
        let draft: AnalysisDraft = serde_json::from_value(value)?;

        let analysis = SiteAnalysis {
            analyzed_at: Utc::now(),
            url: site_url.to_string(),
            site_name: if draft.site_name.is_empty() {
                metadata.title.clone()
            } else {
                draft.site_name
            },
            brand_voice: draft.brand_voice,
            topics: draft.topics,
            value_props: draft.value_props,
            target_audience: draft.target_audience,
        };

        TypedStore::write(self.store.as_ref(), &paths::site_analysis(&domain), &analysis).await?;
        tracing::info!("🧠 Site analysis written for {}", domain);
        Ok(analysis)
    }
}
