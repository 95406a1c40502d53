use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use gw_core::{
    ArticleBrief, ArticleInventory, ArticlePlan, BriefStatus, ContentGap, Error,
    GenerationOptions, Generator, Pattern, Platform, Result, SiteAnalysis, Store, TypedStore,
};
use gw_storage::paths;
use serde::Deserialize;
use uuid::Uuid;

use crate::prompts;

/// Fallback header gradients cycled when the model omits one.
const GRADIENTS: &[&str] = &[
    "from-blue-500 to-purple-600",
    "from-emerald-500 to-teal-600",
    "from-orange-500 to-rose-600",
    "from-indigo-500 to-sky-600",
];

const WORDS_PER_MINUTE: u32 = 200;

/// Markdown summary skeleton; the marker lines are replaced with rendered
/// sections.
const PLAN_TEMPLATE: &str = "\
# Blog Content Plan

Site: {site}
Generated: {date}

## Content Gaps

<!-- gaps -->

## Planned Articles

<!-- articles -->

## Next Steps

1. Review the briefs in `article-plan.json` and adjust where needed.
2. Run `gw generate` to draft the planned articles.
";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanDraft {
    #[serde(default)]
    gaps: Vec<ContentGap>,
    articles: Vec<BriefDraft>,
}

/// Model-proposed brief. `platform` and `pattern` are closed enums, so an
/// out-of-vocabulary value fails deserialization and the stage.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BriefDraft {
    title: String,
    #[serde(default)]
    subtitle: String,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    angle: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    target_audience: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    outline: Vec<String>,
    #[serde(default = "default_target_length")]
    target_length: u32,
    platform: Platform,
    #[serde(default)]
    gradient: Option<String>,
    pattern: Pattern,
}

fn default_target_length() -> u32 {
    1500
}

pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut prev_dash = true;
    for c in title.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn unique_slug(base: &str, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() { "untitled" } else { base };
    let mut candidate = base.to_string();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{base}-{n}");
        n += 1;
    }
    candidate
}

fn read_time(target_length: u32) -> String {
    let minutes = target_length.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

/// Turns the site analysis (plus the optional inventory) into content gaps
/// and article briefs, persisting `article-plan.json` and the human-readable
/// `blog-plan.md`.
pub struct PlanStage {
    store: Arc<dyn Store>,
    generator: Arc<dyn Generator>,
}

impl PlanStage {
    pub fn new(store: Arc<dyn Store>, generator: Arc<dyn Generator>) -> Self {
        Self { store, generator }
    }

    pub async fn run(&self, site_url: &str, count: usize) -> Result<ArticlePlan> {
        let domain = paths::domain_key(site_url)?;
        let analysis: SiteAnalysis =
            TypedStore::read(self.store.as_ref(), &paths::site_analysis(&domain))
                .await?
                .ok_or_else(|| Error::MissingArtifact {
                    artifact: "site-analysis.json".to_string(),
                    hint: format!("gw analyze {site_url}"),
                })?;
        let inventory: Option<ArticleInventory> =
            TypedStore::read(self.store.as_ref(), &paths::existing_articles(&domain)).await?;

        tracing::info!("🗺️ Planning {} articles for {}", count, site_url);
        let value = self
            .generator
            .generate_json(
                prompts::PLAN_SYSTEM,
                &prompts::plan(&analysis, inventory.as_ref(), count),
                &GenerationOptions::default(),
            )
            .await?;
        let draft: PlanDraft = serde_json::from_value(value)?;
        if draft.articles.is_empty() {
            return Err(Error::Generation("Model proposed no articles".to_string()));
        }

        let mut used_slugs = HashSet::new();
        let articles: Vec<ArticleBrief> = draft
            .articles
            .into_iter()
            .enumerate()
            .map(|(i, d)| {
                let slug = unique_slug(&slugify(&d.title), &mut used_slugs);
                ArticleBrief {
                    id: Uuid::new_v4().to_string(),
                    slug,
                    title: d.title,
                    subtitle: d.subtitle,
                    topic: d.topic,
                    angle: d.angle,
                    category: d.category,
                    target_audience: d.target_audience,
                    keywords: d.keywords,
                    outline: d.outline,
                    target_length: d.target_length,
                    platform: d.platform,
                    status: BriefStatus::Planned,
                    gradient: d
                        .gradient
                        .unwrap_or_else(|| GRADIENTS[i % GRADIENTS.len()].to_string()),
                    pattern: d.pattern,
                    read_time: read_time(d.target_length),
                }
            })
            .collect();

        let plan = ArticlePlan {
            generated_at: Utc::now(),
            site_url: site_url.to_string(),
            gaps: draft.gaps,
            articles,
        };

        TypedStore::write(self.store.as_ref(), &paths::article_plan(&domain), &plan).await?;
        self.store
            .write_text(&paths::blog_plan_md(&domain), &render_plan_markdown(&plan))
            .await?;
        tracing::info!(
            "📋 Plan written for {}: {} gaps, {} briefs",
            domain,
            plan.gaps.len(),
            plan.articles.len()
        );
        Ok(plan)
    }
}

fn render_gaps(gaps: &[ContentGap]) -> String {
    if gaps.is_empty() {
        return "No significant gaps identified.".to_string();
    }
    let mut out = String::new();
    for gap in gaps {
        out.push_str(&format!(
            "### {} ({} priority)\n\n{}\n",
            gap.topic, gap.priority, gap.rationale
        ));
        if !gap.suggested_angles.is_empty() {
            out.push_str("\nSuggested angles:\n");
            for angle in &gap.suggested_angles {
                out.push_str(&format!("- {angle}\n"));
            }
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn render_articles(articles: &[ArticleBrief]) -> String {
    let mut out = String::new();
    for brief in articles {
        out.push_str(&format!(
            "- **{}** — {} _({}, {}, {} words, {})_\n",
            brief.title,
            brief.subtitle,
            brief.category,
            brief.platform,
            brief.target_length,
            brief.status
        ));
    }
    out.trim_end().to_string()
}

pub fn render_plan_markdown(plan: &ArticlePlan) -> String {
    PLAN_TEMPLATE
        .replace("{site}", &plan.site_url)
        .replace("{date}", &plan.generated_at.format("%Y-%m-%d").to_string())
        .replace("<!-- gaps -->", &render_gaps(&plan.gaps))
        .replace("<!-- articles -->", &render_articles(&plan.articles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_inference::models::DummyModel;
    use gw_storage::MemoryStore;

    const PLAN_JSON: &str = r#"{
        "gaps": [
            {"topic": "warehouse automation", "priority": "high",
             "rationale": "No coverage of the core product area.",
             "suggestedAngles": ["ROI math", "case study"]}
        ],
        "articles": [
            {"title": "Why Picking Errors Cost You", "subtitle": "The hidden tax",
             "topic": "automation", "angle": "cost analysis", "category": "operations",
             "targetAudience": "ops leaders", "keywords": ["picking", "errors"],
             "outline": ["The problem", "The math", "The fix"], "targetLength": 1200,
             "platform": "both", "pattern": "grid"},
            {"title": "Why Picking Errors Cost You", "subtitle": "Duplicate title",
             "topic": "automation", "angle": "redux", "category": "operations",
             "targetAudience": "ops leaders", "keywords": [], "outline": [],
             "targetLength": 900, "platform": "medium", "pattern": "dots"}
        ]
    }"#;

    async fn store_with_analysis() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let analysis = SiteAnalysis {
            analyzed_at: Utc::now(),
            url: "https://example.com".to_string(),
            site_name: "Example".to_string(),
            brand_voice: Default::default(),
            topics: vec!["automation".to_string()],
            value_props: vec![],
            target_audience: "ops".to_string(),
        };
        TypedStore::write(store.as_ref(), "example.com/site-analysis.json", &analysis)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_plan_requires_site_analysis() {
        let store = Arc::new(MemoryStore::new());
        let stage = PlanStage::new(store, Arc::new(DummyModel::new()));
        let err = stage.run("https://example.com", 3).await.unwrap_err();
        match err {
            Error::MissingArtifact { artifact, hint } => {
                assert_eq!(artifact, "site-analysis.json");
                assert!(hint.contains("gw analyze"));
            }
            other => panic!("expected MissingArtifact, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plan_assigns_ids_slugs_and_planned_status() {
        let store = store_with_analysis().await;
        let stage = PlanStage::new(store.clone(), Arc::new(DummyModel::with_responses([PLAN_JSON])));

        let plan = stage.run("https://example.com", 2).await.unwrap();
        assert_eq!(plan.articles.len(), 2);
        assert_ne!(plan.articles[0].id, plan.articles[1].id);
        assert_eq!(plan.articles[0].slug, "why-picking-errors-cost-you");
        assert_eq!(plan.articles[1].slug, "why-picking-errors-cost-you-2");
        assert!(plan.articles.iter().all(|b| b.status == BriefStatus::Planned));
        assert_eq!(plan.articles[0].read_time, "6 min read");

        assert!(store.read_json("example.com/article-plan.json").await.unwrap().is_some());
        let md = store
            .read_text("example.com/blog-plan.md")
            .await
            .unwrap()
            .unwrap();
        assert!(md.contains("## Content Gaps"));
        assert!(md.contains("### warehouse automation (high priority)"));
        assert!(md.contains("**Why Picking Errors Cost You**"));
    }

    #[tokio::test]
    async fn test_plan_rejects_unknown_platform() {
        let store = store_with_analysis().await;
        let bad = r#"{"gaps": [], "articles": [
            {"title": "T", "platform": "substack", "pattern": "dots"}
        ]}"#;
        let stage = PlanStage::new(store, Arc::new(DummyModel::with_responses([bad])));
        assert!(stage.run("https://example.com", 1).await.is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust & WebAssembly  "), "rust-webassembly");
        assert_eq!(slugify("émigré"), "migr");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_read_time_rounds_up() {
        assert_eq!(read_time(1200), "6 min read");
        assert_eq!(read_time(1201), "7 min read");
        assert_eq!(read_time(50), "1 min read");
    }
}
