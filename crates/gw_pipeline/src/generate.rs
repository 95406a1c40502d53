use std::sync::Arc;

use gw_core::{
    ArticleBrief, ArticlePlan, BriefStatus, Error, GeneratedArticle, GenerationOptions, Generator,
    MermaidDiagram, Result, SiteAnalysis, Store, TypedStore,
};
use gw_storage::paths;
use serde::Deserialize;

use crate::{export, prompts};

const ARTICLE_MAX_TOKENS: u32 = 8192;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleDraft {
    content: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    meta_description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    medium_content: Option<String>,
    #[serde(default)]
    linkedin_content: Option<String>,
    #[serde(default)]
    mermaid_diagrams: Option<Vec<MermaidDiagram>>,
}

/// Drafts articles for pending briefs. Resume is brief-granular: only briefs
/// whose status is not yet `Generated` are processed, and the plan is
/// persisted after every completed brief, so a crash mid-run never causes
/// finished briefs to be reprocessed.
pub struct GenerateStage {
    store: Arc<dyn Store>,
    generator: Arc<dyn Generator>,
}

impl GenerateStage {
    pub fn new(store: Arc<dyn Store>, generator: Arc<dyn Generator>) -> Self {
        Self { store, generator }
    }

    pub async fn run(&self, site_url: &str, count: usize) -> Result<Vec<GeneratedArticle>> {
        let domain = paths::domain_key(site_url)?;
        let mut plan: ArticlePlan =
            TypedStore::read(self.store.as_ref(), &paths::article_plan(&domain))
                .await?
                .ok_or_else(|| Error::MissingArtifact {
                    artifact: "article-plan.json".to_string(),
                    hint: format!("gw plan {site_url}"),
                })?;
        let analysis: Option<SiteAnalysis> =
            TypedStore::read(self.store.as_ref(), &paths::site_analysis(&domain)).await?;

        let pending: Vec<usize> = plan
            .articles
            .iter()
            .enumerate()
            .filter(|(_, brief)| brief.status != BriefStatus::Generated)
            .map(|(i, _)| i)
            .take(count)
            .collect();
        if pending.is_empty() {
            tracing::info!("✅ All briefs in the plan are already generated");
        }

        let mut generated = Vec::new();
        for idx in pending {
            let brief = plan.articles[idx].clone();
            tracing::info!("✍️ Generating \"{}\" ({})", brief.title, brief.slug);
            let article = self.generate_article(&brief, analysis.as_ref()).await?;
            self.write_article_files(&domain, &article).await?;

            plan.articles[idx].status =
                plan.articles[idx].status.advance_to(BriefStatus::Generated)?;
            TypedStore::write(self.store.as_ref(), &paths::article_plan(&domain), &plan).await?;
            generated.push(article);
        }

        self.write_exports(&domain, &plan).await?;
        tracing::info!("📦 Generated {} articles for {}", generated.len(), domain);
        Ok(generated)
    }

    async fn generate_article(
        &self,
        brief: &ArticleBrief,
        analysis: Option<&SiteAnalysis>,
    ) -> Result<GeneratedArticle> {
        let options = GenerationOptions {
            max_tokens: ARTICLE_MAX_TOKENS,
            ..GenerationOptions::default()
        };
        let value = self
            .generator
            .generate_json(
                prompts::GENERATE_SYSTEM,
                &prompts::article(brief, analysis),
                &options,
            )
            .await?;
        let draft: ArticleDraft = serde_json::from_value(value)?;
        if draft.content.trim().is_empty() {
            return Err(Error::Generation(format!(
                "Empty article body for {}",
                brief.slug
            )));
        }

        Ok(GeneratedArticle {
            brief_id: brief.id.clone(),
            slug: brief.slug.clone(),
            title: brief.title.clone(),
            content: draft.content,
            excerpt: draft.excerpt,
            meta_description: draft.meta_description,
            tags: if draft.tags.is_empty() {
                brief.keywords.clone()
            } else {
                draft.tags
            },
            medium_content: draft.medium_content,
            linkedin_content: draft.linkedin_content,
            gradient: brief.gradient.clone(),
            pattern: brief.pattern,
            read_time: brief.read_time.clone(),
            mermaid_diagrams: draft.mermaid_diagrams,
        })
    }

    async fn write_article_files(&self, domain: &str, article: &GeneratedArticle) -> Result<()> {
        self.store
            .write_text(
                &paths::article_file(domain, &article.slug, "article.md"),
                &article.content,
            )
            .await?;
        if let Some(medium) = &article.medium_content {
            self.store
                .write_text(&paths::article_file(domain, &article.slug, "medium.md"), medium)
                .await?;
        }
        if let Some(linkedin) = &article.linkedin_content {
            self.store
                .write_text(
                    &paths::article_file(domain, &article.slug, "linkedin.md"),
                    linkedin,
                )
                .await?;
        }

        // metadata.json carries everything except the bulky bodies
        let mut meta = serde_json::to_value(article)?;
        if let Some(map) = meta.as_object_mut() {
            map.remove("content");
            map.remove("mediumContent");
            map.remove("linkedinContent");
        }
        self.store
            .write_json(&paths::article_file(domain, &article.slug, "metadata.json"), &meta)
            .await
    }

    async fn write_exports(&self, domain: &str, plan: &ArticlePlan) -> Result<()> {
        let mut posts = Vec::new();
        for brief in plan
            .articles
            .iter()
            .filter(|b| b.status == BriefStatus::Generated)
        {
            let meta = self
                .store
                .read_json(&paths::article_file(domain, &brief.slug, "metadata.json"))
                .await?;
            let tags = meta
                .as_ref()
                .and_then(|m| m["tags"].as_array())
                .map(|a| {
                    a.iter()
                        .filter_map(|t| t.as_str().map(String::from))
                        .collect()
                })
                .unwrap_or_else(|| brief.keywords.clone());
            posts.push(export::ExportPost {
                slug: brief.slug.clone(),
                title: brief.title.clone(),
                category: brief.category.clone(),
                tags,
                gradient: brief.gradient.clone(),
                pattern: brief.pattern.to_string(),
                read_time: brief.read_time.clone(),
            });
        }
        self.store
            .write_text(&paths::blog_ts(domain), &export::render_blog_ts(&posts))
            .await?;
        self.store
            .write_text(&paths::output_readme(domain), &export::render_readme(&posts))
            .await
    }
}
