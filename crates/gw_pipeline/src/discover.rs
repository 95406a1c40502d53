use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use gw_core::{
    ArticleInventory, DiscoveryOutcome, ExistingArticle, Result, SkipReason, Store, TypedStore,
};
use gw_scrape::extract::{
    extract_main_content, extract_metadata, extract_published_at, find_blog_links,
};
use gw_scrape::links::extract_article_links;
use gw_scrape::PageFetcher;
use gw_storage::paths;
use url::Url;

use crate::{truncate_chars, PipelineConfig};

/// Validation gate: candidates whose body has fewer characters are noise,
/// not articles. Counted in chars, matching the truncation limits below.
const MIN_CONTENT_LEN: usize = 100;
/// Inventory keeps a truncated body for analysis prompts.
const STORED_CONTENT_LIMIT: usize = 5000;
const EXCERPT_LIMIT: usize = 200;
const MAX_TOPICS: usize = 5;

/// Conventional listing paths probed when the homepage exposes no blog link.
const COMMON_BLOG_PATHS: &[&str] = &[
    "/blog",
    "/news",
    "/articles",
    "/insights",
    "/resources",
    "/posts",
];

/// Domain-agnostic topic words tagged onto articles when found in the body.
const TOPIC_VOCABULARY: &[&str] = &[
    "ai",
    "machine learning",
    "automation",
    "security",
    "cloud",
    "data",
    "analytics",
    "design",
    "marketing",
    "productivity",
    "engineering",
    "startup",
    "leadership",
    "finance",
    "strategy",
    "devops",
    "open source",
];

/// Spaces out consecutive outbound fetches. The delay is awaited before
/// every fetch after the first, probes included.
struct Pacer {
    delay: Duration,
    fetched: bool,
}

impl Pacer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            fetched: false,
        }
    }

    async fn pause(&mut self) {
        if self.fetched && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.fetched = true;
    }
}

/// Finds the site's blog listing, inspects candidate article pages and
/// writes the `existing-articles.json` inventory. Re-running overwrites the
/// inventory wholesale; there is no per-item resume here.
pub struct DiscoverStage {
    store: Arc<dyn Store>,
    fetcher: Arc<dyn PageFetcher>,
    config: PipelineConfig,
}

impl DiscoverStage {
    pub fn new(
        store: Arc<dyn Store>,
        fetcher: Arc<dyn PageFetcher>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    pub async fn run(&self, site_url: &str) -> Result<ArticleInventory> {
        let domain = paths::domain_key(site_url)?;
        let mut pacer = Pacer::new(self.config.fetch_delay);
        tracing::info!("📰 Discovering existing articles on {}", site_url);

        let (blog_url, candidates) = match self.locate_blog(site_url, &mut pacer).await? {
            Some(found) => found,
            None => {
                tracing::warn!("No blog listing found on {}", site_url);
                (String::new(), Vec::new())
            }
        };

        let mut articles: Vec<ExistingArticle> = Vec::new();
        let mut skipped = 0usize;
        for url in candidates.into_iter().take(self.config.max_articles) {
            pacer.pause().await;
            match self.inspect_candidate(&url).await {
                DiscoveryOutcome::Accepted(article) => {
                    if !articles.iter().any(|a| a.url == article.url) {
                        articles.push(*article);
                    }
                }
                DiscoveryOutcome::Skipped { url, reason } => {
                    skipped += 1;
                    tracing::debug!("Skipping {}: {}", url, reason);
                }
            }
        }

        let inventory = ArticleInventory {
            discovered_at: Utc::now(),
            blog_url,
            article_count: articles.len(),
            articles,
        };
        TypedStore::write(
            self.store.as_ref(),
            &paths::existing_articles(&domain),
            &inventory,
        )
        .await?;
        tracing::info!(
            "📚 Inventoried {} articles ({} skipped) for {}",
            inventory.article_count,
            skipped,
            domain
        );
        Ok(inventory)
    }

    /// Probes homepage blog links first, then the conventional paths,
    /// returning the first listing that yields article candidates. Probe
    /// failures are treated as not-found.
    async fn locate_blog(
        &self,
        site_url: &str,
        pacer: &mut Pacer,
    ) -> Result<Option<(String, Vec<String>)>> {
        pacer.pause().await;
        let homepage = self.fetcher.fetch(site_url).await?;

        let mut probes = find_blog_links(&homepage, site_url)?;
        if let Ok(base) = Url::parse(site_url) {
            for path in COMMON_BLOG_PATHS {
                if let Ok(joined) = base.join(path) {
                    let url = joined.to_string();
                    if !probes.contains(&url) {
                        probes.push(url);
                    }
                }
            }
        }

        for probe in probes {
            pacer.pause().await;
            let Ok(listing) = self.fetcher.fetch(&probe).await else {
                continue;
            };
            let Ok(links) = extract_article_links(&listing, &probe) else {
                continue;
            };
            if !links.is_empty() {
                tracing::info!("🔗 Found {} candidate links at {}", links.len(), probe);
                return Ok(Some((probe, links)));
            }
        }
        Ok(None)
    }

    /// Fetches and validates one candidate. Failures become skips so a bad
    /// page never aborts the batch.
    async fn inspect_candidate(&self, url: &str) -> DiscoveryOutcome {
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                return DiscoveryOutcome::Skipped {
                    url: url.to_string(),
                    reason: SkipReason::FetchFailed(e.to_string()),
                }
            }
        };

        let metadata = extract_metadata(&html);
        let content = extract_main_content(&html);
        if metadata.title.is_empty() {
            return DiscoveryOutcome::Skipped {
                url: url.to_string(),
                reason: SkipReason::MissingTitle,
            };
        }
        let content_chars = content.chars().count();
        if content_chars < MIN_CONTENT_LEN {
            return DiscoveryOutcome::Skipped {
                url: url.to_string(),
                reason: SkipReason::ThinContent(content_chars),
            };
        }

        // Word count reflects the full body, not the truncated stored copy.
        let word_count = content.split_whitespace().count();
        let excerpt = if metadata.description.is_empty() {
            truncate_chars(&content, EXCERPT_LIMIT)
        } else {
            metadata.description.clone()
        };
        let topics = tag_topics(&metadata.keywords, &content);

        DiscoveryOutcome::Accepted(Box::new(ExistingArticle {
            url: url.to_string(),
            title: metadata.title,
            published_at: extract_published_at(&html),
            excerpt,
            topics,
            word_count,
            content: Some(truncate_chars(&content, STORED_CONTENT_LIMIT)),
        }))
    }
}

/// Seeds topics from page keywords, then appends vocabulary words present in
/// the body, capped at five, first-seen order, no case-insensitive dups.
fn tag_topics(keywords: &[String], body: &str) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for keyword in keywords {
        if topics.len() >= MAX_TOPICS {
            return topics;
        }
        let keyword = keyword.trim();
        if !keyword.is_empty() && !topics.iter().any(|t| t.eq_ignore_ascii_case(keyword)) {
            topics.push(keyword.to_string());
        }
    }
    let lower = body.to_lowercase();
    for word in TOPIC_VOCABULARY {
        if topics.len() >= MAX_TOPICS {
            break;
        }
        if lower.contains(word) && !topics.iter().any(|t| t.eq_ignore_ascii_case(word)) {
            topics.push((*word).to_string());
        }
    }
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeFetcher;
    use gw_storage::MemoryStore;

    fn article_html(title: &str, body: &str) -> String {
        format!(
            "<html><head><title>{title}</title></head><body>\
             <article><p>{body}</p></article></body></html>"
        )
    }

    fn zero_delay_config() -> PipelineConfig {
        PipelineConfig {
            fetch_delay: Duration::ZERO,
            ..PipelineConfig::default()
        }
    }

    fn site_fetcher() -> FakeFetcher {
        let homepage = r#"<html><body><nav><a href="/blog">Blog</a></nav></body></html>"#;
        let listing = r#"<html><body>
            <div class="blog-post"><a href="/blog/good">Good</a></div>
            <div class="blog-post"><a href="/blog/untitled">Untitled</a></div>
            <div class="blog-post"><a href="/blog/thin">Thin</a></div>
            <div class="blog-post"><a href="/blog/dead">Dead</a></div>
        </body></html>"#;
        FakeFetcher::new()
            .with_page("https://example.com", homepage)
            .with_page("https://example.com/blog", listing)
            .with_page(
                "https://example.com/blog/good",
                &article_html("A Good Post", &"word ".repeat(60)),
            )
            .with_page(
                "https://example.com/blog/untitled",
                &format!(
                    "<html><body><article><p>{}</p></article></body></html>",
                    "word ".repeat(60)
                ),
            )
            .with_page(
                "https://example.com/blog/thin",
                &article_html("Thin Post", "barely anything"),
            )
        // /blog/dead intentionally missing so the fetch fails
    }

    #[tokio::test]
    async fn test_discover_validates_and_skips() {
        let store = Arc::new(MemoryStore::new());
        let stage = DiscoverStage::new(store.clone(), Arc::new(site_fetcher()), zero_delay_config());

        let inventory = stage.run("https://example.com").await.unwrap();
        assert_eq!(inventory.blog_url, "https://example.com/blog");
        assert_eq!(inventory.article_count, 1);
        assert_eq!(inventory.articles[0].title, "A Good Post");
        assert_eq!(inventory.articles[0].url, "https://example.com/blog/good");

        let stored: ArticleInventory =
            TypedStore::read(store.as_ref(), "example.com/existing-articles.json")
                .await
                .unwrap()
                .unwrap();
        assert_eq!(stored.article_count, 1);
    }

    #[tokio::test]
    async fn test_discover_probes_common_paths_without_homepage_link() {
        let listing = r#"<html><body>
            <article><a href="/news/update-one">One</a></article>
        </body></html>"#;
        let fetcher = FakeFetcher::new()
            .with_page("https://example.com", "<html><body>no links</body></html>")
            .with_page("https://example.com/news", listing)
            .with_page(
                "https://example.com/news/update-one",
                &article_html("Update One", &"word ".repeat(60)),
            );
        let store = Arc::new(MemoryStore::new());
        let stage = DiscoverStage::new(store, Arc::new(fetcher), zero_delay_config());

        let inventory = stage.run("https://example.com").await.unwrap();
        assert_eq!(inventory.blog_url, "https://example.com/news");
        assert_eq!(inventory.article_count, 1);
    }

    #[tokio::test]
    async fn test_discover_writes_empty_inventory_when_no_blog_found() {
        let fetcher =
            FakeFetcher::new().with_page("https://example.com", "<html><body>brochure</body></html>");
        let store = Arc::new(MemoryStore::new());
        let stage = DiscoverStage::new(store.clone(), Arc::new(fetcher), zero_delay_config());

        let inventory = stage.run("https://example.com").await.unwrap();
        assert_eq!(inventory.article_count, 0);
        assert!(inventory.blog_url.is_empty());
        assert!(store
            .read_json("example.com/existing-articles.json")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_word_count_precedes_truncation() {
        let long_body = "word ".repeat(1500); // ~7500 chars, 1500 words
        let fetcher = site_fetcher().with_page(
            "https://example.com/blog/good",
            &article_html("A Long Post", &long_body),
        );
        let store = Arc::new(MemoryStore::new());
        let stage = DiscoverStage::new(store, Arc::new(fetcher), zero_delay_config());

        let inventory = stage.run("https://example.com").await.unwrap();
        let article = &inventory.articles[0];
        assert_eq!(article.word_count, 1500);
        let stored = article.content.as_ref().unwrap();
        assert_eq!(stored.chars().count(), STORED_CONTENT_LIMIT);
    }

    #[tokio::test]
    async fn test_content_gate_counts_chars_not_bytes() {
        // 60 two-byte chars: over 100 bytes but under the 100-char gate
        let fetcher = site_fetcher().with_page(
            "https://example.com/blog/good",
            &article_html("Accents", &"é".repeat(60)),
        );
        let store = Arc::new(MemoryStore::new());
        let stage = DiscoverStage::new(store, Arc::new(fetcher), zero_delay_config());

        let inventory = stage.run("https://example.com").await.unwrap();
        assert_eq!(inventory.article_count, 0);
    }

    #[test]
    fn test_tag_topics_seeds_keywords_then_vocabulary() {
        let keywords = vec!["Robotics".to_string(), "Logistics".to_string()];
        let body = "We use machine learning and automation to improve security posture.";
        let topics = tag_topics(&keywords, body);
        assert_eq!(
            topics,
            vec!["Robotics", "Logistics", "machine learning", "automation", "security"]
        );
        assert_eq!(topics.len(), 5);
    }

    #[test]
    fn test_tag_topics_dedups_case_insensitively() {
        let keywords = vec!["AI".to_string()];
        let body = "ai everywhere";
        let topics = tag_topics(&keywords, body);
        assert_eq!(topics, vec!["AI"]);
    }
}
