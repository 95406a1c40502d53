use gw_core::{Error, Result};
use scraper::{Html, Selector};
use url::Url;

/// Listing-page patterns in priority order: semantic article containers,
/// then card class substrings, then bare heading anchors. Matches from all
/// selectors are unioned.
const ARTICLE_LINK_SELECTORS: &[&str] = &[
    "article h2 a[href]",
    "article h3 a[href]",
    "article a[href]",
    "[class*=\"blog-post\"] a[href]",
    "[class*=\"post\"] a[href]",
    "[class*=\"article\"] a[href]",
    "[class*=\"entry\"] a[href]",
    "[class*=\"card\"] a[href]",
    "h2 a[href]",
    "h3 a[href]",
];

/// Path segments that mark navigation/utility URLs rather than articles.
const NON_ARTICLE_SEGMENTS: &[&str] = &[
    "tag", "tags", "category", "categories", "author", "authors", "page", "search", "login",
    "signup", "register", "archive", "feed", "rss",
];

fn has_denied_segment(url: &Url) -> bool {
    url.path_segments()
        .map(|mut segments| {
            segments.any(|segment| {
                let segment = segment.to_ascii_lowercase();
                NON_ARTICLE_SEGMENTS.contains(&segment.as_str())
            })
        })
        .unwrap_or(false)
}

fn normalized(mut url: Url) -> String {
    url.set_fragment(None);
    let s = url.to_string();
    s.trim_end_matches('/').to_string()
}

/// Candidate article URLs from a listing page, deduped in first-seen order.
/// Heuristic and best-effort: downstream title/length validation is the
/// actual correctness gate.
pub fn extract_article_links(listing_html: &str, base_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(base_url).map_err(|_| Error::InvalidUrl(base_url.to_string()))?;
    let listing = normalized(base.clone());
    let document = Html::parse_document(listing_html);

    let mut seen = std::collections::HashSet::new();
    let mut links = Vec::new();
    for css in ARTICLE_LINK_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        for anchor in document.select(&selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Ok(mut resolved) = base.join(href) else {
                continue;
            };
            resolved.set_fragment(None);
            if resolved.host_str() != base.host_str() || has_denied_segment(&resolved) {
                continue;
            }
            let url = resolved.to_string();
            if url.trim_end_matches('/') == listing {
                continue;
            }
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }
    }
    Ok(links)
}
