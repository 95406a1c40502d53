use gw_core::{Error, ExtractedMetadata, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose subtrees never contribute to body text.
const BOILERPLATE_TAGS: &[&str] = &[
    "nav", "footer", "header", "aside", "script", "style", "noscript", "form", "iframe",
];

/// Class/id token substrings marking ad, cookie and popup containers.
const BOILERPLATE_CLASS_HINTS: &[&str] = &[
    "advert", "cookie", "popup", "banner", "promo", "newsletter", "sidebar", "modal",
];

/// Tokens too short to substring-match safely; compared exactly.
const BOILERPLATE_CLASS_TOKENS: &[&str] = &["ad", "ads"];

/// Content containers in priority order: semantic landmarks first, then the
/// common content-class fallbacks. First match wins.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role=\"main\"]",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".post-body",
    ".article-body",
    "#content",
    ".content",
];

/// Path segments that mark a URL as blog-like, matched case-insensitively
/// at segment boundaries.
const BLOG_PATH_SEGMENTS: &[&str] = &[
    "blog", "news", "article", "articles", "post", "posts", "insight", "insights", "resource",
    "resources",
];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "blockquote",
    "pre", "br", "tr", "table",
];

fn is_boilerplate_element(el: &scraper::node::Element) -> bool {
    if BOILERPLATE_TAGS.contains(&el.name()) {
        return true;
    }
    for attr in ["class", "id"] {
        if let Some(value) = el.attr(attr) {
            for token in value.split_whitespace() {
                let token = token.to_ascii_lowercase();
                if BOILERPLATE_CLASS_TOKENS.iter().any(|t| token == *t)
                    || BOILERPLATE_CLASS_HINTS.iter().any(|h| token.contains(h))
                {
                    return true;
                }
            }
        }
    }
    false
}

fn inside_boilerplate(element: ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_boilerplate_element(ancestor.value()))
}

/// Collects descendant text, skipping boilerplate subtrees entirely so their
/// text never leaks into the output.
fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if is_boilerplate_element(child_el.value()) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&child_el.value().name());
            if block {
                out.push('\n');
            }
            collect_text(child_el, out);
            if block {
                out.push('\n');
            }
        }
    }
}

fn element_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    normalize_whitespace(&out)
}

/// Collapses whitespace runs to single spaces and blank-line runs to one
/// blank line, trimming the ends. Applied on every body-text path so word
/// counts stay consistent; idempotent.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut prev_blank = false;
    for raw_line in text.lines() {
        let line = raw_line.split_whitespace().collect::<Vec<_>>().join(" ");
        let blank = line.is_empty();
        if blank && prev_blank {
            continue;
        }
        out.push(line);
        prev_blank = blank;
    }
    out.join("\n").trim().to_string()
}

/// Returns the cleaned text of the first matching content container, falling
/// back to the whole body when no container matches.
pub fn extract_main_content(html: &str) -> String {
    let document = Html::parse_document(html);
    for css in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(css) {
            if let Some(element) = document
                .select(&selector)
                .find(|el| !inside_boilerplate(*el))
            {
                return element_text(element);
            }
        }
    }
    if let Ok(selector) = Selector::parse("body") {
        if let Some(body) = document.select(&selector).next() {
            return element_text(body);
        }
    }
    String::new()
}

fn select_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn select_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn extract_metadata(html: &str) -> ExtractedMetadata {
    let document = Html::parse_document(html);

    let title = select_text(&document, "title")
        .or_else(|| select_attr(&document, "meta[property=\"og:title\"]", "content"))
        .or_else(|| select_text(&document, "h1"))
        .unwrap_or_default();

    let description = select_attr(&document, "meta[name=\"description\"]", "content")
        .or_else(|| select_attr(&document, "meta[property=\"og:description\"]", "content"))
        .unwrap_or_default();

    let keywords = select_attr(&document, "meta[name=\"keywords\"]", "content")
        .map(|raw| {
            raw.split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect()
        })
        .unwrap_or_default();

    ExtractedMetadata {
        title,
        description,
        keywords,
    }
}

/// Publish date of an article page, as found. Tries a datetime-attributed
/// time element, then date-class elements, then the article:published_time
/// meta tag.
pub fn extract_published_at(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    select_attr(&document, "time[datetime]", "datetime")
        .or_else(|| select_text(&document, "[class*=\"date\"]"))
        .or_else(|| select_text(&document, "[class*=\"published\"]"))
        .or_else(|| select_attr(&document, "meta[property=\"article:published_time\"]", "content"))
}

fn resolve_same_host(href: &str, base: &Url) -> Option<Url> {
    let mut resolved = base.join(href).ok()?;
    if resolved.host_str() != base.host_str() {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

/// Every same-domain anchor target, resolved against `base_url` and deduped
/// by absolute URL in first-seen order. Malformed hrefs are skipped.
pub fn extract_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(base_url).map_err(|_| Error::InvalidUrl(base_url.to_string()))?;
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("a[href]").map_err(|e| Error::Validation(format!("bad selector: {e}")))?;

    let mut seen = std::collections::HashSet::new();
    let mut links = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(resolved) = resolve_same_host(href, &base) else {
            continue;
        };
        let url = resolved.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }
    Ok(links)
}

fn has_blog_segment(url: &Url) -> bool {
    url.path_segments()
        .map(|mut segments| {
            segments.any(|segment| {
                let segment = segment.to_ascii_lowercase();
                BLOG_PATH_SEGMENTS.contains(&segment.as_str())
            })
        })
        .unwrap_or(false)
}

/// Same-domain links whose path contains a blog-like segment.
pub fn find_blog_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let links = extract_links(html, base_url)?;
    Ok(links
        .into_iter()
        .filter(|link| Url::parse(link).map(|url| has_blog_segment(&url)).unwrap_or(false))
        .collect())
}
