use gw_core::{Error, Result};
use url::Url;

/// Directory key for a site: hostname, lowercased, one leading `www.`
/// stripped.
pub fn domain_key(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|_| Error::InvalidUrl(url.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?
        .to_ascii_lowercase();
    Ok(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

pub fn site_analysis(domain: &str) -> String {
    format!("{domain}/site-analysis.json")
}

pub fn existing_articles(domain: &str) -> String {
    format!("{domain}/existing-articles.json")
}

pub fn article_plan(domain: &str) -> String {
    format!("{domain}/article-plan.json")
}

pub fn blog_plan_md(domain: &str) -> String {
    format!("{domain}/blog-plan.md")
}

pub fn article_file(domain: &str, slug: &str, file: &str) -> String {
    format!("{domain}/output/{slug}/{file}")
}

pub fn blog_ts(domain: &str) -> String {
    format!("{domain}/output/blog.ts")
}

pub fn output_readme(domain: &str) -> String {
    format!("{domain}/output/README.md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_key_strips_www_and_lowercases() {
        assert_eq!(domain_key("https://www.Example.com/about").unwrap(), "example.com");
        assert_eq!(domain_key("https://blog.example.com").unwrap(), "blog.example.com");
        // only one leading www. is stripped
        assert_eq!(domain_key("https://www.www.example.com").unwrap(), "www.example.com");
        assert!(domain_key("not a url").is_err());
    }

    #[test]
    fn test_artifact_paths() {
        assert_eq!(site_analysis("example.com"), "example.com/site-analysis.json");
        assert_eq!(
            article_file("example.com", "my-post", "medium.md"),
            "example.com/output/my-post/medium.md"
        );
        assert_eq!(blog_ts("example.com"), "example.com/output/blog.ts");
    }
}
