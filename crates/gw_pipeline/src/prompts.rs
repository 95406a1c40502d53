//! Prompt builders for the three generation calls. Each JSON-producing
//! prompt spells out the exact keys so `generate_json` can parse strictly.

use gw_core::{ArticleBrief, ArticleInventory, SiteAnalysis};

pub const ANALYZE_SYSTEM: &str = "You are a brand strategist who reverse-engineers a company's \
voice from its website copy. Respond with a single JSON object and nothing else - no markdown \
fences, no commentary.";

pub const PLAN_SYSTEM: &str = "You are a content strategist planning a blog calendar. Respond \
with a single JSON object and nothing else - no markdown fences, no commentary.";

pub const GENERATE_SYSTEM: &str = "You are a senior technical writer producing publication-ready \
blog posts in the client's brand voice. Respond with a single JSON object and nothing else - no \
markdown fences, no commentary.";

pub fn analyze(url: &str, title: &str, description: &str, body: &str) -> String {
    format!(
        "Analyze this website and describe its brand.\n\n\
         URL: {url}\nTitle: {title}\nDescription: {description}\n\nPage content:\n{body}\n\n\
         Return JSON with keys: siteName (string), brandVoice (object with tone, personality, \
         vocabulary array), topics (array of strings), valueProps (array of strings), \
         targetAudience (string)."
    )
}

pub fn plan(analysis: &SiteAnalysis, inventory: Option<&ArticleInventory>, count: usize) -> String {
    let existing = match inventory {
        Some(inv) if !inv.articles.is_empty() => {
            let mut lines = String::new();
            for article in &inv.articles {
                lines.push_str(&format!(
                    "- {} (topics: {})\n",
                    article.title,
                    article.topics.join(", ")
                ));
            }
            format!("Existing articles:\n{lines}")
        }
        _ => "No existing articles were found.".to_string(),
    };

    format!(
        "Plan {count} new blog articles for {site}.\n\n\
         Brand voice: {tone}; {personality}.\nSite topics: {topics}.\n\
         Value props: {props}.\nTarget audience: {audience}.\n\n{existing}\n\
         Identify content gaps the inventory underserves, then propose the articles.\n\
         Return JSON with keys: gaps (array of objects with topic, priority one of \
         high/medium/low, rationale, suggestedAngles array) and articles (array of objects \
         with title, subtitle, topic, angle, category, targetAudience, keywords array, \
         outline array of section labels, targetLength word count number, platform one of \
         medium/linkedin/both, gradient Tailwind gradient class string, pattern one of \
         dots/grid/waves/circuit).",
        site = analysis.url,
        tone = analysis.brand_voice.tone,
        personality = analysis.brand_voice.personality,
        topics = analysis.topics.join(", "),
        props = analysis.value_props.join("; "),
        audience = analysis.target_audience,
    )
}

pub fn article(brief: &ArticleBrief, analysis: Option<&SiteAnalysis>) -> String {
    let voice = analysis
        .map(|a| {
            format!(
                "Write in this brand voice: {}; {}. Preferred vocabulary: {}.\n",
                a.brand_voice.tone,
                a.brand_voice.personality,
                a.brand_voice.vocabulary.join(", ")
            )
        })
        .unwrap_or_default();

    format!(
        "{voice}Write the article \"{title}\" ({subtitle}).\n\
         Topic: {topic}. Angle: {angle}. Audience: {audience}. Target length: {length} words.\n\
         Outline:\n{outline}\n\n\
         Return JSON with keys: content (full Markdown article), excerpt (1-2 sentences), \
         metaDescription (under 160 chars), tags (array of strings){platform_keys}, \
         mermaidDiagrams (optional array of objects with id, description, code).",
        title = brief.title,
        subtitle = brief.subtitle,
        topic = brief.topic,
        angle = brief.angle,
        audience = brief.target_audience,
        length = brief.target_length,
        outline = brief
            .outline
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n"),
        platform_keys = match brief.platform {
            gw_core::Platform::Medium => ", mediumContent (Markdown tailored for Medium)",
            gw_core::Platform::Linkedin => ", linkedinContent (plain-text LinkedIn post)",
            gw_core::Platform::Both =>
                ", mediumContent (Markdown tailored for Medium), linkedinContent (plain-text \
                 LinkedIn post)",
        },
    )
}
