//! Integration artifacts: a typed `blog.ts` metadata module plus an output
//! README, regenerated from the plan after every generate run.

pub struct ExportPost {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub gradient: String,
    pub pattern: String,
    pub read_time: String,
}

fn ts_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn ts_string_array(items: &[String]) -> String {
    let rendered: Vec<String> = items.iter().map(|s| ts_string(s)).collect();
    format!("[{}]", rendered.join(", "))
}

pub fn render_blog_ts(posts: &[ExportPost]) -> String {
    let mut out = String::from(
        "// Generated by gw. Do not edit by hand.\n\n\
         export interface BlogPost {\n\
         \x20 slug: string;\n\
         \x20 title: string;\n\
         \x20 category: string;\n\
         \x20 tags: string[];\n\
         \x20 gradient: string;\n\
         \x20 pattern: string;\n\
         \x20 readTime: string;\n\
         }\n\n\
         export const blogPosts: BlogPost[] = [\n",
    );
    for post in posts {
        out.push_str(&format!(
            "  {{\n    slug: {},\n    title: {},\n    category: {},\n    tags: {},\n    \
             gradient: {},\n    pattern: {},\n    readTime: {},\n  }},\n",
            ts_string(&post.slug),
            ts_string(&post.title),
            ts_string(&post.category),
            ts_string_array(&post.tags),
            ts_string(&post.gradient),
            ts_string(&post.pattern),
            ts_string(&post.read_time),
        ));
    }
    out.push_str(
        "];\n\n\
         export function getPostBySlug(slug: string): BlogPost | undefined {\n\
         \x20 return blogPosts.find((post) => post.slug === slug);\n\
         }\n\n\
         export function getAllSlugs(): string[] {\n\
         \x20 return blogPosts.map((post) => post.slug);\n\
         }\n\n\
         export function getPostsByCategory(category: string): BlogPost[] {\n\
         \x20 return blogPosts.filter((post) => post.category === category);\n\
         }\n\n\
         export function groupByCategory(): Record<string, BlogPost[]> {\n\
         \x20 const groups: Record<string, BlogPost[]> = {};\n\
         \x20 for (const post of blogPosts) {\n\
         \x20   (groups[post.category] ??= []).push(post);\n\
         \x20 }\n\
         \x20 return groups;\n\
         }\n",
    );
    out
}

pub fn render_readme(posts: &[ExportPost]) -> String {
    let mut out = String::from(
        "# Generated Articles\n\n\
         One directory per article: `article.md`, platform variants and\n\
         `metadata.json`. `blog.ts` exports the post index for the site.\n\n",
    );
    if posts.is_empty() {
        out.push_str("No articles generated yet.\n");
        return out;
    }
    for post in posts {
        out.push_str(&format!(
            "- [{}](./{}/article.md) — {} ({}; tags: {})\n",
            post.title,
            post.slug,
            post.category,
            post.read_time,
            post.tags.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> ExportPost {
        ExportPost {
            slug: "first-post".to_string(),
            title: "The \"First\" Post".to_string(),
            category: "engineering".to_string(),
            tags: vec!["rust".to_string(), "web".to_string()],
            gradient: "from-blue-500 to-purple-600".to_string(),
            pattern: "dots".to_string(),
            read_time: "6 min read".to_string(),
        }
    }

    #[test]
    fn test_ts_string_escapes_quotes_and_newlines() {
        assert_eq!(ts_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(ts_string("a\nb"), "\"a\\nb\"");
        assert_eq!(ts_string("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_blog_ts_lists_posts_and_helpers() {
        let ts = render_blog_ts(&[sample_post()]);
        assert!(ts.contains("export interface BlogPost"));
        assert!(ts.contains("slug: \"first-post\""));
        assert!(ts.contains("title: \"The \\\"First\\\" Post\""));
        assert!(ts.contains("tags: [\"rust\", \"web\"]"));
        assert!(ts.contains("export function getPostBySlug"));
        assert!(ts.contains("export function getAllSlugs"));
        assert!(ts.contains("export function getPostsByCategory"));
        assert!(ts.contains("export function groupByCategory"));
    }

    #[test]
    fn test_readme_lists_posts() {
        let md = render_readme(&[sample_post()]);
        assert!(md.contains("[The \"First\" Post](./first-post/article.md)"));

        let empty = render_readme(&[]);
        assert!(empty.contains("No articles generated yet."));
    }
}
