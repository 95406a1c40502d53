pub mod extract;
pub mod fetcher;
pub mod links;

pub use fetcher::{FetchOptions, Fetcher, PageFetcher};

pub mod prelude {
    pub use crate::extract::{
        extract_links, extract_main_content, extract_metadata, extract_published_at,
        find_blog_links, normalize_whitespace,
    };
    pub use crate::fetcher::{FetchOptions, Fetcher, PageFetcher};
    pub use crate::links::extract_article_links;
}
