pub mod error;
pub mod generator;
pub mod store;
pub mod types;

pub use error::Error;
pub use generator::{Generator, GenerationOptions};
pub use store::{Store, TypedStore};
pub use types::{
    ArticleBrief, ArticleInventory, ArticlePlan, BrandVoice, BriefStatus, ContentGap,
    DiscoveryOutcome, ExistingArticle, ExtractedMetadata, GeneratedArticle, MermaidDiagram,
    Pattern, Platform, Priority, SiteAnalysis, SkipReason,
};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::generator::{Generator, GenerationOptions};
    pub use crate::store::{Store, TypedStore};
    pub use crate::types::*;
    pub use crate::{Error, Result};
}
