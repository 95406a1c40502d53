use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

/// One article discovered on the target site. Immutable once created;
/// `url` is the unique key within a domain's inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingArticle {
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub excerpt: String,
    pub topics: Vec<String>,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Persisted as `existing-articles.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInventory {
    pub discovered_at: DateTime<Utc>,
    pub blog_url: String,
    pub article_count: usize,
    pub articles: Vec<ExistingArticle>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandVoice {
    pub tone: String,
    pub personality: String,
    pub vocabulary: Vec<String>,
}

/// Persisted as `site-analysis.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    pub analyzed_at: DateTime<Utc>,
    pub url: String,
    pub site_name: String,
    pub brand_voice: BrandVoice,
    pub topics: Vec<String>,
    pub value_props: Vec<String>,
    pub target_audience: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// A topic the existing inventory underserves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentGap {
    pub topic: String,
    pub priority: Priority,
    pub rationale: String,
    pub suggested_angles: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Medium,
    Linkedin,
    Both,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Medium => write!(f, "medium"),
            Platform::Linkedin => write!(f, "linkedin"),
            Platform::Both => write!(f, "both"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Dots,
    Grid,
    Waves,
    Circuit,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Dots => write!(f, "dots"),
            Pattern::Grid => write!(f, "grid"),
            Pattern::Waves => write!(f, "waves"),
            Pattern::Circuit => write!(f, "circuit"),
        }
    }
}

/// Forward-only lifecycle of a brief. `Generated` is the resume checkpoint:
/// the generate stage skips any brief already in that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BriefStatus {
    Planned,
    Approved,
    Generated,
}

impl BriefStatus {
    /// Validates a transition, rejecting backward moves. Re-asserting the
    /// current state is a no-op, not an error.
    pub fn advance_to(self, next: BriefStatus) -> Result<BriefStatus> {
        if next >= self {
            Ok(next)
        } else {
            Err(Error::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for BriefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BriefStatus::Planned => write!(f, "planned"),
            BriefStatus::Approved => write!(f, "approved"),
            BriefStatus::Generated => write!(f, "generated"),
        }
    }
}

/// A planned-but-not-yet-written article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBrief {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub topic: String,
    pub angle: String,
    pub category: String,
    pub target_audience: String,
    pub keywords: Vec<String>,
    pub outline: Vec<String>,
    pub target_length: u32,
    pub platform: Platform,
    pub status: BriefStatus,
    pub gradient: String,
    pub pattern: Pattern,
    pub read_time: String,
}

/// Persisted as `article-plan.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePlan {
    pub generated_at: DateTime<Utc>,
    pub site_url: String,
    pub gaps: Vec<ContentGap>,
    pub articles: Vec<ArticleBrief>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MermaidDiagram {
    pub id: String,
    pub description: String,
    pub code: String,
}

/// Written exactly once per brief; `brief_id` must reference a brief in the
/// same plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArticle {
    pub brief_id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub meta_description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_content: Option<String>,
    pub gradient: String,
    pub pattern: Pattern,
    pub read_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mermaid_diagrams: Option<Vec<MermaidDiagram>>,
}

/// Why a discovery candidate was dropped instead of inventoried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    FetchFailed(String),
    MissingTitle,
    ThinContent(usize),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
            SkipReason::MissingTitle => write!(f, "no title"),
            SkipReason::ThinContent(len) => write!(f, "content too short ({} chars)", len),
        }
    }
}

/// Per-candidate result of the discovery batch loop. Skips are part of the
/// normal flow, not errors.
#[derive(Debug, Clone)]
pub enum DiscoveryOutcome {
    Accepted(Box<ExistingArticle>),
    Skipped { url: String, reason: SkipReason },
}
