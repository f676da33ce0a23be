use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Like/retweet/reply counters scraped alongside a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    /// Number of likes.
    #[serde(default)]
    pub likes: u64,
    /// Number of retweets / reposts.
    #[serde(default)]
    pub retweets: u64,
    /// Number of replies.
    #[serde(default)]
    pub replies: u64,
}

impl EngagementCounts {
    /// Creates a set of counters.
    pub fn new(likes: u64, retweets: u64, replies: u64) -> Self {
        Self {
            likes,
            retweets,
            replies,
        }
    }

    /// Weighted reach used by opportunity scoring: reposts count double.
    pub fn weighted_total(&self) -> u64 {
        self.likes.saturating_add(self.retweets.saturating_mul(2))
    }

    /// Plain sum of likes and retweets, used when averaging engagement in reports.
    pub fn reach(&self) -> u64 {
        self.likes.saturating_add(self.retweets)
    }
}

/// Represents an unclassified post handed over by the acquisition layer.
///
/// The identifier and author are opaque to the engine and passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RawPost {
    /// Opaque identifier assigned by the acquisition layer.
    #[serde(default = "generate_post_id")]
    pub id: String,
    /// The text content of the post.
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
    /// Engagement counters; zero when the source did not provide them.
    #[serde(default)]
    pub engagement: EngagementCounts,
    /// Publication time, if known.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Opaque author handle, if known.
    #[serde(default)]
    pub author: Option<String>,
}

impl RawPost {
    /// Creates a post with no engagement or metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            engagement: EngagementCounts::default(),
            created_at: None,
            author: None,
        }
    }

    /// Attaches engagement counters.
    pub fn with_engagement(mut self, engagement: EngagementCounts) -> Self {
        self.engagement = engagement;
        self
    }

    /// Attaches a publication time.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

fn generate_post_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn validate_not_blank(text: &str) -> Result<(), validator::ValidationError> {
    if text.trim().is_empty() {
        return Err(validator::ValidationError::new("blank_text"));
    }
    Ok(())
}
