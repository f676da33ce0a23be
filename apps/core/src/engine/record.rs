//! Classification Record - output of the engine for one post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::language::Language;
use super::scoring::{OptimizationPotential, Score};
use super::sentiment::SentimentResult;
use crate::models::EngagementCounts;

/// Everything the engine derived from one post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// Identifier of the source post
    pub post_id: String,

    /// Publication time of the source post, if known
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    pub language: Language,

    pub sentiment: SentimentResult,

    /// Matched categories in taxonomy order; the fallback when nothing matched
    pub categories: Vec<String>,

    pub score: Score,

    /// Extracted keywords, best first
    pub keywords: Vec<String>,

    /// Negative with confidence strictly above 0.5
    pub is_complaint: bool,

    /// Engagement counters of the source post
    #[serde(default)]
    pub engagement: EngagementCounts,

    /// Facet name to label
    #[serde(default)]
    pub facets: BTreeMap<String, String>,

    /// Whether the post matched the taxonomy's relevance keywords
    #[serde(default = "default_relevant")]
    pub is_relevant: bool,

    /// Set in opportunity mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_potential: Option<OptimizationPotential>,
}

fn default_relevant() -> bool {
    true
}

impl ClassificationRecord {
    /// First matched category.
    pub fn primary_category(&self) -> &str {
        self.categories.first().map(String::as_str).unwrap_or_default()
    }

    pub fn facet(&self, name: &str) -> Option<&str> {
        self.facets.get(name).map(String::as_str)
    }
}
