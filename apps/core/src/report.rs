//! Reporting
//!
//! Aggregates over classified batches: a descriptive [`BatchSummary`] and
//! [`discover_opportunities`], which groups opportunity-scored posts into ranked
//! business opportunities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::engine::{CategoryTaxonomy, ClassificationRecord, OptimizationPotential, Score};

/// Descriptive statistics of sentiment scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentStats {
    pub mean: f64,
    /// Sample standard deviation; 0 with fewer than two records
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SentimentStats {
    fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let std_dev = if scores.len() > 1 {
            (scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        Self {
            mean,
            std_dev,
            min: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Counts and distributions over a batch of records. Maps are ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub complaints: usize,
    pub relevant: usize,
    pub languages: BTreeMap<String, usize>,
    /// Every label of a multi-label record is counted.
    pub categories: BTreeMap<String, usize>,
    pub sentiment_labels: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub difficulty_scores: BTreeMap<u8, usize>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub opportunity_scores: BTreeMap<u8, usize>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub optimization_potential: BTreeMap<OptimizationPotential, usize>,
    pub sentiment: SentimentStats,
    /// Span of known publication times
    pub date_range: Option<DateRange>,
}

impl BatchSummary {
    pub fn from_records(records: &[ClassificationRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        let mut scores = Vec::with_capacity(records.len());

        for record in records {
            if record.is_complaint {
                summary.complaints += 1;
            }
            if record.is_relevant {
                summary.relevant += 1;
            }
            *summary
                .languages
                .entry(record.language.code().to_string())
                .or_insert(0) += 1;
            for category in &record.categories {
                *summary.categories.entry(category.clone()).or_insert(0) += 1;
            }
            *summary
                .sentiment_labels
                .entry(record.sentiment.label.to_string())
                .or_insert(0) += 1;
            match record.score {
                Score::Difficulty(v) => *summary.difficulty_scores.entry(v).or_insert(0) += 1,
                Score::Opportunity(v) => *summary.opportunity_scores.entry(v).or_insert(0) += 1,
            }
            if let Some(potential) = record.optimization_potential {
                *summary.optimization_potential.entry(potential).or_insert(0) += 1;
            }
            scores.push(record.sentiment.score);

            if let Some(at) = record.created_at {
                summary.date_range = Some(match summary.date_range {
                    Some(range) => DateRange {
                        start: range.start.min(at),
                        end: range.end.max(at),
                    },
                    None => DateRange { start: at, end: at },
                });
            }
        }

        summary.sentiment = SentimentStats::from_scores(&scores);
        summary
    }

    /// Share of complaints, 0 for an empty batch.
    pub fn complaint_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.complaints as f64 / self.total as f64
        }
    }
}

/// Rough size of the market behind an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSize {
    Niche,
    Small,
    Medium,
    Large,
}

impl MarketSize {
    pub fn estimate(frequency: usize, avg_score: f64) -> Self {
        if frequency >= 20 && avg_score >= 8.0 {
            MarketSize::Large
        } else if frequency >= 10 && avg_score >= 6.0 {
            MarketSize::Medium
        } else if frequency >= 5 && avg_score >= 5.0 {
            MarketSize::Small
        } else {
            MarketSize::Niche
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MarketSize::Large => "large market (>10M users)",
            MarketSize::Medium => "medium market (1M-10M users)",
            MarketSize::Small => "small market (100K-1M users)",
            MarketSize::Niche => "niche market (<100K users)",
        }
    }
}

/// Thresholds a group must meet to count as an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpportunityCriteria {
    pub min_frequency: usize,
    pub min_avg_score: f64,
}

impl Default for OpportunityCriteria {
    fn default() -> Self {
        Self {
            min_frequency: 3,
            min_avg_score: 5.0,
        }
    }
}

/// A recurring, high-scoring pain point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub category: String,
    pub facets: BTreeMap<String, String>,
    pub frequency: usize,
    pub avg_score: f64,
    /// Mean of likes plus retweets
    pub avg_engagement: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    pub market_size: MarketSize,
    /// Most common potential in the group; ties go to the higher label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_potential: Option<OptimizationPotential>,
}

#[derive(Default)]
struct GroupTotals {
    frequency: usize,
    score_sum: u64,
    engagement_sum: u64,
    potentials: BTreeMap<OptimizationPotential, usize>,
}

impl GroupTotals {
    fn dominant_potential(&self) -> Option<OptimizationPotential> {
        let mut best: Option<(OptimizationPotential, usize)> = None;
        // highest label first, so a tie keeps it
        for (&potential, &count) in self.potentials.iter().rev() {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((potential, count));
            }
        }
        best.map(|(potential, _)| potential)
    }
}

/// Groups relevant opportunity-mode records by primary category and facet labels
/// and keeps the groups meeting `criteria`, most frequent first.
pub fn discover_opportunities(
    records: &[ClassificationRecord],
    taxonomy: &CategoryTaxonomy,
    criteria: &OpportunityCriteria,
) -> Vec<Opportunity> {
    let mut groups: BTreeMap<(String, BTreeMap<String, String>), GroupTotals> = BTreeMap::new();

    for record in records.iter().filter(|r| r.is_relevant) {
        let Score::Opportunity(value) = record.score else {
            continue;
        };
        let key = (record.primary_category().to_string(), record.facets.clone());
        let totals = groups.entry(key).or_default();
        totals.frequency += 1;
        totals.score_sum += u64::from(value);
        totals.engagement_sum = totals.engagement_sum.saturating_add(record.engagement.reach());
        if let Some(potential) = record.optimization_potential {
            *totals.potentials.entry(potential).or_insert(0) += 1;
        }
    }

    let mut opportunities: Vec<Opportunity> = groups
        .into_iter()
        .filter_map(|((category, facets), totals)| {
            let avg_score = totals.score_sum as f64 / totals.frequency as f64;
            if totals.frequency < criteria.min_frequency || avg_score < criteria.min_avg_score {
                return None;
            }
            let solution = taxonomy
                .category(&category)
                .and_then(|c| c.solution.as_deref())
                .map(|template| fill_template(template, &facets));
            let optimization_potential = totals.dominant_potential();
            Some(Opportunity {
                optimization_potential,
                market_size: MarketSize::estimate(totals.frequency, avg_score),
                avg_engagement: totals.engagement_sum as f64 / totals.frequency as f64,
                category,
                facets,
                frequency: totals.frequency,
                avg_score,
                solution,
            })
        })
        .collect();

    opportunities.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| b.avg_score.partial_cmp(&a.avg_score).unwrap_or(Ordering::Equal))
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.facets.cmp(&b.facets))
    });
    opportunities
}

/// Replaces `{facet}` placeholders with the group's labels.
fn fill_template(template: &str, facets: &BTreeMap<String, String>) -> String {
    facets.iter().fold(template.to_string(), |text, (facet, label)| {
        text.replace(&format!("{{{}}}", facet), label)
    })
}
