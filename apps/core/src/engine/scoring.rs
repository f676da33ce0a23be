//! Difficulty / Opportunity Scoring.
//!
//! One additive algorithm, parameterised by a [`ScoreMode`] and a [`ScoringProfile`]:
//!
//! 1. keyword tier bonus (highest matching tier, plus a repeat bonus)
//! 2. long-text bonus
//! 3. strong negative sentiment bonus
//! 4. engagement bonus (opportunity mode only)
//! 5. intensity and frequency word bonuses (opportunity mode only)
//!
//! The running score starts at 1 and is clamped to the profile bounds after every step.
//! Every bonus is non-negative, so the result never decreases when a factor grows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::language::Language;
use super::lexicon::KeywordList;
use super::sentiment::{SentimentLabel, SentimentResult};
use crate::error::{AppError, AppResult};
use crate::models::EngagementCounts;

/// Which scale the scorer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// Problem severity, 1-5.
    #[default]
    Difficulty,
    /// Business opportunity, 1-10.
    Opportunity,
}

impl ScoreMode {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreMode::Difficulty => "difficulty",
            ScoreMode::Opportunity => "opportunity",
        }
    }

    /// Default clamp bounds for the mode.
    pub fn default_bounds(&self) -> (u8, u8) {
        match self {
            ScoreMode::Difficulty => (1, 5),
            ScoreMode::Opportunity => (1, 10),
        }
    }
}

impl fmt::Display for ScoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoreMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "difficulty" => Ok(ScoreMode::Difficulty),
            "opportunity" => Ok(ScoreMode::Opportunity),
            other => Err(AppError::config(format!("unknown score mode '{}'", other))),
        }
    }
}

/// A score tagged with the mode that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum Score {
    Difficulty(u8),
    Opportunity(u8),
}

impl Score {
    pub fn new(mode: ScoreMode, value: u8) -> Self {
        match mode {
            ScoreMode::Difficulty => Score::Difficulty(value),
            ScoreMode::Opportunity => Score::Opportunity(value),
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            Score::Difficulty(v) | Score::Opportunity(v) => *v,
        }
    }

    pub fn mode(&self) -> ScoreMode {
        match self {
            Score::Difficulty(_) => ScoreMode::Difficulty,
            Score::Opportunity(_) => ScoreMode::Opportunity,
        }
    }
}

/// Coarse label of how much a reported pain point could be improved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationPotential {
    Low,
    Medium,
    High,
}

impl OptimizationPotential {
    pub fn label(&self) -> &'static str {
        match self {
            OptimizationPotential::Low => "low",
            OptimizationPotential::Medium => "medium",
            OptimizationPotential::High => "high",
        }
    }
}

impl fmt::Display for OptimizationPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Low / medium / high severity keywords.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityTiers {
    pub low: KeywordList,
    pub medium: KeywordList,
    pub high: KeywordList,
}

/// Bonus granted by each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBonus {
    pub low: u8,
    pub medium: u8,
    pub high: u8,
    /// Extra bonus when the winning tier has two or more matches.
    pub repeat: u8,
}

impl Default for TierBonus {
    fn default() -> Self {
        Self {
            low: 0,
            medium: 1,
            high: 2,
            repeat: 1,
        }
    }
}

/// Engagement step: `bonus` applies when weighted engagement is strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementStep {
    pub above: u64,
    pub bonus: u8,
}

fn default_engagement_steps() -> Vec<EngagementStep> {
    vec![
        EngagementStep { above: 100, bonus: 3 },
        EngagementStep { above: 50, bonus: 2 },
        EngagementStep { above: 10, bonus: 1 },
    ]
}

fn default_long_text_chars() -> usize {
    200
}

fn default_negative_confidence() -> f64 {
    0.7
}

fn default_one() -> u8 {
    1
}

fn default_two() -> u8 {
    2
}

/// Tunable inputs of the scoring algorithm for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    /// Lower clamp bound; the mode default when omitted.
    #[serde(default)]
    pub min: Option<u8>,
    /// Upper clamp bound; the mode default when omitted.
    #[serde(default)]
    pub max: Option<u8>,
    pub tiers: SeverityTiers,
    #[serde(default)]
    pub tier_bonus: TierBonus,
    /// Texts longer than this many characters get `length_bonus`.
    #[serde(default = "default_long_text_chars")]
    pub long_text_chars: usize,
    #[serde(default = "default_one")]
    pub length_bonus: u8,
    /// Negative sentiment strictly above this confidence gets `sentiment_bonus`.
    #[serde(default = "default_negative_confidence")]
    pub negative_confidence: f64,
    #[serde(default = "default_one")]
    pub sentiment_bonus: u8,
    /// Ordered from highest threshold to lowest; the first step exceeded wins.
    #[serde(default = "default_engagement_steps")]
    pub engagement: Vec<EngagementStep>,
    #[serde(default)]
    pub intensity: KeywordList,
    #[serde(default = "default_one")]
    pub intensity_bonus: u8,
    #[serde(default)]
    pub frequency: KeywordList,
    #[serde(default = "default_two")]
    pub frequency_bonus: u8,
    /// Pain words that mark high optimization potential when no tier matched.
    #[serde(default)]
    pub pain: KeywordList,
}

impl ScoringProfile {
    /// Validates bounds against `mode` and keyword lists, normalising keywords to lowercase.
    pub fn validate(&mut self, context: &str, mode: ScoreMode) -> AppResult<()> {
        self.tiers.low.normalize(&format!("{}.tiers.low", context))?;
        self.tiers.medium.normalize(&format!("{}.tiers.medium", context))?;
        self.tiers.high.normalize(&format!("{}.tiers.high", context))?;
        self.intensity.normalize(&format!("{}.intensity", context))?;
        self.frequency.normalize(&format!("{}.frequency", context))?;
        self.pain.normalize(&format!("{}.pain", context))?;

        for (tier, list) in [
            ("low", &self.tiers.low),
            ("medium", &self.tiers.medium),
            ("high", &self.tiers.high),
        ] {
            if list.is_empty() {
                return Err(AppError::config(format!(
                    "{}.tiers.{}: keyword list is empty",
                    context, tier
                )));
            }
        }

        let (mode_min, mode_max) = mode.default_bounds();
        let min = self.min.unwrap_or(mode_min);
        let max = self.max.unwrap_or(mode_max);
        if min < mode_min || max > mode_max || min > max {
            return Err(AppError::config(format!(
                "{}: bounds [{}, {}] must lie within [{}, {}] for {} mode",
                context, min, max, mode_min, mode_max, mode
            )));
        }

        if !(0.0..=1.0).contains(&self.negative_confidence) {
            return Err(AppError::config(format!(
                "{}: negative_confidence must be within [0, 1]",
                context
            )));
        }

        self.engagement.sort_by(|a, b| b.above.cmp(&a.above));
        Ok(())
    }

    pub(crate) fn zh_vocabulary(&self) -> impl Iterator<Item = &String> {
        self.tiers
            .low
            .zh
            .iter()
            .chain(self.tiers.medium.zh.iter())
            .chain(self.tiers.high.zh.iter())
            .chain(self.intensity.zh.iter())
            .chain(self.frequency.zh.iter())
            .chain(self.pain.zh.iter())
    }

    /// First tier with a contained keyword, high to low; otherwise high when a pain
    /// word is present and medium when not. Keywords of every language count.
    pub fn optimization_potential(&self, text: &str) -> OptimizationPotential {
        let text_lower = text.to_lowercase();
        let tiers = &self.tiers;
        if tiers.high.any_contained(&text_lower) {
            OptimizationPotential::High
        } else if tiers.medium.any_contained(&text_lower) {
            OptimizationPotential::Medium
        } else if tiers.low.any_contained(&text_lower) {
            OptimizationPotential::Low
        } else if self.pain.any_contained(&text_lower) {
            OptimizationPotential::High
        } else {
            OptimizationPotential::Medium
        }
    }
}

/// Applies a scoring profile to classified text.
pub struct SeverityScorer<'a> {
    profile: &'a ScoringProfile,
    mode: ScoreMode,
    min: u8,
    max: u8,
}

impl<'a> SeverityScorer<'a> {
    /// Profile bounds narrow the mode's range but never widen it.
    pub fn new(profile: &'a ScoringProfile, mode: ScoreMode) -> Self {
        let (mode_min, mode_max) = mode.default_bounds();
        let min = profile.min.unwrap_or(mode_min).clamp(mode_min, mode_max);
        let max = profile.max.unwrap_or(mode_max).clamp(min, mode_max);
        Self {
            profile,
            mode,
            min,
            max,
        }
    }

    fn clamp(&self, value: u32) -> u32 {
        value.clamp(u32::from(self.min), u32::from(self.max))
    }

    /// Tier bonus for the highest tier with at least one match.
    fn tier_bonus(&self, text_lower: &str, language: Language) -> u8 {
        let tiers = &self.profile.tiers;
        let bonus = &self.profile.tier_bonus;

        let (matches, tier_bonus) = [
            (tiers.high.count_contained(text_lower, language), bonus.high),
            (tiers.medium.count_contained(text_lower, language), bonus.medium),
            (tiers.low.count_contained(text_lower, language), bonus.low),
        ]
        .into_iter()
        .find(|(count, _)| *count > 0)
        .unwrap_or((0, 0));

        if matches >= 2 {
            tier_bonus.saturating_add(bonus.repeat)
        } else {
            tier_bonus
        }
    }

    fn engagement_bonus(&self, engagement: &EngagementCounts) -> u8 {
        let total = engagement.weighted_total();
        self.profile
            .engagement
            .iter()
            .find(|step| total > step.above)
            .map(|step| step.bonus)
            .unwrap_or(0)
    }

    /// Scores one post. The result always lies within the profile bounds.
    pub fn score(
        &self,
        text: &str,
        language: Language,
        sentiment: &SentimentResult,
        engagement: &EngagementCounts,
    ) -> u8 {
        let profile = self.profile;
        let text_lower = text.to_lowercase();
        let mut score = self.clamp(1);

        score = self.clamp(score + u32::from(self.tier_bonus(&text_lower, language)));

        if text.chars().count() > profile.long_text_chars {
            score = self.clamp(score + u32::from(profile.length_bonus));
        }

        if sentiment.label == SentimentLabel::Negative
            && sentiment.confidence > profile.negative_confidence
        {
            score = self.clamp(score + u32::from(profile.sentiment_bonus));
        }

        if self.mode == ScoreMode::Opportunity {
            score = self.clamp(score + u32::from(self.engagement_bonus(engagement)));

            if profile.intensity.any_contained(&text_lower) {
                score = self.clamp(score + u32::from(profile.intensity_bonus));
            }
            if profile.frequency.any_contained(&text_lower) {
                score = self.clamp(score + u32::from(profile.frequency_bonus));
            }
        }

        // Bounds are u8, so the clamped value always fits.
        u8::try_from(score).unwrap_or(self.max)
    }
}
