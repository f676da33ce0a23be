//! Sentiment Scoring.
//!
//! Two strategies share one `[-1, 1]` scale:
//! - lexicon: `(positive - negative) / tokens`, available for every language
//! - statistical (English only): the mean of a valence compound score and a
//!   polarity estimate, used when the lexicon ships the tables for it
//!
//! Scoring never fails; text without tokens is neutral with zero confidence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::language::Language;
use super::lexicon::Lexicon;
use super::segmenter::Segmenter;
use crate::error::AppError;

/// Scores at or beyond this magnitude are no longer neutral.
const LABEL_THRESHOLD: f64 = 0.1;

/// Normalisation constant of the valence compound score.
const COMPOUND_ALPHA: f64 = 15.0;
/// Emphasis added to an all-caps word when the rest of the text is not shouting.
const CAPS_INCREMENT: f64 = 0.733;
/// Damping applied to a valence word preceded by a negator.
const NEGATION_SCALAR: f64 = -0.74;
/// Emphasis added per exclamation mark, up to four of them.
const EXCLAMATION_INCREMENT: f64 = 0.292;
/// How far back boosters and negators are looked for.
const LOOKBACK: usize = 3;
/// Booster decay by distance from the word it modifies.
const BOOSTER_DECAY: [f64; LOOKBACK] = [1.0, 0.95, 0.9];

/// Discrete polarity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn label(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of sentiment analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Polarity in [-1.0, 1.0]
    pub score: f64,
    /// Always `score.abs()`
    pub confidence: f64,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
            confidence: 0.0,
        }
    }

    /// Clamps a raw score and derives label and confidence from it.
    pub fn from_score(raw: f64) -> Self {
        let score = if raw.is_finite() {
            raw.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let label = if score >= LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Self {
            label,
            score,
            confidence: score.abs(),
        }
    }
}

/// Which strategy English text is scored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentStrategy {
    /// Statistical for English when the lexicon supports it, lexicon otherwise.
    #[default]
    Auto,
    /// Word-list counting for every language.
    Lexicon,
}

impl FromStr for SentimentStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "statistical" => Ok(SentimentStrategy::Auto),
            "lexicon" => Ok(SentimentStrategy::Lexicon),
            other => Err(AppError::config(format!(
                "unknown sentiment strategy '{}'",
                other
            ))),
        }
    }
}

/// Sentiment scorer over a shared lexicon
pub struct SentimentScorer<'a> {
    lexicon: &'a Lexicon,
    segmenter: &'a Segmenter,
    strategy: SentimentStrategy,
}

impl<'a> SentimentScorer<'a> {
    pub fn new(lexicon: &'a Lexicon, segmenter: &'a Segmenter, strategy: SentimentStrategy) -> Self {
        Self {
            lexicon,
            segmenter,
            strategy,
        }
    }

    /// Score `text` with the strategy appropriate for `language`.
    pub fn score(&self, text: &str, language: Language) -> SentimentResult {
        let language = language.ruleset();
        if language == Language::En
            && self.strategy == SentimentStrategy::Auto
            && self.lexicon.has_statistical_tables()
        {
            self.score_statistical(text)
        } else {
            self.score_lexicon(text, language)
        }
    }

    /// `(positive - negative) / tokens`, clamped.
    pub fn score_lexicon(&self, text: &str, language: Language) -> SentimentResult {
        let tokens = self.segmenter.tokenize(text, language);
        if tokens.is_empty() {
            return SentimentResult::neutral();
        }

        let positive = self.lexicon.positive.for_language(language);
        let negative = self.lexicon.negative.for_language(language);

        let pos_count = tokens.iter().filter(|t| positive.contains(t)).count();
        let neg_count = tokens.iter().filter(|t| negative.contains(t)).count();

        let raw = (pos_count as f64 - neg_count as f64) / tokens.len() as f64;
        SentimentResult::from_score(raw)
    }

    /// Mean of the valence compound and the polarity estimate.
    pub fn score_statistical(&self, text: &str) -> SentimentResult {
        let words: Vec<&str> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return SentimentResult::neutral();
        }
        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

        let compound = self.valence_compound(text, &words, &lower);
        let polarity = self.polarity_estimate(&lower);
        SentimentResult::from_score((compound + polarity) / 2.0)
    }

    fn is_negator(&self, word: &str) -> bool {
        word.ends_with("n't") || self.lexicon.negations.iter().any(|n| n == word)
    }

    fn valence_compound(&self, text: &str, words: &[&str], lower: &[String]) -> f64 {
        let shouting = words.iter().filter(|w| is_all_caps(w)).count();
        let caps_differential = shouting > 0 && shouting < words.len();

        let mut sum = 0.0;
        for (i, word) in lower.iter().enumerate() {
            if self.lexicon.boosters.contains_key(word) {
                continue;
            }
            let Some(&base) = self.lexicon.valence.get(word) else {
                continue;
            };

            let mut valence = base;
            if caps_differential && is_all_caps(words[i]) {
                valence += CAPS_INCREMENT * base.signum();
            }

            let mut negated = false;
            for distance in 1..=LOOKBACK.min(i) {
                let previous = &lower[i - distance];
                if let Some(boost) = self.lexicon.boosters.get(previous) {
                    valence += boost * base.signum() * BOOSTER_DECAY[distance - 1];
                }
                if self.is_negator(previous) {
                    negated = true;
                }
            }
            if negated {
                valence *= NEGATION_SCALAR;
            }
            sum += valence;
        }

        if sum != 0.0 {
            let exclamations = text.chars().filter(|c| *c == '!').count().min(4);
            sum += exclamations as f64 * EXCLAMATION_INCREMENT * sum.signum();
        }

        (sum / (sum * sum + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }

    fn polarity_estimate(&self, lower: &[String]) -> f64 {
        let mut matched = Vec::new();
        for (i, word) in lower.iter().enumerate() {
            let Some(&base) = self.lexicon.polarity.get(word) else {
                continue;
            };
            let mut polarity = base;
            if i > 0 {
                if let Some(boost) = self.lexicon.boosters.get(&lower[i - 1]) {
                    polarity *= 1.0 + boost;
                }
            }
            let start = i.saturating_sub(2);
            if lower[start..i].iter().any(|w| self.is_negator(w)) {
                polarity *= -0.5;
            }
            matched.push(polarity.clamp(-1.0, 1.0));
        }

        if matched.is_empty() {
            return 0.0;
        }
        (matched.iter().sum::<f64>() / matched.len() as f64).clamp(-1.0, 1.0)
    }
}

fn is_all_caps(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() > 1 && letters.iter().all(|c| c.is_uppercase())
}
