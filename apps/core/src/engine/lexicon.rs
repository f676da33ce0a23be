//! Lexicon Store.
//!
//! Per-language word lists for sentiment polarity, stop words, and the keyword tiers
//! of both scoring profiles. Built once from configuration data, validated, normalised
//! to lowercase, and read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::language::Language;
use super::scoring::{ScoreMode, ScoringProfile};
use crate::error::{AppError, AppResult};

/// Ordered keyword lists tagged by language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordList {
    #[serde(default)]
    pub zh: Vec<String>,
    #[serde(default)]
    pub en: Vec<String>,
}

impl KeywordList {
    /// Creates a list from static slices.
    pub fn from_slices(zh: &[&str], en: &[&str]) -> Self {
        Self {
            zh: zh.iter().map(|s| s.to_string()).collect(),
            en: en.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Keywords for exactly this language (`unknown` reads the English list).
    pub fn for_language(&self, language: Language) -> &[String] {
        match language.ruleset() {
            Language::Zh => &self.zh,
            _ => &self.en,
        }
    }

    /// Keywords for this language, falling back to English when the language has none.
    pub fn for_language_or_en(&self, language: Language) -> &[String] {
        let list = self.for_language(language);
        if list.is_empty() {
            &self.en
        } else {
            list
        }
    }

    /// Every keyword across languages, Chinese first.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.zh.iter().chain(self.en.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.zh.is_empty() && self.en.is_empty()
    }

    /// Number of this language's keywords contained in `text_lower`.
    pub fn count_contained(&self, text_lower: &str, language: Language) -> usize {
        self.for_language_or_en(language)
            .iter()
            .filter(|k| text_lower.contains(k.as_str()))
            .count()
    }

    /// Whether any keyword of any language is contained in `text_lower`.
    pub fn any_contained(&self, text_lower: &str) -> bool {
        self.all().any(|k| text_lower.contains(k.as_str()))
    }

    /// Lowercases, trims, and de-duplicates in place, keeping first occurrences.
    /// Fails on blank entries so typos in configuration surface at load time.
    pub fn normalize(&mut self, context: &str) -> AppResult<()> {
        for (code, list) in [("zh", &mut self.zh), ("en", &mut self.en)] {
            let mut seen = HashSet::new();
            let mut cleaned = Vec::with_capacity(list.len());
            for keyword in list.iter() {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(AppError::config(format!(
                        "{}: blank {} keyword",
                        context, code
                    )));
                }
                if seen.insert(keyword.clone()) {
                    cleaned.push(keyword);
                }
            }
            *list = cleaned;
        }
        Ok(())
    }
}

/// Sentiment and scoring vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    /// Positive polarity words (lexicon strategy).
    pub positive: KeywordList,
    /// Negative polarity words (lexicon strategy).
    pub negative: KeywordList,
    /// English valence table on a -4..4 scale (statistical strategy).
    #[serde(default)]
    pub valence: BTreeMap<String, f64>,
    /// English polarity table on a -1..1 scale (statistical strategy).
    #[serde(default)]
    pub polarity: BTreeMap<String, f64>,
    /// English intensifiers and dampeners, as a signed increment.
    #[serde(default)]
    pub boosters: BTreeMap<String, f64>,
    /// English negators.
    #[serde(default)]
    pub negations: Vec<String>,
    /// Stop words dropped by keyword extraction.
    #[serde(default)]
    pub stopwords: KeywordList,
    /// Extra Chinese words the segmenter keeps whole, so short sentiment words do
    /// not split compounds such as 信用卡 or 快递.
    #[serde(default)]
    pub vocabulary: Vec<String>,
    /// Keyword tiers and bonuses for difficulty mode.
    pub difficulty: ScoringProfile,
    /// Keyword tiers and bonuses for opportunity mode.
    pub opportunity: ScoringProfile,
}

impl Lexicon {
    /// The lexicon shipped with the crate.
    pub fn builtin() -> AppResult<Self> {
        let mut lexicon: Lexicon = serde_json::from_str(BUILTIN_LEXICON)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Whether the statistical sentiment strategy has data to work with.
    pub fn has_statistical_tables(&self) -> bool {
        !self.valence.is_empty() && !self.polarity.is_empty()
    }

    /// Validates and normalises every table. Called once at load time.
    pub fn validate(&mut self) -> AppResult<()> {
        self.positive.normalize("lexicon.positive")?;
        self.negative.normalize("lexicon.negative")?;
        self.stopwords.normalize("lexicon.stopwords")?;

        for (name, list) in [("positive", &self.positive), ("negative", &self.negative)] {
            if list.zh.is_empty() || list.en.is_empty() {
                return Err(AppError::config(format!(
                    "lexicon.{}: both zh and en word lists are required",
                    name
                )));
            }
        }

        self.valence = normalize_table("lexicon.valence", &self.valence, 4.0)?;
        self.polarity = normalize_table("lexicon.polarity", &self.polarity, 1.0)?;
        self.boosters = normalize_table("lexicon.boosters", &self.boosters, 1.0)?;
        self.negations = self
            .negations
            .iter()
            .map(|n| n.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();

        self.vocabulary = self
            .vocabulary
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        self.difficulty
            .validate("lexicon.difficulty", ScoreMode::Difficulty)?;
        self.opportunity
            .validate("lexicon.opportunity", ScoreMode::Opportunity)?;
        Ok(())
    }

    /// Chinese words the segmenter should keep whole.
    pub(crate) fn zh_vocabulary(&self) -> impl Iterator<Item = &String> {
        self.positive
            .zh
            .iter()
            .chain(self.negative.zh.iter())
            .chain(self.stopwords.zh.iter())
            .chain(self.vocabulary.iter())
            .chain(self.difficulty.zh_vocabulary())
            .chain(self.opportunity.zh_vocabulary())
    }
}

fn normalize_table(
    context: &str,
    table: &BTreeMap<String, f64>,
    bound: f64,
) -> AppResult<BTreeMap<String, f64>> {
    let mut normalized = BTreeMap::new();
    for (word, weight) in table {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(AppError::config(format!("{}: blank entry", context)));
        }
        if !weight.is_finite() || weight.abs() > bound {
            return Err(AppError::config(format!(
                "{}: weight for '{}' must be within [-{}, {}]",
                context, word, bound, bound
            )));
        }
        normalized.insert(word, *weight);
    }
    Ok(normalized)
}

const BUILTIN_LEXICON: &str = include_str!("../../config/lexicon.json");
