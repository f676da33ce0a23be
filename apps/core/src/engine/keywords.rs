//! Keyword Extraction.
//!
//! Chinese text is segmented and ranked by frequency. English text is ranked by
//! TF-IDF over the collection when there are at least two documents to compare,
//! and by plain frequency otherwise. Ties keep first-occurrence order.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::language::Language;
use super::lexicon::KeywordList;
use super::segmenter::{tokenize_en, Segmenter};

/// Shortest Chinese token kept as a keyword, in characters.
const MIN_ZH_CHARS: usize = 2;

/// Links and @mentions, removed before keyword extraction.
static SOCIAL_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S+|www\.\S+|@\w+").expect("Invalid regex: link/mention pattern")
});

/// Result of keyword extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordResult {
    /// The keyword
    pub keyword: String,
    /// TF-IDF score, or the raw count for frequency ranking
    pub score: f32,
    /// Raw frequency across the collection
    pub frequency: usize,
}

/// How a keyword list was ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Segmented,
    TfIdf,
    Frequency,
}

/// Term counts in first-occurrence order.
#[derive(Default)]
struct TermCounts {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl TermCounts {
    fn add(&mut self, term: &str) {
        match self.counts.get_mut(term) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(term.to_string(), 1);
                self.order.push(term.to_string());
            }
        }
    }

    fn count(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Ranked by count, descending; ties keep first occurrence.
    fn ranked(self, top_n: usize) -> Vec<KeywordResult> {
        let mut results: Vec<KeywordResult> = self
            .order
            .into_iter()
            .map(|keyword| {
                let frequency = self.counts.get(&keyword).copied().unwrap_or(0);
                KeywordResult {
                    keyword,
                    score: frequency as f32,
                    frequency,
                }
            })
            .collect();
        results.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        results.truncate(top_n);
        results
    }
}

/// Keyword extractor over a fixed stopword set
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stopwords_zh: HashSet<String>,
    stopwords_en: HashSet<String>,
    segmenter: Segmenter,
}

impl KeywordExtractor {
    pub fn new(stopwords: &KeywordList, segmenter: Segmenter) -> Self {
        Self {
            stopwords_zh: stopwords.zh.iter().cloned().collect(),
            stopwords_en: stopwords.en.iter().cloned().collect(),
            segmenter,
        }
    }

    /// Top `top_n` keywords of a collection of texts.
    pub fn extract<S: AsRef<str>>(&self, texts: &[S], language: Language, top_n: usize) -> Vec<String> {
        self.extract_detailed(texts, language, top_n)
            .1
            .into_iter()
            .map(|k| k.keyword)
            .collect()
    }

    /// Ranked keywords with their scores and the method that ranked them.
    pub fn extract_detailed<S: AsRef<str>>(
        &self,
        texts: &[S],
        language: Language,
        top_n: usize,
    ) -> (ExtractionMethod, Vec<KeywordResult>) {
        match language.ruleset() {
            Language::Zh => (ExtractionMethod::Segmented, self.rank_segmented(texts, top_n)),
            _ => {
                let documents: Vec<Vec<String>> = texts
                    .iter()
                    .map(|t| self.tokenize_en(t.as_ref()))
                    .filter(|doc| !doc.is_empty())
                    .collect();

                if documents.len() >= 2 {
                    let ranked = rank_tfidf(&documents, top_n);
                    if !ranked.is_empty() {
                        return (ExtractionMethod::TfIdf, ranked);
                    }
                }

                let mut counts = TermCounts::default();
                for token in documents.iter().flatten() {
                    counts.add(token);
                }
                (ExtractionMethod::Frequency, counts.ranked(top_n))
            }
        }
    }

    /// English tokens with stop words and bare numbers removed.
    fn tokenize_en(&self, text: &str) -> Vec<String> {
        tokenize_en(&SOCIAL_NOISE.replace_all(text, " "))
            .into_iter()
            .filter(|w| !self.stopwords_en.contains(w) && !w.chars().all(|c| c.is_numeric()))
            .collect()
    }

    fn rank_segmented<S: AsRef<str>>(&self, texts: &[S], top_n: usize) -> Vec<KeywordResult> {
        let mut counts = TermCounts::default();
        for text in texts {
            let cleaned = SOCIAL_NOISE.replace_all(text.as_ref(), " ");
            for token in self.segmenter.segment(&cleaned) {
                if token.chars().count() >= MIN_ZH_CHARS
                    && !self.stopwords_zh.contains(&token)
                    && token.chars().any(|c| c.is_alphanumeric())
                {
                    counts.add(&token);
                }
            }
        }
        counts.ranked(top_n)
    }
}

/// Sum over documents of `tf * idf`, with smoothed `idf = ln((1 + n) / (1 + df)) + 1`.
fn rank_tfidf(documents: &[Vec<String>], top_n: usize) -> Vec<KeywordResult> {
    let n = documents.len() as f32;

    let mut totals = TermCounts::default();
    let mut document_frequency = TermCounts::default();
    for doc in documents {
        let mut seen = HashSet::new();
        for token in doc {
            totals.add(token);
            if seen.insert(token.as_str()) {
                document_frequency.add(token);
            }
        }
    }

    let mut scores: HashMap<&str, f32> = HashMap::new();
    for doc in documents {
        let len = doc.len() as f32;
        let mut tf: HashMap<&str, usize> = HashMap::new();
        for token in doc {
            *tf.entry(token.as_str()).or_insert(0) += 1;
        }
        for (term, count) in tf {
            let df = document_frequency.count(term) as f32;
            let idf = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
            *scores.entry(term).or_insert(0.0) += (count as f32 / len) * idf;
        }
    }

    let mut results: Vec<KeywordResult> = totals
        .order
        .iter()
        .filter_map(|term| {
            let score = scores.get(term.as_str()).copied()?;
            (score.is_finite() && score > 0.0).then(|| KeywordResult {
                keyword: term.clone(),
                score,
                frequency: totals.count(term),
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(top_n);
    results
}
