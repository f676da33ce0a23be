//! # Engine Module
//!
//! Deterministic, rule-based classification of short social-media posts.
//! Every rule is data (taxonomy and lexicon); nothing here performs I/O.
//!
//! ## Components
//! - `language`: character-class language detection
//! - `lexicon`: sentiment words, stop words, scoring profiles
//! - `segmenter`: tokenisation and Chinese dictionary segmentation
//! - `sentiment`: lexicon and statistical sentiment scoring
//! - `taxonomy`: categories, facets, relevance keywords
//! - `category`: category classification and facet labelling
//! - `scoring`: difficulty / opportunity scoring
//! - `keywords`: TF-IDF and frequency keyword extraction
//! - `record`: output data structure
//! - `analyzer`: main orchestrator

pub mod analyzer;
pub mod category;
pub mod keywords;
pub mod language;
pub mod lexicon;
pub mod record;
pub mod scoring;
pub mod segmenter;
pub mod sentiment;
pub mod taxonomy;

pub use analyzer::{ClassificationEngine, EngineSettings};
pub use category::CategoryClassifier;
pub use keywords::{ExtractionMethod, KeywordExtractor, KeywordResult};
pub use language::{detect, Language};
pub use lexicon::{KeywordList, Lexicon};
pub use record::ClassificationRecord;
pub use scoring::{OptimizationPotential, Score, ScoreMode, ScoringProfile, SeverityScorer};
pub use segmenter::Segmenter;
pub use sentiment::{SentimentLabel, SentimentResult, SentimentScorer, SentimentStrategy};
pub use taxonomy::{Category, CategoryTaxonomy, Facet, FacetLabel};
