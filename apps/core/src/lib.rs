//! # PostLens
//!
//! Rule-based classification of short social-media posts: language, sentiment,
//! topical category, and a difficulty or business-opportunity score, plus keyword
//! extraction and batch-level reporting.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use postlens::{ClassificationEngine, EngineConfig, RawPost, ScoreMode};
//!
//! let config = Arc::new(EngineConfig::builtin_complaints()?);
//! let engine = ClassificationEngine::with_mode(config, ScoreMode::Difficulty);
//! let record = engine.classify(&RawPost::new("1", "这个软件总是崩溃，太慢了"));
//! ```

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;

#[cfg(test)]
mod tests;

pub use batch::{BatchClassifier, BatchOutcome, RejectedPost};
pub use config::{EngineConfig, LogFormat, RuntimeConfig};
pub use engine::{
    ClassificationEngine, ClassificationRecord, EngineSettings, Language, OptimizationPotential,
    Score, ScoreMode, SentimentLabel, SentimentResult, SentimentStrategy,
};
pub use error::{AppError, AppResult};
pub use models::{EngagementCounts, RawPost};
pub use report::{discover_opportunities, BatchSummary, MarketSize, Opportunity, OpportunityCriteria};
