//! Configuration.
//!
//! [`EngineConfig`] holds the classification rules (taxonomy and lexicon) and can
//! only be obtained validated. [`RuntimeConfig`] holds process settings read from
//! the environment (after loading a `.env` file, if any).

use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use validator::Validate;

use crate::engine::analyzer::EngineSettings;
use crate::engine::lexicon::Lexicon;
use crate::engine::scoring::ScoreMode;
use crate::engine::segmenter::Segmenter;
use crate::engine::sentiment::SentimentStrategy;
use crate::engine::taxonomy::CategoryTaxonomy;
use crate::error::{AppError, AppResult};

const COMPLAINTS_PRESET: &str = include_str!("../config/complaints.json");
const PROCESS_OPTIMIZATION_PRESET: &str = include_str!("../config/process_optimization.json");

pub const ENV_CONFIG: &str = "POSTLENS_CONFIG";
pub const ENV_MODE: &str = "POSTLENS_MODE";
pub const ENV_TOP_N: &str = "POSTLENS_TOP_N";
pub const ENV_WORKERS: &str = "POSTLENS_WORKERS";
pub const ENV_SENTIMENT: &str = "POSTLENS_SENTIMENT";
pub const ENV_LOG: &str = "POSTLENS_LOG";
pub const ENV_LOG_FORMAT: &str = "POSTLENS_LOG_FORMAT";

/// On-disk shape of an engine configuration document.
#[derive(Deserialize)]
struct EngineConfigDocument {
    taxonomy: CategoryTaxonomy,
    /// The shipped lexicon is used when omitted.
    #[serde(default)]
    lexicon: Option<Lexicon>,
}

/// Validated, immutable classification rules. Share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    taxonomy: CategoryTaxonomy,
    lexicon: Lexicon,
    segmenter: Segmenter,
}

impl EngineConfig {
    /// Validates both tables and builds the segmenter vocabulary from them.
    pub fn new(mut taxonomy: CategoryTaxonomy, mut lexicon: Lexicon) -> AppResult<Self> {
        taxonomy.validate()?;
        lexicon.validate()?;

        let segmenter = Segmenter::new(lexicon.zh_vocabulary().chain(taxonomy.zh_vocabulary()));
        debug!(
            categories = taxonomy.categories.len(),
            facets = taxonomy.facets.len(),
            vocabulary = segmenter.vocabulary_size(),
            "Engine configuration validated"
        );

        Ok(Self {
            taxonomy,
            lexicon,
            segmenter,
        })
    }

    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let document: EngineConfigDocument = serde_json::from_str(json)?;
        let lexicon = match document.lexicon {
            Some(lexicon) => lexicon,
            None => Lexicon::builtin()?,
        };
        Self::new(document.taxonomy, lexicon)
    }

    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json).map_err(|e| match e {
            AppError::Json(err) => AppError::config(format!("{}: {}", path.display(), err)),
            other => other,
        })?;
        info!(path = %path.display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Problem categories of user complaints about software.
    pub fn builtin_complaints() -> AppResult<Self> {
        Self::from_json_str(COMPLAINTS_PRESET)
    }

    /// Pain-point categories plus business-sector and process-type facets.
    pub fn builtin_process_optimization() -> AppResult<Self> {
        Self::from_json_str(PROCESS_OPTIMIZATION_PRESET)
    }

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::config(format!("unknown log format '{}'", other))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Process-level settings.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct RuntimeConfig {
    /// Engine configuration file; the complaints preset when unset.
    pub config_path: Option<PathBuf>,
    pub mode: ScoreMode,
    /// Keywords kept per post.
    #[validate(range(min = 1, max = 50))]
    pub top_n: usize,
    /// Batch worker threads; 0 uses every available core.
    #[validate(range(max = 1024))]
    pub workers: usize,
    pub sentiment: SentimentStrategy,
    /// `tracing` filter directive.
    #[validate(length(min = 1))]
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            mode: ScoreMode::Difficulty,
            top_n: 10,
            workers: 0,
            sentiment: SentimentStrategy::Auto,
            log_filter: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl RuntimeConfig {
    /// Reads `POSTLENS_*` variables, loading `.env` first when present.
    pub fn from_env() -> AppResult<Self> {
        dotenv::dotenv().ok();
        Self::from_vars()
    }

    /// Reads `POSTLENS_*` variables from the current environment only.
    pub fn from_vars() -> AppResult<Self> {
        let defaults = Self::default();
        let config = Self {
            config_path: env_var(ENV_CONFIG).map(PathBuf::from),
            mode: parse_var(ENV_MODE)?.unwrap_or(defaults.mode),
            top_n: parse_var(ENV_TOP_N)?.unwrap_or(defaults.top_n),
            workers: parse_var(ENV_WORKERS)?.unwrap_or(defaults.workers),
            sentiment: parse_var(ENV_SENTIMENT)?.unwrap_or(defaults.sentiment),
            log_filter: env_var(ENV_LOG).unwrap_or(defaults.log_filter),
            log_format: parse_var(ENV_LOG_FORMAT)?.unwrap_or(defaults.log_format),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads the configured engine rules.
    pub fn load_engine_config(&self) -> AppResult<EngineConfig> {
        match &self.config_path {
            Some(path) => EngineConfig::from_path(path),
            None => EngineConfig::builtin_complaints(),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            mode: self.mode,
            top_n: self.top_n,
            sentiment: self.sentiment,
        }
    }
}

/// Non-blank value of an environment variable.
fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    env_var(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| AppError::config(format!("{}='{}': {}", name, raw, e)))
        })
        .transpose()
}
