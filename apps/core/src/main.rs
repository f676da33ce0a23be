// PostLens batch entry point
// Reads posts as JSON lines, writes classification records as JSON lines.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use validator::Validate;

use postlens::batch::{read_posts_jsonl, write_records_jsonl};
use postlens::config::{ENV_CONFIG, ENV_LOG_FORMAT, ENV_MODE, ENV_SENTIMENT, ENV_TOP_N, ENV_WORKERS};
use postlens::{
    discover_opportunities, logging, BatchClassifier, BatchSummary, ClassificationEngine,
    EngineConfig, LogFormat, OpportunityCriteria, RuntimeConfig, ScoreMode, SentimentStrategy,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Complaints,
    ProcessOptimization,
}

#[derive(Parser)]
#[command(name = "postlens")]
#[command(about = "Classify and score social-media posts", long_about = None)]
struct Cli {
    /// JSON-lines posts; stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Output file for records; stdout when omitted or "-"
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Engine configuration file (taxonomy, optional lexicon)
    #[arg(short, long, env = ENV_CONFIG)]
    config: Option<PathBuf>,

    /// Shipped configuration; takes precedence over --config
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// difficulty or opportunity
    #[arg(short, long, env = ENV_MODE)]
    mode: Option<ScoreMode>,

    /// Keywords kept per post (1-50)
    #[arg(long, env = ENV_TOP_N)]
    top_n: Option<usize>,

    /// Worker threads; 0 uses every core
    #[arg(short, long, env = ENV_WORKERS)]
    workers: Option<usize>,

    /// auto or lexicon
    #[arg(long, env = ENV_SENTIMENT)]
    sentiment: Option<SentimentStrategy>,

    /// pretty or json
    #[arg(long, env = ENV_LOG_FORMAT)]
    log_format: Option<LogFormat>,

    /// Write a batch summary as JSON to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Write discovered opportunities as JSON to this file (opportunity mode)
    #[arg(long)]
    opportunities: Option<PathBuf>,

    /// Minimum group size for an opportunity
    #[arg(long, default_value_t = 3)]
    min_frequency: usize,

    /// Minimum average score for an opportunity
    #[arg(long, default_value_t = 5.0)]
    min_avg_score: f64,
}

impl Cli {
    /// Environment settings with command-line overrides applied.
    fn runtime_config(&self) -> anyhow::Result<RuntimeConfig> {
        let mut runtime = RuntimeConfig::from_vars()?;
        if let Some(path) = &self.config {
            runtime.config_path = Some(path.clone());
        }
        if let Some(mode) = self.mode {
            runtime.mode = mode;
        }
        if let Some(top_n) = self.top_n {
            runtime.top_n = top_n;
        }
        if let Some(workers) = self.workers {
            runtime.workers = workers;
        }
        if let Some(sentiment) = self.sentiment {
            runtime.sentiment = sentiment;
        }
        if let Some(format) = self.log_format {
            runtime.log_format = format;
        }
        runtime.validate()?;
        Ok(runtime)
    }

    fn engine_config(&self, runtime: &RuntimeConfig) -> anyhow::Result<EngineConfig> {
        let config = match self.preset {
            Some(Preset::Complaints) => EngineConfig::builtin_complaints()?,
            Some(Preset::ProcessOptimization) => EngineConfig::builtin_process_optimization()?,
            None => runtime.load_engine_config()?,
        };
        Ok(config)
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let runtime = cli.runtime_config().context("invalid configuration")?;
    logging::init(&runtime)?;

    let engine_config = cli
        .engine_config(&runtime)
        .context("failed to load engine configuration")?;
    let taxonomy = engine_config.taxonomy().clone();
    let engine = ClassificationEngine::new(Arc::new(engine_config), runtime.engine_settings());
    let classifier = BatchClassifier::new(engine, runtime.workers)?;

    let (posts, mut rejected) = match cli.input.as_deref() {
        Some(path) if !is_stdio(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            read_posts_jsonl(BufReader::new(file))?
        }
        _ => read_posts_jsonl(io::stdin().lock())?,
    };

    info!(posts = posts.len(), workers = classifier.workers(), "Classifying");
    let outcome = classifier.classify_all(&posts);
    rejected.extend(outcome.rejected);

    match cli.output.as_deref() {
        Some(path) if !is_stdio(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            write_records_jsonl(BufWriter::new(file), &outcome.records)?;
        }
        _ => write_records_jsonl(BufWriter::new(io::stdout().lock()), &outcome.records)?,
    }

    if let Some(path) = &cli.summary {
        write_json(path, &BatchSummary::from_records(&outcome.records))?;
    }

    if let Some(path) = &cli.opportunities {
        let criteria = OpportunityCriteria {
            min_frequency: cli.min_frequency,
            min_avg_score: cli.min_avg_score,
        };
        let opportunities = discover_opportunities(&outcome.records, &taxonomy, &criteria);
        info!(found = opportunities.len(), "Opportunities discovered");
        write_json(path, &opportunities)?;
    }

    // each rejection was already logged where it happened
    if !rejected.is_empty() {
        warn!(rejected = rejected.len(), "Some posts were not classified");
    }

    Ok(())
}
