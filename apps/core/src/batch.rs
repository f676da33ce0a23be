//! Batch Classification
//!
//! Fans posts out over a dedicated rayon pool. A post that fails validation is
//! reported in [`BatchOutcome::rejected`] and never aborts the rest of the batch.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Read, Write};
use std::time::Instant;
use tracing::{info, warn};
use validator::Validate;

use crate::engine::{ClassificationEngine, ClassificationRecord};
use crate::error::{AppError, AppResult};
use crate::models::RawPost;

/// A post that was not classified, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedPost {
    /// Post id, or `line N` when the input line could not be parsed
    pub id: String,
    pub reason: String,
}

/// Records in input order plus everything that was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub records: Vec<ClassificationRecord>,
    pub rejected: Vec<RejectedPost>,
}

/// Parallel classifier over a shared engine
pub struct BatchClassifier {
    engine: ClassificationEngine,
    pool: rayon::ThreadPool,
}

impl BatchClassifier {
    /// `workers == 0` sizes the pool to the available cores.
    pub fn new(engine: ClassificationEngine, workers: usize) -> AppResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("postlens-worker-{}", i))
            .build()
            .map_err(|e| AppError::config(format!("failed to build worker pool: {}", e)))?;
        Ok(Self { engine, pool })
    }

    pub fn engine(&self) -> &ClassificationEngine {
        &self.engine
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Classify every valid post. Output order follows input order.
    pub fn classify_all(&self, posts: &[RawPost]) -> BatchOutcome {
        let start = Instant::now();
        let engine = &self.engine;

        let results: Vec<Result<ClassificationRecord, RejectedPost>> = self.pool.install(|| {
            posts
                .par_iter()
                .map(|post| match post.validate() {
                    Ok(()) => Ok(engine.classify(post)),
                    Err(e) => Err(RejectedPost {
                        id: post.id.clone(),
                        reason: AppError::from(e).to_string(),
                    }),
                })
                .collect()
        });

        let mut outcome = BatchOutcome::default();
        for result in results {
            match result {
                Ok(record) => outcome.records.push(record),
                Err(rejected) => {
                    warn!(post_id = %rejected.id, reason = %rejected.reason, "Post rejected");
                    outcome.rejected.push(rejected);
                }
            }
        }

        info!(
            classified = outcome.records.len(),
            rejected = outcome.rejected.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch classified"
        );
        outcome
    }
}

/// Parses JSON-lines posts. Blank lines are skipped; malformed lines are rejected
/// with their 1-based line number as the id.
pub fn parse_posts_jsonl(input: &str) -> (Vec<RawPost>, Vec<RejectedPost>) {
    let mut posts = Vec::new();
    let mut rejected = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawPost>(line) {
            Ok(post) => posts.push(post),
            Err(e) => {
                let id = format!("line {}", index + 1);
                warn!(line = index + 1, error = %e, "Malformed post skipped");
                rejected.push(RejectedPost {
                    id,
                    reason: AppError::from(e).to_string(),
                });
            }
        }
    }

    (posts, rejected)
}

/// Reads a whole JSON-lines stream; only I/O failures are errors.
pub fn read_posts_jsonl(mut reader: impl BufRead) -> AppResult<(Vec<RawPost>, Vec<RejectedPost>)> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(parse_posts_jsonl(&input))
}

/// Writes one JSON record per line.
pub fn write_records_jsonl(mut writer: impl Write, records: &[ClassificationRecord]) -> AppResult<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
