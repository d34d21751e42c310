//! Persistence boundary.
//!
//! A finished batch is handed to a [`QuestionSink`] for unordered bulk
//! insertion. Sinks may accept a subset; they report how many records they
//! took and why the rest were refused.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::QuestionDoc;

/// Trait for destinations that store generated questions.
#[async_trait]
pub trait QuestionSink: Send + Sync {
    /// Human-readable sink name (e.g. "json-file").
    fn name(&self) -> &str;

    /// Insert a batch. Insertion need not be atomic.
    async fn insert_many(&self, questions: &[QuestionDoc]) -> Result<InsertOutcome>;
}

/// What a sink did with a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOutcome {
    /// Number of records stored.
    pub accepted: usize,
    /// Records the sink refused.
    #[serde(default)]
    pub rejected: Vec<RejectedQuestion>,
}

/// A record a sink refused to store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedQuestion {
    pub id: u32,
    pub reason: String,
}

/// On-disk layout for [`JsonFileSink`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One pretty-printed JSON array.
    #[default]
    Json,
    /// One JSON object per line.
    Jsonl,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Writes the batch to a JSON or JSON Lines file, replacing any previous file.
pub struct JsonFileSink {
    path: PathBuf,
    format: OutputFormat,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSink for JsonFileSink {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn insert_many(&self, questions: &[QuestionDoc]) -> Result<InsertOutcome> {
        let body = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(questions)?,
            OutputFormat::Jsonl => {
                let mut out = String::new();
                for q in questions {
                    out.push_str(&serde_json::to_string(q)?);
                    out.push('\n');
                }
                out
            }
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("failed to write questions to {}", self.path.display()))?;

        tracing::info!("wrote {} questions to {}", questions.len(), self.path.display());
        Ok(InsertOutcome {
            accepted: questions.len(),
            rejected: Vec::new(),
        })
    }
}

/// Read a file written by [`JsonFileSink`] in either format.
pub fn read_questions(path: &Path) -> Result<Vec<QuestionDoc>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;

    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()));
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("failed to parse {} line {}", path.display(), i + 1))
        })
        .collect()
}

/// An in-process sink, for tests and dry runs.
///
/// Can be told to refuse specific ids to exercise partial acceptance.
#[derive(Default)]
pub struct MemorySink {
    stored: Mutex<Vec<QuestionDoc>>,
    reject_ids: HashSet<u32>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that refuses the given ids.
    pub fn rejecting(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
            reject_ids: ids.into_iter().collect(),
        }
    }

    /// Everything stored so far.
    pub fn stored(&self) -> Vec<QuestionDoc> {
        self.stored
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuestionSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert_many(&self, questions: &[QuestionDoc]) -> Result<InsertOutcome> {
        let mut stored = self
            .stored
            .lock()
            .map_err(|_| anyhow::anyhow!("memory sink lock poisoned"))?;

        let mut outcome = InsertOutcome::default();
        for q in questions {
            if self.reject_ids.contains(&q.id) {
                outcome.rejected.push(RejectedQuestion {
                    id: q.id,
                    reason: "rejected by sink".to_string(),
                });
            } else {
                stored.push(q.clone());
                outcome.accepted += 1;
            }
        }
        Ok(outcome)
    }
}
