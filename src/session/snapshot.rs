//! Pre-batch session snapshots.
//!
//! Immediately before a batch run, one composite record (configuration +
//! full prompt array + timestamp + actor) is appended to
//! `snapshots.ndjson`, one JSON object per line. This is an audit trail of
//! what each batch was asked to produce; it is distinct from the live
//! per-field store mirror and is never read back for restart.

use super::Configuration;
use crate::context::SessionContext;
use crate::error::{CarouselError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;

/// Point-in-time record of configuration and prompts taken before a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// RFC3339 timestamp when the snapshot was taken.
    pub ts: DateTime<Utc>,

    /// Who started the batch (e.g. `user@HOST`).
    pub actor: String,

    /// Configuration at batch start.
    pub config: Configuration,

    /// Full prompt backing array at batch start, hidden slots included.
    pub prompts: Vec<String>,
}

impl SessionSnapshot {
    /// Capture a snapshot of the given configuration and prompts now.
    pub fn capture(config: &Configuration, prompts: Vec<String>) -> Self {
        Self {
            ts: Utc::now(),
            actor: actor_string(),
            config: config.clone(),
            prompts,
        }
    }
}

/// The actor string for snapshot metadata.
fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append a snapshot to the session's snapshot log.
///
/// Each append produces exactly one line with a trailing newline. The file
/// is created on first use.
pub fn append_snapshot(ctx: &SessionContext, snapshot: &SessionSnapshot) -> Result<()> {
    let line = serde_json::to_string(snapshot)
        .map_err(|e| CarouselError::User(format!("failed to serialize snapshot: {}", e)))?;

    let path = ctx.snapshots_path();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            CarouselError::User(format!(
                "failed to open snapshot log '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", line)
        .map_err(|e| CarouselError::User(format!("failed to append snapshot: {}", e)))
}

/// Read all snapshots from the log, oldest first.
///
/// Used by `status --history`. A missing log is an empty history.
pub fn read_snapshots(ctx: &SessionContext) -> Result<Vec<SessionSnapshot>> {
    let path = ctx.snapshots_path();
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&path)?;
    let mut snapshots = Vec::new();
    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let snapshot: SessionSnapshot = serde_json::from_str(line).map_err(|e| {
            CarouselError::User(format!(
                "snapshot log line {} is corrupted: {}",
                number + 1,
                e
            ))
        })?;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}
