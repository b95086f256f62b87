//! Diagnostics log: every failed backend call, one JSON line each.
//!
//! The dashboard never shows transport or decode details to the user; it
//! shows a fixed message and records the detail here instead.
//!
//! Log file: `~/.clinic-dash/diagnostics.jsonl` (see `[diagnostics]` config).

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::expand_home;
use crate::config::schema::DiagnosticsConfig;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One line of the diagnostics log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub timestamp: String,
    /// Dashboard operation that failed, e.g. `"load_patients"`.
    pub operation: String,
    pub detail: String,
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Where diagnostics go. `None` means logging is switched off.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    path: Option<PathBuf>,
}

impl Diagnostics {
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: expand_home(&config.path),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an entry. Best-effort; I/O failures are ignored.
    pub fn record(&self, operation: &str, detail: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let entry = DiagnosticEntry {
            timestamp: Utc::now().to_rfc3339(),
            operation: operation.to_string(),
            detail: detail.to_string(),
        };
        let _ = append_entry(path, &entry);
    }

    /// The last `limit` entries, oldest first. Malformed lines are skipped.
    pub fn read_recent(&self, limit: usize) -> Vec<DiagnosticEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        let entries: Vec<DiagnosticEntry> = BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect();

        let skip = entries.len().saturating_sub(limit);
        entries.into_iter().skip(skip).collect()
    }
}

fn append_entry(path: &Path, entry: &DiagnosticEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
