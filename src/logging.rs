//! Structured run logs: one JSON line per pipeline event, plus a statistics snapshot.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::StatisticsRow;
use crate::AggregationError;

fn utc_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub run_id: String,
    pub timestamp_utc: String,
    pub stage: String,
    pub event: String,
    pub status: String,
    pub duration_ms: u64,
    pub component: String,
    pub message: String,
    pub trace_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub frequency_khz: f64,
    pub mean_abs_v: f64,
    pub var_v: f64,
    pub rms_abs_v: f64,
    pub p95_abs_v: f64,
    pub sample_size: usize,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl StatisticsSnapshot {
    /// Snapshot of the first row of a frame, or all zeros for an empty frame.
    pub fn from_frame(rows: &[StatisticsRow]) -> Self {
        match rows.first() {
            Some(row) => Self {
                frequency_khz: row.frequency_khz,
                mean_abs_v: row.mean_abs_v,
                var_v: row.var_v,
                rms_abs_v: row.rms_abs_v,
                p95_abs_v: row.p95_abs_v.unwrap_or(0.0),
                sample_size: row.sample_size.unwrap_or(0),
                ci_lower: 0.0,
                ci_upper: 0.0,
            },
            None => Self {
                frequency_khz: 0.0,
                mean_abs_v: 0.0,
                var_v: 0.0,
                rms_abs_v: 0.0,
                p95_abs_v: 0.0,
                sample_size: 0,
                ci_lower: 0.0,
                ci_upper: 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatisticsEnvelope {
    run_id: String,
    timestamp_utc: String,
    statistics: StatisticsSnapshot,
}

/// Writes `<log_dir>/runs/<run_id>.jsonl` and `<log_dir>/stats/<run_id>.json`.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    run_id: String,
    run_log_path: PathBuf,
    stats_log_path: PathBuf,
}

impl StructuredLogger {
    pub fn new(run_id: impl Into<String>, log_dir: &Path) -> Result<Self, AggregationError> {
        let run_id = run_id.into();
        let run_dir = log_dir.join("runs");
        let stats_dir = log_dir.join("stats");
        fs::create_dir_all(&run_dir)?;
        fs::create_dir_all(&stats_dir)?;

        Ok(Self {
            run_log_path: run_dir.join(format!("{run_id}.jsonl")),
            stats_log_path: stats_dir.join(format!("{run_id}.json")),
            run_id,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn run_log_path(&self) -> &Path {
        &self.run_log_path
    }

    pub fn stats_log_path(&self) -> &Path {
        &self.stats_log_path
    }

    #[allow(clippy::too_many_arguments)]
    pub fn log_event(
        &self,
        stage: &str,
        event: &str,
        status: &str,
        duration_ms: u64,
        component: &str,
        message: &str,
        trace_id: Option<&str>,
    ) -> Result<(), AggregationError> {
        let record = RunEvent {
            run_id: self.run_id.clone(),
            timestamp_utc: utc_now(),
            stage: stage.to_string(),
            event: event.to_string(),
            status: status.to_string(),
            duration_ms,
            component: component.to_string(),
            message: message.to_string(),
            trace_id: trace_id
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.run_log_path)?;
        writeln!(file, "{}", serde_json::to_string(&record)?)?;
        Ok(())
    }

    /// Replaces the statistics file for this run.
    pub fn log_statistics(&self, statistics: &StatisticsSnapshot) -> Result<(), AggregationError> {
        let envelope = StatisticsEnvelope {
            run_id: self.run_id.clone(),
            timestamp_utc: utc_now(),
            statistics: statistics.clone(),
        };
        fs::write(
            &self.stats_log_path,
            serde_json::to_string_pretty(&envelope)?,
        )?;
        Ok(())
    }
}
