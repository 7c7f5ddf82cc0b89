// WHY: batch loop lives in the library so integration tests and benches can
// drive it without the CLI

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::dispatcher::AnnotationDispatcher;
use crate::fixture_writer::FixtureWriter;
use crate::interpretation::Interpretation;

/// Why a single record produced no row
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub domain: String,
    pub intent: String,
    pub utterance: String,
    /// `annotation` or `io`
    pub stage: String,
    pub error: String,
}

/// Per-run counters, written as JSON with `--stats-out`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub records_loaded: u64,
    pub rows_written: u64,
    /// Records whose annotation failed
    pub records_skipped: u64,
    /// Rows that were built but could not be written
    pub rows_failed: u64,
    pub processing_time_ms: u64,
    pub failures: Vec<RecordFailure>,
}

impl RunStats {
    fn record_failure(&mut self, interp: &Interpretation, stage: &str, error: String) {
        self.failures.push(RecordFailure {
            domain: interp.domain().to_string(),
            intent: interp.intent().to_string(),
            utterance: interp.utterance().to_string(),
            stage: stage.to_string(),
            error,
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Save as pretty JSON, creating the parent directory if needed
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write stats to {}", path.display()))?;
        Ok(())
    }
}

/// Annotate every record and append its fixture row
///
/// Annotation and write failures are logged and counted; with `fail_fast`
/// the first one aborts the batch instead.
pub async fn process_records(
    records: &[Interpretation],
    dispatcher: &AnnotationDispatcher,
    writer: &FixtureWriter,
    fail_fast: bool,
    progress: &ProgressBar,
) -> Result<RunStats> {
    let start_time = Instant::now();
    let mut stats = RunStats {
        records_loaded: records.len() as u64,
        ..Default::default()
    };

    info!("Starting batch of {} records", records.len());

    for interp in records {
        progress.inc(1);

        let row = match writer.build_row(interp, dispatcher) {
            Ok(row) => row,
            Err(e) => {
                if fail_fast {
                    return Err(e).with_context(|| {
                        format!("Failed to annotate {:?} ({}/{})", interp.utterance(), interp.domain(), interp.intent())
                    });
                }
                warn!(
                    domain = interp.domain(),
                    intent = interp.intent(),
                    utterance = interp.utterance(),
                    "Skipping record: {}",
                    e
                );
                stats.records_skipped += 1;
                stats.record_failure(interp, "annotation", e.to_string());
                continue;
            }
        };

        match writer.append_row(&row).await {
            Ok(_) => stats.rows_written += 1,
            Err(e) => {
                if fail_fast {
                    return Err(e);
                }
                error!("Failed to save row for {}/{}: {:#}", row.domain, row.intent, e);
                stats.rows_failed += 1;
                stats.record_failure(interp, "io", format!("{e:#}"));
            }
        }
    }

    stats.processing_time_ms = start_time.elapsed().as_millis() as u64;
    progress.finish_with_message("done");

    info!(
        "Batch complete: {} written, {} skipped, {} failed in {}ms",
        stats.rows_written, stats.records_skipped, stats.rows_failed, stats.processing_time_ms
    );
    Ok(stats)
}
