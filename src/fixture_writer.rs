// WHY: downstream fixture consumers read one tab-delimited row per utterance,
// grouped into one file per domain and intent

use anyhow::{Context, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::annotator::AnnotatedUtterance;
use crate::dispatcher::AnnotationDispatcher;
use crate::error::AnnotationResult;
use crate::interpretation::Interpretation;

/// Base directory fixtures land in unless configured otherwise
pub const DEFAULT_FIXTURE_DIR: &str = "fud";
pub const FIXTURE_FILE_EXT: &str = "txt";
pub const FIELD_DELIMITER: char = '\t';
/// CRLF, the terminator downstream fixture readers expect
pub const ROW_TERMINATOR: &str = "\r\n";
/// Label column value for rows without any annotated slot
pub const NO_SLOTS: &str = "NULL";
pub const DEFAULT_DEVICES: &[&str] = &["doppler", "hendrix", "mshop", "knight", "firetv"];

/// Configuration for fixture output
#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub base_dir: PathBuf,
    pub devices: Vec<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
            devices: DEFAULT_DEVICES.iter().map(|device| device.to_string()).collect(),
        }
    }
}

/// One fixture row: `domain, intent, labels, annotated text, devices`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureRow {
    pub domain: String,
    pub intent: String,
    pub labels: Vec<String>,
    pub annotated_text: String,
    pub devices: Vec<String>,
}

impl FixtureRow {
    pub fn new(interp: &Interpretation, annotated: AnnotatedUtterance, devices: &[String]) -> Self {
        let (annotated_text, labels) = annotated.into_parts();
        Self {
            domain: interp.domain().to_string(),
            intent: interp.intent().to_string(),
            labels,
            annotated_text,
            devices: devices.to_vec(),
        }
    }

    /// Column values in output order
    pub fn fields(&self) -> [String; 5] {
        let labels = if self.labels.is_empty() {
            NO_SLOTS.to_string()
        } else {
            self.labels.join(",")
        };

        [
            self.domain.clone(),
            self.intent.clone(),
            labels,
            self.annotated_text.clone(),
            self.devices.join(","),
        ]
    }

    /// Tab-delimited line including the trailing [`ROW_TERMINATOR`]
    pub fn to_line(&self) -> String {
        let fields = self.fields();
        let delimiter = FIELD_DELIMITER.to_string();
        let mut line = fields
            .iter()
            .map(|field| quote_field(field))
            .collect::<Vec<_>>()
            .join(delimiter.as_str());
        line.push_str(ROW_TERMINATOR);
        line
    }
}

/// Quote a field that would otherwise break the row structure
fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([FIELD_DELIMITER, '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Fixture file for a domain and intent: `<base_dir>/<domain>/<intent>.txt`
pub fn fixture_path(base_dir: &Path, domain: &str, intent: &str) -> PathBuf {
    base_dir
        .join(domain)
        .join(format!("{intent}.{FIXTURE_FILE_EXT}"))
}

/// Builds fixture rows and appends them to per-intent files
pub struct FixtureWriter {
    config: WriterConfig,
}

impl FixtureWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn path_for(&self, interp: &Interpretation) -> PathBuf {
        fixture_path(&self.config.base_dir, interp.domain(), interp.intent())
    }

    /// Annotate `interp` and shape it into a row
    pub fn build_row(
        &self,
        interp: &Interpretation,
        dispatcher: &AnnotationDispatcher,
    ) -> AnnotationResult<FixtureRow> {
        let annotated = interp.annotated_utterance_with(dispatcher)?;
        if !annotated.is_annotated() && !interp.slots().is_empty() {
            debug!(
                utterance = interp.utterance(),
                slots = ?interp.slots(),
                "No slot value matched; writing {} labels",
                NO_SLOTS
            );
        }
        Ok(FixtureRow::new(interp, annotated, &self.config.devices))
    }

    /// Append `row` to its fixture file, creating directories and the file as needed
    pub async fn append_row(&self, row: &FixtureRow) -> Result<PathBuf> {
        let path = fixture_path(&self.config.base_dir, &row.domain, &row.intent);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        debug!("Start saving: {}", path.display());
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let line = row.to_line();
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        file.flush().await?;

        info!(fields = ?row.fields(), "Saved fixture row to {}", path.display());
        Ok(path)
    }
}

impl Default for FixtureWriter {
    fn default() -> Self {
        Self::new(WriterConfig::default())
    }
}
