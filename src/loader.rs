use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::interpretation::Interpretation;
use crate::slot_map::SlotMap;

/// Configuration for loading interpretation exports
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Language forced onto every loaded record
    pub lang: Option<String>,
    /// Whether a malformed or unreadable input aborts instead of yielding no records
    pub fail_fast: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportItem {
    utterance_text: String,
    interpretation: ExportInterpretation,
}

#[derive(Debug, Deserialize)]
struct ExportInterpretation {
    value: ExportInterpretationValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportInterpretationValue {
    domain: ExportDomain,
    #[serde(rename = "type")]
    intent: String,
    #[serde(default)]
    entity_properties: Vec<ExportEntityProperty>,
}

#[derive(Debug, Deserialize)]
struct ExportDomain {
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportEntityProperty {
    name: String,
    #[serde(default)]
    property_values: Vec<ExportPropertyValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportPropertyValue {
    surface_form: ExportSurfaceForm,
}

#[derive(Debug, Deserialize)]
struct ExportSurfaceForm {
    #[serde(default)]
    tokens: Vec<ExportToken>,
}

#[derive(Debug, Deserialize)]
struct ExportToken {
    value: String,
}

impl ExportItem {
    fn into_interpretation(self, lang: Option<&str>) -> Interpretation {
        let value = self.interpretation.value;
        let mut slots = SlotMap::with_capacity(value.entity_properties.len());

        for property in value.entity_properties {
            // Only the first property value carries the surface form
            let Some(first) = property.property_values.into_iter().next() else {
                warn!(slot = %property.name, "Entity property has no values, skipping slot");
                continue;
            };
            if first.surface_form.tokens.is_empty() {
                continue;
            }

            let token: String = first
                .surface_form
                .tokens
                .iter()
                .map(|token| token.value.as_str())
                .collect();
            slots.insert(property.name, token);
        }

        let mut interp = Interpretation::new(value.domain.value, value.intent, self.utterance_text, slots);
        interp.set_lang(lang);
        interp
    }
}

/// Parse an interpretation export (a JSON array) into records
///
/// Slot tokens are the surface-form tokens of the first property value joined
/// without separator.
pub fn parse_interpretations(json: &str, lang: Option<&str>) -> Result<Vec<Interpretation>> {
    let items: Vec<ExportItem> =
        serde_json::from_str(json).context("Malformed interpretation export")?;

    let records: Vec<Interpretation> = items
        .into_iter()
        .map(|item| item.into_interpretation(lang))
        .collect();

    for record in &records {
        debug!(
            domain = record.domain(),
            intent = record.intent(),
            utterance = record.utterance(),
            slots = ?record.slots(),
            "Loaded interpretation"
        );
    }

    Ok(records)
}

/// Reads interpretation exports from disk
pub struct InterpretationLoader {
    config: LoaderConfig,
}

impl InterpretationLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load every record in the export at `path`
    ///
    /// Without fail-fast an unreadable or malformed file is logged and yields
    /// an empty record list.
    pub async fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Interpretation>> {
        let path = path.as_ref();
        info!("Start loading: {}", path.display());

        match self.try_load(path).await {
            Ok(records) => {
                info!("Loaded {} records from {}", records.len(), path.display());
                Ok(records)
            }
            Err(e) if !self.config.fail_fast => {
                error!("Failed to load {}: {:#}", path.display(), e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn try_load(&self, path: &Path) -> Result<Vec<Interpretation>> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        parse_interpretations(&content, self.config.lang.as_deref())
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Load an export with default configuration
pub async fn load_interpretations<P: AsRef<Path>>(path: P) -> Result<Vec<Interpretation>> {
    InterpretationLoader::new(LoaderConfig::default()).load(path).await
}
