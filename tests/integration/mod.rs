// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary workspace holding an input export and a fixture output directory
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Directory fixture rows are written under
    pub fn out_dir(&self) -> PathBuf {
        self.root_path.join("fud")
    }

    /// Write an export file built from `items` and return its path
    pub fn create_export<P: AsRef<Path>>(&self, relative_path: P, items: &[Value]) -> PathBuf {
        let file_path = self.root_path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        let content = serde_json::to_string_pretty(items).expect("Failed to serialize export");
        fs::write(&file_path, content).expect("Failed to write export file");
        file_path
    }

    /// Read the fixture file for a domain and intent
    pub fn read_fixture(&self, domain: &str, intent: &str) -> String {
        let path = self.out_dir().join(domain).join(format!("{intent}.txt"));
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
    }

    pub fn fixture_exists(&self, domain: &str, intent: &str) -> bool {
        self.out_dir().join(domain).join(format!("{intent}.txt")).exists()
    }
}

/// Build one export item; each slot is `(name, tokens)`
pub fn export_item(domain: &str, intent: &str, utterance: &str, slots: &[(&str, &[&str])]) -> Value {
    let entity_properties: Vec<Value> = slots
        .iter()
        .map(|(name, tokens)| {
            let tokens: Vec<Value> = tokens.iter().map(|token| json!({ "value": token })).collect();
            json!({
                "name": name,
                "propertyValues": [ { "surfaceForm": { "tokens": tokens } } ]
            })
        })
        .collect();

    json!({
        "utteranceText": utterance,
        "interpretation": {
            "value": {
                "domain": { "value": domain },
                "type": intent,
                "entityProperties": entity_properties
            }
        }
    })
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines",
            context, expected_lines.len(), actual_lines.len()
        );
    }

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context, i + 1, expected_line, actual_line
            );
        }
    }
}
