pub mod annotator;
pub mod batch;
pub mod dispatcher;
pub mod error;
pub mod fixture_writer;
pub mod interpretation;
pub mod language;
pub mod loader;
pub mod slot_map;

// Re-export main types for convenient access
pub use annotator::{AnnotatedUtterance, Annotator};
pub use dispatcher::AnnotationDispatcher;
pub use error::{AnnotationError, AnnotationResult};
pub use interpretation::{Interpretation, PHATIC_INTENT};
pub use language::{LanguageDetector, ScriptLanguageDetector};
pub use slot_map::SlotMap;

// Re-export batch I/O helpers used by the CLI and integration tests
pub use batch::{process_records, RecordFailure, RunStats};
pub use fixture_writer::{fixture_path, FixtureRow, FixtureWriter, WriterConfig};
pub use loader::{load_interpretations, parse_interpretations, InterpretationLoader, LoaderConfig};
