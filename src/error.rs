use thiserror::Error;

/// Result type for annotation operations
pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Errors raised while choosing or running an annotator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// No annotator in the chain claims the language
    #[error("language not supported: {lang}")]
    LanguageNotSupported { lang: String },

    /// The detector could not decide on a language for the text
    #[error("language detection failed: {0}")]
    DetectionFailed(String),
}
