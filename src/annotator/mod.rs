// WHY: token boundaries differ by script family, so each family gets its own
// matching algorithm behind one closed enum

use serde::Serialize;
use tracing::debug;

use crate::slot_map::SlotMap;

pub mod character_run;
pub mod whitespace_token;

/// Annotated text plus the labels used, in left-to-right match order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotatedUtterance {
    pub text: String,
    pub labels: Vec<String>,
}

impl AnnotatedUtterance {
    pub fn new(text: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            text: text.into(),
            labels,
        }
    }

    /// Text carrying no annotations at all
    pub fn unannotated(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    pub fn is_annotated(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.text, self.labels)
    }
}

/// Language-family specific match-and-wrap algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotator {
    /// Dense character matching for scripts without word spacing (Japanese)
    CharacterRun,
    /// Whole-token matching for space-delimited languages (Spanish)
    WhitespaceToken,
}

impl Annotator {
    /// Language code this annotator claims
    pub fn language(&self) -> &'static str {
        match self {
            Annotator::CharacterRun => "ja",
            Annotator::WhitespaceToken => "es",
        }
    }

    pub fn can_handle(&self, lang: &str) -> bool {
        let claimed = lang.trim().eq_ignore_ascii_case(self.language());
        debug!(annotator = ?self, lang, claimed, "Checking language claim");
        claimed
    }

    /// Annotate `utterance` with the first matching slot at each position
    pub fn execute(&self, utterance: &str, slots: &SlotMap) -> AnnotatedUtterance {
        match self {
            Annotator::CharacterRun => character_run::annotate(utterance, slots),
            Annotator::WhitespaceToken => whitespace_token::annotate(utterance, slots),
        }
    }
}

/// Remove every whitespace character, including ideographic spaces
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
