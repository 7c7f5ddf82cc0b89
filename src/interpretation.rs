use serde::Serialize;
use tracing::debug;

use crate::annotator::{strip_whitespace, AnnotatedUtterance};
use crate::dispatcher::AnnotationDispatcher;
use crate::error::AnnotationResult;
use crate::slot_map::SlotMap;

/// Intent whose records are never annotated, whatever slots they carry
pub const PHATIC_INTENT: &str = "PhaticIntent";

/// One interpretation record: labels, utterance and the slots to annotate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    domain: String,
    intent: String,
    utterance: String,
    slots: SlotMap,
    lang: Option<String>,
}

impl Interpretation {
    pub fn new(
        domain: impl Into<String>,
        intent: impl Into<String>,
        utterance: impl Into<String>,
        slots: SlotMap,
    ) -> Self {
        Self {
            domain: domain.into(),
            intent: intent.into(),
            utterance: utterance.into(),
            slots,
            lang: None,
        }
    }

    /// Force the language used when this record is annotated (`None` to detect)
    pub fn set_lang(&mut self, lang: Option<&str>) {
        self.lang = lang.map(str::to_string);
    }

    pub fn with_lang(mut self, lang: &str) -> Self {
        self.set_lang(Some(lang));
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn intent(&self) -> &str {
        &self.intent
    }

    pub fn utterance(&self) -> &str {
        &self.utterance
    }

    pub fn slots(&self) -> &SlotMap {
        &self.slots
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn is_phatic(&self) -> bool {
        self.intent == PHATIC_INTENT
    }

    /// Annotate with the shared dispatcher
    pub fn annotated_utterance(&self) -> AnnotationResult<AnnotatedUtterance> {
        self.annotated_utterance_with(AnnotationDispatcher::get_instance(None))
    }

    /// Annotate with `dispatcher`, passing this record's language as a per-call override
    ///
    /// Phatic records skip the dispatcher and only lose their whitespace.
    pub fn annotated_utterance_with(
        &self,
        dispatcher: &AnnotationDispatcher,
    ) -> AnnotationResult<AnnotatedUtterance> {
        if self.is_phatic() {
            debug!(intent = %self.intent, "Skipping annotation for phatic intent");
            return Ok(AnnotatedUtterance::unannotated(strip_whitespace(&self.utterance)));
        }

        dispatcher.annotate_with_lang(&self.utterance, &self.slots, self.lang.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnnotationError;

    #[test]
    fn test_phatic_bypasses_slots() {
        let interp = Interpretation::new(
            "Global",
            PHATIC_INTENT,
            "お やすみ",
            SlotMap::from([("Greeting", "おやすみ")]),
        );

        let result = interp.annotated_utterance().unwrap();

        assert_eq!(result, AnnotatedUtterance::unannotated("おやすみ"));
    }

    #[test]
    fn test_phatic_bypasses_unsupported_language() {
        let interp = Interpretation::new("Global", PHATIC_INTENT, "good night", SlotMap::new())
            .with_lang("en");

        let result = interp.annotated_utterance_with(&AnnotationDispatcher::default());

        assert_eq!(result.unwrap().text, "goodnight");
    }

    #[test]
    fn test_record_language_is_used() {
        let interp = Interpretation::new(
            "HomeAutomation",
            "TurnOffApplianceIntent",
            "apaga luz",
            SlotMap::from([("DeviceType", "luz")]),
        )
        .with_lang("es");

        let result = interp
            .annotated_utterance_with(&AnnotationDispatcher::default())
            .unwrap();

        assert_eq!(result.text, "apaga luz|DeviceType");
    }

    #[test]
    fn test_record_language_unsupported() {
        let mut interp = Interpretation::new("Global", "StopIntent", "止めて", SlotMap::new());
        interp.set_lang(Some("en"));

        let result = interp.annotated_utterance_with(&AnnotationDispatcher::default());

        assert!(matches!(result, Err(AnnotationError::LanguageNotSupported { .. })));
        assert_eq!(interp.lang(), Some("en"));
    }
}
