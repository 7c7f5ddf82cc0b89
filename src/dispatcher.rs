// WHY: chain order is itself the tie-break between annotators, so claims are
// resolved by a linear scan instead of a lookup table

use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};
use tracing::{debug, info};

use crate::annotator::{AnnotatedUtterance, Annotator};
use crate::error::{AnnotationError, AnnotationResult};
use crate::language::{LanguageDetector, ScriptLanguageDetector};
use crate::slot_map::SlotMap;

static GLOBAL_DISPATCHER: OnceLock<AnnotationDispatcher> = OnceLock::new();

/// Ordered chain of annotators plus the language selection policy
///
/// Language precedence for one call: explicit per-call language, then the
/// sticky override, then the detector.
pub struct AnnotationDispatcher {
    chain: Vec<Annotator>,
    detector: Box<dyn LanguageDetector>,
    sticky_lang: RwLock<Option<String>>,
}

impl AnnotationDispatcher {
    /// Character-run first, whitespace-token second
    pub const DEFAULT_CHAIN: [Annotator; 2] = [Annotator::CharacterRun, Annotator::WhitespaceToken];

    /// Create a dispatcher with the default chain and the given detector
    pub fn new(detector: impl LanguageDetector + 'static) -> Self {
        Self::with_chain(Self::DEFAULT_CHAIN.to_vec(), detector)
    }

    /// Create a dispatcher with a custom chain, consulted front to back
    pub fn with_chain(chain: Vec<Annotator>, detector: impl LanguageDetector + 'static) -> Self {
        Self {
            chain,
            detector: Box::new(detector),
            sticky_lang: RwLock::new(None),
        }
    }

    /// Shared process-wide dispatcher, built on first use
    ///
    /// A non-blank `lang_override` becomes the sticky language for every later
    /// call on the shared instance until replaced or cleared with
    /// [`set_lang`](Self::set_lang). Prefer [`annotate_with_lang`](Self::annotate_with_lang)
    /// when batches mix languages.
    pub fn get_instance(lang_override: Option<&str>) -> &'static AnnotationDispatcher {
        let instance = GLOBAL_DISPATCHER.get_or_init(|| {
            info!("Initializing shared annotation dispatcher");
            AnnotationDispatcher::new(ScriptLanguageDetector::new())
        });

        if let Some(lang) = lang_override.filter(|lang| !lang.trim().is_empty()) {
            instance.set_lang(Some(lang));
        }

        instance
    }

    /// Replace or clear (`None` or blank) the sticky language override
    pub fn set_lang(&self, lang: Option<&str>) {
        let normalized = lang
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string);
        debug!(sticky_lang = ?normalized, "Setting sticky language override");

        let mut guard = self.sticky_lang.write().unwrap_or_else(PoisonError::into_inner);
        *guard = normalized;
    }

    pub fn sticky_lang(&self) -> Option<String> {
        self.sticky_lang
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Annotators in priority order
    pub fn chain(&self) -> &[Annotator] {
        &self.chain
    }

    /// Sticky override if set, otherwise the detector's verdict on `text`
    pub fn detect_lang(&self, text: &str) -> AnnotationResult<String> {
        match self.sticky_lang() {
            Some(lang) => Ok(lang),
            None => self.detector.detect(text),
        }
    }

    /// First annotator in the chain that claims `lang`
    pub fn annotator_for(&self, lang: &str) -> AnnotationResult<Annotator> {
        self.chain
            .iter()
            .copied()
            .find(|annotator| annotator.can_handle(lang))
            .ok_or_else(|| AnnotationError::LanguageNotSupported {
                lang: lang.to_string(),
            })
    }

    /// Detect the language of `utterance` and annotate it with the claiming annotator
    pub fn annotate(&self, utterance: &str, slots: &SlotMap) -> AnnotationResult<AnnotatedUtterance> {
        self.annotate_with_lang(utterance, slots, None)
    }

    /// Like [`annotate`](Self::annotate), but a `Some` language wins over both
    /// the sticky override and detection without touching shared state
    pub fn annotate_with_lang(
        &self,
        utterance: &str,
        slots: &SlotMap,
        lang: Option<&str>,
    ) -> AnnotationResult<AnnotatedUtterance> {
        let lang = match lang.map(str::trim).filter(|lang| !lang.is_empty()) {
            Some(lang) => lang.to_string(),
            None => self.detect_lang(utterance)?,
        };

        let annotator = self.annotator_for(&lang)?;
        debug!(?annotator, %lang, "Annotating utterance");
        Ok(annotator.execute(utterance, slots))
    }
}

impl Default for AnnotationDispatcher {
    fn default() -> Self {
        Self::new(ScriptLanguageDetector::new())
    }
}

impl fmt::Debug for AnnotationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationDispatcher")
            .field("chain", &self.chain)
            .field("sticky_lang", &self.sticky_lang())
            .finish_non_exhaustive()
    }
}
