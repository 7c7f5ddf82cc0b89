// WHY: detection is a pluggable collaborator; the built-in detector only has
// to tell apart the script families the annotator chain cares about

use crate::error::{AnnotationError, AnnotationResult};
use tracing::debug;

/// Something that can name the language of a piece of text
pub trait LanguageDetector: Send + Sync {
    /// Return a two-letter ISO-639-1 code for `text`
    fn detect(&self, text: &str) -> AnnotationResult<String>;
}

/// Spanish function words plus the command verbs and device nouns that make up
/// short smart-home requests ("Apaga luz", "Sube volumen")
const SPANISH_MARKERS: &[&str] = &[
    // function words
    "el", "la", "los", "las", "un", "una", "unos", "unas", "de", "del", "al", "que", "y",
    "por", "para", "con", "en", "es", "mi", "tu", "su", "lo", "le", "se", "qué", "esta",
    "este", "todo", "todas", "todos",
    // command verbs
    "apaga", "apagar", "enciende", "encender", "prende", "prender", "pon", "poner", "sube",
    "subir", "baja", "bajar", "abre", "abrir", "cierra", "cerrar", "activa", "desactiva",
    "cambia", "reproduce", "pausa", "detén", "busca", "llama", "dime", "muestra",
    "quiero", "siguiente", "anterior", "ayuda", "hola", "gracias",
    // devices and places
    "luz", "luces", "lámpara", "ventilador", "volumen", "tele", "televisión", "televisor",
    "música", "canción", "puerta", "ventana", "persiana", "calefacción", "aire",
    "temperatura", "alarma", "sala", "salón", "cocina", "dormitorio", "habitación", "baño",
];

/// English function words plus the matching command vocabulary
///
/// Words spelled the same in both languages ("a", "me", "no", "radio") are left
/// out so they never tip the count.
const ENGLISH_MARKERS: &[&str] = &[
    // function words
    "the", "an", "and", "of", "to", "is", "on", "off", "it", "in", "please", "my", "your",
    "what", "with", "for", "this", "that", "all", "up", "down",
    // command verbs
    "turn", "switch", "set", "open", "close", "play", "pause", "stop", "show", "call",
    "find", "search", "tell", "help", "next", "previous", "hello", "thanks",
    // devices and places
    "light", "lights", "lamp", "fan", "volume", "tv", "music", "song", "door", "window",
    "heating", "temperature", "alarm", "room", "kitchen", "bedroom", "bathroom",
];

/// Script and stop-word heuristic detector
///
/// Kana or CJK ideographs give `ja`. Latin text gives `es` when it carries
/// Spanish orthography or more Spanish than English marker words, `en`
/// otherwise. Empty text, text without letters, and other scripts fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLanguageDetector;

impl ScriptLanguageDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for ScriptLanguageDetector {
    fn detect(&self, text: &str) -> AnnotationResult<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AnnotationError::DetectionFailed(
                "cannot detect language of empty text".to_string(),
            ));
        }

        if trimmed.chars().any(is_japanese_char) {
            debug!("Detected Japanese script in {:?}", trimmed);
            return Ok("ja".to_string());
        }

        let letters: Vec<char> = trimmed.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            return Err(AnnotationError::DetectionFailed(format!(
                "no letters in {trimmed:?}"
            )));
        }

        if !letters.iter().copied().all(is_latin_char) {
            return Err(AnnotationError::DetectionFailed(format!(
                "unrecognized script in {trimmed:?}"
            )));
        }

        if trimmed.chars().any(is_spanish_orthography) {
            return Ok("es".to_string());
        }

        let mut spanish_hits = 0usize;
        let mut english_hits = 0usize;
        for word in trimmed.split_whitespace() {
            let word = word
                .trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase();
            if SPANISH_MARKERS.contains(&word.as_str()) {
                spanish_hits += 1;
            } else if ENGLISH_MARKERS.contains(&word.as_str()) {
                english_hits += 1;
            }
        }

        debug!(spanish_hits, english_hits, "Latin marker-word counts");
        if spanish_hits > english_hits {
            Ok("es".to_string())
        } else {
            Ok("en".to_string())
        }
    }
}

fn is_japanese_char(ch: char) -> bool {
    matches!(ch as u32,
        0x3040..=0x309F     // hiragana
        | 0x30A0..=0x30FF   // katakana
        | 0x31F0..=0x31FF   // katakana phonetic extensions
        | 0xFF66..=0xFF9F   // half-width katakana
        | 0x3400..=0x4DBF   // CJK extension A
        | 0x4E00..=0x9FFF   // CJK unified ideographs
        | 0xF900..=0xFAFF)  // CJK compatibility ideographs
}

fn is_latin_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch as u32, 0x00C0..=0x024F)
}

fn is_spanish_orthography(ch: char) -> bool {
    matches!(
        ch,
        'ñ' | 'Ñ' | '¿' | '¡' | 'á' | 'é' | 'í' | 'ó' | 'ú' | 'Á' | 'É' | 'Í' | 'Ó' | 'Ú'
    )
}
