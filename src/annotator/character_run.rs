// Character-run matching: spaces carry no boundary information, so both the
// utterance and every slot token are compared with all whitespace removed.

use tracing::debug;

use super::AnnotatedUtterance;
use crate::slot_map::SlotMap;

/// Slot label together with its whitespace-free pattern
struct Pattern<'a> {
    label: &'a str,
    chars: Vec<char>,
}

/// Wrap the first matching slot pattern at each cursor position as `{token|Label}`
///
/// Unmatched characters pass through one at a time. Patterns are tried in slot
/// declaration order and the first one that fits wins. A pattern running past
/// the end of the utterance, or an empty one, never matches.
pub fn annotate(utterance: &str, slots: &SlotMap) -> AnnotatedUtterance {
    let chars: Vec<char> = utterance.chars().filter(|c| !c.is_whitespace()).collect();
    let patterns: Vec<Pattern<'_>> = slots
        .iter()
        .map(|(label, token)| Pattern {
            label,
            chars: token.chars().filter(|c| !c.is_whitespace()).collect(),
        })
        .collect();

    debug!(chars = chars.len(), patterns = patterns.len(), "Character-run scan");

    let mut annotated = String::with_capacity(utterance.len() * 2);
    let mut labels = Vec::new();
    let mut cursor = 0;

    while cursor < chars.len() {
        match find_pattern_at(&chars[cursor..], &patterns) {
            Some(pattern) => {
                debug!(cursor, label = pattern.label, "Matched slot pattern");
                annotated.push('{');
                annotated.extend(pattern.chars.iter());
                annotated.push('|');
                annotated.push_str(pattern.label);
                annotated.push('}');
                labels.push(pattern.label.to_string());
                cursor += pattern.chars.len();
            }
            None => {
                annotated.push(chars[cursor]);
                cursor += 1;
            }
        }
    }

    AnnotatedUtterance::new(annotated, labels)
}

fn find_pattern_at<'p, 'a>(rest: &[char], patterns: &'p [Pattern<'a>]) -> Option<&'p Pattern<'a>> {
    patterns
        .iter()
        .find(|pattern| !pattern.chars.is_empty() && rest.starts_with(&pattern.chars))
}
