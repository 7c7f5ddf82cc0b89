use tracing::debug;

use super::AnnotatedUtterance;
use crate::slot_map::SlotMap;

/// Suffix every space-delimited token that equals a slot token with `|Label`
///
/// Only whole tokens match; punctuation stays attached to its token. Tokens
/// are split on single spaces, so runs of spaces survive the round trip.
pub fn annotate(utterance: &str, slots: &SlotMap) -> AnnotatedUtterance {
    debug!(utterance, labels = ?slots.labels().collect::<Vec<_>>(), "Whitespace-token scan");

    let mut pieces = Vec::new();
    let mut labels = Vec::new();

    for token in utterance.split(' ') {
        let matched = if token.is_empty() {
            None
        } else {
            slots.iter().find(|(_, value)| *value == token)
        };

        match matched {
            Some((label, _)) => {
                debug!(token, label, "Matched slot token");
                pieces.push(format!("{token}|{label}"));
                labels.push(label.to_string());
            }
            None => pieces.push(token.to_string()),
        }
    }

    AnnotatedUtterance::new(pieces.join(" "), labels)
}
