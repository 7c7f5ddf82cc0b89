// WHY: match priority depends on declaration order, so slots live in an ordered
// vector rather than a hash map

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Insertion-ordered mapping from slot label to its surface-form token
///
/// Labels are unique. Re-inserting a label replaces its token but keeps the
/// label's original position, so the first declaration still wins ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotMap {
    entries: Vec<(String, String)>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace a slot, returning the previous token for the label
    pub fn insert(&mut self, label: impl Into<String>, token: impl Into<String>) -> Option<String> {
        let label = label.into();
        let token = token.into();

        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, value)) => Some(std::mem::replace(value, token)),
            None => {
                self.entries.push((label, token));
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, token)| token.as_str())
    }

    /// Iterate `(label, token)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(label, token)| (label.as_str(), token.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SlotMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut slots = SlotMap::new();
        for (label, token) in iter {
            slots.insert(label, token);
        }
        slots
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for SlotMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for SlotMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, token) in &self.entries {
            map.serialize_entry(label, token)?;
        }
        map.end()
    }
}

struct SlotMapVisitor;

impl<'de> Visitor<'de> for SlotMapVisitor {
    type Value = SlotMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping slot labels to tokens")
    }

    // Entries arrive in document order, which is the priority order
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut slots = SlotMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((label, token)) = access.next_entry::<String, String>()? {
            slots.insert(label, token);
        }
        Ok(slots)
    }
}

impl<'de> Deserialize<'de> for SlotMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SlotMapVisitor)
    }
}
