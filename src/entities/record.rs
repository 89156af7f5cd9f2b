// 🧾 Entity Record - stable identity + ordered values
//
// "entity_id is IDENTITY, values are what the conversation has said so far"
//
// Values keep recognition order. Every copy and merge preserves it.

use serde::{Deserialize, Serialize};

use super::value::{EntityValue, TextSource};

// ============================================================================
// ENTITY RECORD
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    /// Identifier from the extraction layer ("" = not yet assigned)
    #[serde(default)]
    pub entity_id: String,

    /// Recognized values, in recognition order (empty = known but unfilled)
    #[serde(default)]
    pub values: Vec<EntityValue>,
}

impl EntityRecord {
    pub fn new(entity_id: impl Into<String>, values: Vec<EntityValue>) -> Self {
        EntityRecord {
            entity_id: entity_id.into(),
            values,
        }
    }

    /// Record known by name but holding no value yet
    pub fn unfilled(entity_id: impl Into<String>) -> Self {
        EntityRecord::new(entity_id, Vec::new())
    }

    pub fn is_filled(&self) -> bool {
        !self.values.is_empty()
    }

    /// One string per value, in order
    pub fn values_as_list(&self, source: TextSource) -> Vec<String> {
        self.values
            .iter()
            .map(|value| value.text(source).to_string())
            .collect()
    }

    /// Values joined as an English list ("a", "a and b", "a, b and c")
    ///
    /// Returns None when the record holds no value.
    pub fn values_as_string(&self, source: TextSource) -> Option<String> {
        let texts: Vec<&str> = self.values.iter().map(|value| value.text(source)).collect();
        join_as_sentence(&texts)
    }

    /// New record with `values` appended after the existing ones
    pub fn with_appended(&self, values: &[EntityValue]) -> EntityRecord {
        let mut next = self.clone();
        next.values.extend_from_slice(values);
        next
    }
}

// ============================================================================
// SENTENCE JOINING
// ============================================================================

/// Join items as an English list with no Oxford comma
///
/// - []              → None
/// - [a]             → "a"
/// - [a, b]          → "a and b"
/// - [a, b, ..., z]  → "a, b, ... and z"
pub fn join_as_sentence<S: AsRef<str>>(items: &[S]) -> Option<String> {
    match items {
        [] => None,
        [only] => Some(only.as_ref().to_string()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|item| item.as_ref()).collect();
            Some(format!("{} and {}", head.join(", "), last.as_ref()))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
