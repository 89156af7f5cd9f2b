// 🧠 Entity Memory Map - per-turn view of every known entity
//
// "A turn's memory is a VALUE: new turn, new map"
//
// Problem solved:
// - Render what the bot remembers ("Seattle and Portland") for previews/transcripts
// - Tell "never observed" apart from "observed but unfilled"
// - Update one entity without touching the map a previous turn still holds
//
// Records are shared between maps through Arc and are never mutated in place.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::{EntityRecord, EntityValue, TextSource};
use crate::observations::TurnObservations;
use crate::tokenizer::token_spans;

/// Prefix marking an entity reference inside template text
pub const ENTITY_REFERENCE_PREFIX: char = '$';

// ============================================================================
// ENTITY MEMORY MAP
// ============================================================================

/// Immutable map from entity name (case-sensitive) to EntityRecord
///
/// Iterates in ascending name order. Serializes as a `{ name: record }` object;
/// deserialization goes through `from_entries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntityMemoryMap {
    entries: BTreeMap<String, Arc<EntityRecord>>,
}

impl EntityMemoryMap {
    /// Empty map (no entity observed)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from (name, record) pairs
    ///
    /// Duplicate names: the LAST pair wins, and each replacement is logged
    /// as a warning so the caller can fix its input.
    pub fn from_entries<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, EntityRecord)>,
        K: Into<String>,
    {
        let mut entries: BTreeMap<String, Arc<EntityRecord>> = BTreeMap::new();

        for (name, record) in pairs {
            let name = name.into();
            if let Some(previous) = entries.get(&name) {
                log::warn!(
                    "duplicate entity '{}' in memory input: replacing id '{}' ({} values) with id '{}' ({} values)",
                    name,
                    previous.entity_id,
                    previous.values.len(),
                    record.entity_id,
                    record.values.len()
                );
            }
            entries.insert(name, Arc::new(record));
        }

        EntityMemoryMap { entries }
    }

    /// Parse a map from its own JSON form (`{ name: record }`)
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse entity memory JSON")
    }

    /// Parse extraction-layer observations (JSON) into a map
    pub fn from_observations_json(json: &str) -> Result<Self> {
        Ok(TurnObservations::from_json(json)?.into_memory_map())
    }

    // ========================================================================
    // UPDATES (always return a new map)
    // ========================================================================

    /// New map with `name` replaced or inserted
    pub fn with_updated_entity(&self, name: &str, record: EntityRecord) -> EntityMemoryMap {
        log::debug!("memory update: '{}' now holds {} values", name, record.values.len());

        let mut entries = self.entries.clone();
        entries.insert(name.to_string(), Arc::new(record));
        EntityMemoryMap { entries }
    }

    /// New map without `name`
    pub fn without_entity(&self, name: &str) -> EntityMemoryMap {
        if !self.entries.contains_key(name) {
            return self.clone();
        }

        log::debug!("memory update: '{}' removed", name);

        let mut entries = self.entries.clone();
        entries.remove(name);
        EntityMemoryMap { entries }
    }

    /// New map with `values` appended to `name` (recognition order kept)
    ///
    /// Creates the record when `name` is unknown. An existing record keeps
    /// its id unless that id is still the empty sentinel.
    pub fn with_appended_values(
        &self,
        name: &str,
        entity_id: &str,
        values: &[EntityValue],
    ) -> EntityMemoryMap {
        let record = match self.entries.get(name) {
            Some(existing) => {
                let mut next = existing.with_appended(values);
                if next.entity_id.is_empty() {
                    next.entity_id = entity_id.to_string();
                }
                next
            }
            None => EntityRecord::new(entity_id, values.to_vec()),
        };

        self.with_updated_entity(name, record)
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    pub fn get(&self, name: &str) -> Option<&EntityRecord> {
        self.entries.get(name).map(|record| record.as_ref())
    }

    /// Entity observed this turn (filled or not)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entity observed and holding at least one value
    pub fn is_filled(&self, name: &str) -> bool {
        self.get(name).map_or(false, EntityRecord::is_filled)
    }

    /// Raw user texts of `name`; empty when unknown or unfilled
    pub fn list_for(&self, name: &str) -> Vec<String> {
        self.get(name)
            .map(|record| record.values_as_list(TextSource::Raw))
            .unwrap_or_default()
    }

    /// Display texts of `name` joined as a sentence
    ///
    /// None when the entity is unknown or unfilled, never "".
    pub fn string_for(&self, name: &str) -> Option<String> {
        self.get(name)
            .and_then(|record| record.values_as_string(TextSource::Display))
    }

    pub fn entity_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityRecord)> {
        self.entries
            .iter()
            .map(|(name, record)| (name.as_str(), record.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // TEMPLATE SUBSTITUTION
    // ========================================================================

    /// Replace `$name` tokens with the entity's rendered value
    ///
    /// Example: "Flying to $city." → "Flying to Seattle and Portland."
    ///
    /// References to unknown or unfilled entities stay as written.
    /// Delimiters and whitespace are kept exactly.
    pub fn substitute_entities(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;

        for (start, end) in token_spans(text) {
            let token = &text[start..end];
            let replacement = token
                .strip_prefix(ENTITY_REFERENCE_PREFIX)
                .and_then(|name| self.string_for(name));

            if let Some(value) = replacement {
                output.push_str(&text[cursor..start]);
                output.push_str(&value);
                cursor = end;
            }
        }

        output.push_str(&text[cursor..]);
        output
    }
}

impl<K: Into<String>> FromIterator<(K, EntityRecord)> for EntityMemoryMap {
    fn from_iter<I: IntoIterator<Item = (K, EntityRecord)>>(iter: I) -> Self {
        EntityMemoryMap::from_entries(iter)
    }
}

// ============================================================================
// DESERIALIZATION
// ============================================================================

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = EntityMemoryMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping entity names to entity records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(pair) = access.next_entry::<String, EntityRecord>()? {
            pairs.push(pair);
        }
        Ok(EntityMemoryMap::from_entries(pairs))
    }
}

impl<'de> Deserialize<'de> for EntityMemoryMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }
}

// ============================================================================
// TESTS
// ============================================================================
