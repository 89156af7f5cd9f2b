// 📥 Observations - what the extraction layer hands us after each turn
//
// Input shape (JSON):
//   [ { "entityName": "city", "entityId": "…", "values": [ { "rawText": "…", ... } ] } ]
// or
//   { "observations": [ ... ] }
//
// Nothing here validates semantics: empty ids and empty resolutions are accepted as-is.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::entities::{EntityRecord, EntityValue};
use crate::memory::EntityMemoryMap;

// ============================================================================
// ENTITY OBSERVATION
// ============================================================================

/// One (entityName, entityId, values) triple from the extraction layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityObservation {
    pub entity_name: String,

    #[serde(default)]
    pub entity_id: String,

    #[serde(default)]
    pub values: Vec<EntityValue>,
}

impl EntityObservation {
    pub fn new(
        entity_name: impl Into<String>,
        entity_id: impl Into<String>,
        values: Vec<EntityValue>,
    ) -> Self {
        EntityObservation {
            entity_name: entity_name.into(),
            entity_id: entity_id.into(),
            values,
        }
    }

    /// Split into the map key and its record
    pub fn into_entry(self) -> (String, EntityRecord) {
        (self.entity_name, EntityRecord::new(self.entity_id, self.values))
    }
}

// ============================================================================
// TURN OBSERVATIONS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnObservations {
    pub observations: Vec<EntityObservation>,
}

/// Accepted top-level JSON shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum ObservationsDocument {
    List(Vec<EntityObservation>),
    Wrapped(TurnObservations),
}

impl TurnObservations {
    pub fn new(observations: Vec<EntityObservation>) -> Self {
        TurnObservations { observations }
    }

    /// Parse observations from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let document: ObservationsDocument =
            serde_json::from_str(json).context("Failed to parse entity observations JSON")?;

        let turn = match document {
            ObservationsDocument::List(observations) => TurnObservations::new(observations),
            ObservationsDocument::Wrapped(turn) => turn,
        };

        log::debug!("loaded {} entity observations", turn.observations.len());
        Ok(turn)
    }

    /// Load observations from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read observations file: {:?}", path.as_ref()))?;

        TurnObservations::from_json(&content)
            .with_context(|| format!("Invalid observations file: {:?}", path.as_ref()))
    }

    /// Build this turn's memory (duplicate names: last observation wins)
    pub fn into_memory_map(self) -> EntityMemoryMap {
        EntityMemoryMap::from_entries(self.observations.into_iter().map(EntityObservation::into_entry))
    }

    /// Apply observations on top of a previous turn's memory
    ///
    /// Each observation replaces its entity's record; entities not observed
    /// this turn are carried over. `previous` is not modified.
    pub fn apply_to(&self, previous: &EntityMemoryMap) -> EntityMemoryMap {
        self.observations.iter().fold(previous.clone(), |map, observation| {
            map.with_updated_entity(
                &observation.entity_name,
                EntityRecord::new(observation.entity_id.clone(), observation.values.clone()),
            )
        })
    }
}

// ============================================================================
// TRANSCRIPT TURN
// ============================================================================

/// Per-turn inputs from transcript validation
///
/// Both fields are ordinary memory inputs; no validation-specific behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptTurn {
    /// One memory map per hypothetical API result
    #[serde(default)]
    pub api_results: Vec<EntityMemoryMap>,

    /// Entities asserted up front for this turn
    #[serde(default)]
    pub predicted_entities: Vec<EntityObservation>,
}

impl TranscriptTurn {
    pub fn predicted_map(&self) -> EntityMemoryMap {
        EntityMemoryMap::from_entries(
            self.predicted_entities
                .iter()
                .cloned()
                .map(EntityObservation::into_entry),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
