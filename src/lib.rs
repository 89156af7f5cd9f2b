// Entity Memory - Core Library
// Tracks recognized entities per conversation turn and renders them back as text

pub mod entities;       // Entity values + records
pub mod tokenizer;      // Template text splitting
pub mod memory;         // Per-turn entity memory map
pub mod observations;   // Extraction-layer input (JSON boundary)

#[cfg(test)]
mod test_logger;

// Re-export commonly used types
pub use entities::{
    EntityValue, EntityRecord, Resolution, TextSource,
    join_as_sentence,
};
pub use tokenizer::{split, token_spans, is_delimiter};
pub use memory::{EntityMemoryMap, ENTITY_REFERENCE_PREFIX};
pub use observations::{EntityObservation, TurnObservations, TranscriptTurn};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
