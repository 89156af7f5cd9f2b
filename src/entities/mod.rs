// Entity Models
// Identity persists, values accumulate:
//
// - EntityValue: one immutable recognized occurrence
// - EntityRecord: stable entity id + ordered values

pub mod value;
pub mod record;

pub use value::{EntityValue, Resolution, TextSource};
pub use record::{EntityRecord, join_as_sentence};
