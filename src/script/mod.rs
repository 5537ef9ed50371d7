//! Mutation script encoding
//!
//! A mutation script is one JSON array the backend consumes positionally:
//! a dataset-command header, then column instructions, row-option changes,
//! and row payloads. Elements carry no type tag; a `null` sentinel marks
//! the end of a run of rows wherever the next element would otherwise be
//! indistinguishable from more row data.
//!
//! The encoder writes incrementally so a script can be transmitted while
//! it is still being produced.

mod encoder;
mod errors;
mod instruction;

pub use encoder::{encode_script, ScriptEncoder};
pub use errors::{ScriptError, ScriptResult};
pub use instruction::{CommandKind, DatasetCommand, Mutation, RowOptions, UpdateMode};
