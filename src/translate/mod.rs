//! Row translation pipeline
//!
//! Consumes a lazy sequence of raw JSON values plus a resolved schema and
//! produces a lazy sequence of typed row operations, validating every field
//! against the codec. The pipeline is pull-based and fail-fast: the first
//! error terminates the sequence and no further input is consumed.
//!
//! [`DatumReader`] is the input side: it frames one datum at a time out of
//! a serialized JSON array body, enforcing the per-datum size cap before
//! the datum is ever parsed. That cap is the crate's only backpressure
//! mechanism.

mod datum;
mod errors;
mod pipeline;

pub use datum::DatumReader;
pub use errors::{TranslateError, TranslateResult};
pub use pipeline::{RowOperation, RowTranslator, DELETE_MARKER};
