//! Type codec registry
//!
//! Total mapping from each semantic type to its client JSON reader and
//! writer, its backend-wire writer, and its flat-text renderer. The mapping
//! is realized as exhaustive matches, so completeness is checked at compile
//! time rather than at process start.
//!
//! # Design Principles
//!
//! - Typed values are produced only through [`decode_client`]
//! - Decode mismatch is absence, not an error: callers own the reporting
//! - Encoding never fails
//! - JSON null decodes to [`TypedValue::Null`] for every type

mod registry;
mod value;

pub use registry::{decode_client, encode_client, encode_wire, to_text};
pub use value::TypedValue;
