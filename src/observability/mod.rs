//! Observability for the gateway core
//!
//! Structured JSON logs, one line per event, synchronous and unbuffered so
//! a crash never loses the line that explains it.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
