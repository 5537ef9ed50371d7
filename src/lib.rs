//! datagate - typed JSON interchange and mutation-protocol core
//!
//! The gateway sits between an external JSON dataset API and an internal
//! mutation/query backend. This crate is the typed core of that gateway:
//! it decodes client JSON into typed column values, translates streamed row
//! edits into typed row operations, encodes mutation scripts for the
//! backend, and renders typed row streams into the export formats.
//!
//! Transport, name resolution, and persistence are external collaborators;
//! this crate starts from a resolved dataset identifier and schema.

pub mod codec;
pub mod config;
pub mod export;
pub mod gateway;
pub mod observability;
pub mod schema;
pub mod script;
pub mod translate;
