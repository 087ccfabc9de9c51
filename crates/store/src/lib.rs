//! Embedded document store for buddydesk.
//!
//! A thin wrapper over `redb` providing:
//! - Database lifecycle management with file-backed and in-memory engines
//! - Fixed table definitions for the registry's collections
//!
//! Key encoding lives in `buddydesk-types`; record semantics and secondary
//! index maintenance live in `buddydesk-registry`.

#![deny(unsafe_code)]

mod engine;
mod tables;

pub use engine::{EngineError, StorageEngine};
pub use tables::Tables;
