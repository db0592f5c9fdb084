//! limsxml - Live bindings between typed fields and LIMS entity documents
//!
//! Layers:
//! A: Byte-level XML scanning and tokenizing (core, reader)
//! B: Mutable arena DOM with namespace tables (dom)
//! C: Entities and the stores that load them (entity)
//! D: Descriptors and write-through proxies (binding)
//! E: Per-entity descriptor tables (schema)
//!
//! Every descriptor refreshes its entity through the entity's store, then
//! reads or writes the document directly. Proxies opened by collection
//! descriptors are snapshots that write through on every mutation.

mod core;
mod reader;

pub mod binding;
pub mod dom;
pub mod entity;
pub mod error;
pub mod schema;

// ============================================================================
// Re-exports
// ============================================================================

pub use crate::core::tokenizer::ParseError;
pub use binding::{
    Dimension, ExternalId, InputOutputMap, IoRecord, Location, OutputPlacement, Region, RootResolver, SyncDict,
    SyncList, UdfType, UdfValue,
};
pub use dom::{Document, NamespaceTable, NodeId, QName};
pub use entity::{DetachedStore, Entity, EntityKind, EntityRef, EntityStore, MemoryStore};
pub use error::{BindError, Result};
pub use schema::Schema;
