//! DOM Module - Arena-based mutable XML Document
//!
//! Implements the document the bindings read and write:
//! - Arena allocation for nodes
//! - NodeId (u32) indices that survive detachment
//! - String interning for element/attribute names
//! - Namespace resolution at parse time and a configurable prefix table

pub mod document;
pub mod namespace;
pub mod node;
pub mod strings;
mod writer;

pub use document::{ChildIter, Document};
pub use namespace::{ns, NamespaceScopes, NamespaceTable, NamespaceTableBuilder, QName};
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
pub use strings::StringPool;
