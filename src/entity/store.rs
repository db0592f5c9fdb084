//! Entity stores
//!
//! The store owns retrieval: `refresh` makes the entity's document reflect
//! the latest known state. Transport and caching policy live behind this
//! trait; the stores here are in-process.

use super::Entity;
use crate::dom::Document;
use crate::error::{BindError, Result};
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub trait EntityStore {
    /// Ensure the entity's document reflects the latest known state
    fn refresh(&self, entity: &mut Entity) -> Result<()>;
}

/// Store for entities built locally; refresh keeps whatever document the
/// entity holds
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedStore;

impl EntityStore for DetachedStore {
    fn refresh(&self, _entity: &mut Entity) -> Result<()> {
        Ok(())
    }
}

/// Store serving XML payloads by uri.
///
/// An entity is parsed from its payload on first refresh and again after
/// [`Entity::invalidate`]; loaded entities are left untouched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payloads: RefCell<HashMap<String, String>>,
    fetches: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the payload served for `uri`
    pub fn insert(&self, uri: impl Into<String>, xml: impl Into<String>) {
        self.payloads.borrow_mut().insert(uri.into(), xml.into());
    }

    /// Store the entity's serialized document as its payload
    pub fn put(&self, entity: &Entity) -> Result<()> {
        let xml = entity.to_xml()?;
        debug!("put {} ({} bytes)", entity.uri(), xml.len());
        self.insert(entity.uri(), xml);
        Ok(())
    }

    pub fn payload(&self, uri: &str) -> Option<String> {
        self.payloads.borrow().get(uri).cloned()
    }

    /// Number of payloads parsed into entities so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl EntityStore for MemoryStore {
    fn refresh(&self, entity: &mut Entity) -> Result<()> {
        if entity.is_loaded() {
            return Ok(());
        }
        let document = {
            let payloads = self.payloads.borrow();
            let xml = payloads
                .get(entity.uri())
                .ok_or_else(|| BindError::Store(format!("no payload for {}", entity.uri())))?;
            Document::parse_str(xml)?
        };
        self.fetches.set(self.fetches.get() + 1);
        debug!("loaded {} ({} nodes)", entity.uri(), document.node_count());
        entity.set_document(document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use std::rc::Rc;

    const URI: &str = "http://lims/api/v2/samples/S1";

    #[test]
    fn test_memory_store_loads_once() {
        let store = Rc::new(MemoryStore::new());
        store.insert(URI, "<smp:sample xmlns:smp=\"http://genologics.com/ri/sample\"><name>s1</name></smp:sample>");
        let mut entity = Entity::new(EntityKind::Sample, URI, store.clone());

        entity.refresh().unwrap();
        entity.refresh().unwrap();
        assert_eq!(store.fetch_count(), 1);

        entity.invalidate();
        entity.refresh().unwrap();
        assert_eq!(store.fetch_count(), 2);
    }

    #[test]
    fn test_missing_payload() {
        let store = Rc::new(MemoryStore::new());
        let mut entity = Entity::new(EntityKind::Sample, URI, store);
        assert!(matches!(entity.refresh(), Err(BindError::Store(_))));
    }

    #[test]
    fn test_malformed_payload() {
        let store = Rc::new(MemoryStore::new());
        store.insert(URI, "<smp:sample><name></smp:sample>");
        let mut entity = Entity::new(EntityKind::Sample, URI, store);
        assert!(matches!(entity.refresh(), Err(BindError::Parse(_))));
    }

    #[test]
    fn test_put_round_trip() {
        let store = Rc::new(MemoryStore::new());
        let entity = Entity::create(EntityKind::Sample, URI);
        store.put(&entity).unwrap();
        assert!(store.payload(URI).unwrap().contains("smp:sample"));
    }
}
