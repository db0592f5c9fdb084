//! Entities - one XML document per LIMS object
//!
//! An [`Entity`] owns its document and a handle to the [`EntityStore`] that
//! loads it. Descriptors refresh the entity through the store before every
//! read or write, then bind to the document through a
//! [`Region`](crate::binding::Region).

pub mod store;

use crate::binding::Region;
use crate::dom::{Document, NamespaceTable};
use crate::error::{BindError, Result};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

pub use store::{DetachedStore, EntityStore, MemoryStore};

/// Kinds of LIMS entity with a descriptor schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Sample,
    Project,
    Process,
    ProcessType,
    Artifact,
    Container,
    ContainerType,
    Researcher,
    Lab,
    Stage,
    StepPlacements,
}

impl EntityKind {
    /// Qualified root element of the entity's document
    pub const fn root_tag(self) -> &'static str {
        match self {
            EntityKind::Sample => "smp:sample",
            EntityKind::Project => "prj:project",
            EntityKind::Process => "prc:process",
            EntityKind::ProcessType => "ptp:process-type",
            EntityKind::Artifact => "art:artifact",
            EntityKind::Container => "con:container",
            EntityKind::ContainerType => "ctp:container-type",
            EntityKind::Researcher => "res:researcher",
            EntityKind::Lab => "lab:lab",
            EntityKind::Stage => "stg:stage",
            EntityKind::StepPlacements => "stp:placements",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Sample => "sample",
            EntityKind::Project => "project",
            EntityKind::Process => "process",
            EntityKind::ProcessType => "processtype",
            EntityKind::Artifact => "artifact",
            EntityKind::Container => "container",
            EntityKind::ContainerType => "containertype",
            EntityKind::Researcher => "researcher",
            EntityKind::Lab => "lab",
            EntityKind::Stage => "stage",
            EntityKind::StepPlacements => "step-placements",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference to another entity by uri
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    kind: EntityKind,
    uri: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, uri: impl Into<String>) -> Self {
        EntityRef {
            kind,
            uri: uri.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// LIMS id: the last path segment of the uri, without query
    pub fn id(&self) -> &str {
        let path = self.uri.split(['?', '#']).next().unwrap_or_default();
        path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.uri)
    }
}

/// A LIMS entity: its reference, its document once loaded, and the store
/// that loads it
pub struct Entity {
    reference: EntityRef,
    document: Option<Document>,
    store: Rc<dyn EntityStore>,
    namespaces: Arc<NamespaceTable>,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("reference", &self.reference)
            .field("loaded", &self.document.is_some())
            .finish()
    }
}

impl Entity {
    /// Unloaded entity; the store provides the document on first refresh
    pub fn new(kind: EntityKind, uri: impl Into<String>, store: Rc<dyn EntityStore>) -> Self {
        Entity {
            reference: EntityRef::new(kind, uri),
            document: None,
            store,
            namespaces: NamespaceTable::global(),
        }
    }

    /// New local entity with an empty root element of the kind's tag
    pub fn create(kind: EntityKind, uri: impl Into<String>) -> Self {
        let namespaces = NamespaceTable::global();
        let document = Document::new(&namespaces.qualify(kind.root_tag()));
        Self::from_document(kind, uri, document).with_namespaces(namespaces)
    }

    /// Local entity over an existing document
    pub fn from_document(kind: EntityKind, uri: impl Into<String>, document: Document) -> Self {
        Entity {
            reference: EntityRef::new(kind, uri),
            document: Some(document),
            store: Rc::new(DetachedStore),
            namespaces: NamespaceTable::global(),
        }
    }

    /// Use `namespaces` instead of the process-wide table
    pub fn with_namespaces(mut self, namespaces: Arc<NamespaceTable>) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.reference.kind
    }

    pub fn uri(&self) -> &str {
        &self.reference.uri
    }

    pub fn id(&self) -> &str {
        self.reference.id()
    }

    pub fn reference(&self) -> EntityRef {
        self.reference.clone()
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn store(&self) -> &Rc<dyn EntityStore> {
        &self.store
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn set_document(&mut self, document: Document) {
        self.document = Some(document);
    }

    /// Drop the document so the next refresh reloads it
    pub fn invalidate(&mut self) {
        self.document = None;
    }

    /// Bring the document up to date through the entity's store
    pub fn refresh(&mut self) -> Result<()> {
        let store = Rc::clone(&self.store);
        store.refresh(self)?;
        if self.document.is_none() {
            return Err(BindError::NotLoaded(self.reference.uri.clone()));
        }
        Ok(())
    }

    /// Borrow the loaded document together with the namespace table
    pub fn region(&mut self) -> Result<Region<'_>> {
        let document = self
            .document
            .as_mut()
            .ok_or_else(|| BindError::NotLoaded(self.reference.uri.clone()))?;
        Ok(Region::new(document, &self.namespaces))
    }

    /// Refresh, then run `f` over the entity's region
    pub fn with_region<T>(&mut self, f: impl FnOnce(&mut Region<'_>) -> Result<T>) -> Result<T> {
        self.refresh()?;
        let mut region = self.region()?;
        f(&mut region)
    }

    pub fn to_xml(&self) -> Result<String> {
        self.document
            .as_ref()
            .map(Document::to_xml)
            .ok_or_else(|| BindError::NotLoaded(self.reference.uri.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_id() {
        let sample = EntityRef::new(EntityKind::Sample, "http://lims/api/v2/samples/ABC101A1");
        assert_eq!(sample.id(), "ABC101A1");
        let artifact = EntityRef::new(EntityKind::Artifact, "http://lims/api/v2/artifacts/2-1234?state=99");
        assert_eq!(artifact.id(), "2-1234");
        assert_eq!(EntityRef::new(EntityKind::Lab, "http://lims/api/v2/labs/1/").id(), "1");
    }

    #[test]
    fn test_create_declares_root_namespace() {
        let entity = Entity::create(EntityKind::Container, "http://lims/api/v2/containers/27-1");
        let doc = entity.document().unwrap();
        assert_eq!(doc.name(doc.root()), "con:container");
        assert_eq!(doc.namespace_uri(doc.root()), Some("http://genologics.com/ri/container"));
        assert_eq!(entity.id(), "27-1");
    }

    #[test]
    fn test_invalidated_detached_entity_is_not_loaded() {
        let mut entity = Entity::create(EntityKind::Sample, "http://lims/api/v2/samples/S1");
        entity.refresh().unwrap();
        entity.invalidate();
        assert!(matches!(entity.refresh(), Err(BindError::NotLoaded(_))));
        assert!(entity.to_xml().is_err());
    }
}
