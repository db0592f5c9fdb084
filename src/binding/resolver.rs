//! Root resolution
//!
//! Descriptors and proxies operate under a sub-root found by following a
//! path of tags from the document root. Missing steps are created as empty
//! elements, so resolving the same path twice yields the same node.

use crate::dom::{Document, NamespaceTable, NodeId, QName};
use crate::error::{BindError, Result};
use log::trace;

/// Locates, creating on demand, the sub-root a binding operates under
#[derive(Debug, Clone, Copy)]
pub struct RootResolver<'a> {
    namespaces: &'a NamespaceTable,
}

impl<'a> RootResolver<'a> {
    pub fn new(namespaces: &'a NamespaceTable) -> Self {
        RootResolver { namespaces }
    }

    /// Descend `path` from the root element. An empty path is the root.
    pub fn resolve(&self, doc: &mut Document, path: &[&str]) -> NodeId {
        let mut node = doc.root();
        for step in path {
            let name = self.namespaces.qualify(step);
            node = match doc.find_child(node, &name) {
                Some(child) => child,
                None => {
                    let child = doc.create_element(&name);
                    doc.append_child(node, child);
                    trace!("created missing root step <{}>", step);
                    child
                }
            };
        }
        node
    }

    /// Like [`resolve`](Self::resolve) without creating anything
    pub fn find(&self, doc: &Document, path: &[&str]) -> Option<NodeId> {
        path.iter().try_fold(doc.root(), |node, step| {
            doc.find_child(node, &self.namespaces.qualify(step))
        })
    }
}

/// A loaded document borrowed together with its namespace table.
///
/// Every binding reads and writes through a region; holding one keeps the
/// document exclusively borrowed.
pub struct Region<'e> {
    pub doc: &'e mut Document,
    pub namespaces: &'e NamespaceTable,
}

impl<'e> Region<'e> {
    pub fn new(doc: &'e mut Document, namespaces: &'e NamespaceTable) -> Self {
        Region { doc, namespaces }
    }

    pub fn resolver(&self) -> RootResolver<'e> {
        RootResolver::new(self.namespaces)
    }

    /// Resolve a sub-root, creating missing steps
    pub fn resolve(&mut self, path: &[&str]) -> NodeId {
        self.resolver().resolve(self.doc, path)
    }

    pub fn qualify<'t>(&self, tag: &'t str) -> QName<'t>
    where
        'e: 't,
    {
        self.namespaces.qualify(tag)
    }

    /// First child of `parent` named `tag`
    pub fn child(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.doc.find_child(parent, &self.namespaces.qualify(tag))
    }

    /// All children of `parent` named `tag`, in document order
    pub fn children(&self, parent: NodeId, tag: &str) -> Vec<NodeId> {
        self.doc.find_children(parent, &self.namespaces.qualify(tag))
    }

    /// New detached element named `tag`
    pub fn create(&mut self, tag: &str) -> NodeId {
        let name = self.namespaces.qualify(tag);
        self.doc.create_element(&name)
    }

    /// New element named `tag` appended to `parent`
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.create(tag);
        self.doc.append_child(parent, child);
        child
    }

    /// Child named `tag`, appended if absent
    pub fn child_or_append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        match self.child(parent, tag) {
            Some(child) => child,
            None => self.append(parent, tag),
        }
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        self.doc.text(node)
    }

    /// Required attribute of `node`
    pub fn require_attribute(&self, node: NodeId, attribute: &str) -> Result<String> {
        self.doc
            .attribute(node, attribute)
            .map(str::to_string)
            .ok_or_else(|| BindError::missing_attribute(self.doc.name(node), attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_is_root() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str("<a><b/></a>").unwrap();
        let resolver = RootResolver::new(&table);
        assert_eq!(resolver.resolve(&mut doc, &[]), doc.root());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str("<a/>").unwrap();
        let resolver = RootResolver::new(&table);

        let first = resolver.resolve(&mut doc, &["output-placements", "udf:type"]);
        let count = doc.node_count();
        let second = resolver.resolve(&mut doc, &["output-placements", "udf:type"]);
        assert_eq!(first, second);
        assert_eq!(doc.node_count(), count);
        assert_eq!(doc.element_children(doc.root()).count(), 1);
        assert_eq!(resolver.find(&doc, &["output-placements", "udf:type"]), Some(first));
    }

    #[test]
    fn test_resolve_follows_existing_steps() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str("<a><x><y id=\"1\"/></x></a>").unwrap();
        let resolver = RootResolver::new(&table);
        let y = resolver.resolve(&mut doc, &["x", "y"]);
        assert_eq!(doc.attribute(y, "id"), Some("1"));
        assert_eq!(resolver.find(&doc, &["x", "z"]), None);
    }

    #[test]
    fn test_region_require_attribute() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str("<a uri=\"u\"/>").unwrap();
        let region = Region::new(&mut doc, &table);
        let root = region.doc.root();
        assert_eq!(region.require_attribute(root, "uri").unwrap(), "u");
        assert!(matches!(
            region.require_attribute(root, "limsid"),
            Err(BindError::MissingAttribute { .. })
        ));
    }
}
