//! XML Document - Arena-based mutable DOM
//!
//! Storage:
//! - Arena allocation for nodes, addressed by `NodeId`
//! - String interning for element names, attribute names and namespace URIs
//! - Namespace URIs resolved once at parse (or creation) time
//!
//! Structural edits relink nodes in place. Detached nodes stay in the arena
//! so ids held by proxies never dangle.

use super::namespace::{NamespaceScopes, QName};
use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode};
use super::strings::StringPool;
use crate::core::tokenizer::ParseError;
use crate::reader::events::{split_name, StartElement, XmlEvent};
use crate::reader::slice::SliceReader;
use log::trace;

/// Id of the document node; the root element is its only element child
pub(crate) const DOCUMENT_NODE: NodeId = 0;

/// An XML document stored in arena format
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<XmlNode>,
    pub(super) strings: StringPool,
    root: NodeId,
}

impl Document {
    /// New document holding a single empty root element. A prefixed root
    /// gets an `xmlns:prefix` declaration for its namespace.
    pub fn new(root: &QName<'_>) -> Self {
        let mut doc = Document {
            nodes: vec![XmlNode::document()],
            strings: StringPool::new(),
            root: DOCUMENT_NODE,
        };
        let root_id = doc.create_element(root);
        if let (Some(prefix), Some(uri)) = (root.prefix, root.namespace) {
            doc.set_attribute(root_id, &format!("xmlns:{}", prefix), uri);
        }
        doc.link_last(DOCUMENT_NODE, root_id);
        doc.root = root_id;
        doc
    }

    pub fn parse_str(input: &str) -> Result<Self, ParseError> {
        Self::parse(input.as_bytes())
    }

    /// Parse a complete document. Mismatched or unclosed tags, text outside
    /// the root element and a missing or repeated root element are errors.
    pub fn parse(input: &[u8]) -> Result<Self, ParseError> {
        let mut doc = Document {
            nodes: Vec::with_capacity(64),
            strings: StringPool::new(),
            root: DOCUMENT_NODE,
        };
        doc.nodes.push(XmlNode::document());

        let mut reader = SliceReader::new(input);
        let mut scopes = NamespaceScopes::with_xml_prefix(&mut doc.strings);
        // Open elements with the offset of their start tag
        let mut stack: Vec<(NodeId, usize)> = vec![(DOCUMENT_NODE, 0)];
        let mut root_element: Option<NodeId> = None;

        while let Some(event) = reader.next_event()? {
            let position = reader.event_start();
            let parent = stack.last().map_or(DOCUMENT_NODE, |&(id, _)| id);
            let at_top = stack.len() == 1;

            match event {
                XmlEvent::StartElement(elem) | XmlEvent::EmptyElement(elem)
                    if at_top && root_element.is_some() =>
                {
                    return Err(ParseError::new(
                        format!("Document has multiple root elements: <{}>", elem.name_str().unwrap_or("?")),
                        position,
                    ));
                }
                XmlEvent::StartElement(elem) => {
                    let id = doc.handle_element(&elem, parent, &mut scopes)?;
                    root_element.get_or_insert(id);
                    stack.push((id, position));
                }
                XmlEvent::EmptyElement(elem) => {
                    let id = doc.handle_element(&elem, parent, &mut scopes)?;
                    scopes.pop_scope();
                    root_element.get_or_insert(id);
                }
                XmlEvent::EndElement(end) => {
                    let open = stack.pop().map(|(id, _)| id).filter(|&id| id != DOCUMENT_NODE);
                    let Some(open) = open else {
                        return Err(ParseError::new(
                            format!("Unexpected end tag </{}>", end.name_str().unwrap_or("?")),
                            position,
                        ));
                    };
                    if doc.name(open).as_bytes() != end.name {
                        return Err(ParseError::new(
                            format!(
                                "Tag mismatch: <{}> closed with </{}>",
                                doc.name(open),
                                end.name_str().unwrap_or("?")
                            ),
                            position,
                        ));
                    }
                    scopes.pop_scope();
                }
                XmlEvent::Text(content) if at_top => {
                    if !content.iter().all(|&b| crate::core::scanner::is_whitespace(b)) {
                        return Err(ParseError::new("Text content not allowed at document level", position));
                    }
                }
                XmlEvent::Text(content) => {
                    let node = XmlNode::character_data(NodeKind::Text, utf8(&content)?);
                    doc.push_child(parent, node);
                }
                XmlEvent::CData(content) => {
                    let node = XmlNode::character_data(NodeKind::CData, utf8(&content)?);
                    doc.push_child(parent, node);
                }
                XmlEvent::Comment(content) => {
                    let node = XmlNode::character_data(NodeKind::Comment, utf8(&content)?);
                    doc.push_child(parent, node);
                }
                XmlEvent::ProcessingInstruction { target, data } => {
                    let target_id = doc.strings.intern(&utf8(target)?);
                    let data = data.as_deref().map(utf8).transpose()?.unwrap_or_default();
                    let node = XmlNode::processing_instruction(target_id, data.trim_start().to_string());
                    doc.push_child(parent, node);
                }
                XmlEvent::Prolog => {}
            }
        }

        if let Some(&(unclosed, start)) = stack.get(1) {
            return Err(ParseError::new(format!("Unclosed tag: <{}>", doc.name(unclosed)), start));
        }
        doc.root = root_element.ok_or_else(|| ParseError::new("Document has no root element", input.len()))?;
        Ok(doc)
    }

    /// Intern an element with its attributes and resolve its namespace.
    /// Leaves a pushed namespace scope for the caller to pop.
    fn handle_element(
        &mut self,
        elem: &StartElement<'_>,
        parent: NodeId,
        scopes: &mut NamespaceScopes,
    ) -> Result<NodeId, ParseError> {
        let name = utf8(elem.name)?;
        scopes.push_scope();

        let mut attributes = Vec::with_capacity(elem.attributes.len());
        for attr in &elem.attributes {
            let value = utf8(&attr.value)?;
            if let Some(prefix) = attr.declared_prefix() {
                let prefix_id = self.strings.intern(prefix);
                let uri_id = self.strings.intern(&value);
                scopes.declare(prefix_id, uri_id);
            }
            attributes.push(XmlAttribute {
                name_id: self.strings.intern(&utf8(&attr.name)?),
                value,
            });
        }

        let prefix_id = match split_name(&name).0 {
            Some(prefix) => self.strings.intern(prefix),
            None => 0,
        };
        let namespace_id = scopes.resolve(prefix_id).unwrap_or(0);

        let mut node = XmlNode::element(self.strings.intern(&name), namespace_id);
        node.attributes = attributes;
        Ok(self.push_child(parent, node))
    }

    /// Add a node to the arena as the last child of `parent`
    fn push_child(&mut self, parent: NodeId, node: XmlNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.link_last(parent, id);
        id
    }

    fn link_last(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child = self.nodes[parent_id as usize].last_child;
        {
            let child = &mut self.nodes[child_id as usize];
            child.parent = Some(parent_id);
            child.prev_sibling = last_child;
            child.next_sibling = None;
        }
        match last_child {
            Some(last) => self.nodes[last as usize].next_sibling = Some(child_id),
            None => self.nodes[parent_id as usize].first_child = Some(child_id),
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Root element id
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get_node(id).map(|n| n.kind)
    }

    /// Qualified element name as written (`udf:field`), or PI target
    pub fn name(&self, id: NodeId) -> &str {
        self.get_node(id).map_or("", |n| self.strings.get(n.name_id))
    }

    pub fn local_name(&self, id: NodeId) -> &str {
        split_name(self.name(id)).1
    }

    pub fn prefix(&self, id: NodeId) -> Option<&str> {
        split_name(self.name(id)).0
    }

    pub fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        self.get_node(id)
            .filter(|n| n.namespace_id != 0)
            .map(|n| self.strings.get(n.namespace_id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|n| n.parent)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|n| n.next_sibling)
    }

    /// Whether the node is reachable from the document node
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == DOCUMENT_NODE {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Iterate over all children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over element children of a node
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(|&c| self.nodes[c as usize].is_element())
    }

    /// Whether an element matches a qualified name.
    ///
    /// Namespaced names match on namespace URI and local name, whatever
    /// prefix the document uses. Unprefixed names match unprefixed elements.
    /// Names with a prefix unknown to the table match the literal name.
    pub fn matches(&self, id: NodeId, name: &QName<'_>) -> bool {
        if !self.get_node(id).is_some_and(XmlNode::is_element) {
            return false;
        }
        let (prefix, local) = split_name(self.name(id));
        if local != name.local {
            return false;
        }
        match (name.prefix, name.namespace) {
            (_, Some(uri)) => self.namespace_uri(id) == Some(uri),
            (Some(wanted), None) => prefix == Some(wanted),
            (None, None) => prefix.is_none(),
        }
    }

    /// First element child matching `name`
    pub fn find_child(&self, parent: NodeId, name: &QName<'_>) -> Option<NodeId> {
        self.children(parent).find(|&c| self.matches(c, name))
    }

    /// All element children matching `name`, in document order
    pub fn find_children(&self, parent: NodeId, name: &QName<'_>) -> Vec<NodeId> {
        self.children(parent).filter(|&c| self.matches(c, name)).collect()
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name_id = self.strings.lookup(name)?;
        self.get_node(id)?
            .attributes
            .iter()
            .find(|a| a.name_id == name_id)
            .map(|a| a.value.as_str())
    }

    /// All attributes of an element as (name, value), in document order
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.get_node(id)
            .into_iter()
            .flat_map(|n| n.attributes.iter())
            .map(|a| (self.strings.get(a.name_id), a.value.as_str()))
    }

    /// Element text: the text and CDATA children before the first element
    /// child. Empty text reads as `None`.
    pub fn text(&self, id: NodeId) -> Option<String> {
        let mut text = String::new();
        for child in self.children(id) {
            let node = &self.nodes[child as usize];
            if node.is_element() {
                break;
            }
            if node.is_text() {
                text.push_str(&node.content);
            }
        }
        (!text.is_empty()).then_some(text)
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Create a detached element; attach it with `append_child` or `insert_before`
    pub fn create_element(&mut self, name: &QName<'_>) -> NodeId {
        let name_id = self.strings.intern(&name.qualified());
        let namespace_id = name.namespace.map_or(0, |uri| self.strings.intern(uri));
        let id = self.nodes.len() as NodeId;
        self.nodes.push(XmlNode::element(name_id, namespace_id));
        trace!("created <{}> as node {}", name.qualified(), id);
        id
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.link_last(parent, child);
    }

    /// Move `child` directly before `reference`, which must be a child of `parent`
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        if self.parent(reference) != Some(parent) {
            self.append_child(parent, child);
            return;
        }
        self.detach(child);
        let prev = self.nodes[reference as usize].prev_sibling;
        {
            let node = &mut self.nodes[child as usize];
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = Some(reference);
        }
        self.nodes[reference as usize].prev_sibling = Some(child);
        match prev {
            Some(p) => self.nodes[p as usize].next_sibling = Some(child),
            None => self.nodes[parent as usize].first_child = Some(child),
        }
    }

    /// Move `child` directly after `reference`, or to the end when
    /// `reference` is the last child
    pub fn insert_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        match self.next_sibling(reference) {
            Some(next) if next != child => self.insert_before(parent, child, next),
            Some(_) => {}
            None => self.append_child(parent, child),
        }
    }

    /// Unlink a node from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        let Some(parent) = parent else {
            return;
        };

        match prev {
            Some(p) => self.nodes[p as usize].next_sibling = next,
            None => self.nodes[parent as usize].first_child = next,
        }
        match next {
            Some(n) => self.nodes[n as usize].prev_sibling = prev,
            None => self.nodes[parent as usize].last_child = prev,
        }
        let node = &mut self.nodes[id as usize];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        trace!("detached node {} from {}", id, parent);
    }

    /// Replace the element's leading text; `None` or "" removes it
    pub fn set_text(&mut self, id: NodeId, text: Option<&str>) {
        let leading: Vec<NodeId> = self
            .children(id)
            .take_while(|&c| !self.nodes[c as usize].is_element())
            .filter(|&c| self.nodes[c as usize].is_text())
            .collect();
        for child in leading {
            self.detach(child);
        }

        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return;
        };
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(XmlNode::character_data(NodeKind::Text, text.to_string()));
        match self.get_node(id).and_then(|n| n.first_child) {
            Some(first) => self.insert_before(id, node_id, first),
            None => self.link_last(id, node_id),
        }
    }

    /// Set or replace an attribute, keeping its position when it exists
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let name_id = self.strings.intern(name);
        let Some(node) = self.nodes.get_mut(id as usize) else {
            return;
        };
        match node.attributes.iter_mut().find(|a| a.name_id == name_id) {
            Some(attr) => attr.value = value.to_string(),
            None => node.attributes.push(XmlAttribute {
                name_id,
                value: value.to_string(),
            }),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let name_id = self.strings.lookup(name)?;
        let node = self.nodes.get_mut(id as usize)?;
        let pos = node.attributes.iter().position(|a| a.name_id == name_id)?;
        Some(node.attributes.remove(pos).value)
    }

    /// Serialize to XML text with an XML declaration
    pub fn to_xml(&self) -> String {
        super::writer::write_document(self)
    }
}

fn utf8(bytes: &[u8]) -> Result<String, ParseError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ParseError::new("Invalid UTF-8 in document", e.valid_up_to()))
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d Document,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NamespaceTable;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<smp:sample xmlns:udf="http://genologics.com/ri/userdefined" xmlns:smp="http://genologics.com/ri/sample" uri="http://lims/api/v2/samples/ABC101A1" limsid="ABC101A1">
    <name>P101_1</name>
    <udf:field type="Numeric" name="Conc">12.5</udf:field>
    <udf:field type="String" name="Note">a &amp; b</udf:field>
</smp:sample>"#;

    #[test]
    fn test_parse_sample() {
        let doc = Document::parse_str(SAMPLE).unwrap();
        let root = doc.root();
        assert_eq!(doc.name(root), "smp:sample");
        assert_eq!(doc.local_name(root), "sample");
        assert_eq!(doc.namespace_uri(root), Some("http://genologics.com/ri/sample"));
        assert_eq!(doc.attribute(root, "limsid"), Some("ABC101A1"));
        assert_eq!(doc.element_children(root).count(), 3);
    }

    #[test]
    fn test_find_by_namespace() {
        let table = NamespaceTable::genologics();
        let doc = Document::parse_str(SAMPLE).unwrap();
        let fields = doc.find_children(doc.root(), &table.qualify("udf:field"));
        assert_eq!(fields.len(), 2);
        assert_eq!(doc.text(fields[1]).as_deref(), Some("a & b"));

        let name = doc.find_child(doc.root(), &table.qualify("name")).unwrap();
        assert_eq!(doc.text(name).as_deref(), Some("P101_1"));
    }

    #[test]
    fn test_other_prefix_same_namespace() {
        let table = NamespaceTable::genologics();
        let doc = Document::parse_str(
            r#"<a xmlns:u="http://genologics.com/ri/userdefined"><u:field name="x"/></a>"#,
        )
        .unwrap();
        assert!(doc.find_child(doc.root(), &table.qualify("udf:field")).is_some());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Document::parse_str("<a><b></a>").is_err());
        assert!(Document::parse_str("<a>").is_err());
        assert!(Document::parse_str("<a/><b/>").is_err());
        assert!(Document::parse_str("").is_err());
        assert!(Document::parse_str("text<a/>").is_err());
    }

    #[test]
    fn test_parse_error_positions() {
        let position = |input: &str| Document::parse_str(input).unwrap_err().position;
        assert_eq!(position("<a><b></a>"), 6);
        assert_eq!(position("<a/><b/>"), 4);
        assert_eq!(position("<a/></b>"), 4);
        assert_eq!(position("<a><b/>"), 0);
        assert_eq!(position(" <a/> x"), 5);
    }

    #[test]
    fn test_byte_order_mark() {
        let doc = Document::parse_str("\u{feff}<a/>").unwrap();
        assert_eq!(doc.name(doc.root()), "a");
    }

    #[test]
    fn test_set_text_replaces_leading_text() {
        let mut doc = Document::parse_str("<a>old<b/>tail</a>").unwrap();
        let root = doc.root();
        doc.set_text(root, Some("new"));
        assert_eq!(doc.text(root).as_deref(), Some("new"));
        assert_eq!(doc.children(root).count(), 3);

        doc.set_text(root, None);
        assert_eq!(doc.text(root), None);
    }

    #[test]
    fn test_insert_and_detach() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str("<a><x/><z/></a>").unwrap();
        let root = doc.root();
        let z = doc.find_child(root, &QName::local("z")).unwrap();
        let y = doc.create_element(&table.qualify("y"));
        assert!(!doc.is_attached(y));

        doc.insert_before(root, y, z);
        let names: Vec<_> = doc.element_children(root).map(|c| doc.name(c).to_string()).collect();
        assert_eq!(names, ["x", "y", "z"]);

        doc.detach(y);
        assert!(!doc.is_attached(y));
        assert_eq!(doc.element_children(root).count(), 2);
        assert_eq!(doc.get_node(z).unwrap().prev_sibling.map(|p| doc.name(p)), Some("x"));
    }

    #[test]
    fn test_attributes_keep_order() {
        let mut doc = Document::parse_str(r#"<a one="1" two="2"/>"#).unwrap();
        let root = doc.root();
        doc.set_attribute(root, "one", "uno");
        doc.set_attribute(root, "three", "3");
        let attrs: Vec<_> = doc.attributes(root).collect();
        assert_eq!(attrs, [("one", "uno"), ("two", "2"), ("three", "3")]);
        assert_eq!(doc.remove_attribute(root, "two").as_deref(), Some("2"));
        assert_eq!(doc.attribute(root, "two"), None);
    }

    #[test]
    fn test_new_document_declares_prefix() {
        let table = NamespaceTable::genologics();
        let doc = Document::new(&table.qualify("con:container"));
        let root = doc.root();
        assert_eq!(doc.name(root), "con:container");
        assert_eq!(doc.attribute(root, "xmlns:con"), Some("http://genologics.com/ri/container"));
    }
}
