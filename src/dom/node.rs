//! XML Node representation
//!
//! Uses NodeId (u32) for compact node references into the document arena.
//! Nodes are never freed: a detached node keeps its id and its subtree but
//! is no longer reachable from the document root.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    Element,
    Text,
    CData,
    Comment,
    ProcessingInstruction,
}

/// An XML node in the arena
#[derive(Debug, Clone)]
pub struct XmlNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Pool id of the qualified name (elements) or PI target
    pub name_id: u32,
    /// Pool id of the resolved namespace URI, or 0
    pub namespace_id: u32,
    /// Element attributes in document order
    pub attributes: Vec<XmlAttribute>,
    /// Content of text, CDATA, comment and PI nodes
    pub content: String,
}

impl XmlNode {
    fn with_kind(kind: NodeKind) -> Self {
        XmlNode {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id: 0,
            namespace_id: 0,
            attributes: Vec::new(),
            content: String::new(),
        }
    }

    pub fn document() -> Self {
        Self::with_kind(NodeKind::Document)
    }

    pub fn element(name_id: u32, namespace_id: u32) -> Self {
        XmlNode {
            name_id,
            namespace_id,
            ..Self::with_kind(NodeKind::Element)
        }
    }

    /// Text-bearing node (text, CDATA, comment)
    pub fn character_data(kind: NodeKind, content: String) -> Self {
        XmlNode {
            content,
            ..Self::with_kind(kind)
        }
    }

    pub fn processing_instruction(target_id: u32, data: String) -> Self {
        XmlNode {
            name_id: target_id,
            content: data,
            ..Self::with_kind(NodeKind::ProcessingInstruction)
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Text or CDATA, the kinds that contribute to element text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }
}

/// Stored attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Pool id of the attribute name
    pub name_id: u32,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let doc = XmlNode::document();
        assert_eq!(doc.kind, NodeKind::Document);
        assert!(doc.parent.is_none());
    }

    #[test]
    fn test_element_node() {
        let elem = XmlNode::element(3, 1);
        assert!(elem.is_element());
        assert_eq!(elem.name_id, 3);
        assert_eq!(elem.namespace_id, 1);
        assert!(elem.attributes.is_empty());
    }

    #[test]
    fn test_cdata_counts_as_text() {
        let node = XmlNode::character_data(NodeKind::CData, "x".into());
        assert!(node.is_text());
        assert!(!XmlNode::character_data(NodeKind::Comment, "x".into()).is_text());
    }
}
