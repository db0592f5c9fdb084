//! XML Writer
//!
//! Serializes a [`Document`] back to text. Prefixes used by elements but
//! not declared on them or an ancestor get an `xmlns:prefix` declaration
//! on the element that first needs them.

use super::document::{Document, DOCUMENT_NODE};
use super::node::{NodeId, NodeKind};
use crate::core::entities::{escape_attribute, escape_text};

const DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>\n";

struct XmlWriter<'d> {
    doc: &'d Document,
    out: String,
    /// Prefixes declared by the open elements, innermost last
    declared: Vec<&'d str>,
}

pub(crate) fn write_document(doc: &Document) -> String {
    let mut writer = XmlWriter {
        doc,
        out: String::with_capacity(doc.node_count() * 32),
        declared: vec!["xml"],
    };
    writer.out.push_str(DECLARATION);
    for (i, child) in doc.children(DOCUMENT_NODE).enumerate() {
        if i > 0 {
            writer.out.push('\n');
        }
        writer.write_node(child);
    }
    writer.out
}

impl<'d> XmlWriter<'d> {
    fn write_node(&mut self, id: NodeId) {
        let Some(node) = self.doc.get_node(id) else {
            return;
        };
        match node.kind {
            NodeKind::Element => self.write_element(id),
            NodeKind::Text => self.out.push_str(&escape_text(&node.content)),
            NodeKind::CData => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(&node.content);
                self.out.push_str("]]>");
            }
            NodeKind::Comment => {
                self.out.push_str("<!--");
                self.out.push_str(&node.content);
                self.out.push_str("-->");
            }
            NodeKind::ProcessingInstruction => {
                self.out.push_str("<?");
                self.out.push_str(self.doc.name(id));
                if !node.content.is_empty() {
                    self.out.push(' ');
                    self.out.push_str(&node.content);
                }
                self.out.push_str("?>");
            }
            NodeKind::Document => {}
        }
    }

    fn write_element(&mut self, id: NodeId) {
        let doc = self.doc;
        let name = doc.name(id);
        let mark = self.declared.len();

        self.out.push('<');
        self.out.push_str(name);
        for (attr, value) in doc.attributes(id) {
            if attr == "xmlns" {
                self.declared.push("");
            } else if let Some(prefix) = attr.strip_prefix("xmlns:") {
                self.declared.push(prefix);
            }
            self.write_attribute(attr, value);
        }

        if let (Some(prefix), Some(uri)) = (doc.prefix(id), doc.namespace_uri(id)) {
            if !self.declared.contains(&prefix) {
                self.out.push_str(" xmlns:");
                self.out.push_str(prefix);
                self.out.push_str("=\"");
                self.out.push_str(&escape_attribute(uri));
                self.out.push('"');
                self.declared.push(prefix);
            }
        }

        if doc.children(id).next().is_none() {
            self.out.push_str(" />");
        } else {
            self.out.push('>');
            for child in doc.children(id) {
                self.write_node(child);
            }
            self.out.push_str("</");
            self.out.push_str(name);
            self.out.push('>');
        }
        self.declared.truncate(mark);
    }

    fn write_attribute(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&escape_attribute(value));
        self.out.push('"');
    }
}
