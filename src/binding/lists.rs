//! Writable list kinds: text, attribute maps, reagent labels and entity
//! references.

use super::list::{ListBinding, ListEncode, SyncList};
use super::resolver::Region;
use crate::dom::NodeId;
use crate::entity::{EntityKind, EntityRef};
use crate::error::{BindError, Result};
use indexmap::IndexMap;

/// Element text as the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextList {
    tag: &'static str,
    nesting: &'static [&'static str],
}

impl TextList {
    pub const fn new(tag: &'static str) -> Self {
        TextList { tag, nesting: &[] }
    }

    pub const fn nested(self, nesting: &'static [&'static str]) -> Self {
        TextList { nesting, ..self }
    }
}

pub type XmlTextList<'e> = SyncList<'e, TextList>;

impl ListBinding for TextList {
    type Item = String;

    fn tag(&self) -> &str {
        self.tag
    }

    fn nesting(&self) -> &[&str] {
        self.nesting
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<String> {
        Ok(region.text(node).unwrap_or_default())
    }
}

impl ListEncode for TextList {
    fn encode(&self, region: &mut Region<'_>, item: &String) -> Result<NodeId> {
        let node = region.create(self.tag);
        region.doc.set_text(node, Some(item));
        Ok(node)
    }
}

/// Each element's attributes as a map. The decoded maps are copies;
/// changing one writes nothing until it is assigned back through the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeList {
    tag: &'static str,
    nesting: &'static [&'static str],
}

impl AttributeList {
    pub const fn new(tag: &'static str) -> Self {
        AttributeList { tag, nesting: &[] }
    }

    pub const fn nested(self, nesting: &'static [&'static str]) -> Self {
        AttributeList { nesting, ..self }
    }
}

pub type XmlAttributeList<'e> = SyncList<'e, AttributeList>;

impl ListBinding for AttributeList {
    type Item = IndexMap<String, String>;

    fn tag(&self) -> &str {
        self.tag
    }

    fn nesting(&self) -> &[&str] {
        self.nesting
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<Self::Item> {
        Ok(region
            .doc
            .attributes(node)
            .filter(|(name, _)| *name != "xmlns" && !name.starts_with("xmlns:"))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

impl ListEncode for AttributeList {
    fn encode(&self, region: &mut Region<'_>, item: &Self::Item) -> Result<NodeId> {
        let node = region.create(self.tag);
        for (name, value) in item {
            region.doc.set_attribute(node, name, value);
        }
        Ok(node)
    }
}

/// `reagent-label` elements exposed by their `name` attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReagentLabelList;

pub type XmlReagentLabelList<'e> = SyncList<'e, ReagentLabelList>;

impl ListBinding for ReagentLabelList {
    type Item = String;

    fn tag(&self) -> &str {
        "reagent-label"
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<String> {
        region.require_attribute(node, "name")
    }
}

impl ListEncode for ReagentLabelList {
    fn encode(&self, region: &mut Region<'_>, item: &String) -> Result<NodeId> {
        let node = region.create("reagent-label");
        region.doc.set_attribute(node, "name", item);
        Ok(node)
    }
}

/// Elements referencing entities of one kind through their `uri` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityList {
    tag: &'static str,
    kind: EntityKind,
    nesting: &'static [&'static str],
}

impl EntityList {
    pub const fn new(tag: &'static str, kind: EntityKind) -> Self {
        EntityList { tag, kind, nesting: &[] }
    }

    pub const fn nested(self, nesting: &'static [&'static str]) -> Self {
        EntityList { nesting, ..self }
    }
}

pub type XmlEntityList<'e> = SyncList<'e, EntityList>;

impl ListBinding for EntityList {
    type Item = EntityRef;

    fn tag(&self) -> &str {
        self.tag
    }

    fn nesting(&self) -> &[&str] {
        self.nesting
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<EntityRef> {
        let uri = region.require_attribute(node, "uri")?;
        Ok(EntityRef::new(self.kind, uri))
    }
}

impl ListEncode for EntityList {
    fn encode(&self, region: &mut Region<'_>, item: &EntityRef) -> Result<NodeId> {
        if item.kind() != self.kind {
            return Err(BindError::mismatch(self.tag, self.kind.as_str(), item.kind().as_str()));
        }
        let node = region.create(self.tag);
        region.doc.set_attribute(node, "uri", item.uri());
        Ok(node)
    }
}
