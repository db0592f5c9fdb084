//! Sub-tag dictionary
//!
//! Flattens the children of one element into `child tag -> child text`
//! pairs, e.g. the lines of an address block.

use super::dict::{DictBinding, SyncDict};
use super::resolver::Region;
use crate::dom::NodeId;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubTagBinding {
    tag: &'static str,
}

impl SubTagBinding {
    pub const fn new(tag: &'static str) -> Self {
        SubTagBinding { tag }
    }
}

pub type SubTagDictionary<'e> = SyncDict<'e, SubTagBinding>;

impl DictBinding for SubTagBinding {
    type Value = Option<String>;

    fn elements(&self, region: &mut Region<'_>) -> Result<Vec<NodeId>> {
        let root = region.doc.root();
        Ok(match region.child(root, self.tag) {
            Some(parent) => region.doc.element_children(parent).collect(),
            None => Vec::new(),
        })
    }

    fn key(&self, region: &Region<'_>, node: NodeId) -> Option<String> {
        Some(region.doc.name(node).to_string())
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<(String, Option<String>)> {
        Ok((region.doc.name(node).to_string(), region.text(node)))
    }

    fn write(
        &self,
        region: &mut Region<'_>,
        existing: Option<NodeId>,
        key: &str,
        value: &Option<String>,
    ) -> Result<()> {
        let node = match existing {
            Some(node) => node,
            None => {
                let root = region.doc.root();
                let parent = region.child_or_append(root, self.tag);
                region.append(parent, key)
            }
        };
        region.doc.set_text(node, value.as_deref());
        Ok(())
    }
}
