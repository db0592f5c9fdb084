//! UDF dictionary
//!
//! UDFs are `udf:field` elements carrying `name` and `type` attributes with
//! the value as text. A UDT groups fields inside one `udf:type` wrapper
//! whose `name` attribute is the group name.

use super::dict::{DictBinding, SyncDict};
use super::resolver::Region;
use super::value::{UdfType, UdfValue};
use crate::dom::NodeId;
use crate::error::{BindError, Result};
use log::debug;

const FIELD: &str = "udf:field";
const GROUP: &str = "udf:type";

/// Layout of UDF fields under a (possibly nested) root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdfBinding {
    nesting: &'static [&'static str],
    udt: bool,
}

impl UdfBinding {
    /// Fields directly under the root
    pub const fn fields(nesting: &'static [&'static str]) -> Self {
        UdfBinding { nesting, udt: false }
    }

    /// Fields inside the root's `udf:type` group
    pub const fn grouped(nesting: &'static [&'static str]) -> Self {
        UdfBinding { nesting, udt: true }
    }

    pub const fn is_udt(&self) -> bool {
        self.udt
    }

    fn group(&self, region: &mut Region<'_>) -> Option<NodeId> {
        let root = region.resolve(self.nesting);
        region.child(root, GROUP)
    }

    fn declared_type(region: &Region<'_>, node: NodeId) -> Result<UdfType> {
        region.require_attribute(node, "type")?.parse()
    }
}

impl DictBinding for UdfBinding {
    type Value = UdfValue;

    fn elements(&self, region: &mut Region<'_>) -> Result<Vec<NodeId>> {
        if self.udt {
            return Ok(match self.group(region) {
                Some(group) => region.children(group, FIELD),
                None => Vec::new(),
            });
        }
        let root = region.resolve(self.nesting);
        Ok(region.children(root, FIELD))
    }

    fn key(&self, region: &Region<'_>, node: NodeId) -> Option<String> {
        region.doc.attribute(node, "name").map(str::to_string)
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<(String, UdfValue)> {
        let name = region.require_attribute(node, "name")?;
        let ty = Self::declared_type(region, node)?;
        let value = UdfValue::decode(ty, region.text(node).as_deref())?;
        Ok((name, value))
    }

    fn write(
        &self,
        region: &mut Region<'_>,
        existing: Option<NodeId>,
        key: &str,
        value: &UdfValue,
    ) -> Result<()> {
        if let Some(node) = existing {
            let ty = Self::declared_type(region, node)?;
            let text = value.encode(ty, key)?;
            region.doc.set_text(node, text.as_deref());
            return Ok(());
        }

        let ty = value.infer_type()?;
        let text = value.encode(ty, key)?;
        let parent = if self.udt {
            self.group(region).ok_or_else(|| {
                BindError::Structural(format!("no UDT group element to hold field '{}'", key))
            })?
        } else {
            region.resolve(self.nesting)
        };
        let field = region.append(parent, FIELD);
        region.doc.set_attribute(field, "type", ty.as_str());
        region.doc.set_attribute(field, "name", key);
        region.doc.set_text(field, text.as_deref());
        debug!("added {} UDF '{}'", ty, key);
        Ok(())
    }
}

/// Dictionary of UDF values, optionally within a UDT
pub type UdfDictionary<'e> = SyncDict<'e, UdfBinding>;

impl<'e> SyncDict<'e, UdfBinding> {
    /// Group name of a UDT dictionary; `None` for plain UDFs or a missing group
    pub fn udt(&mut self) -> Option<String> {
        if !self.binding.is_udt() {
            return None;
        }
        let group = self.binding.group(&mut self.region)?;
        self.region.doc.attribute(group, "name").map(str::to_string)
    }

    /// Rename the UDT group. Only an existing group element can be renamed.
    pub fn set_udt(&mut self, name: &str) -> Result<()> {
        if !self.binding.is_udt() {
            return Err(BindError::Structural(
                "cannot set a group name on a UDF dictionary".to_string(),
            ));
        }
        let group = self
            .binding
            .group(&mut self.region)
            .ok_or_else(|| BindError::Structural(format!("no UDT group element to rename to '{}'", name)))?;
        self.region.doc.set_attribute(group, "name", name);
        Ok(())
    }
}
