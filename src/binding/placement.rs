//! Placement dictionary
//!
//! Maps well coordinates such as `A:1` to the artifact placed there. Each
//! entry is a `placement` element with `uri` and `limsid` attributes and a
//! nested `value` element holding the coordinate.

use super::dict::{DictBinding, SyncDict};
use super::resolver::Region;
use crate::dom::NodeId;
use crate::entity::{EntityKind, EntityRef};
use crate::error::{BindError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementBinding {
    tag: &'static str,
    nesting: &'static [&'static str],
}

impl PlacementBinding {
    pub const fn new(tag: &'static str) -> Self {
        PlacementBinding { tag, nesting: &[] }
    }

    pub const fn nested(self, nesting: &'static [&'static str]) -> Self {
        PlacementBinding { nesting, ..self }
    }
}

pub type PlacementDictionary<'e> = SyncDict<'e, PlacementBinding>;

impl DictBinding for PlacementBinding {
    type Value = EntityRef;

    fn elements(&self, region: &mut Region<'_>) -> Result<Vec<NodeId>> {
        let root = region.resolve(self.nesting);
        Ok(region.children(root, self.tag))
    }

    fn key(&self, region: &Region<'_>, node: NodeId) -> Option<String> {
        region.child(node, "value").and_then(|value| region.text(value))
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<(String, EntityRef)> {
        let key = self.key(region, node).ok_or_else(|| BindError::MissingElement {
            parent: self.tag.to_string(),
            tag: "value".to_string(),
        })?;
        let uri = region.require_attribute(node, "uri")?;
        Ok((key, EntityRef::new(EntityKind::Artifact, uri)))
    }

    fn write(
        &self,
        region: &mut Region<'_>,
        existing: Option<NodeId>,
        key: &str,
        value: &EntityRef,
    ) -> Result<()> {
        if value.kind() != EntityKind::Artifact {
            return Err(BindError::mismatch(key, "artifact", value.kind().as_str()));
        }
        let node = match existing {
            Some(node) => node,
            None => {
                let root = region.resolve(self.nesting);
                let node = region.append(root, self.tag);
                let coordinate = region.append(node, "value");
                region.doc.set_text(coordinate, Some(key));
                node
            }
        };
        region.doc.set_attribute(node, "uri", value.uri());
        region.doc.set_attribute(node, "limsid", value.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NamespaceTable};

    const CONTAINER: &str = r#"<con:container xmlns:con="http://genologics.com/ri/container">
    <name>Plate1</name>
    <placement uri="http://lims/api/v2/artifacts/A1-PA1" limsid="A1-PA1"><value>A:1</value></placement>
    <placement uri="http://lims/api/v2/artifacts/B1-PA1" limsid="B1-PA1"><value>B:1</value></placement>
</con:container>"#;

    fn artifact(id: &str) -> EntityRef {
        EntityRef::new(EntityKind::Artifact, format!("http://lims/api/v2/artifacts/{}", id))
    }

    #[test]
    fn test_decode_placements() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str(CONTAINER).unwrap();
        let placements = SyncDict::open(Region::new(&mut doc, &table), PlacementBinding::new("placement")).unwrap();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements.get("B:1").map(EntityRef::id), Some("B1-PA1"));
    }

    #[test]
    fn test_set_new_and_existing() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str(CONTAINER).unwrap();
        {
            let mut placements =
                SyncDict::open(Region::new(&mut doc, &table), PlacementBinding::new("placement")).unwrap();
            placements.set("C:1", artifact("C1-PA1")).unwrap();
            placements.set("A:1", artifact("X-PA1")).unwrap();
            assert_eq!(placements.len(), 3);
        }
        let nodes = doc.find_children(doc.root(), &table.qualify("placement"));
        assert_eq!(nodes.len(), 3);
        assert_eq!(doc.attribute(nodes[0], "limsid"), Some("X-PA1"));
        let value = doc.find_child(nodes[2], &table.qualify("value")).unwrap();
        assert_eq!(doc.text(value).as_deref(), Some("C:1"));
    }

    #[test]
    fn test_rejects_non_artifact() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str(CONTAINER).unwrap();
        let mut placements =
            SyncDict::open(Region::new(&mut doc, &table), PlacementBinding::new("placement")).unwrap();
        let sample = EntityRef::new(EntityKind::Sample, "http://lims/api/v2/samples/S1");
        assert!(matches!(placements.set("D:1", sample), Err(BindError::TypeMismatch { .. })));
    }

    #[test]
    fn test_missing_coordinate() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str(r#"<c><placement uri="u"/></c>"#).unwrap();
        let result = SyncDict::open(Region::new(&mut doc, &table), PlacementBinding::new("placement"));
        assert!(matches!(result, Err(BindError::MissingElement { .. })));
    }
}
