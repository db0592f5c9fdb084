//! Output placements of a step
//!
//! Each `output-placement` element under `output-placements` binds an
//! artifact to an optional location: a container reference plus a
//! coordinate such as `1:1`.

use super::list::{ListBinding, ListEncode, SyncList};
use super::resolver::Region;
use super::scalar::Location;
use crate::dom::NodeId;
use crate::entity::{EntityKind, EntityRef};
use crate::error::{BindError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlacement {
    pub artifact: EntityRef,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputPlacementList;

pub type XmlOutputPlacementList<'e> = SyncList<'e, OutputPlacementList>;

const TAG: &str = "output-placement";

impl ListBinding for OutputPlacementList {
    type Item = OutputPlacement;

    fn tag(&self) -> &str {
        TAG
    }

    fn nesting(&self) -> &[&str] {
        &["output-placements"]
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<OutputPlacement> {
        let uri = region.require_attribute(node, "uri")?;
        let location = region
            .child(node, "location")
            .map(|loc| Location::decode(region, loc))
            .transpose()?;
        Ok(OutputPlacement {
            artifact: EntityRef::new(EntityKind::Artifact, uri),
            location,
        })
    }
}

impl ListEncode for OutputPlacementList {
    fn encode(&self, region: &mut Region<'_>, item: &OutputPlacement) -> Result<NodeId> {
        if item.artifact.kind() != EntityKind::Artifact {
            return Err(BindError::mismatch(TAG, "artifact", item.artifact.kind().as_str()));
        }
        let node = region.create(TAG);
        region.doc.set_attribute(node, "uri", item.artifact.uri());
        if let Some(location) = &item.location {
            if location.container.kind() != EntityKind::Container {
                return Err(BindError::mismatch("location", "container", location.container.kind().as_str()));
            }
            let loc = region.append(node, "location");
            let container = region.append(loc, "container");
            region.doc.set_attribute(container, "uri", location.container.uri());
            region.doc.set_attribute(container, "limsid", location.container.id());
            let value = region.append(loc, "value");
            region.doc.set_text(value, location.value.as_deref());
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NamespaceTable};

    const PLACEMENTS: &str = r#"<stp:placements xmlns:stp="http://genologics.com/ri/step">
    <output-placements>
        <output-placement uri="http://lims/api/v2/artifacts/92-1">
            <location>
                <container uri="http://lims/api/v2/containers/27-5" limsid="27-5"/>
                <value>1:1</value>
            </location>
        </output-placement>
        <output-placement uri="http://lims/api/v2/artifacts/92-2"/>
    </output-placements>
</stp:placements>"#;

    fn placement(artifact: &str, container: &str, well: &str) -> OutputPlacement {
        OutputPlacement {
            artifact: EntityRef::new(EntityKind::Artifact, format!("http://lims/api/v2/artifacts/{}", artifact)),
            location: Some(Location {
                container: EntityRef::new(EntityKind::Container, format!("http://lims/api/v2/containers/{}", container)),
                value: Some(well.to_string()),
            }),
        }
    }

    #[test]
    fn test_decode() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str(PLACEMENTS).unwrap();
        let list = SyncList::open(Region::new(&mut doc, &table), OutputPlacementList).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0), Some(&placement("92-1", "27-5", "1:1")));
        assert_eq!(list.get(1).unwrap().location, None);
    }

    #[test]
    fn test_append_writes_location() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str("<stp:placements xmlns:stp=\"http://genologics.com/ri/step\"/>").unwrap();
        {
            let mut list = SyncList::open(Region::new(&mut doc, &table), OutputPlacementList).unwrap();
            list.append(placement("92-3", "27-6", "B:2")).unwrap();
        }
        let reread = SyncList::open(Region::new(&mut doc, &table), OutputPlacementList).unwrap();
        assert_eq!(reread.to_vec(), [placement("92-3", "27-6", "B:2")]);
        drop(reread);
        assert!(doc.to_xml().contains(r#"<container uri="http://lims/api/v2/containers/27-6" limsid="27-6" />"#));
    }

    #[test]
    fn test_wrong_container_kind() {
        let table = NamespaceTable::genologics();
        let mut doc = Document::parse_str(PLACEMENTS).unwrap();
        let mut list = SyncList::open(Region::new(&mut doc, &table), OutputPlacementList).unwrap();
        let mut bad = placement("92-4", "27-7", "C:3");
        if let Some(location) = bad.location.as_mut() {
            location.container = EntityRef::new(EntityKind::Sample, "http://lims/api/v2/samples/S1");
        }
        assert!(matches!(list.append(bad), Err(BindError::TypeMismatch { .. })));
        assert_eq!(list.len(), 2);
    }
}
