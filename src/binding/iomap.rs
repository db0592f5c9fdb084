//! Input/output maps of a process
//!
//! Read-only: the binding implements decoding only, so the list it opens
//! has no mutating operations. Missing `input` or `output` branches decode
//! to `None` rather than failing.

use super::list::{ListBinding, SyncList};
use super::resolver::Region;
use crate::dom::NodeId;
use crate::entity::{EntityKind, EntityRef};
use crate::error::Result;

/// One side of an input/output pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoRecord {
    pub limsid: Option<String>,
    pub output_type: Option<String>,
    pub output_generation_type: Option<String>,
    pub uri: Option<EntityRef>,
    pub post_process_uri: Option<EntityRef>,
    pub parent_process: Option<EntityRef>,
}

impl IoRecord {
    fn decode(region: &Region<'_>, node: NodeId) -> IoRecord {
        let doc = &*region.doc;
        let text = |name: &str| doc.attribute(node, name).map(str::to_string);
        let artifact = |name: &str| doc.attribute(node, name).map(|uri| EntityRef::new(EntityKind::Artifact, uri));
        IoRecord {
            limsid: text("limsid"),
            output_type: text("output-type"),
            output_generation_type: text("output-generation-type"),
            uri: artifact("uri"),
            post_process_uri: artifact("post-process-uri"),
            parent_process: region
                .child(node, "parent-process")
                .and_then(|parent| doc.attribute(parent, "uri"))
                .map(|uri| EntityRef::new(EntityKind::Process, uri)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOutputMap {
    pub input: Option<IoRecord>,
    pub output: Option<IoRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutputMapList;

pub type XmlInputOutputMapList<'e> = SyncList<'e, InputOutputMapList>;

impl ListBinding for InputOutputMapList {
    type Item = InputOutputMap;

    fn tag(&self) -> &str {
        "input-output-map"
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<InputOutputMap> {
        let branch = |tag: &str| region.child(node, tag).map(|n| IoRecord::decode(region, n));
        Ok(InputOutputMap {
            input: branch("input"),
            output: branch("output"),
        })
    }
}
