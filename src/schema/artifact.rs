use super::{Schema, UDF};
use crate::binding::{
    BooleanDescriptor, EntityDescriptor, EntityList, EntityListDescriptor, LocationDescriptor, ReagentLabelList,
    ReagentLabelListDescriptor, StringDescriptor, UdfDictionaryDescriptor,
};
use crate::entity::EntityKind;

/// A sample, analyte or result file produced by a process
pub struct Artifact;

impl Schema for Artifact {
    const KIND: EntityKind = EntityKind::Artifact;
}

impl Artifact {
    pub const NAME: StringDescriptor = StringDescriptor::new("name");
    pub const TYPE: StringDescriptor = StringDescriptor::new("type");
    pub const OUTPUT_TYPE: StringDescriptor = StringDescriptor::new("output-type");
    pub const PARENT_PROCESS: EntityDescriptor = EntityDescriptor::new("parent-process", EntityKind::Process);
    pub const VOLUME: StringDescriptor = StringDescriptor::new("volume");
    pub const CONCENTRATION: StringDescriptor = StringDescriptor::new("concentration");
    pub const QC_FLAG: StringDescriptor = StringDescriptor::new("qc-flag");
    pub const LOCATION: LocationDescriptor = LocationDescriptor::new("location");
    pub const WORKING_FLAG: BooleanDescriptor = BooleanDescriptor::new("working-flag");
    pub const SAMPLES: EntityListDescriptor = EntityListDescriptor::new(EntityList::new("sample", EntityKind::Sample));
    pub const REAGENT_LABELS: ReagentLabelListDescriptor = ReagentLabelListDescriptor::new(ReagentLabelList);
    pub const UDF: UdfDictionaryDescriptor = UDF;
}
