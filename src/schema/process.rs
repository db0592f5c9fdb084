use super::{Schema, UDF, UDT};
use crate::binding::{
    AttributeList, AttributeListDescriptor, EntityDescriptor, EntityList, EntityListDescriptor,
    InputOutputMapDescriptor, InputOutputMapList, IntegerAttributeDescriptor, OutputPlacementList,
    OutputPlacementListDescriptor, StringAttributeDescriptor, StringDescriptor, UdfDictionaryDescriptor,
};
use crate::entity::EntityKind;

/// A process run on a set of input artifacts
pub struct Process;

impl Schema for Process {
    const KIND: EntityKind = EntityKind::Process;
}

impl Process {
    pub const TYPE: EntityDescriptor = EntityDescriptor::new("type", EntityKind::ProcessType);
    pub const DATE_RUN: StringDescriptor = StringDescriptor::new("date-run");
    pub const TECHNICIAN: EntityDescriptor = EntityDescriptor::new("technician", EntityKind::Researcher);
    pub const PROTOCOL_NAME: StringDescriptor = StringDescriptor::new("protocol-name");
    pub const INPUT_OUTPUT_MAPS: InputOutputMapDescriptor = InputOutputMapDescriptor::new(InputOutputMapList);
    pub const UDF: UdfDictionaryDescriptor = UDF;
    pub const UDT: UdfDictionaryDescriptor = UDT;
}

pub struct ProcessType;

impl Schema for ProcessType {
    const KIND: EntityKind = EntityKind::ProcessType;
}

impl ProcessType {
    pub const NAME: StringAttributeDescriptor = StringAttributeDescriptor::new("name");
    pub const PROCESS_OUTPUTS: AttributeListDescriptor =
        AttributeListDescriptor::new(AttributeList::new("process-output"));
    pub const PARAMETERS: AttributeListDescriptor = AttributeListDescriptor::new(AttributeList::new("parameter"));
}

/// A workflow stage
pub struct Stage;

impl Schema for Stage {
    const KIND: EntityKind = EntityKind::Stage;
}

impl Stage {
    pub const NAME: StringAttributeDescriptor = StringAttributeDescriptor::new("name");
    pub const INDEX: IntegerAttributeDescriptor = IntegerAttributeDescriptor::new("index");
}

/// Placement of a step's outputs into containers
pub struct StepPlacements;

impl Schema for StepPlacements {
    const KIND: EntityKind = EntityKind::StepPlacements;
}

impl StepPlacements {
    pub const SELECTED_CONTAINERS: EntityListDescriptor =
        EntityListDescriptor::new(EntityList::new("container", EntityKind::Container).nested(&["selected-containers"]));
    pub const PLACEMENTS: OutputPlacementListDescriptor = OutputPlacementListDescriptor::new(OutputPlacementList);
}
