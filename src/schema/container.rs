use super::{Schema, UDF};
use crate::binding::{
    DimensionDescriptor, EntityDescriptor, IntegerDescriptor, PlacementBinding, PlacementDictionaryDescriptor,
    StringAttributeDescriptor, StringDescriptor, StringListDescriptor, TextList, UdfDictionaryDescriptor,
};
use crate::entity::EntityKind;

/// A plate or tube holding artifacts
pub struct Container;

impl Schema for Container {
    const KIND: EntityKind = EntityKind::Container;
}

impl Container {
    pub const NAME: StringDescriptor = StringDescriptor::new("name");
    pub const TYPE: EntityDescriptor = EntityDescriptor::new("type", EntityKind::ContainerType);
    pub const OCCUPIED_WELLS: IntegerDescriptor = IntegerDescriptor::new("occupied-wells");
    pub const PLACEMENTS: PlacementDictionaryDescriptor =
        PlacementDictionaryDescriptor::new(PlacementBinding::new("placement"));
    pub const STATE: StringDescriptor = StringDescriptor::new("state");
    pub const UDF: UdfDictionaryDescriptor = UDF;
}

/// Well layout of a kind of container
pub struct ContainerType;

impl Schema for ContainerType {
    const KIND: EntityKind = EntityKind::ContainerType;
}

impl ContainerType {
    pub const NAME: StringAttributeDescriptor = StringAttributeDescriptor::new("name");
    pub const CALIBRANT_WELLS: StringListDescriptor = StringListDescriptor::new(TextList::new("calibrant-well"));
    pub const UNAVAILABLE_WELLS: StringListDescriptor = StringListDescriptor::new(TextList::new("unavailable-well"));
    pub const X_DIMENSION: DimensionDescriptor = DimensionDescriptor::new("x-dimension");
    pub const Y_DIMENSION: DimensionDescriptor = DimensionDescriptor::new("y-dimension");
}
