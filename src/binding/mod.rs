//! Bindings between typed values and entity documents
//!
//! - [`resolver`]: locate or create the sub-root a binding works under
//! - [`scalar`]: descriptors for single tags and attributes
//! - [`dict`] / [`list`]: synchronized proxies writing through on mutation
//! - the proxy kinds: UDF, placement and sub-tag dictionaries; text,
//!   attribute, reagent-label, entity, input/output-map and output-placement
//!   lists
//! - [`collection`]: descriptors opening a fresh proxy per access

pub mod collection;
pub mod dict;
pub mod iomap;
pub mod list;
pub mod lists;
pub mod output_placement;
pub mod placement;
pub mod resolver;
pub mod scalar;
pub mod subtag;
pub mod udf;
pub mod value;

pub use collection::{DictDescriptor, ListDescriptor, UdfDictionaryDescriptor};
pub use dict::{DictBinding, SyncDict};
pub use iomap::{InputOutputMap, InputOutputMapList, IoRecord, XmlInputOutputMapList};
pub use list::{ListBinding, ListEncode, SyncList};
pub use lists::{
    AttributeList, EntityList, ReagentLabelList, TextList, XmlAttributeList, XmlEntityList, XmlReagentLabelList,
    XmlTextList,
};
pub use output_placement::{OutputPlacement, OutputPlacementList, XmlOutputPlacementList};
pub use placement::{PlacementBinding, PlacementDictionary};
pub use resolver::{Region, RootResolver};
pub use scalar::{
    BooleanDescriptor, Dimension, DimensionDescriptor, EntityDescriptor, ExternalId, ExternalIdListDescriptor,
    IntegerAttributeDescriptor, IntegerDescriptor, Location, LocationDescriptor, StringAttributeDescriptor,
    StringDescriptor,
};
pub use subtag::{SubTagBinding, SubTagDictionary};
pub use udf::{UdfBinding, UdfDictionary};
pub use value::{UdfType, UdfValue};

/// Descriptor of a container's placement dictionary
pub type PlacementDictionaryDescriptor = DictDescriptor<PlacementBinding>;
/// Descriptor of an element-text list
pub type StringListDescriptor = ListDescriptor<TextList>;
pub type AttributeListDescriptor = ListDescriptor<AttributeList>;
pub type ReagentLabelListDescriptor = ListDescriptor<ReagentLabelList>;
pub type EntityListDescriptor = ListDescriptor<EntityList>;
/// Get-only: the binding cannot encode
pub type InputOutputMapDescriptor = ListDescriptor<InputOutputMapList>;
pub type OutputPlacementListDescriptor = ListDescriptor<OutputPlacementList>;
/// Descriptor of a sub-tag dictionary
pub type StringDictionaryDescriptor = DictDescriptor<SubTagBinding>;
