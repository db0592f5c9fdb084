use super::{Schema, EXTERNAL_IDS, UDF, UDT};
use crate::binding::{
    EntityDescriptor, ExternalIdListDescriptor, StringAttributeDescriptor, StringDescriptor,
    StringDictionaryDescriptor, SubTagBinding, UdfDictionaryDescriptor,
};
use crate::entity::EntityKind;

/// A submitted sample
pub struct Sample;

impl Schema for Sample {
    const KIND: EntityKind = EntityKind::Sample;
}

impl Sample {
    pub const NAME: StringDescriptor = StringDescriptor::new("name");
    pub const DATE_RECEIVED: StringDescriptor = StringDescriptor::new("date-received");
    pub const DATE_COMPLETED: StringDescriptor = StringDescriptor::new("date-completed");
    pub const PROJECT: EntityDescriptor = EntityDescriptor::new("project", EntityKind::Project);
    pub const SUBMITTER: EntityDescriptor = EntityDescriptor::new("submitter", EntityKind::Researcher);
    pub const ARTIFACT: EntityDescriptor = EntityDescriptor::new("artifact", EntityKind::Artifact);
    pub const UDF: UdfDictionaryDescriptor = UDF;
    pub const EXTERNAL_IDS: ExternalIdListDescriptor = EXTERNAL_IDS;
}

pub struct Project;

impl Schema for Project {
    const KIND: EntityKind = EntityKind::Project;
}

impl Project {
    pub const NAME: StringDescriptor = StringDescriptor::new("name");
    pub const OPEN_DATE: StringDescriptor = StringDescriptor::new("open-date");
    pub const CLOSE_DATE: StringDescriptor = StringDescriptor::new("close-date");
    pub const INVOICE_DATE: StringDescriptor = StringDescriptor::new("invoice-date");
    pub const RESEARCHER: EntityDescriptor = EntityDescriptor::new("researcher", EntityKind::Researcher);
    pub const UDF: UdfDictionaryDescriptor = UDF;
    pub const UDT: UdfDictionaryDescriptor = UDT;
    pub const EXTERNAL_IDS: ExternalIdListDescriptor = EXTERNAL_IDS;
}

/// A LIMS user
pub struct Researcher;

impl Schema for Researcher {
    const KIND: EntityKind = EntityKind::Researcher;
}

impl Researcher {
    pub const FIRST_NAME: StringDescriptor = StringDescriptor::new("first-name");
    pub const LAST_NAME: StringDescriptor = StringDescriptor::new("last-name");
    pub const PHONE: StringDescriptor = StringDescriptor::new("phone");
    pub const EMAIL: StringDescriptor = StringDescriptor::new("email");
    pub const INITIALS: StringDescriptor = StringDescriptor::new("initials");
    pub const LAB: EntityDescriptor = EntityDescriptor::new("lab", EntityKind::Lab);
    pub const USERNAME: StringDescriptor = StringDescriptor::new("username").nested(&["credentials"]);
    pub const UDF: UdfDictionaryDescriptor = UDF;
    pub const EXTERNAL_IDS: ExternalIdListDescriptor = EXTERNAL_IDS;
}

pub struct Lab;

impl Schema for Lab {
    const KIND: EntityKind = EntityKind::Lab;
}

impl Lab {
    pub const NAME: StringDescriptor = StringDescriptor::new("name");
    pub const WEBSITE: StringDescriptor = StringDescriptor::new("website");
    pub const BILLING_ADDRESS: StringDictionaryDescriptor =
        StringDictionaryDescriptor::new(SubTagBinding::new("billing-address"));
    pub const SHIPPING_ADDRESS: StringDictionaryDescriptor =
        StringDictionaryDescriptor::new(SubTagBinding::new("shipping-address"));
    pub const URI: StringAttributeDescriptor = StringAttributeDescriptor::new("uri");
    pub const UDF: UdfDictionaryDescriptor = UDF;
    pub const EXTERNAL_IDS: ExternalIdListDescriptor = EXTERNAL_IDS;
}
