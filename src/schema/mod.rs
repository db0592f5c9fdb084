//! Entity schemas
//!
//! One type per entity kind, listing the descriptors bound to its document
//! as associated constants:
//!
//! ```ignore
//! let name = Sample::NAME.get(&mut sample)?;
//! Sample::UDF.get(&mut sample)?.set("Concentration", 12.5)?;
//! ```

mod artifact;
mod container;
mod process;
mod sample;

pub use artifact::Artifact;
pub use container::{Container, ContainerType};
pub use process::{Process, ProcessType, Stage, StepPlacements};
pub use sample::{Lab, Project, Researcher, Sample};

use crate::binding::{ExternalIdListDescriptor, UdfDictionaryDescriptor};
use crate::entity::{Entity, EntityKind, EntityStore};
use std::rc::Rc;

/// Descriptors shared by every schema type
pub trait Schema {
    const KIND: EntityKind;

    /// Unloaded entity served by `store`
    fn load(uri: impl Into<String>, store: Rc<dyn EntityStore>) -> Entity {
        Entity::new(Self::KIND, uri, store)
    }

    /// New local entity with an empty document
    fn create(uri: impl Into<String>) -> Entity {
        Entity::create(Self::KIND, uri)
    }
}

const UDF: UdfDictionaryDescriptor = UdfDictionaryDescriptor::udf();
const UDT: UdfDictionaryDescriptor = UdfDictionaryDescriptor::udt();
const EXTERNAL_IDS: ExternalIdListDescriptor = ExternalIdListDescriptor::new();
