//! Collection descriptors
//!
//! A collection descriptor refreshes the entity and opens a brand-new proxy
//! on every `get`. Assignment through `set` replaces the whole collection:
//! existing backing elements are cleared before the new contents are
//! written.

use super::dict::{DictBinding, SyncDict};
use super::list::{ListBinding, ListEncode, SyncList};
use super::udf::UdfBinding;
use crate::entity::Entity;
use crate::error::Result;
use log::debug;

/// Descriptor opening a [`SyncList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDescriptor<B> {
    binding: B,
}

impl<B: ListBinding + Clone> ListDescriptor<B> {
    pub const fn new(binding: B) -> Self {
        ListDescriptor { binding }
    }

    pub fn get<'e>(&self, entity: &'e mut Entity) -> Result<SyncList<'e, B>> {
        entity.refresh()?;
        SyncList::open(entity.region()?, self.binding.clone())
    }
}

impl<B: ListEncode + Clone> ListDescriptor<B> {
    /// Replace the list's contents with `items`
    pub fn set<I: IntoIterator<Item = B::Item>>(&self, entity: &mut Entity, items: I) -> Result<()> {
        let uri = entity.uri().to_string();
        let mut list = self.get(entity)?;
        list.clear();
        list.extend(items)?;
        debug!("replaced <{}> list of {} with {} items", self.binding.tag(), uri, list.len());
        Ok(())
    }
}

/// Descriptor opening a [`SyncDict`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictDescriptor<B> {
    binding: B,
}

impl<B: DictBinding + Clone> DictDescriptor<B> {
    pub const fn new(binding: B) -> Self {
        DictDescriptor { binding }
    }

    pub fn get<'e>(&self, entity: &'e mut Entity) -> Result<SyncDict<'e, B>> {
        entity.refresh()?;
        SyncDict::open(entity.region()?, self.binding.clone())
    }

    /// Replace the dictionary's contents with `entries`
    pub fn set<K, V, I>(&self, entity: &mut Entity, entries: I) -> Result<()>
    where
        K: Into<String>,
        V: Into<B::Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let uri = entity.uri().to_string();
        let mut dict = self.get(entity)?;
        dict.clear()?;
        for (key, value) in entries {
            dict.set(key, value)?;
        }
        debug!("replaced dictionary of {} with {} entries", uri, dict.len());
        Ok(())
    }
}

/// UDF dictionary descriptor, plain or grouped in a UDT
pub type UdfDictionaryDescriptor = DictDescriptor<UdfBinding>;

impl DictDescriptor<UdfBinding> {
    /// Fields directly under the root element
    pub const fn udf() -> Self {
        Self::new(UdfBinding::fields(&[]))
    }

    /// Fields inside the root element's UDT group
    pub const fn udt() -> Self {
        Self::new(UdfBinding::grouped(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::lists::{EntityList, TextList};
    use crate::binding::value::UdfValue;
    use crate::dom::Document;
    use crate::entity::{EntityKind, EntityRef};
    use crate::error::BindError;

    const SAMPLE: &str = r#"<smp:sample xmlns:udf="http://genologics.com/ri/userdefined" xmlns:smp="http://genologics.com/ri/sample">
    <udf:field type="Numeric" name="A">1</udf:field>
    <udf:field type="Numeric" name="B">2</udf:field>
    <alias>one</alias>
    <alias>two</alias>
</smp:sample>"#;

    fn sample() -> Entity {
        Entity::from_document(
            EntityKind::Sample,
            "http://lims/api/v2/samples/S1",
            Document::parse_str(SAMPLE).unwrap(),
        )
    }

    #[test]
    fn test_dictionary_full_replace() {
        let mut entity = sample();
        let udf = UdfDictionaryDescriptor::udf();
        udf.set(&mut entity, [("A", 1i64)]).unwrap();

        let dict = udf.get(&mut entity).unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("A"), Some(&UdfValue::Int(1)));
        assert!(!dict.contains_key("B"));
    }

    #[test]
    fn test_list_full_replace() {
        let mut entity = sample();
        let aliases = ListDescriptor::new(TextList::new("alias"));
        aliases.set(&mut entity, ["three".to_string()]).unwrap();
        assert_eq!(aliases.get(&mut entity).unwrap().to_vec(), ["three"]);

        aliases.set(&mut entity, Vec::new()).unwrap();
        assert!(aliases.get(&mut entity).unwrap().is_empty());
    }

    #[test]
    fn test_each_get_is_a_fresh_snapshot() {
        let mut entity = sample();
        let udf = UdfDictionaryDescriptor::udf();
        let before = udf.get(&mut entity).unwrap().to_map();
        udf.get(&mut entity).unwrap().set("C", "new").unwrap();
        let after = udf.get(&mut entity).unwrap();
        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 3);
    }

    #[test]
    fn test_failed_replace_reports_error() {
        let mut entity = sample();
        let samples = ListDescriptor::new(EntityList::new("sample", EntityKind::Sample));
        let wrong = EntityRef::new(EntityKind::Project, "http://lims/api/v2/projects/P1");
        assert!(matches!(samples.set(&mut entity, [wrong]), Err(BindError::TypeMismatch { .. })));
    }
}
