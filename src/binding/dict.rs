//! Synchronized dictionary proxy
//!
//! [`SyncDict`] decodes the backing elements of a region into an ordered
//! map when opened, and writes every `set`, `remove` and `clear` through to
//! the document immediately. The element layout of each dictionary kind is
//! supplied by a [`DictBinding`].

use super::resolver::Region;
use crate::dom::NodeId;
use crate::error::Result;
use indexmap::IndexMap;
use log::trace;

/// Element layout of one kind of dictionary
pub trait DictBinding {
    type Value: Clone;

    /// Backing elements, in document order
    fn elements(&self, region: &mut Region<'_>) -> Result<Vec<NodeId>>;

    /// Key of a backing element, if it has one
    fn key(&self, region: &Region<'_>, node: NodeId) -> Option<String>;

    /// Decode a backing element into its entry
    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<(String, Self::Value)>;

    /// Write `value` for `key`: in place into `existing`, or as a new element
    fn write(
        &self,
        region: &mut Region<'_>,
        existing: Option<NodeId>,
        key: &str,
        value: &Self::Value,
    ) -> Result<()>;
}

/// Ordered map mirroring a set of backing elements.
///
/// A snapshot taken at construction: writes go straight to the document,
/// but writes made through another proxy afterwards are not observed.
/// Duplicate keys in the document are tolerated; the last one decoded wins
/// in the map while writes go to the first matching element.
pub struct SyncDict<'e, B: DictBinding> {
    pub(crate) region: Region<'e>,
    pub(crate) binding: B,
    map: IndexMap<String, B::Value>,
    elements: Vec<NodeId>,
}

impl<'e, B: DictBinding> SyncDict<'e, B> {
    pub fn open(region: Region<'e>, binding: B) -> Result<Self> {
        let mut dict = SyncDict {
            region,
            binding,
            map: IndexMap::new(),
            elements: Vec::new(),
        };
        dict.sync()?;
        Ok(dict)
    }

    /// Re-read the backing elements and rebuild the map
    fn sync(&mut self) -> Result<()> {
        self.elements = self.binding.elements(&mut self.region)?;
        self.map.clear();
        for &node in &self.elements {
            let (key, value) = self.binding.decode(&self.region, node)?;
            self.map.insert(key, value);
        }
        trace!("synchronized dictionary with {} elements", self.elements.len());
        Ok(())
    }

    /// First backing element for `key`
    fn backing(&self, key: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .copied()
            .find(|&node| self.binding.key(&self.region, node).as_deref() == Some(key))
    }

    pub fn get(&self, key: &str) -> Option<&B::Value> {
        self.map.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &B::Value)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy of the current entries
    pub fn to_map(&self) -> IndexMap<String, B::Value> {
        self.map.clone()
    }

    /// Write `value` under `key`. An existing entry is rewritten in place;
    /// a new one is appended and the proxy resynchronized.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<B::Value>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        let existing = self.backing(&key);
        self.binding.write(&mut self.region, existing, &key, &value)?;
        match existing {
            Some(_) => {
                self.map.insert(key, value);
            }
            None => self.sync()?,
        }
        Ok(())
    }

    /// Remove the first backing element for `key` and the map entry
    pub fn remove(&mut self, key: &str) -> Option<B::Value> {
        if let Some(node) = self.backing(key) {
            self.region.doc.detach(node);
            self.elements.retain(|&n| n != node);
        }
        self.map.shift_remove(key)
    }

    /// Remove every backing element
    pub fn clear(&mut self) -> Result<()> {
        for &node in &self.elements {
            self.region.doc.detach(node);
        }
        self.sync()
    }
}

impl<'a, 'e, B: DictBinding> IntoIterator for &'a SyncDict<'e, B> {
    type Item = (&'a String, &'a B::Value);
    type IntoIter = indexmap::map::Iter<'a, String, B::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
