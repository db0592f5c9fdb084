//! Synchronized list proxy
//!
//! [`SyncList`] mirrors the elements named by a [`ListBinding`] under a
//! resolved root. Every mutation is written to the document at once and
//! list order always equals document order. Read-only kinds implement only
//! [`ListBinding`]; writable kinds add [`ListEncode`].

use super::resolver::Region;
use crate::dom::NodeId;
use crate::error::{BindError, Result};
use log::trace;
use std::ops::Range;

/// Element selection and decoding of one kind of list
pub trait ListBinding {
    type Item: Clone;

    /// Tag of the backing elements
    fn tag(&self) -> &str;

    /// Path from the document root to the elements' parent
    fn nesting(&self) -> &[&str] {
        &[]
    }

    fn decode(&self, region: &Region<'_>, node: NodeId) -> Result<Self::Item>;
}

/// Lists whose items can be written back
pub trait ListEncode: ListBinding {
    /// Build a detached backing element for `item`
    fn encode(&self, region: &mut Region<'_>, item: &Self::Item) -> Result<NodeId>;
}

pub struct SyncList<'e, B: ListBinding> {
    region: Region<'e>,
    binding: B,
    root: NodeId,
    items: Vec<B::Item>,
    elements: Vec<NodeId>,
}

impl<'e, B: ListBinding> SyncList<'e, B> {
    pub fn open(mut region: Region<'e>, binding: B) -> Result<Self> {
        let root = region.resolve(binding.nesting());
        let elements = region.children(root, binding.tag());
        let items = elements
            .iter()
            .map(|&node| binding.decode(&region, node))
            .collect::<Result<Vec<_>>>()?;
        Ok(SyncList {
            region,
            binding,
            root,
            items,
            elements,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&B::Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, B::Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[B::Item] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<B::Item> {
        self.items.clone()
    }

    fn check_index(&self, index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(BindError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}

impl<'e, B: ListEncode> SyncList<'e, B> {
    /// Attach `node` so it becomes backing element `index`
    fn attach(&mut self, index: usize, node: NodeId, item: B::Item) {
        let doc = &mut *self.region.doc;
        match (self.elements.get(index), self.elements.last()) {
            (Some(&anchor), _) => {
                let parent = doc.parent(anchor).unwrap_or(self.root);
                doc.insert_before(parent, node, anchor);
            }
            (None, Some(&last)) => {
                let parent = doc.parent(last).unwrap_or(self.root);
                doc.insert_after(parent, node, last);
            }
            (None, None) => doc.append_child(self.root, node),
        }
        self.elements.insert(index, node);
        self.items.insert(index, item);
    }

    fn detach(&mut self, index: usize) -> B::Item {
        let node = self.elements.remove(index);
        self.region.doc.detach(node);
        self.items.remove(index)
    }

    pub fn append(&mut self, item: B::Item) -> Result<()> {
        let node = self.binding.encode(&mut self.region, &item)?;
        self.attach(self.items.len(), node, item);
        Ok(())
    }

    /// Append every item. All items are encoded before any is attached.
    pub fn extend<I: IntoIterator<Item = B::Item>>(&mut self, items: I) -> Result<()> {
        let encoded = items
            .into_iter()
            .map(|item| -> Result<(NodeId, B::Item)> {
                Ok((self.binding.encode(&mut self.region, &item)?, item))
            })
            .collect::<Result<Vec<_>>>()?;
        for (node, item) in encoded {
            self.attach(self.items.len(), node, item);
        }
        Ok(())
    }

    /// Insert before position `index`; `index == len()` appends
    pub fn insert(&mut self, index: usize, item: B::Item) -> Result<()> {
        self.check_index(index, self.items.len() + 1)?;
        let node = self.binding.encode(&mut self.region, &item)?;
        self.attach(index, node, item);
        Ok(())
    }

    /// Replace the item at `index`, keeping its position
    pub fn set(&mut self, index: usize, item: B::Item) -> Result<B::Item> {
        self.check_index(index, self.items.len())?;
        let node = self.binding.encode(&mut self.region, &item)?;
        let doc = &mut *self.region.doc;
        let previous = self.elements[index];
        let parent = doc.parent(previous).unwrap_or(self.root);
        match doc.next_sibling(previous) {
            Some(next) => doc.insert_before(parent, node, next),
            None => doc.append_child(parent, node),
        }
        doc.detach(previous);
        self.elements[index] = node;
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    /// Replace the items in `range` with `items`
    pub fn splice<I: IntoIterator<Item = B::Item>>(&mut self, range: Range<usize>, items: I) -> Result<Vec<B::Item>> {
        if range.start > range.end {
            return Err(BindError::IndexOutOfRange {
                index: range.start,
                len: self.items.len(),
            });
        }
        self.check_index(range.end, self.items.len() + 1)?;
        let encoded = items
            .into_iter()
            .map(|item| -> Result<(NodeId, B::Item)> {
                Ok((self.binding.encode(&mut self.region, &item)?, item))
            })
            .collect::<Result<Vec<_>>>()?;

        let removed = range.clone().map(|_| self.detach(range.start)).collect();
        for (offset, (node, item)) in encoded.into_iter().enumerate() {
            self.attach(range.start + offset, node, item);
        }
        trace!("spliced {:?} of <{}> list", range, self.binding.tag());
        Ok(removed)
    }

    pub fn remove(&mut self, index: usize) -> Result<B::Item> {
        self.check_index(index, self.items.len())?;
        Ok(self.detach(index))
    }

    /// Remove every backing element
    pub fn clear(&mut self) {
        for node in self.elements.drain(..) {
            self.region.doc.detach(node);
        }
        self.items.clear();
    }
}

impl<'a, 'e, B: ListBinding> IntoIterator for &'a SyncList<'e, B> {
    type Item = &'a B::Item;
    type IntoIter = std::slice::Iter<'a, B::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
