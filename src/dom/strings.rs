//! Name Interning Pool
//!
//! Element names, attribute names and namespace URIs repeat across every
//! entity document, so they are stored once and referenced by `u32` id.
//! Id 0 is reserved for the empty string.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct StringPool {
    /// Strings indexed by id
    entries: Vec<Box<str>>,
    /// Content -> id
    index: HashMap<Box<str>, u32>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(64),
            index: HashMap::with_capacity(64),
        };
        pool.entries.push(Box::from(""));
        pool
    }

    /// Intern a string, returning its id
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        if let Some(&id) = self.index.get(s) {
            return id;
        }
        let id = self.entries.len() as u32;
        self.entries.push(Box::from(s));
        self.index.insert(Box::from(s), id);
        id
    }

    /// Id of an already interned string, without interning it
    pub fn lookup(&self, s: &str) -> Option<u32> {
        if s.is_empty() {
            return Some(0);
        }
        self.index.get(s).copied()
    }

    pub fn get(&self, id: u32) -> &str {
        self.entries.get(id as usize).map_or("", |s| s)
    }

    /// Number of unique strings stored (including the reserved empty string)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_duplicate() {
        let mut pool = StringPool::new();
        let id1 = pool.intern("udf:field");
        let id2 = pool.intern("udf:field");
        assert_eq!(id1, id2);
        assert_eq!(pool.get(id1), "udf:field");
    }

    #[test]
    fn test_intern_different() {
        let mut pool = StringPool::new();
        assert_ne!(pool.intern("placement"), pool.intern("value"));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_empty_string() {
        let mut pool = StringPool::new();
        assert_eq!(pool.intern(""), 0);
        assert_eq!(pool.get(0), "");
        assert!(pool.is_empty());
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let mut pool = StringPool::new();
        pool.intern("name");
        assert!(pool.lookup("name").is_some());
        assert!(pool.lookup("type").is_none());
        assert_eq!(pool.len(), 2);
    }
}
