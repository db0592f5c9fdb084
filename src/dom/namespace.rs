//! Namespace Resolution
//!
//! Two halves:
//! - [`NamespaceTable`]: the immutable prefix -> URI table used to qualify
//!   tags such as `udf:field`. Loaded once per process (or injected per
//!   entity) and never mutated afterwards.
//! - [`NamespaceScopes`]: stack-based resolver tracking `xmlns`
//!   declarations while a document is parsed or serialized.

use super::strings::StringPool;
use crate::reader::events::split_name;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// Base of every genologics REST namespace
    pub const GENOLOGICS_RI: &str = "http://genologics.com/ri";
}

/// Prefixes of the genologics REST API, each bound to `{GENOLOGICS_RI}/<name>`
const GENOLOGICS_PREFIXES: &[(&str, &str)] = &[
    ("art", "artifact"),
    ("artgr", "artifactgroup"),
    ("cnf", "clientnotification"),
    ("con", "container"),
    ("ctp", "containertype"),
    ("exc", "exception"),
    ("file", "file"),
    ("inst", "instrument"),
    ("kit", "reagentkit"),
    ("lab", "lab"),
    ("lot", "reagentlot"),
    ("prc", "process"),
    ("prj", "project"),
    ("prop", "property"),
    ("protcnf", "protocolconfiguration"),
    ("protstepcnf", "stepconfiguration"),
    ("prx", "processexecution"),
    ("ptm", "processtemplate"),
    ("ptp", "processtype"),
    ("res", "researcher"),
    ("rt", "routing"),
    ("rtp", "reagenttype"),
    ("smp", "sample"),
    ("stg", "stage"),
    ("stp", "step"),
    ("udf", "userdefined"),
    ("ver", "version"),
    ("wkfcnf", "workflowconfiguration"),
];

static GLOBAL: OnceLock<Arc<NamespaceTable>> = OnceLock::new();

/// Immutable prefix -> namespace URI table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    prefixes: IndexMap<String, String>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::genologics()
    }
}

impl NamespaceTable {
    /// The genologics REST namespaces (`ri`, `udf`, `smp`, `art`, ...)
    pub fn genologics() -> Self {
        let mut builder = Self::builder().prefix("ri", ns::GENOLOGICS_RI);
        for (prefix, name) in GENOLOGICS_PREFIXES {
            builder = builder.prefix(*prefix, format!("{}/{}", ns::GENOLOGICS_RI, name));
        }
        builder.build()
    }

    pub fn builder() -> NamespaceTableBuilder {
        NamespaceTableBuilder::default()
    }

    /// Process-wide table; defaults to [`NamespaceTable::genologics`] on first use
    pub fn global() -> Arc<NamespaceTable> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::genologics())))
    }

    /// Install the process-wide table. Fails, returning the table, once a
    /// table is already in place (installed or defaulted by `global`).
    pub fn install(table: NamespaceTable) -> Result<(), NamespaceTable> {
        GLOBAL
            .set(Arc::new(table))
            .map_err(|rejected| Arc::unwrap_or_clone(rejected))
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, u)| u.as_str() == uri)
            .map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Resolve `prefix:local` against the table. An unknown prefix yields a
    /// name without namespace that only matches the literal qualified name.
    pub fn qualify<'a>(&'a self, tag: &'a str) -> QName<'a> {
        let (prefix, local) = split_name(tag);
        QName {
            prefix,
            local,
            namespace: prefix.and_then(|p| self.uri(p)),
        }
    }
}

#[derive(Debug, Default)]
pub struct NamespaceTableBuilder {
    prefixes: IndexMap<String, String>,
}

impl NamespaceTableBuilder {
    /// Bind a prefix; a later binding of the same prefix replaces the earlier one
    pub fn prefix(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), uri.into());
        self
    }

    pub fn build(self) -> NamespaceTable {
        NamespaceTable {
            prefixes: self.prefixes,
        }
    }
}

/// A tag qualified against a [`NamespaceTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QName<'a> {
    pub prefix: Option<&'a str>,
    pub local: &'a str,
    /// Resolved URI; `None` for unprefixed tags and unknown prefixes
    pub namespace: Option<&'a str>,
}

impl<'a> QName<'a> {
    /// Unqualified name
    pub fn local(local: &'a str) -> Self {
        QName {
            prefix: None,
            local,
            namespace: None,
        }
    }

    /// Name as written in the document (`prefix:local` or `local`)
    pub fn qualified(&self) -> Cow<'a, str> {
        match self.prefix {
            Some(prefix) => Cow::Owned(format!("{}:{}", prefix, self.local)),
            None => Cow::Borrowed(self.local),
        }
    }
}

/// Namespace binding (prefix -> URI)
#[derive(Debug, Clone)]
struct NsBinding {
    prefix_id: u32,
    uri_id: u32,
    depth: u16,
}

/// Stack-based resolver of in-scope `xmlns` declarations.
/// Prefix id 0 stands for the default namespace.
#[derive(Debug, Default)]
pub struct NamespaceScopes {
    bindings: Vec<NsBinding>,
    depth: u16,
}

impl NamespaceScopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with the `xml` prefix pre-declared, as every parsed document has it
    pub fn with_xml_prefix(strings: &mut StringPool) -> Self {
        let mut scopes = Self::new();
        scopes.declare(strings.intern("xml"), strings.intern(ns::XML));
        scopes
    }

    /// Enter a new element scope
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave an element scope, removing any bindings declared in it
    pub fn pop_scope(&mut self) {
        while self.bindings.last().is_some_and(|b| b.depth >= self.depth && b.depth > 0) {
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Declare a binding for the current scope
    pub fn declare(&mut self, prefix_id: u32, uri_id: u32) {
        self.bindings.push(NsBinding {
            prefix_id,
            uri_id,
            depth: self.depth,
        });
    }

    /// Resolve a prefix to a namespace URI id, most recent binding first
    pub fn resolve(&self, prefix_id: u32) -> Option<u32> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.prefix_id == prefix_id)
            .map(|b| b.uri_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genologics_table() {
        let table = NamespaceTable::genologics();
        assert_eq!(table.uri("udf"), Some("http://genologics.com/ri/userdefined"));
        assert_eq!(table.uri("ri"), Some("http://genologics.com/ri"));
        assert_eq!(table.prefix_for("http://genologics.com/ri/sample"), Some("smp"));
    }

    #[test]
    fn test_qualify() {
        let table = NamespaceTable::genologics();
        let q = table.qualify("udf:field");
        assert_eq!(q.local, "field");
        assert_eq!(q.namespace, Some("http://genologics.com/ri/userdefined"));
        assert_eq!(q.qualified(), "udf:field");

        let plain = table.qualify("placement");
        assert_eq!(plain, QName::local("placement"));

        let unknown = table.qualify("zz:thing");
        assert_eq!(unknown.prefix, Some("zz"));
        assert!(unknown.namespace.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let table = NamespaceTable::builder()
            .prefix("udf", "urn:a")
            .prefix("udf", "urn:b")
            .build();
        assert_eq!(table.len(), 1);
        assert_eq!(table.uri("udf"), Some("urn:b"));
    }

    #[test]
    fn test_scope_pop() {
        let mut strings = StringPool::new();
        let mut scopes = NamespaceScopes::with_xml_prefix(&mut strings);
        let prefix = strings.intern("udf");
        let uri = strings.intern("urn:udf");

        scopes.push_scope();
        scopes.declare(prefix, uri);
        assert_eq!(scopes.resolve(prefix), Some(uri));

        scopes.pop_scope();
        assert_eq!(scopes.resolve(prefix), None);
        assert!(scopes.resolve(strings.intern("xml")).is_some());
    }

    #[test]
    fn test_shadow_binding() {
        let mut strings = StringPool::new();
        let mut scopes = NamespaceScopes::with_xml_prefix(&mut strings);
        let prefix = strings.intern("ns");
        let uri1 = strings.intern("urn:ns1");
        let uri2 = strings.intern("urn:ns2");

        scopes.push_scope();
        scopes.declare(prefix, uri1);
        scopes.push_scope();
        scopes.declare(prefix, uri2);
        assert_eq!(scopes.resolve(prefix), Some(uri2));

        scopes.pop_scope();
        assert_eq!(scopes.resolve(prefix), Some(uri1));
    }
}
