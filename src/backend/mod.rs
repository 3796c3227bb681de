//! XML tree backends
//!
//! The codec never touches a concrete tree type. Every handler is written
//! against [`XmlBackend`], a small capability set implemented once per tree
//! technology:
//!
//! ```text
//!                 ┌────────────── XmlBackend ──────────────┐
//!  Deserializer ─▶│ tag / attributes / text / tail / kids  │◀─ Serializer
//!                 │ parse / write / stream_parse           │
//!                 └───────┬──────────────────────┬─────────┘
//!                         │                      │
//!                  ArenaBackend              DomBackend
//!            (NodeId handles, quick-xml)  (Rc nodes, roxmltree)
//! ```
//!
//! # Conventions
//!
//! - Tags are local names (`tmx`, never `{ns}tmx` or `p:tmx`).
//! - Attribute keys use the prefixed form: `xml:lang` addresses the XML
//!   namespace `lang` attribute whatever the tree stores internally.
//! - Text before the first child is the node's *text*; text after a child
//!   is that child's *tail*.
//! - All methods take `&self`. Backends keep their tree behind a `RefCell`,
//!   so one instance serves one conversion on one thread at a time.

pub mod arena;
pub mod dom;
pub mod encoding;
pub mod events;
pub mod writer;

pub use arena::{ArenaBackend, NodeId};
pub use dom::{DomBackend, DomNode};
pub use encoding::{resolve_encoding, DecodedSource, EncodedSink};
pub use events::{EventCursor, TreeEvent};

use crate::errors::{BackendError, BackendResult};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::io::{BufRead, Write};

/// Namespace bound to the reserved `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Capability set every XML tree implementation provides to the codec
pub trait XmlBackend {
    /// Handle to one element of the tree
    type Node: Clone + fmt::Debug;

    /// Local name of the element
    fn tag(&self, node: &Self::Node) -> String;

    /// Creates a detached element
    fn make_node(&self, tag: &str) -> Self::Node;

    fn get_attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    /// All attributes in insertion order, keys normalized
    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)>;

    fn get_text(&self, node: &Self::Node) -> Option<String>;

    fn set_text(&self, node: &Self::Node, text: Option<&str>);

    fn get_tail(&self, node: &Self::Node) -> Option<String>;

    fn set_tail(&self, node: &Self::Node, tail: Option<&str>);

    fn append_child(&self, parent: &Self::Node, child: &Self::Node);

    /// Detaches `child` from `parent` and releases its subtree
    fn remove_child(&self, parent: &Self::Node, child: &Self::Node);

    /// Element children in document order, optionally restricted to `filter`
    fn children(&self, node: &Self::Node, filter: Option<&TagSet>) -> Vec<Self::Node>;

    /// Drops text, tail, attributes and every descendant of `node`
    fn clear(&self, node: &Self::Node);

    /// Parses a whole document and returns its root element
    fn parse<R: BufRead>(&self, source: R) -> BackendResult<Self::Node>
    where
        Self: Sized,
    {
        let mut cursor = self.stream_parse(source);
        let mut root = None;
        while let Some(event) = cursor.next_event(self)? {
            if let TreeEvent::Start(node) = event {
                if root.is_none() {
                    root = Some(node);
                }
            }
        }
        root.ok_or(BackendError::EmptyDocument)
    }

    /// Starts an incremental parse; see [`EventCursor`]
    fn stream_parse<R: BufRead>(&self, source: R) -> EventCursor<R, Self::Node>
    where
        Self: Sized,
    {
        EventCursor::new(source)
    }

    /// Writes `node` as a complete document, XML declaration included,
    /// in the encoding named by `encoding`
    fn write<W: Write>(&self, node: &Self::Node, sink: W, encoding: &str) -> BackendResult<()>
    where
        Self: Sized,
    {
        writer::write_document(self, node, sink, encoding)
    }

    /// Writes `node` and its subtree without a declaration
    fn write_fragment<W: Write>(&self, node: &Self::Node, sink: W) -> BackendResult<()>
    where
        Self: Sized,
    {
        writer::write_fragment(self, node, sink)
    }
}

// ============================================================================
// TAG SETS
// ============================================================================

/// Set of element local names, used to filter children and streamed nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = local_name(tag);
        if tag.is_empty() {
            return false;
        }
        self.0.insert(tag.to_string())
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.0.remove(local_name(tag))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(local_name(tag))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tags in `self` that are not in `other`
    pub fn difference(&self, other: &TagSet) -> TagSet {
        TagSet(self.0.difference(&other.0).cloned().collect())
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag.as_ref());
        }
        set
    }
}

impl From<&str> for TagSet {
    fn from(tag: &str) -> Self {
        std::iter::once(tag).collect()
    }
}

impl<const N: usize> From<[&str; N]> for TagSet {
    fn from(tags: [&str; N]) -> Self {
        tags.into_iter().collect()
    }
}

// ============================================================================
// NAME NORMALIZATION
// ============================================================================

/// Strips a Clark-notation namespace (`{ns}tag`) or a prefix (`p:tag`)
pub fn local_name(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix('{') {
        if let Some((_, local)) = rest.split_once('}') {
            return local;
        }
    }
    match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

/// Canonical attribute key: `{XML_NAMESPACE}lang` becomes `xml:lang`
pub fn normalize_key(name: &str) -> Cow<'_, str> {
    if let Some(rest) = name.strip_prefix('{') {
        if let Some((namespace, local)) = rest.split_once('}') {
            if namespace == XML_NAMESPACE {
                return Cow::Owned(format!("xml:{}", local));
            }
        }
    }
    Cow::Borrowed(name)
}

/// Clark-notation form of an attribute key: `xml:lang` becomes `{XML_NAMESPACE}lang`
pub fn clark_key(name: &str) -> Cow<'_, str> {
    match name.strip_prefix("xml:") {
        Some(local) => Cow::Owned(format!("{{{}}}{}", XML_NAMESPACE, local)),
        None => Cow::Borrowed(name),
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
