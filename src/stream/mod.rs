//! Streaming deserialization
//!
//! [`ElementStream`] grows the tree one event at a time and hands back each
//! entity whose tag is in the mask as soon as its end tag is read. Once a
//! node has been deserialized (or is known not to be needed) its subtree is
//! released, so memory stays proportional to the largest matched subtree
//! rather than to the document.
//!
//! ```text
//! Start(tag) ─▶ Seeking:    tag in mask ─▶ mark matched (now Collecting)
//!               Collecting: keep, nested matches suppressed
//! End(node)  ─▶ matched   ─▶ deserialize, yield, release
//!               inside a match ─▶ keep (part of the pending subtree)
//!               otherwise ─▶ release
//! ```

use crate::backend::{EventCursor, TagSet, TreeEvent, XmlBackend};
use crate::de::Deserializer;
use crate::errors::Result;
use crate::model::{ElementKind, TmxElement};
use once_cell::sync::Lazy;
use std::io::BufRead;

/// Tags that map to an entity; `body` and `seg` are wrappers
pub static KNOWN_TAGS: Lazy<TagSet> =
    Lazy::new(|| ElementKind::ALL.iter().map(|kind| kind.tag()).collect());

/// Which elements a stream yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    tags: TagSet,
    exclude: bool,
}

impl TagFilter {
    /// Every entity below the root
    pub fn all() -> Self {
        Self::excluding(TagSet::new())
    }

    pub fn only(tag: &str) -> Self {
        Self::any_of(TagSet::from(tag))
    }

    pub fn any_of(tags: impl Into<TagSet>) -> Self {
        Self {
            tags: tags.into(),
            exclude: false,
        }
    }

    /// Every entity below the root except `tags`
    pub fn excluding(tags: impl Into<TagSet>) -> Self {
        Self {
            tags: tags.into(),
            exclude: true,
        }
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn is_exclude(&self) -> bool {
        self.exclude
    }

    /// Tags that start a match
    ///
    /// An allow-list is used as given, so `tmx` only matches when listed.
    pub fn mask(&self) -> TagSet {
        if !self.exclude {
            return self.tags.clone();
        }
        let mut mask = KNOWN_TAGS.difference(&self.tags);
        mask.remove("tmx");
        mask
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug)]
struct OpenNode<N> {
    node: N,
    matched: bool,
}

/// Lazy, forward-only sequence of entities read from one source
///
/// Stops at the first error; entities already yielded stay valid.
pub struct ElementStream<B: XmlBackend, R> {
    de: Deserializer<B>,
    cursor: EventCursor<R, B::Node>,
    mask: TagSet,
    open: Vec<OpenNode<B::Node>>,
    yielded: usize,
    done: bool,
}

impl<B: XmlBackend, R: BufRead> ElementStream<B, R> {
    pub fn new(de: Deserializer<B>, source: R, filter: &TagFilter) -> Self {
        let mask = filter.mask();
        log::debug!(
            "streaming elements matching [{}]",
            mask.iter().collect::<Vec<_>>().join(", ")
        );
        let cursor = de.backend().stream_parse(source);
        Self {
            de,
            cursor,
            mask,
            open: Vec::new(),
            yielded: 0,
            done: false,
        }
    }

    pub fn deserializer(&self) -> &Deserializer<B> {
        &self.de
    }

    /// True while inside a subtree whose root already matched
    fn collecting(&self) -> bool {
        self.open.iter().any(|open| open.matched)
    }

    /// Detaches `node` from the innermost open node and frees it
    fn release(&self, node: &B::Node) {
        let backend = self.de.backend();
        match self.open.last() {
            Some(parent) => backend.remove_child(&parent.node, node),
            None => backend.clear(node),
        }
    }

    fn advance(&mut self) -> Result<Option<TmxElement>> {
        loop {
            let event = match self.cursor.next_event(self.de.backend())? {
                Some(event) => event,
                None => {
                    log::debug!("stream finished after {} element(s)", self.yielded);
                    return Ok(None);
                }
            };

            match event {
                TreeEvent::Start(node) => {
                    let matched = !self.collecting() && self.mask.contains(&self.de.backend().tag(&node));
                    self.open.push(OpenNode { node, matched });
                }
                TreeEvent::End(node) => {
                    let Some(closed) = self.open.pop() else {
                        continue;
                    };
                    if closed.matched {
                        let element = self.de.deserialize(&node);
                        self.release(&node);
                        match element? {
                            Some(element) => {
                                self.yielded += 1;
                                return Ok(Some(element));
                            }
                            None => continue,
                        }
                    }
                    if !self.collecting() {
                        self.release(&node);
                    }
                }
            }
        }
    }
}

impl<B: XmlBackend, R: BufRead> Iterator for ElementStream<B, R> {
    type Item = Result<TmxElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<B: XmlBackend, R: BufRead> std::iter::FusedIterator for ElementStream<B, R> {}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
