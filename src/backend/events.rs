//! Incremental tree building on top of `quick_xml::Reader`
//!
//! [`EventCursor`] pulls raw reader events and turns them into tree growth on
//! any [`XmlBackend`]: every start tag creates a node attached to its parent,
//! every end tag closes it. Callers see one [`TreeEvent`] per transition, so
//! they can inspect (and release) subtrees as soon as they are complete.
//!
//! Input goes through [`DecodedSource`], so the reader only ever sees UTF-8.
//! Comments, processing instructions and the DOCTYPE are skipped. Text is
//! routed to the open node's text, or to the tail of the last closed
//! sibling, exactly like an ElementTree-style builder.

use super::encoding::DecodedSource;
use super::XmlBackend;
use crate::errors::{BackendError, BackendResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::VecDeque;
use std::io::BufRead;

/// One transition of the tree being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent<N> {
    /// Node was created and attached; its attributes are set, its content is not
    Start(N),
    /// Node and its whole subtree are complete
    End(N),
}

impl<N> TreeEvent<N> {
    pub fn node(&self) -> &N {
        match self {
            TreeEvent::Start(node) | TreeEvent::End(node) => node,
        }
    }
}

/// Pull-based tree builder
pub struct EventCursor<R, N> {
    reader: Reader<DecodedSource<R>>,
    buf: Vec<u8>,
    /// Ancestors of the insertion point, root first
    open: Vec<N>,
    /// Most recently closed child of the innermost open node
    last_closed: Option<N>,
    pending: VecDeque<TreeEvent<N>>,
    done: bool,
}

impl<R: BufRead, N: Clone> EventCursor<R, N> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(DecodedSource::new(source));
        reader.trim_text(false);
        reader.check_end_names(true);
        Self {
            reader,
            buf: Vec::new(),
            open: Vec::new(),
            last_closed: None,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Byte offset the reader has reached, counted in the UTF-8 text
    pub fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    /// Advances the parse until the next tree transition; `None` at end of input
    pub fn next_event<B>(&mut self, backend: &B) -> BackendResult<Option<TreeEvent<N>>>
    where
        B: XmlBackend<Node = N>,
    {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
            if self.done {
                return Ok(None);
            }
            let mut buf = std::mem::take(&mut self.buf);
            buf.clear();
            let result = self.step(backend, &mut buf);
            self.buf = buf;
            result?;
        }
    }

    fn step<B>(&mut self, backend: &B, buf: &mut Vec<u8>) -> BackendResult<()>
    where
        B: XmlBackend<Node = N>,
    {
        let event = self
            .reader
            .read_event_into(buf)
            .map_err(|source| self.xml_error(source))?;

        match event {
            Event::Start(start) => {
                let node = self.open_element(backend, &start)?;
                self.pending.push_back(TreeEvent::Start(node));
            }
            Event::Empty(start) => {
                let node = self.open_element(backend, &start)?;
                self.close_element();
                self.pending.push_back(TreeEvent::Start(node.clone()));
                self.pending.push_back(TreeEvent::End(node));
            }
            Event::End(_) => {
                if let Some(node) = self.close_element() {
                    self.pending.push_back(TreeEvent::End(node));
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|source| self.xml_error(source))?;
                self.push_text(backend, &text);
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let text = std::str::from_utf8(&bytes)?;
                self.push_text(backend, text);
            }
            Event::Eof => {
                self.done = true;
                if let Some(open) = self.open.last() {
                    return Err(BackendError::UnexpectedEof {
                        open: backend.tag(open),
                    });
                }
            }
            // Declaration, comments, processing instructions, DOCTYPE
            _ => {}
        }
        Ok(())
    }

    fn open_element<B>(&mut self, backend: &B, start: &BytesStart<'_>) -> BackendResult<N>
    where
        B: XmlBackend<Node = N>,
    {
        let name = start.name();
        let tag = std::str::from_utf8(name.local_name().into_inner())?;
        let node = backend.make_node(tag);

        for attribute in start.attributes() {
            let attribute = attribute
                .map_err(|source| self.xml_error(quick_xml::Error::InvalidAttr(source)))?;
            let key = std::str::from_utf8(attribute.key.into_inner())?;
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            if key.contains(':') && !key.starts_with("xml:") {
                log::debug!("dropping attribute '{}' in foreign namespace on <{}>", key, tag);
                continue;
            }
            let value = attribute
                .unescape_value()
                .map_err(|source| self.xml_error(source))?;
            backend.set_attribute(&node, key, &value);
        }

        if let Some(parent) = self.open.last() {
            backend.append_child(parent, &node);
        }
        self.open.push(node.clone());
        self.last_closed = None;
        Ok(node)
    }

    fn close_element(&mut self) -> Option<N> {
        let node = self.open.pop();
        self.last_closed = node.clone();
        node
    }

    fn push_text<B>(&mut self, backend: &B, text: &str)
    where
        B: XmlBackend<Node = N>,
    {
        if text.is_empty() || self.open.is_empty() {
            return;
        }
        match &self.last_closed {
            Some(sibling) => {
                let mut tail = backend.get_tail(sibling).unwrap_or_default();
                tail.push_str(text);
                backend.set_tail(sibling, Some(&tail));
            }
            None => {
                if let Some(parent) = self.open.last() {
                    let mut current = backend.get_text(parent).unwrap_or_default();
                    current.push_str(text);
                    backend.set_text(parent, Some(&current));
                }
            }
        }
    }

    fn xml_error(&self, source: quick_xml::Error) -> BackendError {
        BackendError::Xml {
            position: self.reader.buffer_position() as u64,
            source,
        }
    }
}
