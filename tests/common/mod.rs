// Shared helpers for the integration tests
#![allow(dead_code)]

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tmx_codec::backend::TagSet;
use tmx_codec::{Header, Segtype, XmlBackend};

// ============================================================================
// LOG CAPTURE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub level: Level,
    pub message: String,
}

thread_local! {
    static RECORDS: RefCell<Vec<Captured>> = RefCell::new(Vec::new());
}

/// Records every log call made on the calling thread
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        RECORDS.with(|records| {
            records.borrow_mut().push(Captured {
                level: record.level(),
                message: record.args().to_string(),
            })
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

static INSTALL: Lazy<()> = Lazy::new(|| {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
});

/// Runs `f` and returns its result with the non-debug records it logged
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<Captured>) {
    Lazy::force(&INSTALL);
    RECORDS.with(|records| records.borrow_mut().clear());
    let out = f();
    let records = RECORDS.with(|records| records.take());
    let records = records
        .into_iter()
        .filter(|record| record.level != Level::Debug)
        .collect();
    (out, records)
}

// ============================================================================
// COUNTING BACKEND
// ============================================================================

/// Delegates to `B` and counts calls per trait method
#[derive(Debug, Default)]
pub struct CountingBackend<B> {
    inner: B,
    calls: RefCell<HashMap<&'static str, usize>>,
    total: Cell<usize>,
}

impl<B: XmlBackend> CountingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            calls: RefCell::new(HashMap::new()),
            total: Cell::new(0),
        }
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.borrow().get(method).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total.get()
    }

    fn count(&self, method: &'static str) {
        *self.calls.borrow_mut().entry(method).or_insert(0) += 1;
        self.total.set(self.total.get() + 1);
    }
}

impl<B: XmlBackend> XmlBackend for CountingBackend<B> {
    type Node = B::Node;

    fn tag(&self, node: &Self::Node) -> String {
        self.count("tag");
        self.inner.tag(node)
    }

    fn make_node(&self, tag: &str) -> Self::Node {
        self.count("make_node");
        self.inner.make_node(tag)
    }

    fn get_attribute(&self, node: &Self::Node, name: &str) -> Option<String> {
        self.count("get_attribute");
        self.inner.get_attribute(node, name)
    }

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) {
        self.count("set_attribute");
        self.inner.set_attribute(node, name, value)
    }

    fn attributes(&self, node: &Self::Node) -> Vec<(String, String)> {
        self.count("attributes");
        self.inner.attributes(node)
    }

    fn get_text(&self, node: &Self::Node) -> Option<String> {
        self.count("get_text");
        self.inner.get_text(node)
    }

    fn set_text(&self, node: &Self::Node, text: Option<&str>) {
        self.count("set_text");
        self.inner.set_text(node, text)
    }

    fn get_tail(&self, node: &Self::Node) -> Option<String> {
        self.count("get_tail");
        self.inner.get_tail(node)
    }

    fn set_tail(&self, node: &Self::Node, tail: Option<&str>) {
        self.count("set_tail");
        self.inner.set_tail(node, tail)
    }

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) {
        self.count("append_child");
        self.inner.append_child(parent, child)
    }

    fn remove_child(&self, parent: &Self::Node, child: &Self::Node) {
        self.count("remove_child");
        self.inner.remove_child(parent, child)
    }

    fn children(&self, node: &Self::Node, filter: Option<&TagSet>) -> Vec<Self::Node> {
        self.count("children");
        self.inner.children(node, filter)
    }

    fn clear(&self, node: &Self::Node) {
        self.count("clear");
        self.inner.clear(node)
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn header() -> Header {
    Header::new("tmx-codec", "0.1", Segtype::Sentence, "ABCTransMem", "en-US", "en-US", "plaintext")
}

pub const MINIMAL: &str = r#"<tmx version="1.4"><header creationtool="t" creationtoolversion="1" segtype="sentence" o-tmf="f" adminlang="en" srclang="en" datatype="plain"/><body/></tmx>"#;

/// Wraps `units` (raw `<tu>` markup) in a minimal document
pub fn document(units: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<tmx version="1.4">
<header creationtool="t" creationtoolversion="1" segtype="sentence" o-tmf="f" adminlang="en" srclang="en" datatype="plain"/>
<body>{}</body>
</tmx>"#,
        units
    )
}
