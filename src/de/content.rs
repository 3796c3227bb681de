//! Mixed content: text runs interleaved with inline elements
//!
//! ```text
//! <seg>A<ph x="1"/>B<bpt i="1">&lt;b&gt;</bpt>C</seg>
//!   text "A"  ─▶ Text("A")
//!   <ph>      ─▶ emit ─▶ Ph
//!   tail "B"  ─▶ Text("B")
//!   <bpt>     ─▶ emit ─▶ Bpt
//!   tail "C"  ─▶ Text("C")
//! ```
//!
//! Each child tag is checked against the allow-list of the content alphabet
//! being built. A child skipped under `ignore` keeps its tail; adjacent text
//! runs are merged.

use super::Deserializer;
use crate::backend::XmlBackend;
use crate::errors::{DeserializationError, DeserializationResult};
use crate::model::{CodePart, SegmentPart, TmxElement};

/// One content alphabet (`SegmentPart` or `CodePart`)
pub trait ContentPart: Sized {
    /// Child tags this alphabet admits
    const ALLOWED: &'static [&'static str];

    fn text(text: String) -> Self;

    fn as_text_mut(&mut self) -> Option<&mut String>;

    /// Converts an emitted entity, handing it back when it does not belong here
    fn from_element(element: TmxElement) -> Result<Self, TmxElement>;
}

impl ContentPart for SegmentPart {
    const ALLOWED: &'static [&'static str] = &["bpt", "ept", "it", "ph", "hi"];

    fn text(text: String) -> Self {
        SegmentPart::Text(text)
    }

    fn as_text_mut(&mut self) -> Option<&mut String> {
        match self {
            SegmentPart::Text(text) => Some(text),
            _ => None,
        }
    }

    fn from_element(element: TmxElement) -> Result<Self, TmxElement> {
        match element {
            TmxElement::Bpt(bpt) => Ok(SegmentPart::Bpt(bpt)),
            TmxElement::Ept(ept) => Ok(SegmentPart::Ept(ept)),
            TmxElement::It(it) => Ok(SegmentPart::It(it)),
            TmxElement::Ph(ph) => Ok(SegmentPart::Ph(ph)),
            TmxElement::Hi(hi) => Ok(SegmentPart::Hi(hi)),
            other => Err(other),
        }
    }
}

impl ContentPart for CodePart {
    const ALLOWED: &'static [&'static str] = &["sub"];

    fn text(text: String) -> Self {
        CodePart::Text(text)
    }

    fn as_text_mut(&mut self) -> Option<&mut String> {
        match self {
            CodePart::Text(text) => Some(text),
            CodePart::Sub(_) => None,
        }
    }

    fn from_element(element: TmxElement) -> Result<Self, TmxElement> {
        match element {
            TmxElement::Sub(sub) => Ok(CodePart::Sub(sub)),
            other => Err(other),
        }
    }
}

fn push_text<P: ContentPart>(parts: &mut Vec<P>, text: Option<String>) {
    let Some(text) = text.filter(|text| !text.is_empty()) else {
        return;
    };
    match parts.last_mut().and_then(P::as_text_mut) {
        Some(last) => last.push_str(&text),
        None => parts.push(P::text(text)),
    }
}

/// Reads the mixed content of `node` in document order
pub fn deserialize_content<B, P>(de: &Deserializer<B>, node: &B::Node) -> DeserializationResult<Vec<P>>
where
    B: XmlBackend,
    P: ContentPart,
{
    let backend = de.backend();
    let parent = backend.tag(node);
    let mut parts = Vec::new();
    push_text(&mut parts, backend.get_text(node));

    for child in backend.children(node, None) {
        let tag = backend.tag(&child);
        if !P::ALLOWED.contains(&tag.as_str()) {
            de.invalid_child(&parent, &tag)?;
        } else if let Some(element) = de.emit(&child)? {
            let part = P::from_element(element).map_err(|other| {
                DeserializationError::UnexpectedElement {
                    tag: tag.clone(),
                    expected: format!("<{}> content part", parent),
                    found: other.kind(),
                }
            })?;
            parts.push(part);
        }
        push_text(&mut parts, backend.get_tail(&child));
    }
    Ok(parts)
}
