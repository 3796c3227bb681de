//! Mixed content back into text, children and tails
//!
//! The first text run becomes the node's text; every text run after an
//! inline child becomes that child's tail. Consecutive runs concatenate.

use super::Serializer;
use crate::backend::XmlBackend;
use crate::errors::SerializationResult;
use crate::model::{CodePart, ElementRef, SegmentPart};

/// One content part seen as either a text run or an entity
#[derive(Debug, Clone, Copy)]
pub enum PartRef<'a> {
    Text(&'a str),
    Element(ElementRef<'a>),
}

pub trait SerializablePart {
    fn part(&self) -> PartRef<'_>;
}

impl SerializablePart for SegmentPart {
    fn part(&self) -> PartRef<'_> {
        match self {
            SegmentPart::Text(text) => PartRef::Text(text),
            SegmentPart::Bpt(bpt) => PartRef::Element(bpt.into()),
            SegmentPart::Ept(ept) => PartRef::Element(ept.into()),
            SegmentPart::It(it) => PartRef::Element(it.into()),
            SegmentPart::Ph(ph) => PartRef::Element(ph.into()),
            SegmentPart::Hi(hi) => PartRef::Element(hi.into()),
        }
    }
}

impl SerializablePart for CodePart {
    fn part(&self) -> PartRef<'_> {
        match self {
            CodePart::Text(text) => PartRef::Text(text),
            CodePart::Sub(sub) => PartRef::Element(sub.into()),
        }
    }
}

fn append_text(current: Option<String>, text: &str) -> String {
    let mut current = current.unwrap_or_default();
    current.push_str(text);
    current
}

/// Writes `parts` into `node` in order
pub fn serialize_content<B, P>(ser: &Serializer<B>, node: &B::Node, parts: &[P]) -> SerializationResult<()>
where
    B: XmlBackend,
    P: SerializablePart,
{
    let backend = ser.backend();
    let mut last_child: Option<B::Node> = None;

    for part in parts {
        match part.part() {
            PartRef::Text(text) if text.is_empty() => {}
            PartRef::Text(text) => match &last_child {
                Some(child) => {
                    let tail = append_text(backend.get_tail(child), text);
                    backend.set_tail(child, Some(&tail));
                }
                None => {
                    let own = append_text(backend.get_text(node), text);
                    backend.set_text(node, Some(&own));
                }
            },
            PartRef::Element(element) => {
                if let Some(child) = ser.emit(element)? {
                    backend.append_child(node, &child);
                    last_child = Some(child);
                }
            }
        }
    }
    Ok(())
}
