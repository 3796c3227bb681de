//! Inline markup: `<bpt>`, `<ept>`, `<it>`, `<ph>`, `<hi>`, `<sub>`
//!
//! Two content alphabets exist in TMX and both are closed here:
//!
//! - [`SegmentPart`]: what a `<seg>`, `<hi>` or `<sub>` may hold
//!   (text, `bpt`, `ept`, `it`, `ph`, `hi`)
//! - [`CodePart`]: what the native-code elements `<bpt>`, `<ept>`, `<it>`
//!   and `<ph>` may hold (text, `sub`)
//!
//! The recursion `hi → hi` and `bpt → sub → bpt` is plain self-reference
//! through these enums.

use super::enums::{Assoc, Pos};
use serde::{Deserialize, Serialize};

// ============================================================================
// CONTENT PARTS
// ============================================================================

/// One run of segment-level mixed content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentPart {
    Text(String),
    Bpt(Bpt),
    Ept(Ept),
    It(It),
    Ph(Ph),
    Hi(Hi),
}

/// One run of native-code content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodePart {
    Text(String),
    Sub(Sub),
}

impl SegmentPart {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SegmentPart::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl CodePart {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CodePart::Text(text) => Some(text),
            CodePart::Sub(_) => None,
        }
    }
}

impl From<&str> for SegmentPart {
    fn from(text: &str) -> Self {
        SegmentPart::Text(text.to_string())
    }
}

impl From<String> for SegmentPart {
    fn from(text: String) -> Self {
        SegmentPart::Text(text)
    }
}

impl From<&str> for CodePart {
    fn from(text: &str) -> Self {
        CodePart::Text(text.to_string())
    }
}

impl From<String> for CodePart {
    fn from(text: String) -> Self {
        CodePart::Text(text)
    }
}

impl From<Sub> for CodePart {
    fn from(sub: Sub) -> Self {
        CodePart::Sub(sub)
    }
}

macro_rules! segment_part_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for SegmentPart {
                fn from(value: $variant) -> Self {
                    SegmentPart::$variant(value)
                }
            }
        )*
    };
}

segment_part_from!(Bpt, Ept, It, Ph, Hi);

// ============================================================================
// NATIVE CODE ELEMENTS
// ============================================================================

/// `<bpt>`: opening half of a paired native code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bpt {
    /// Pairs this `<bpt>` with its `<ept>`
    pub i: u32,
    pub x: Option<u32>,
    /// `type`
    pub kind: Option<String>,
    pub content: Vec<CodePart>,
}

impl Bpt {
    pub fn new(i: u32) -> Self {
        Self {
            i,
            x: None,
            kind: None,
            content: Vec::new(),
        }
    }

    pub fn with_x(mut self, x: u32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_part(mut self, part: impl Into<CodePart>) -> Self {
        self.content.push(part.into());
        self
    }
}

/// `<ept>`: closing half of a paired native code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ept {
    pub i: u32,
    pub content: Vec<CodePart>,
}

impl Ept {
    pub fn new(i: u32) -> Self {
        Self {
            i,
            content: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: impl Into<CodePart>) -> Self {
        self.content.push(part.into());
        self
    }
}

/// `<it>`: native code whose counterpart lies outside the segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct It {
    pub pos: Pos,
    pub x: Option<u32>,
    /// `type`
    pub kind: Option<String>,
    pub content: Vec<CodePart>,
}

impl It {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            x: None,
            kind: None,
            content: Vec::new(),
        }
    }

    pub fn with_x(mut self, x: u32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_part(mut self, part: impl Into<CodePart>) -> Self {
        self.content.push(part.into());
        self
    }
}

/// `<ph>`: standalone native code (image, line break, variable...)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ph {
    pub x: Option<u32>,
    /// `type`
    pub kind: Option<String>,
    pub assoc: Option<Assoc>,
    pub content: Vec<CodePart>,
}

impl Ph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_x(mut self, x: u32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_assoc(mut self, assoc: Assoc) -> Self {
        self.assoc = Some(assoc);
        self
    }

    pub fn with_part(mut self, part: impl Into<CodePart>) -> Self {
        self.content.push(part.into());
        self
    }
}

// ============================================================================
// RECURSIVE ELEMENTS
// ============================================================================

/// `<hi>`: highlighted span of segment content
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hi {
    pub x: Option<u32>,
    /// `type`
    pub kind: Option<String>,
    pub content: Vec<SegmentPart>,
}

impl Hi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_x(mut self, x: u32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_part(mut self, part: impl Into<SegmentPart>) -> Self {
        self.content.push(part.into());
        self
    }
}

/// `<sub>`: translatable sub-flow nested inside native code
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sub {
    pub datatype: Option<String>,
    /// `type`
    pub kind: Option<String>,
    pub content: Vec<SegmentPart>,
}

impl Sub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_part(mut self, part: impl Into<SegmentPart>) -> Self {
        self.content.push(part.into());
        self
    }
}
