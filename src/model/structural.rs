//! Structural elements: `<tmx>`, `<header>`, `<tu>`, `<tuv>`, `<note>`, `<prop>`

use super::date;
use super::enums::Segtype;
use super::inline::SegmentPart;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The only TMX version this codec writes
pub const TMX_VERSION: &str = "1.4";

// ============================================================================
// ANNOTATIONS
// ============================================================================

/// `<note>`: free-form comment attached to a header, unit or variant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Note {
    /// `None` when the element had no text and policy kept it anyway
    pub text: Option<String>,
    /// `xml:lang`
    pub lang: Option<String>,
    /// `o-encoding`
    pub encoding: Option<String>,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

/// `<prop>`: tool-defined property; `kind` is the `type` attribute
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Prop {
    pub text: Option<String>,
    pub kind: String,
    /// `xml:lang`
    pub lang: Option<String>,
    /// `o-encoding`
    pub encoding: Option<String>,
}

impl Prop {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// `<header>`: document-wide metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub creationtool: String,
    pub creationtoolversion: String,
    pub segtype: Segtype,
    /// `o-tmf`: format of the translation memory the file was exported from
    pub tmf: String,
    pub adminlang: String,
    pub srclang: String,
    pub datatype: String,
    /// `o-encoding`
    pub encoding: Option<String>,
    pub creationdate: Option<DateTime<Utc>>,
    pub creationid: Option<String>,
    pub changedate: Option<DateTime<Utc>>,
    pub changeid: Option<String>,
    pub notes: Vec<Note>,
    pub props: Vec<Prop>,
}

impl Header {
    pub fn new(
        creationtool: impl Into<String>,
        creationtoolversion: impl Into<String>,
        segtype: Segtype,
        tmf: impl Into<String>,
        adminlang: impl Into<String>,
        srclang: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Self {
        Self {
            creationtool: creationtool.into(),
            creationtoolversion: creationtoolversion.into(),
            segtype,
            tmf: tmf.into(),
            adminlang: adminlang.into(),
            srclang: srclang.into(),
            datatype: datatype.into(),
            encoding: None,
            creationdate: None,
            creationid: None,
            changedate: None,
            changeid: None,
            notes: Vec::new(),
            props: Vec::new(),
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_creation(mut self, date: DateTime<Utc>, id: impl Into<String>) -> Self {
        self.creationdate = Some(date::truncate(date));
        self.creationid = Some(id.into());
        self
    }

    pub fn with_change(mut self, date: DateTime<Utc>, id: impl Into<String>) -> Self {
        self.changedate = Some(date::truncate(date));
        self.changeid = Some(id.into());
        self
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_prop(mut self, prop: Prop) -> Self {
        self.props.push(prop);
        self
    }
}

// ============================================================================
// TRANSLATION UNITS
// ============================================================================

/// `<tuv>`: one language variant of a translation unit
///
/// `content` is the mixed content of the variant's `<seg>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tuv {
    /// `xml:lang`
    pub lang: String,
    /// `o-encoding`
    pub encoding: Option<String>,
    pub datatype: Option<String>,
    pub usagecount: Option<u32>,
    pub lastusagedate: Option<DateTime<Utc>>,
    pub creationtool: Option<String>,
    pub creationtoolversion: Option<String>,
    pub creationdate: Option<DateTime<Utc>>,
    pub creationid: Option<String>,
    pub changedate: Option<DateTime<Utc>>,
    pub changeid: Option<String>,
    /// `o-tmf`
    pub tmf: Option<String>,
    pub notes: Vec<Note>,
    pub props: Vec<Prop>,
    pub content: Vec<SegmentPart>,
}

impl Tuv {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            ..Self::default()
        }
    }

    /// Appends a text run or inline element to the segment
    pub fn with_part(mut self, part: impl Into<SegmentPart>) -> Self {
        self.content.push(part.into());
        self
    }

    pub fn with_content(mut self, content: Vec<SegmentPart>) -> Self {
        self.content = content;
        self
    }

    pub fn with_creation(mut self, date: DateTime<Utc>, id: impl Into<String>) -> Self {
        self.creationdate = Some(date::truncate(date));
        self.creationid = Some(id.into());
        self
    }

    pub fn with_change(mut self, date: DateTime<Utc>, id: impl Into<String>) -> Self {
        self.changedate = Some(date::truncate(date));
        self.changeid = Some(id.into());
        self
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_prop(mut self, prop: Prop) -> Self {
        self.props.push(prop);
        self
    }

    /// Concatenated text runs, inline markup dropped
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for part in &self.content {
            if let SegmentPart::Text(text) = part {
                out.push_str(text);
            }
        }
        out
    }
}

/// `<tu>`: a translation unit and its variants
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tu {
    pub tuid: Option<String>,
    /// `o-encoding`
    pub encoding: Option<String>,
    pub datatype: Option<String>,
    pub usagecount: Option<u32>,
    pub lastusagedate: Option<DateTime<Utc>>,
    pub creationtool: Option<String>,
    pub creationtoolversion: Option<String>,
    pub creationdate: Option<DateTime<Utc>>,
    pub creationid: Option<String>,
    pub changedate: Option<DateTime<Utc>>,
    pub changeid: Option<String>,
    pub segtype: Option<Segtype>,
    /// `o-tmf`
    pub tmf: Option<String>,
    pub srclang: Option<String>,
    pub notes: Vec<Note>,
    pub props: Vec<Prop>,
    pub variants: Vec<Tuv>,
}

impl Tu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tuid(mut self, tuid: impl Into<String>) -> Self {
        self.tuid = Some(tuid.into());
        self
    }

    pub fn with_srclang(mut self, srclang: impl Into<String>) -> Self {
        self.srclang = Some(srclang.into());
        self
    }

    pub fn with_segtype(mut self, segtype: Segtype) -> Self {
        self.segtype = Some(segtype);
        self
    }

    pub fn with_creation(mut self, date: DateTime<Utc>, id: impl Into<String>) -> Self {
        self.creationdate = Some(date::truncate(date));
        self.creationid = Some(id.into());
        self
    }

    pub fn with_change(mut self, date: DateTime<Utc>, id: impl Into<String>) -> Self {
        self.changedate = Some(date::truncate(date));
        self.changeid = Some(id.into());
        self
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_prop(mut self, prop: Prop) -> Self {
        self.props.push(prop);
        self
    }

    pub fn with_variant(mut self, tuv: Tuv) -> Self {
        self.variants.push(tuv);
        self
    }

    /// First variant in the given language
    pub fn variant(&self, lang: &str) -> Option<&Tuv> {
        self.variants.iter().find(|tuv| tuv.lang == lang)
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// `<tmx>`: the document root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tmx {
    /// Version read from the file; always written as [`TMX_VERSION`]
    pub version: String,
    pub header: Header,
    pub body: Vec<Tu>,
}

impl Tmx {
    pub fn new(header: Header) -> Self {
        Self {
            version: TMX_VERSION.to_string(),
            header,
            body: Vec::new(),
        }
    }

    pub fn with_unit(mut self, tu: Tu) -> Self {
        self.body.push(tu);
        self
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = Tu>) -> Self {
        self.body.extend(units);
        self
    }
}
