//! Polymorphic views over every entity the codec converts

use super::inline::{Bpt, Ept, Hi, It, Ph, Sub};
use super::structural::{Header, Note, Prop, Tmx, Tu, Tuv};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime variant of an entity; the serializer's dispatch key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Tmx,
    Header,
    Tu,
    Tuv,
    Note,
    Prop,
    Bpt,
    Ept,
    It,
    Ph,
    Hi,
    Sub,
}

impl ElementKind {
    pub const ALL: [ElementKind; 12] = [
        ElementKind::Tmx,
        ElementKind::Header,
        ElementKind::Tu,
        ElementKind::Tuv,
        ElementKind::Note,
        ElementKind::Prop,
        ElementKind::Bpt,
        ElementKind::Ept,
        ElementKind::It,
        ElementKind::Ph,
        ElementKind::Hi,
        ElementKind::Sub,
    ];

    /// XML tag this entity is written as
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Tmx => "tmx",
            ElementKind::Header => "header",
            ElementKind::Tu => "tu",
            ElementKind::Tuv => "tuv",
            ElementKind::Note => "note",
            ElementKind::Prop => "prop",
            ElementKind::Bpt => "bpt",
            ElementKind::Ept => "ept",
            ElementKind::It => "it",
            ElementKind::Ph => "ph",
            ElementKind::Hi => "hi",
            ElementKind::Sub => "sub",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        ElementKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An owned entity of any kind, as produced by deserialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TmxElement {
    Tmx(Tmx),
    Header(Header),
    Tu(Tu),
    Tuv(Tuv),
    Note(Note),
    Prop(Prop),
    Bpt(Bpt),
    Ept(Ept),
    It(It),
    Ph(Ph),
    Hi(Hi),
    Sub(Sub),
}

/// A borrowed entity of any kind, as consumed by serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef<'a> {
    Tmx(&'a Tmx),
    Header(&'a Header),
    Tu(&'a Tu),
    Tuv(&'a Tuv),
    Note(&'a Note),
    Prop(&'a Prop),
    Bpt(&'a Bpt),
    Ept(&'a Ept),
    It(&'a It),
    Ph(&'a Ph),
    Hi(&'a Hi),
    Sub(&'a Sub),
}

impl TmxElement {
    pub fn kind(&self) -> ElementKind {
        self.view().kind()
    }

    pub fn view(&self) -> ElementRef<'_> {
        match self {
            TmxElement::Tmx(v) => ElementRef::Tmx(v),
            TmxElement::Header(v) => ElementRef::Header(v),
            TmxElement::Tu(v) => ElementRef::Tu(v),
            TmxElement::Tuv(v) => ElementRef::Tuv(v),
            TmxElement::Note(v) => ElementRef::Note(v),
            TmxElement::Prop(v) => ElementRef::Prop(v),
            TmxElement::Bpt(v) => ElementRef::Bpt(v),
            TmxElement::Ept(v) => ElementRef::Ept(v),
            TmxElement::It(v) => ElementRef::It(v),
            TmxElement::Ph(v) => ElementRef::Ph(v),
            TmxElement::Hi(v) => ElementRef::Hi(v),
            TmxElement::Sub(v) => ElementRef::Sub(v),
        }
    }
}

impl<'a> ElementRef<'a> {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementRef::Tmx(_) => ElementKind::Tmx,
            ElementRef::Header(_) => ElementKind::Header,
            ElementRef::Tu(_) => ElementKind::Tu,
            ElementRef::Tuv(_) => ElementKind::Tuv,
            ElementRef::Note(_) => ElementKind::Note,
            ElementRef::Prop(_) => ElementKind::Prop,
            ElementRef::Bpt(_) => ElementKind::Bpt,
            ElementRef::Ept(_) => ElementKind::Ept,
            ElementRef::It(_) => ElementKind::It,
            ElementRef::Ph(_) => ElementKind::Ph,
            ElementRef::Hi(_) => ElementKind::Hi,
            ElementRef::Sub(_) => ElementKind::Sub,
        }
    }
}

impl<'a> From<&'a TmxElement> for ElementRef<'a> {
    fn from(element: &'a TmxElement) -> Self {
        element.view()
    }
}

macro_rules! element_conversions {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for TmxElement {
                fn from(value: $variant) -> Self {
                    TmxElement::$variant(value)
                }
            }

            impl<'a> From<&'a $variant> for ElementRef<'a> {
                fn from(value: &'a $variant) -> Self {
                    ElementRef::$variant(value)
                }
            }

            impl TryFrom<TmxElement> for $variant {
                type Error = TmxElement;

                fn try_from(element: TmxElement) -> Result<Self, Self::Error> {
                    match element {
                        TmxElement::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

element_conversions!(Tmx, Header, Tu, Tuv, Note, Prop, Bpt, Ept, It, Ph, Hi, Sub);
