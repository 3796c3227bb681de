//! Closed attribute value sets (`segtype`, `pos`, `assoc`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A value outside one of the closed TMX attribute sets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not one of: {}", .allowed.join(", "))]
pub struct UnknownVariant {
    pub value: String,
    pub allowed: &'static [&'static str],
}

/// Segmentation level (`segtype` on `<header>` and `<tu>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segtype {
    Block,
    Paragraph,
    Sentence,
    Phrase,
}

impl Segtype {
    pub const VALUES: &'static [&'static str] = &["block", "paragraph", "sentence", "phrase"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segtype::Block => "block",
            Segtype::Paragraph => "paragraph",
            Segtype::Sentence => "sentence",
            Segtype::Phrase => "phrase",
        }
    }
}

impl FromStr for Segtype {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block" => Ok(Segtype::Block),
            "paragraph" => Ok(Segtype::Paragraph),
            "sentence" => Ok(Segtype::Sentence),
            "phrase" => Ok(Segtype::Phrase),
            other => Err(UnknownVariant {
                value: other.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

/// Position of an isolated tag (`pos` on `<it>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pos {
    /// Tag opens at this point
    Begin,
    /// Tag closes at this point
    End,
}

impl Pos {
    pub const VALUES: &'static [&'static str] = &["begin", "end"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pos::Begin => "begin",
            Pos::End => "end",
        }
    }
}

impl FromStr for Pos {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "begin" => Ok(Pos::Begin),
            "end" => Ok(Pos::End),
            other => Err(UnknownVariant {
                value: other.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

/// Which side of the surrounding text a placeholder belongs to (`assoc` on `<ph>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assoc {
    /// Previous
    #[serde(rename = "p")]
    P,
    /// Following
    #[serde(rename = "f")]
    F,
    /// Both
    #[serde(rename = "b")]
    B,
}

impl Assoc {
    pub const VALUES: &'static [&'static str] = &["p", "f", "b"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Assoc::P => "p",
            Assoc::F => "f",
            Assoc::B => "b",
        }
    }
}

impl FromStr for Assoc {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p" => Ok(Assoc::P),
            "f" => Ok(Assoc::F),
            "b" => Ok(Assoc::B),
            other => Err(UnknownVariant {
                value: other.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Segtype, Pos, Assoc);
