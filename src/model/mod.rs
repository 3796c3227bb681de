//! TMX 1.4 object model
//!
//! Plain value types mirroring the TMX elements. Nothing in here knows about
//! XML trees: the codec in [`crate::de`] / [`crate::ser`] converts between
//! these types and backend nodes.
//!
//! # Layout
//!
//! ```text
//! Tmx
//!  ├─ Header ── Note*, Prop*
//!  └─ Tu* ───── Note*, Prop*, Tuv*
//!                               └─ content: SegmentPart* (text | bpt | ept | it | ph | hi)
//! ```
//!
//! Inline content keeps document order exactly: a segment `A<ph/>B` is
//! `[Text("A"), Ph(..), Text("B")]`.

pub mod date;
pub mod element;
pub mod enums;
pub mod inline;
pub mod structural;

pub use element::{ElementKind, ElementRef, TmxElement};
pub use enums::{Assoc, Pos, Segtype, UnknownVariant};
pub use inline::{Bpt, CodePart, Ept, Hi, It, Ph, SegmentPart, Sub};
pub use structural::{Header, Note, Prop, Tmx, Tu, Tuv, TMX_VERSION};
