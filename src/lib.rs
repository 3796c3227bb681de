//! TMX codec
//!
//! Reads and writes TMX 1.4 translation memories through interchangeable XML
//! tree backends, with every recoverable defect in the input routed through a
//! configurable policy.
//!
//! - [`model`]: the typed TMX object model and its builders
//! - [`backend`]: the [`XmlBackend`] contract, [`ArenaBackend`] and [`DomBackend`]
//! - [`de`] / [`ser`]: handler-dispatched conversion between trees and the model
//! - [`stream`]: memory-bounded streaming of selected elements
//! - [`api`]: `load` / `save` and their configurable forms

pub mod api;
pub mod backend;
pub mod config;
pub mod de;
pub mod errors;
pub mod model;
pub mod policy;
pub mod ser;
pub mod stream;

// Re-export commonly used types
pub use api::{load, save, Loader, Saver, UnitWriter};
pub use backend::{ArenaBackend, DomBackend, TagSet, XmlBackend};
pub use config::{BackendKind, CodecConfig, ConfiguredStream};
pub use de::Deserializer;
pub use errors::{Error, Result};
pub use model::*;
pub use policy::{DeserializationPolicy, SerializationPolicy};
pub use ser::Serializer;
pub use stream::{ElementStream, TagFilter};
