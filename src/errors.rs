//! Error types
//!
//! One enum per layer, joined by [`Error`] at the public API:
//!
//! - [`BackendError`]: reading or writing XML failed (always fatal)
//! - [`DeserializationError`]: a tree did not fit the TMX model and policy said raise
//! - [`SerializationError`]: an entity could not be written and policy said raise

use crate::model::ElementKind;
use std::path::PathBuf;
use thiserror::Error;

pub type BackendResult<T> = std::result::Result<T, BackendError>;
pub type DeserializationResult<T> = std::result::Result<T, DeserializationError>;
pub type SerializationResult<T> = std::result::Result<T, SerializationError>;
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause attached to attribute conversion failures
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of the XML layer underneath the codec
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reader error with the byte offset it was detected at
    #[error("XML error at position {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("XML write error: {0}")]
    Write(#[from] quick_xml::Error),

    #[error("XML parse error: {0}")]
    Dom(#[from] roxmltree::Error),

    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("unexpected end of document: <{open}> is still open")]
    UnexpectedEof { open: String },

    #[error("document has no root element")]
    EmptyDocument,

    #[error("unsupported encoding '{0}'")]
    UnsupportedEncoding(String),
}

/// A TMX tree that does not fit the object model
#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("incorrect tag: expected <{expected}>, got <{found}>")]
    InvalidTag { expected: String, found: String },

    #[error("missing required attribute '{attribute}' on <{tag}>")]
    MissingAttribute { tag: String, attribute: String },

    /// Integer, date or enum attribute that failed to convert
    #[error("invalid value '{value}' for attribute '{attribute}' on <{tag}>: {reason}")]
    InvalidAttributeValue {
        tag: String,
        attribute: String,
        value: String,
        reason: String,
        #[source]
        cause: Option<Cause>,
    },

    #[error("<{tag}> has no text content")]
    MissingText { tag: String },

    #[error("<{tag}> has unexpected text content '{text}'")]
    ExtraText { tag: String, text: String },

    #[error("<{child}> is not allowed inside <{parent}>")]
    InvalidChild { parent: String, child: String },

    /// More than one `<header>`, `<body>` or `<seg>`
    #[error("<{parent}> contains more than one <{child}>")]
    DuplicateChild { parent: String, child: String },

    #[error("<{parent}> is missing its <{child}>")]
    MissingChild { parent: String, child: String },

    #[error("no handler registered for <{tag}>")]
    MissingHandler { tag: String },

    /// A handler returned an entity of the wrong kind for where it sits
    #[error("<{tag}> produced a {found} where a {expected} was expected")]
    UnexpectedElement {
        tag: String,
        expected: String,
        found: ElementKind,
    },
}

/// An entity that cannot be written as TMX
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("required attribute '{attribute}' of <{tag}> is empty")]
    MissingAttribute { tag: String, attribute: String },

    #[error("invalid value '{value}' for attribute '{attribute}' on <{tag}>: {reason}")]
    InvalidAttributeValue {
        tag: String,
        attribute: String,
        value: String,
        reason: String,
    },

    /// A `<note>` / `<prop>` without text would not read back
    #[error("<{tag}> has no text to write")]
    MissingText { tag: String },

    /// The handler registered for one kind was handed another
    #[error("handler for {handler} cannot serialize a {found}")]
    InvalidObjectType {
        handler: ElementKind,
        found: ElementKind,
    },

    #[error("no handler registered for {kind}")]
    MissingHandler { kind: ElementKind },
}

/// Errors surfaced by [`crate::api`]
#[derive(Debug, Error)]
pub enum Error {
    #[error("file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is a directory", .0.display())]
    IsADirectory(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("root element is <{found}>, expected <tmx>")]
    NotTmx { found: String },

    /// Policy dropped the element the caller asked for
    #[error("<{tag}> was omitted by policy")]
    Omitted { tag: String },

    #[error("invalid YAML configuration: {0}")]
    ConfigYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON configuration: {0}")]
    ConfigJson(#[from] serde_json::Error),
}
