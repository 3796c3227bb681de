//! XML tree → object model
//!
//! # Architecture
//!
//! ```text
//! Deserializer::deserialize(node)
//!   ├─ tag(node) ──▶ handlers["tu"] ──▶ handlers::tu(&Deserializer, node)
//!   │                                     ├─ attribute helpers (policy aware)
//!   │                                     └─ emit(child) ──▶ handlers["tuv"] ...
//!   └─ no handler ──▶ missing_handler policy (raise / ignore / builtin table)
//! ```
//!
//! Handlers are plain function pointers keyed by tag. The engine reference a
//! handler receives is its way back into dispatch, which is how `<hi>` nests
//! in `<hi>` and `<tu>` reaches `<tuv>` without any handler naming another.
//!
//! A handler returns `Ok(None)` when policy told it to drop the element; the
//! parent simply carries on without it.

mod attributes;
pub mod content;
pub mod handlers;

pub use attributes::AttributeValue;
pub use content::ContentPart;

use crate::backend::XmlBackend;
use crate::errors::{DeserializationError, DeserializationResult};
use crate::model::TmxElement;
use crate::policy::{DeserializationPolicy, MissingHandlerBehavior};
use std::collections::HashMap;

/// Turns one node into one entity; `Ok(None)` means omitted by policy
pub type DeserializeHandler<B> = fn(
    &Deserializer<B>,
    &<B as XmlBackend>::Node,
) -> DeserializationResult<Option<TmxElement>>;

/// Tag-dispatched deserialization engine
pub struct Deserializer<B: XmlBackend> {
    backend: B,
    policy: DeserializationPolicy,
    handlers: HashMap<String, DeserializeHandler<B>>,
}

impl<B: XmlBackend> Deserializer<B> {
    /// Engine with the builtin handler for every TMX element
    pub fn new(backend: B, policy: DeserializationPolicy) -> Self {
        Self::with_handlers(backend, policy, builtin_handlers())
    }

    /// Engine with a caller-supplied handler table
    pub fn with_handlers(
        backend: B,
        policy: DeserializationPolicy,
        handlers: HashMap<String, DeserializeHandler<B>>,
    ) -> Self {
        Self {
            backend,
            policy,
            handlers,
        }
    }

    /// Installs `handler` for `tag`, returning the one it replaces
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        handler: DeserializeHandler<B>,
    ) -> Option<DeserializeHandler<B>> {
        self.handlers.insert(tag.into(), handler)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> &DeserializationPolicy {
        &self.policy
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Dispatches `node` to the handler registered for its tag
    pub fn deserialize(&self, node: &B::Node) -> DeserializationResult<Option<TmxElement>> {
        let tag = self.backend.tag(node);
        log::debug!("deserializing <{}>", tag);

        if let Some(handler) = self.handlers.get(&tag) {
            return handler(self, node);
        }

        let behavior = self
            .policy
            .missing_handler
            .fire(format_args!("no handler registered for <{}>", tag));
        match behavior {
            MissingHandlerBehavior::Raise => Err(DeserializationError::MissingHandler { tag }),
            MissingHandlerBehavior::Ignore => Ok(None),
            MissingHandlerBehavior::DefaultHandler => match builtin_handler::<B>(&tag) {
                Some(handler) => handler(self, node),
                None => Err(DeserializationError::MissingHandler { tag }),
            },
        }
    }

    /// Re-entry point for handlers deserializing a child node
    pub fn emit(&self, node: &B::Node) -> DeserializationResult<Option<TmxElement>> {
        self.deserialize(node)
    }

    /// Emits `node` and checks the result is a `T`
    pub fn emit_as<T>(&self, node: &B::Node) -> DeserializationResult<Option<T>>
    where
        T: TryFrom<TmxElement, Error = TmxElement>,
    {
        let Some(element) = self.emit(node)? else {
            return Ok(None);
        };
        let tag = self.backend.tag(node);
        T::try_from(element)
            .map(Some)
            .map_err(|other| DeserializationError::UnexpectedElement {
                expected: tag.clone(),
                tag,
                found: other.kind(),
            })
    }
}

/// Builtin handler for `tag`, if TMX defines an entity for it
pub fn builtin_handler<B: XmlBackend>(tag: &str) -> Option<DeserializeHandler<B>> {
    let handler: DeserializeHandler<B> = match tag {
        "tmx" => handlers::tmx::<B>,
        "header" => handlers::header::<B>,
        "tu" => handlers::tu::<B>,
        "tuv" => handlers::tuv::<B>,
        "note" => handlers::note::<B>,
        "prop" => handlers::prop::<B>,
        "bpt" => handlers::bpt::<B>,
        "ept" => handlers::ept::<B>,
        "it" => handlers::it::<B>,
        "ph" => handlers::ph::<B>,
        "hi" => handlers::hi::<B>,
        "sub" => handlers::sub::<B>,
        _ => return None,
    };
    Some(handler)
}

/// The full builtin handler table
pub fn builtin_handlers<B: XmlBackend>() -> HashMap<String, DeserializeHandler<B>> {
    crate::model::ElementKind::ALL
        .iter()
        .filter_map(|kind| {
            builtin_handler::<B>(kind.tag()).map(|handler| (kind.tag().to_string(), handler))
        })
        .collect()
}
