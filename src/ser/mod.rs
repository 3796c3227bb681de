//! Object model → XML tree
//!
//! The mirror image of [`crate::de`]: handlers keyed by the runtime
//! [`ElementKind`] of the entity, each building one node through the
//! backend and calling back into the engine for its children.

mod attributes;
pub mod content;
pub mod handlers;

pub use content::{PartRef, SerializablePart};

use crate::backend::XmlBackend;
use crate::errors::{SerializationError, SerializationResult};
use crate::model::{ElementKind, ElementRef};
use crate::policy::{MissingHandlerBehavior, SerializationPolicy};
use std::collections::HashMap;

/// Builds the node for one entity; `Ok(None)` means omitted by policy
pub type SerializeHandler<B> = fn(
    &Serializer<B>,
    ElementRef<'_>,
) -> SerializationResult<Option<<B as XmlBackend>::Node>>;

/// Kind-dispatched serialization engine
pub struct Serializer<B: XmlBackend> {
    backend: B,
    policy: SerializationPolicy,
    handlers: HashMap<ElementKind, SerializeHandler<B>>,
}

impl<B: XmlBackend> Serializer<B> {
    pub fn new(backend: B, policy: SerializationPolicy) -> Self {
        Self::with_handlers(backend, policy, builtin_handlers())
    }

    pub fn with_handlers(
        backend: B,
        policy: SerializationPolicy,
        handlers: HashMap<ElementKind, SerializeHandler<B>>,
    ) -> Self {
        Self {
            backend,
            policy,
            handlers,
        }
    }

    pub fn register(
        &mut self,
        kind: ElementKind,
        handler: SerializeHandler<B>,
    ) -> Option<SerializeHandler<B>> {
        self.handlers.insert(kind, handler)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> &SerializationPolicy {
        &self.policy
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Dispatches `element` to the handler registered for its kind
    pub fn serialize<'a>(
        &self,
        element: impl Into<ElementRef<'a>>,
    ) -> SerializationResult<Option<B::Node>> {
        let element = element.into();
        let kind = element.kind();
        log::debug!("serializing {}", kind);

        if let Some(handler) = self.handlers.get(&kind) {
            return handler(self, element);
        }

        let behavior = self
            .policy
            .missing_handler
            .fire(format_args!("no handler registered for {}", kind));
        match behavior {
            MissingHandlerBehavior::Raise => Err(SerializationError::MissingHandler { kind }),
            MissingHandlerBehavior::Ignore => Ok(None),
            MissingHandlerBehavior::DefaultHandler => builtin_handler::<B>(kind)(self, element),
        }
    }

    /// Re-entry point for handlers serializing a child entity
    pub fn emit(&self, element: ElementRef<'_>) -> SerializationResult<Option<B::Node>> {
        self.serialize(element)
    }

    /// Serializes `element` and appends the result to `parent`
    pub fn append<'a>(
        &self,
        parent: &B::Node,
        element: impl Into<ElementRef<'a>>,
    ) -> SerializationResult<()> {
        if let Some(child) = self.emit(element.into())? {
            self.backend.append_child(parent, &child);
        }
        Ok(())
    }
}

/// Builtin handler for `kind`; every kind has one
pub fn builtin_handler<B: XmlBackend>(kind: ElementKind) -> SerializeHandler<B> {
    let handler: SerializeHandler<B> = match kind {
        ElementKind::Tmx => handlers::tmx::<B>,
        ElementKind::Header => handlers::header::<B>,
        ElementKind::Tu => handlers::tu::<B>,
        ElementKind::Tuv => handlers::tuv::<B>,
        ElementKind::Note => handlers::note::<B>,
        ElementKind::Prop => handlers::prop::<B>,
        ElementKind::Bpt => handlers::bpt::<B>,
        ElementKind::Ept => handlers::ept::<B>,
        ElementKind::It => handlers::it::<B>,
        ElementKind::Ph => handlers::ph::<B>,
        ElementKind::Hi => handlers::hi::<B>,
        ElementKind::Sub => handlers::sub::<B>,
    };
    handler
}

pub fn builtin_handlers<B: XmlBackend>() -> HashMap<ElementKind, SerializeHandler<B>> {
    ElementKind::ALL
        .iter()
        .map(|kind| (*kind, builtin_handler::<B>(*kind)))
        .collect()
}
