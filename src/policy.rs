//! Failure policies for malformed input and unwritable entities
//!
//! Each named condition maps to a [`PolicyValue`]: the behavior to apply and
//! the level it is logged at. Behaviors are per-condition enums, so a choice
//! that makes no sense for a condition (say `keep_first` for a bad attribute)
//! cannot be configured at all.
//!
//! A condition is always logged before its behavior is applied, `ignore`
//! included.
//!
//! Policies are plain serde types and load from YAML or JSON through
//! [`crate::config::CodecConfig`]:
//!
//! ```yaml
//! deserialization:
//!   missing_text: { behavior: empty, log_level: warn }
//!   multiple_headers: { behavior: keep_first, log_level: info }
//! ```

use log::Level;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// BEHAVIORS
// ============================================================================

/// Abort with a typed error, or skip and continue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaiseOrIgnore {
    Raise,
    Ignore,
}

/// What to do with a `<note>` / `<prop>` without text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTextBehavior {
    Raise,
    /// Keep the element with no text
    Ignore,
    /// Keep the element with an empty string
    Empty,
}

/// Conflict resolution for children that must appear once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateBehavior {
    Raise,
    KeepFirst,
    KeepLast,
}

/// What the dispatch engine does for a tag or kind it has no handler for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingHandlerBehavior {
    Raise,
    /// Produce nothing for the element
    Ignore,
    /// Fall back to the builtin handler table
    DefaultHandler,
}

/// A behavior and the level its condition is logged at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyValue<B> {
    pub behavior: B,
    pub log_level: Level,
}

impl<B: Copy> PolicyValue<B> {
    pub const fn new(behavior: B, log_level: Level) -> Self {
        Self {
            behavior,
            log_level,
        }
    }

    /// Logs the condition at the configured level, then hands back the behavior to apply
    pub fn fire(&self, message: fmt::Arguments<'_>) -> B {
        log::log!(self.log_level, "{}", message);
        self.behavior
    }
}

const fn raise() -> PolicyValue<RaiseOrIgnore> {
    PolicyValue::new(RaiseOrIgnore::Raise, Level::Error)
}

const fn ignore() -> PolicyValue<RaiseOrIgnore> {
    PolicyValue::new(RaiseOrIgnore::Ignore, Level::Warn)
}

// ============================================================================
// DESERIALIZATION
// ============================================================================

/// Conditions raised while turning XML nodes into entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeserializationPolicy {
    /// A handler was given a node with another tag
    pub invalid_tag: PolicyValue<RaiseOrIgnore>,
    pub required_attribute_missing: PolicyValue<RaiseOrIgnore>,
    /// Integer, date or enum attribute that does not convert
    pub invalid_attribute_value: PolicyValue<RaiseOrIgnore>,
    /// `<note>` / `<prop>` without text
    pub missing_text: PolicyValue<MissingTextBehavior>,
    /// Non-whitespace text inside a structural element
    pub extra_text: PolicyValue<RaiseOrIgnore>,
    /// Child element not allowed where it sits
    pub invalid_child_element: PolicyValue<RaiseOrIgnore>,
    pub multiple_headers: PolicyValue<DuplicateBehavior>,
    pub missing_header: PolicyValue<RaiseOrIgnore>,
    pub multiple_bodies: PolicyValue<DuplicateBehavior>,
    pub missing_body: PolicyValue<RaiseOrIgnore>,
    pub multiple_seg: PolicyValue<DuplicateBehavior>,
    pub missing_seg: PolicyValue<RaiseOrIgnore>,
    pub missing_handler: PolicyValue<MissingHandlerBehavior>,
}

impl Default for DeserializationPolicy {
    fn default() -> Self {
        Self {
            invalid_tag: raise(),
            required_attribute_missing: raise(),
            invalid_attribute_value: raise(),
            missing_text: PolicyValue::new(MissingTextBehavior::Raise, Level::Error),
            extra_text: raise(),
            invalid_child_element: raise(),
            multiple_headers: PolicyValue::new(DuplicateBehavior::Raise, Level::Error),
            missing_header: raise(),
            multiple_bodies: PolicyValue::new(DuplicateBehavior::Raise, Level::Error),
            missing_body: raise(),
            multiple_seg: PolicyValue::new(DuplicateBehavior::Raise, Level::Error),
            missing_seg: raise(),
            missing_handler: PolicyValue::new(MissingHandlerBehavior::Raise, Level::Error),
        }
    }
}

impl DeserializationPolicy {
    /// Raise on everything (the default)
    pub fn strict() -> Self {
        Self::default()
    }

    /// Recover from everything that has a fallback, logging at `warn`
    pub fn lenient() -> Self {
        Self {
            invalid_tag: ignore(),
            required_attribute_missing: ignore(),
            invalid_attribute_value: ignore(),
            missing_text: PolicyValue::new(MissingTextBehavior::Empty, Level::Warn),
            extra_text: ignore(),
            invalid_child_element: ignore(),
            multiple_headers: PolicyValue::new(DuplicateBehavior::KeepFirst, Level::Warn),
            missing_header: ignore(),
            multiple_bodies: PolicyValue::new(DuplicateBehavior::KeepFirst, Level::Warn),
            missing_body: ignore(),
            multiple_seg: PolicyValue::new(DuplicateBehavior::KeepFirst, Level::Warn),
            missing_seg: ignore(),
            missing_handler: PolicyValue::new(MissingHandlerBehavior::DefaultHandler, Level::Warn),
        }
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

/// Conditions raised while turning entities into XML nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializationPolicy {
    /// A required string attribute is empty; `ignore` leaves it out
    pub required_attribute_missing: PolicyValue<RaiseOrIgnore>,
    /// Document version other than 1.4; `ignore` writes 1.4
    pub invalid_attribute_value: PolicyValue<RaiseOrIgnore>,
    /// `<note>` / `<prop>` with no or empty text; `ignore` writes an empty element
    pub missing_text: PolicyValue<RaiseOrIgnore>,
    /// A handler was given an entity kind it does not write
    pub invalid_object_type: PolicyValue<RaiseOrIgnore>,
    pub missing_handler: PolicyValue<MissingHandlerBehavior>,
}

impl Default for SerializationPolicy {
    fn default() -> Self {
        Self {
            required_attribute_missing: raise(),
            invalid_attribute_value: raise(),
            missing_text: raise(),
            invalid_object_type: raise(),
            missing_handler: PolicyValue::new(MissingHandlerBehavior::Raise, Level::Error),
        }
    }
}

impl SerializationPolicy {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            required_attribute_missing: ignore(),
            invalid_attribute_value: ignore(),
            missing_text: ignore(),
            invalid_object_type: ignore(),
            missing_handler: PolicyValue::new(MissingHandlerBehavior::DefaultHandler, Level::Warn),
        }
    }
}
