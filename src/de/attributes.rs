//! Policy-aware accessors shared by every handler
//!
//! Required accessors return `Ok(None)` when the value is unusable and policy
//! said `ignore`: the caller drops its element. Optional accessors return
//! `Ok(None)` for an absent value and for an invalid one under `ignore`.

use super::Deserializer;
use crate::backend::XmlBackend;
use crate::errors::{Cause, DeserializationError, DeserializationResult};
use crate::model::{date, Assoc, Pos, Segtype};
use crate::policy::{DuplicateBehavior, MissingTextBehavior, PolicyValue, RaiseOrIgnore};
use chrono::{DateTime, Utc};

/// A typed attribute value read from its XML lexical form
pub trait AttributeValue: Sized {
    fn parse_attribute(value: &str) -> Result<Self, Cause>;
}

impl AttributeValue for u32 {
    fn parse_attribute(value: &str) -> Result<Self, Cause> {
        Ok(value.trim().parse::<u32>()?)
    }
}

impl AttributeValue for DateTime<Utc> {
    fn parse_attribute(value: &str) -> Result<Self, Cause> {
        Ok(date::parse(value)?)
    }
}

macro_rules! enum_attribute {
    ($($ty:ty),*) => {
        $(
            impl AttributeValue for $ty {
                fn parse_attribute(value: &str) -> Result<Self, Cause> {
                    Ok(value.parse::<$ty>()?)
                }
            }
        )*
    };
}

enum_attribute!(Segtype, Pos, Assoc);

impl<B: XmlBackend> Deserializer<B> {
    /// Applies `invalid_tag` when `node` is not a `<expected>`
    pub fn check_tag(&self, node: &B::Node, expected: &str) -> DeserializationResult<()> {
        let found = self.backend.tag(node);
        if found == expected {
            return Ok(());
        }
        let behavior = self.policy.invalid_tag.fire(format_args!(
            "incorrect tag: expected <{}>, got <{}>",
            expected, found
        ));
        match behavior {
            RaiseOrIgnore::Raise => Err(DeserializationError::InvalidTag {
                expected: expected.to_string(),
                found,
            }),
            RaiseOrIgnore::Ignore => Ok(()),
        }
    }

    pub fn optional_str(&self, node: &B::Node, name: &str) -> Option<String> {
        self.backend.get_attribute(node, name)
    }

    pub fn required_str(&self, node: &B::Node, name: &str) -> DeserializationResult<Option<String>> {
        match self.backend.get_attribute(node, name) {
            Some(value) => Ok(Some(value)),
            None => self.missing_attribute(node, name).map(|()| None),
        }
    }

    pub fn optional_attr<T: AttributeValue>(
        &self,
        node: &B::Node,
        name: &str,
    ) -> DeserializationResult<Option<T>> {
        match self.backend.get_attribute(node, name) {
            Some(value) => self.coerce(node, name, value),
            None => Ok(None),
        }
    }

    pub fn required_attr<T: AttributeValue>(
        &self,
        node: &B::Node,
        name: &str,
    ) -> DeserializationResult<Option<T>> {
        match self.backend.get_attribute(node, name) {
            Some(value) => self.coerce(node, name, value),
            None => self.missing_attribute(node, name).map(|()| None),
        }
    }

    fn missing_attribute(&self, node: &B::Node, name: &str) -> DeserializationResult<()> {
        let tag = self.backend.tag(node);
        let behavior = self
            .policy
            .required_attribute_missing
            .fire(format_args!("missing required attribute '{}' on <{}>", name, tag));
        match behavior {
            RaiseOrIgnore::Raise => Err(DeserializationError::MissingAttribute {
                tag,
                attribute: name.to_string(),
            }),
            RaiseOrIgnore::Ignore => Ok(()),
        }
    }

    fn coerce<T: AttributeValue>(
        &self,
        node: &B::Node,
        name: &str,
        value: String,
    ) -> DeserializationResult<Option<T>> {
        let cause = match T::parse_attribute(&value) {
            Ok(parsed) => return Ok(Some(parsed)),
            Err(cause) => cause,
        };
        let tag = self.backend.tag(node);
        let behavior = self.policy.invalid_attribute_value.fire(format_args!(
            "invalid value '{}' for attribute '{}' on <{}>: {}",
            value, name, tag, cause
        ));
        match behavior {
            RaiseOrIgnore::Raise => Err(DeserializationError::InvalidAttributeValue {
                tag,
                attribute: name.to_string(),
                reason: cause.to_string(),
                value,
                cause: Some(cause),
            }),
            RaiseOrIgnore::Ignore => Ok(None),
        }
    }

    /// Text payload of a `<note>` / `<prop>`, applying `missing_text`
    ///
    /// `Ok(None)` keeps the element without text.
    pub fn required_text(&self, node: &B::Node) -> DeserializationResult<Option<String>> {
        if let Some(text) = self.backend.get_text(node).filter(|text| !text.is_empty()) {
            return Ok(Some(text));
        }
        let tag = self.backend.tag(node);
        let behavior = self
            .policy
            .missing_text
            .fire(format_args!("<{}> has no text content", tag));
        match behavior {
            MissingTextBehavior::Raise => Err(DeserializationError::MissingText { tag }),
            MissingTextBehavior::Ignore => Ok(None),
            MissingTextBehavior::Empty => Ok(Some(String::new())),
        }
    }

    /// Applies `extra_text` when a structural element holds non-whitespace text
    pub fn check_extra_text(&self, node: &B::Node) -> DeserializationResult<()> {
        let Some(text) = self.backend.get_text(node) else {
            return Ok(());
        };
        if text.trim().is_empty() {
            return Ok(());
        }
        let tag = self.backend.tag(node);
        let behavior = self
            .policy
            .extra_text
            .fire(format_args!("<{}> has unexpected text content '{}'", tag, text));
        match behavior {
            RaiseOrIgnore::Raise => Err(DeserializationError::ExtraText { tag, text }),
            RaiseOrIgnore::Ignore => Ok(()),
        }
    }

    /// Applies `invalid_child_element`; `Ok` means skip the child
    pub fn invalid_child(&self, parent: &str, child: &str) -> DeserializationResult<()> {
        let behavior = self
            .policy
            .invalid_child_element
            .fire(format_args!("<{}> is not allowed inside <{}>", child, parent));
        match behavior {
            RaiseOrIgnore::Raise => Err(DeserializationError::InvalidChild {
                parent: parent.to_string(),
                child: child.to_string(),
            }),
            RaiseOrIgnore::Ignore => Ok(()),
        }
    }

    /// Resolves a repeated singleton child; `Ok(true)` means the new one replaces the old
    pub fn replace_duplicate(
        &self,
        condition: &PolicyValue<DuplicateBehavior>,
        parent: &str,
        child: &str,
    ) -> DeserializationResult<bool> {
        let behavior =
            condition.fire(format_args!("<{}> contains more than one <{}>", parent, child));
        match behavior {
            DuplicateBehavior::Raise => Err(DeserializationError::DuplicateChild {
                parent: parent.to_string(),
                child: child.to_string(),
            }),
            DuplicateBehavior::KeepFirst => Ok(false),
            DuplicateBehavior::KeepLast => Ok(true),
        }
    }

    /// Applies a `missing_*` condition; `Ok` means carry on without the child
    pub fn missing_child(
        &self,
        condition: &PolicyValue<RaiseOrIgnore>,
        parent: &str,
        child: &str,
    ) -> DeserializationResult<()> {
        let behavior = condition.fire(format_args!("<{}> is missing its <{}>", parent, child));
        match behavior {
            RaiseOrIgnore::Raise => Err(DeserializationError::MissingChild {
                parent: parent.to_string(),
                child: child.to_string(),
            }),
            RaiseOrIgnore::Ignore => Ok(()),
        }
    }
}
