//! Attribute emitters and policy conditions for handlers

use super::Serializer;
use crate::backend::XmlBackend;
use crate::errors::{SerializationError, SerializationResult};
use crate::model::{date, ElementKind, TMX_VERSION};
use crate::policy::RaiseOrIgnore;
use chrono::{DateTime, Utc};

impl<B: XmlBackend> Serializer<B> {
    pub fn set_optional_str(&self, node: &B::Node, name: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.backend.set_attribute(node, name, value);
        }
    }

    /// Writes a required attribute; an empty value applies `required_attribute_missing`
    pub fn set_required_str(&self, node: &B::Node, name: &str, value: &str) -> SerializationResult<()> {
        if !value.is_empty() {
            self.backend.set_attribute(node, name, value);
            return Ok(());
        }
        let tag = self.backend.tag(node);
        let behavior = self
            .policy
            .required_attribute_missing
            .fire(format_args!("required attribute '{}' of <{}> is empty", name, tag));
        match behavior {
            RaiseOrIgnore::Raise => Err(SerializationError::MissingAttribute {
                tag,
                attribute: name.to_string(),
            }),
            RaiseOrIgnore::Ignore => Ok(()),
        }
    }

    /// Text of a `<note>` / `<prop>`; missing or empty text applies `missing_text`
    pub fn set_required_text(&self, node: &B::Node, text: Option<&str>) -> SerializationResult<()> {
        if let Some(text) = text.filter(|text| !text.is_empty()) {
            self.backend.set_text(node, Some(text));
            return Ok(());
        }
        let tag = self.backend.tag(node);
        let behavior = self
            .policy
            .missing_text
            .fire(format_args!("<{}> has no text to write", tag));
        match behavior {
            RaiseOrIgnore::Raise => Err(SerializationError::MissingText { tag }),
            RaiseOrIgnore::Ignore => Ok(()),
        }
    }

    pub fn set_optional_int(&self, node: &B::Node, name: &str, value: Option<u32>) {
        if let Some(value) = value {
            self.backend.set_attribute(node, name, &value.to_string());
        }
    }

    pub fn set_optional_date(&self, node: &B::Node, name: &str, value: Option<&DateTime<Utc>>) {
        if let Some(value) = value {
            self.backend.set_attribute(node, name, &date::format(value));
        }
    }

    /// Applies `invalid_attribute_value` to a document version other than 1.4
    pub fn check_version(&self, version: &str) -> SerializationResult<()> {
        if version == TMX_VERSION {
            return Ok(());
        }
        let behavior = self.policy.invalid_attribute_value.fire(format_args!(
            "cannot write TMX version '{}', only {} is supported",
            version, TMX_VERSION
        ));
        match behavior {
            RaiseOrIgnore::Raise => Err(SerializationError::InvalidAttributeValue {
                tag: "tmx".to_string(),
                attribute: "version".to_string(),
                value: version.to_string(),
                reason: format!("only TMX {} is written", TMX_VERSION),
            }),
            RaiseOrIgnore::Ignore => Ok(()),
        }
    }

    /// Applies `invalid_object_type` for a handler handed the wrong variant
    pub fn invalid_object_type(
        &self,
        handler: ElementKind,
        found: ElementKind,
    ) -> SerializationResult<Option<B::Node>> {
        let behavior = self
            .policy
            .invalid_object_type
            .fire(format_args!("handler for {} cannot serialize a {}", handler, found));
        match behavior {
            RaiseOrIgnore::Raise => Err(SerializationError::InvalidObjectType { handler, found }),
            RaiseOrIgnore::Ignore => Ok(None),
        }
    }
}
