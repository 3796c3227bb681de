//! Reference-counted element tree, parsed with `roxmltree`
//!
//! Whole documents go through `roxmltree` and are copied into mutable
//! [`DomNode`]s. Attribute keys are stored in Clark notation
//! (`{http://www.w3.org/XML/1998/namespace}lang`), the way namespace-aware
//! trees keep them, and normalized on the way out. Attributes in any other
//! namespace are dropped on import. Streaming uses the shared
//! quick-xml builder.

use super::encoding::DecodedSource;
use super::{clark_key, local_name, normalize_key, TagSet, XmlBackend, XML_NAMESPACE};
use crate::errors::BackendResult;
use std::cell::RefCell;
use std::fmt;
use std::io::{BufRead, Read};
use std::rc::Rc;

#[derive(Default)]
struct DomElement {
    tag: String,
    /// Clark-notation keys
    attributes: Vec<(String, String)>,
    text: Option<String>,
    tail: Option<String>,
    children: Vec<DomNode>,
}

/// Shared handle to one element; clones point at the same element
#[derive(Clone)]
pub struct DomNode(Rc<RefCell<DomElement>>);

impl DomNode {
    fn new(tag: &str) -> Self {
        DomNode(Rc::new(RefCell::new(DomElement {
            tag: local_name(tag).to_string(),
            ..DomElement::default()
        })))
    }

    pub fn ptr_eq(&self, other: &DomNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for DomNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DomNode {}

impl fmt::Debug for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = self.0.borrow();
        f.debug_struct("DomNode")
            .field("tag", &element.tag)
            .field("children", &element.children.len())
            .finish()
    }
}

/// Element tree of shared, mutable nodes
#[derive(Debug, Default, Clone)]
pub struct DomBackend;

impl DomBackend {
    pub fn new() -> Self {
        DomBackend
    }

    fn import(&self, source: roxmltree::Node<'_, '_>) -> DomNode {
        let node = DomNode::new(source.tag_name().name());
        {
            let mut element = node.0.borrow_mut();
            for attribute in source.attributes() {
                let key = match attribute.namespace() {
                    Some(XML_NAMESPACE) => format!("{{{}}}{}", XML_NAMESPACE, attribute.name()),
                    Some(namespace) => {
                        log::debug!(
                            "dropping attribute '{}' in foreign namespace {} on <{}>",
                            attribute.name(),
                            namespace,
                            element.tag
                        );
                        continue;
                    }
                    None => attribute.name().to_string(),
                };
                element.attributes.push((key, attribute.value().to_string()));
            }
        }

        let mut last_child: Option<DomNode> = None;
        for child in source.children() {
            if child.is_element() {
                let imported = self.import(child);
                node.0.borrow_mut().children.push(imported.clone());
                last_child = Some(imported);
            } else if child.is_text() {
                let text = child.text().unwrap_or_default();
                let target = last_child.as_ref().unwrap_or(&node);
                let mut element = target.0.borrow_mut();
                let slot = if last_child.is_some() {
                    &mut element.tail
                } else {
                    &mut element.text
                };
                slot.get_or_insert_with(String::new).push_str(text);
            }
        }
        node
    }
}

impl XmlBackend for DomBackend {
    type Node = DomNode;

    fn tag(&self, node: &DomNode) -> String {
        node.0.borrow().tag.clone()
    }

    fn make_node(&self, tag: &str) -> DomNode {
        DomNode::new(tag)
    }

    fn get_attribute(&self, node: &DomNode, name: &str) -> Option<String> {
        let key = clark_key(name);
        node.0
            .borrow()
            .attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&self, node: &DomNode, name: &str, value: &str) {
        let key = clark_key(name).into_owned();
        let mut element = node.0.borrow_mut();
        match element.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element.attributes.push((key, value.to_string())),
        }
    }

    fn attributes(&self, node: &DomNode) -> Vec<(String, String)> {
        node.0
            .borrow()
            .attributes
            .iter()
            .map(|(k, v)| (normalize_key(k).into_owned(), v.clone()))
            .collect()
    }

    fn get_text(&self, node: &DomNode) -> Option<String> {
        node.0.borrow().text.clone()
    }

    fn set_text(&self, node: &DomNode, text: Option<&str>) {
        node.0.borrow_mut().text = text.map(str::to_string);
    }

    fn get_tail(&self, node: &DomNode) -> Option<String> {
        node.0.borrow().tail.clone()
    }

    fn set_tail(&self, node: &DomNode, tail: Option<&str>) {
        node.0.borrow_mut().tail = tail.map(str::to_string);
    }

    fn append_child(&self, parent: &DomNode, child: &DomNode) {
        if parent.ptr_eq(child) {
            return;
        }
        parent.0.borrow_mut().children.push(child.clone());
    }

    fn remove_child(&self, parent: &DomNode, child: &DomNode) {
        parent
            .0
            .borrow_mut()
            .children
            .retain(|existing| !existing.ptr_eq(child));
    }

    fn children(&self, node: &DomNode, filter: Option<&TagSet>) -> Vec<DomNode> {
        node.0
            .borrow()
            .children
            .iter()
            .filter(|child| filter.map_or(true, |filter| filter.contains(&child.0.borrow().tag)))
            .cloned()
            .collect()
    }

    fn clear(&self, node: &DomNode) {
        let mut element = node.0.borrow_mut();
        element.attributes.clear();
        element.text = None;
        element.tail = None;
        element.children.clear();
    }

    fn parse<R: BufRead>(&self, source: R) -> BackendResult<DomNode> {
        let mut content = String::new();
        DecodedSource::new(source).read_to_string(&mut content)?;
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let document = roxmltree::Document::parse_with_options(&content, options)?;
        Ok(self.import(document.root_element()))
    }
}
