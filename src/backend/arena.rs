//! Arena-allocated element tree (the default backend)
//!
//! Nodes live in one `Vec` and are addressed by [`NodeId`]. Released slots go
//! on a free list and are reused, so a streaming parse that removes each
//! completed subtree keeps the arena at the size of the largest open subtree.

use super::{local_name, normalize_key, TagSet, XmlBackend};
use std::cell::RefCell;

/// Handle to a node in an [`ArenaBackend`]
///
/// Handles are only meaningful for the backend that issued them. Accessing a
/// released node is a no-op that reads as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    tail: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug, Default)]
struct Arena {
    slots: Vec<Option<NodeData>>,
    free: Vec<usize>,
}

impl Arena {
    fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn detach(&mut self, child: NodeId) {
        let parent = self.get_mut(child).and_then(|data| data.parent.take());
        if let Some(parent) = parent.and_then(|parent| self.get_mut(parent)) {
            parent.children.retain(|id| *id != child);
        }
    }

    /// Frees `id` and its descendants
    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.slots.get_mut(current.0).and_then(Option::take) {
                stack.extend(data.children);
                self.free.push(current.0);
            }
        }
    }
}

/// Element tree backed by a slot arena
#[derive(Debug, Default)]
pub struct ArenaBackend {
    arena: RefCell<Arena>,
}

impl ArenaBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes currently allocated
    pub fn live_nodes(&self) -> usize {
        let arena = self.arena.borrow();
        arena.slots.len() - arena.free.len()
    }

    /// Parent of `node`, if attached
    pub fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.arena.borrow().get(*node).and_then(|data| data.parent)
    }

    fn read<T>(&self, id: NodeId, f: impl FnOnce(&NodeData) -> T) -> Option<T> {
        self.arena.borrow().get(id).map(f)
    }

    fn update(&self, id: NodeId, f: impl FnOnce(&mut NodeData)) {
        if let Some(data) = self.arena.borrow_mut().get_mut(id) {
            f(data);
        }
    }
}

impl XmlBackend for ArenaBackend {
    type Node = NodeId;

    fn tag(&self, node: &NodeId) -> String {
        self.read(*node, |data| data.tag.clone()).unwrap_or_default()
    }

    fn make_node(&self, tag: &str) -> NodeId {
        let data = NodeData {
            tag: local_name(tag).to_string(),
            ..NodeData::default()
        };
        let mut arena = self.arena.borrow_mut();
        match arena.free.pop() {
            Some(index) => {
                arena.slots[index] = Some(data);
                NodeId(index)
            }
            None => {
                arena.slots.push(Some(data));
                NodeId(arena.slots.len() - 1)
            }
        }
    }

    fn get_attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let key = normalize_key(name);
        self.read(*node, |data| {
            data.attributes
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        })
        .flatten()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        let key = normalize_key(name).into_owned();
        self.update(*node, |data| {
            match data.attributes.iter_mut().find(|(k, _)| *k == key) {
                Some((_, existing)) => *existing = value.to_string(),
                None => data.attributes.push((key, value.to_string())),
            }
        });
    }

    fn attributes(&self, node: &NodeId) -> Vec<(String, String)> {
        self.read(*node, |data| data.attributes.clone())
            .unwrap_or_default()
    }

    fn get_text(&self, node: &NodeId) -> Option<String> {
        self.read(*node, |data| data.text.clone()).flatten()
    }

    fn set_text(&self, node: &NodeId, text: Option<&str>) {
        self.update(*node, |data| data.text = text.map(str::to_string));
    }

    fn get_tail(&self, node: &NodeId) -> Option<String> {
        self.read(*node, |data| data.tail.clone()).flatten()
    }

    fn set_tail(&self, node: &NodeId, tail: Option<&str>) {
        self.update(*node, |data| data.tail = tail.map(str::to_string));
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        let mut arena = self.arena.borrow_mut();
        if arena.get(*parent).is_none() || arena.get(*child).is_none() {
            return;
        }
        arena.detach(*child);
        if let Some(data) = arena.get_mut(*child) {
            data.parent = Some(*parent);
        }
        if let Some(data) = arena.get_mut(*parent) {
            data.children.push(*child);
        }
    }

    fn remove_child(&self, parent: &NodeId, child: &NodeId) {
        let mut arena = self.arena.borrow_mut();
        let attached = arena
            .get(*child)
            .map_or(false, |data| data.parent == Some(*parent));
        if !attached {
            return;
        }
        arena.detach(*child);
        arena.release(*child);
    }

    fn children(&self, node: &NodeId, filter: Option<&TagSet>) -> Vec<NodeId> {
        let arena = self.arena.borrow();
        let Some(data) = arena.get(*node) else {
            return Vec::new();
        };
        data.children
            .iter()
            .copied()
            .filter(|child| match filter {
                None => true,
                Some(filter) => arena
                    .get(*child)
                    .map_or(false, |child| filter.contains(&child.tag)),
            })
            .collect()
    }

    fn clear(&self, node: &NodeId) {
        let mut arena = self.arena.borrow_mut();
        let children = match arena.get_mut(*node) {
            Some(data) => {
                data.attributes.clear();
                data.text = None;
                data.tail = None;
                std::mem::take(&mut data.children)
            }
            None => return,
        };
        for child in children {
            arena.release(child);
        }
    }
}
