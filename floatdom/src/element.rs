//! Element tree: ids, parent links and laid-out rectangles.
//!
//! The tree does not render anything. It records where the caller's elements
//! ended up so that containment ("is this click inside the dropdown?") and
//! hit testing can be answered without a real DOM.

use std::collections::HashMap;

use crate::layout::Rect;

#[derive(Debug, Clone)]
struct Node {
    parent: Option<String>,
    rect: Rect,
    /// Stacking layer. Overlay surfaces use a higher layer than page content.
    layer: i32,
    /// Insertion sequence, later elements paint on top of earlier siblings.
    order: u64,
}

#[derive(Debug, Default)]
pub struct ElementTree {
    nodes: HashMap<String, Node>,
    next_order: u64,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an element.
    ///
    /// Replacing keeps the paint order of the original insertion.
    pub fn insert(&mut self, id: impl Into<String>, parent: Option<&str>, rect: Rect) {
        self.insert_layered(id, parent, rect, 0);
    }

    /// Insert an element on an explicit stacking layer.
    pub fn insert_layered(
        &mut self,
        id: impl Into<String>,
        parent: Option<&str>,
        rect: Rect,
        layer: i32,
    ) {
        let id = id.into();
        let order = match self.nodes.get(&id) {
            Some(existing) => existing.order,
            None => {
                self.next_order += 1;
                self.next_order
            }
        };
        self.nodes.insert(
            id,
            Node {
                parent: parent.map(str::to_string),
                rect,
                layer,
                order,
            },
        );
    }

    /// Update the rectangle of an existing element.
    /// Returns false if the element is unknown.
    pub fn set_rect(&mut self, id: &str, rect: Rect) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Remove an element and all of its descendants.
    pub fn remove(&mut self, id: &str) {
        let doomed: Vec<String> = self
            .nodes
            .keys()
            .filter(|candidate| self.contains(id, candidate))
            .cloned()
            .collect();
        for key in doomed {
            self.nodes.remove(&key);
        }
    }

    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.nodes.get(id).map(|node| node.rect)
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|node| node.parent.as_deref())
    }

    pub fn exists(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: &str, node: &str) -> bool {
        let mut current = Some(node);
        // Bounded walk: a malformed parent cycle must not hang the caller.
        let mut remaining = self.nodes.len() + 1;
        while let Some(id) = current {
            if id == ancestor {
                return self.nodes.contains_key(id);
            }
            if remaining == 0 {
                log::warn!("[element] parent cycle detected at {}", id);
                return false;
            }
            remaining -= 1;
            current = self.parent(id);
        }
        false
    }

    fn depth(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            if depth > self.nodes.len() {
                break;
            }
            current = self.parent(parent);
        }
        depth
    }

    /// Find the topmost element at the given coordinates.
    ///
    /// Higher layers win, then deeper elements, then later insertions.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<String> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.rect.contains(x, y))
            .max_by_key(|(id, node)| (node.layer, self.depth(id), node.order))
            .map(|(id, _)| id.clone())
    }
}
