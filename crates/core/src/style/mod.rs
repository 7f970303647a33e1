use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The property that carries an element's own background.
pub const BACKGROUND_COLOR: &str = "background-color";

/// Handle to an element owned by a [`StyleSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

/// Get/set access to named visual properties plus the computed background
/// query the color modules rely on.
///
/// Property names are either standard (`color`, `background-color`) or
/// custom (`--line`); implementations store both the same way.
pub trait StyleSurface {
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    fn property(&self, element: ElementId, name: &str) -> Option<&str>;

    fn set_property(&mut self, element: ElementId, name: &str, value: &str);

    /// Background color as computed for `element` alone, without looking at
    /// ancestors.
    fn computed_background(&self, element: ElementId) -> Option<&str>;

    /// Replaces the text content of `element`.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// First non-transparent background found walking from `element` up
    /// through its ancestors.
    fn effective_background(&self, element: ElementId) -> Option<&str> {
        let mut current = Some(element);
        while let Some(el) = current {
            if let Some(bg) = self.computed_background(el) {
                if !is_transparent(bg) {
                    return Some(bg);
                }
            }
            current = self.parent(el);
        }
        None
    }
}

/// Whether a computed background shows nothing of its own.
pub fn is_transparent(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == "transparent" || value == "rgba(0, 0, 0, 0)"
}

#[derive(Debug, Default, Clone)]
struct Node {
    name: String,
    parent: Option<ElementId>,
    properties: HashMap<String, String>,
    text: String,
}

/// In-memory element tree with inline styles.
#[derive(Debug, Default, Clone)]
pub struct StyleTree {
    nodes: Vec<Node>,
}

impl StyleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element, optionally beneath `parent`.
    pub fn insert(&mut self, name: impl Into<String>, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            parent,
            ..Default::default()
        });
        id
    }

    pub fn name(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(element.0).map(|node| node.name.as_str())
    }

    pub fn text(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(element.0).map(|node| node.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl StyleSurface for StyleTree {
    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element.0).and_then(|node| node.parent)
    }

    fn property(&self, element: ElementId, name: &str) -> Option<&str> {
        self.nodes
            .get(element.0)
            .and_then(|node| node.properties.get(name))
            .map(String::as_str)
    }

    fn set_property(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.properties.insert(name.to_string(), value.to_string());
        }
    }

    fn computed_background(&self, element: ElementId) -> Option<&str> {
        self.property(element, BACKGROUND_COLOR)
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.text.clear();
            node.text.push_str(text);
        }
    }
}
