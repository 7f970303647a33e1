use serde::{Deserialize, Serialize};

use crate::{
    geometry::{ShapeDescriptor, SHAPE_DESCRIPTORS},
    Result, ShapesError,
};

/// Which shapes from the descriptor table are currently drawn. Owned by the
/// host and passed to the draw step explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeVisibility {
    entries: Vec<(String, bool)>,
}

impl Default for ShapeVisibility {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeVisibility {
    /// One entry per descriptor, all hidden.
    pub fn new() -> Self {
        Self {
            entries: SHAPE_DESCRIPTORS
                .iter()
                .map(|d| (d.key.to_string(), false))
                .collect(),
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, visible)| k == key && *visible)
    }

    /// Toggles a shape, as a UI checkbox would.
    pub fn set(&mut self, key: &str, visible: bool) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .ok_or_else(|| ShapesError::UnknownShape(key.to_string()))?;
        entry.1 = visible;
        Ok(())
    }

    pub fn hide_all(&mut self) {
        for entry in &mut self.entries {
            entry.1 = false;
        }
    }

    /// Shows exactly the shapes in `keys`. Keys outside the table are
    /// skipped.
    pub fn apply_combo<S: AsRef<str>>(&mut self, keys: &[S]) {
        self.hide_all();
        for key in keys {
            if self.set(key.as_ref(), true).is_err() {
                tracing::debug!(key = key.as_ref(), "combo references unknown shape");
            }
        }
    }

    /// Visible descriptors in table order.
    pub fn visible_descriptors(&self) -> impl Iterator<Item = &'static ShapeDescriptor> + '_ {
        SHAPE_DESCRIPTORS
            .iter()
            .filter(move |d| self.is_visible(d.key))
    }

    pub fn visible_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, visible)| *visible)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
