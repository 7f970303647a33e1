use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::{
    animator::{AnimModule, Tick},
    color::ColorSample,
    style::{ElementId, StyleSurface},
    Result,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    /// Used on dark backgrounds.
    pub light_color: String,
    /// Used on bright backgrounds.
    pub dark_color: String,
    /// Standard property or custom `--name`.
    pub target_property: String,
    /// Luminance above which the dark color wins.
    pub threshold: f64,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            light_color: "#ffffff".to_string(),
            dark_color: "#000000".to_string(),
            target_property: "color".to_string(),
            threshold: 0.57,
        }
    }
}

impl ContrastConfig {
    pub fn targeting(property: impl Into<String>) -> Self {
        Self {
            target_property: property.into(),
            ..Default::default()
        }
    }

    /// The same colors and threshold, written to `property` instead.
    pub fn retarget(&self, property: impl Into<String>) -> Self {
        Self {
            target_property: property.into(),
            ..self.clone()
        }
    }

    /// Picks the text color for a background luminance. Exactly at the
    /// threshold the light color is chosen.
    pub fn pick(&self, luminance: f64) -> &str {
        if luminance > self.threshold {
            &self.dark_color
        } else {
            &self.light_color
        }
    }

    /// Picks the text color for a CSS background string. Unparseable input
    /// counts as black.
    pub fn resolve(&self, background: &str) -> &str {
        self.pick(ColorSample::parse(background).luminance())
    }
}

/// Keeps an element's text color readable against whatever background shows
/// through behind it.
#[derive(Debug, Clone)]
pub struct TextContrast {
    element: ElementId,
    pub config: ContrastConfig,
}

impl TextContrast {
    pub fn new(element: ElementId, config: ContrastConfig) -> Self {
        Self { element, config }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Re-reads the effective background and writes the matching text color.
    /// Returns the color when a write happened; nothing is written when no
    /// background is found or the value is already current.
    pub fn apply(&self, surface: &mut dyn StyleSurface) -> Option<String> {
        let chosen = {
            let background = surface.effective_background(self.element)?;
            self.config.resolve(background).to_string()
        };

        let current = surface
            .property(self.element, &self.config.target_property)
            .map(str::trim);
        if current == Some(chosen.as_str()) {
            return None;
        }

        surface.set_property(self.element, &self.config.target_property, &chosen);
        tracing::debug!(
            element = self.element.0,
            property = %self.config.target_property,
            color = %chosen,
            "text contrast flipped"
        );
        Some(chosen)
    }
}

impl AnimModule for TextContrast {
    fn update(&mut self, _tick: Tick, surface: &mut dyn StyleSurface) -> Result<()> {
        self.apply(surface);
        Ok(())
    }

    fn label(&self) -> &str {
        "text-contrast"
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
