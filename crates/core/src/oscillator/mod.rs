//! Background color oscillation.
//!
//! Hue turns continuously and accumulates across ticks. Saturation and
//! lightness swing sinusoidally between their bounds as pure functions of
//! the absolute frame time, so every oscillator shares one phase reference
//! regardless of when it was created.

use std::any::Any;
use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    animator::{AnimModule, Tick},
    color::Hsl,
    style::{ElementId, StyleSurface, BACKGROUND_COLOR},
    Result,
};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Tunables for a [`ColorShift`]. Bounds are percentages, speeds are per
/// minute. Nothing is validated: `min > max` simply inverts the swing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorConfig {
    /// Initial hue in degrees; drawn uniformly from `[0, 360)` when unset.
    pub starting_hue: Option<f64>,
    pub style_property: String,
    pub sat_min: f64,
    pub sat_max: f64,
    pub light_min: f64,
    pub light_max: f64,
    /// Full hue rotations per minute.
    pub hue_speed_rpm: f64,
    /// Saturation cycles per minute.
    pub sat_speed_cpm: f64,
    /// Lightness cycles per minute.
    pub light_speed_cpm: f64,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            starting_hue: None,
            style_property: BACKGROUND_COLOR.to_string(),
            sat_min: 30.0,
            sat_max: 100.0,
            light_min: 40.0,
            light_max: 75.0,
            hue_speed_rpm: 0.2,
            sat_speed_cpm: 1.0,
            light_speed_cpm: 0.6,
        }
    }
}

impl OscillatorConfig {
    /// Degrees of hue turned over `dt_ms`.
    pub fn hue_delta(&self, dt_ms: f64) -> f64 {
        self.hue_speed_rpm * 360.0 * dt_ms / MS_PER_MINUTE
    }

    pub fn saturation_at(&self, time_ms: f64) -> f64 {
        swing(self.sat_min, self.sat_max, self.sat_speed_cpm, time_ms)
    }

    pub fn lightness_at(&self, time_ms: f64) -> f64 {
        swing(self.light_min, self.light_max, self.light_speed_cpm, time_ms)
    }
}

/// `mid + amp * sin(2π * cpm * t / 60000)`.
fn swing(min: f64, max: f64, cycles_per_minute: f64, time_ms: f64) -> f64 {
    let mid = (min + max) / 2.0;
    let amp = (max - min) / 2.0;
    mid + amp * (TAU * cycles_per_minute * time_ms / MS_PER_MINUTE).sin()
}

/// Animates one style property of one element through HSL space.
#[derive(Debug, Clone)]
pub struct ColorShift {
    element: ElementId,
    hue: f64,
    readout: Option<ElementId>,
    current: Option<Hsl>,
    /// Read afresh on every update, so edits take effect on the next tick.
    pub config: OscillatorConfig,
}

impl ColorShift {
    pub fn new(element: ElementId, config: OscillatorConfig) -> Self {
        Self::with_rng(element, config, &mut rand::thread_rng())
    }

    /// Like [`ColorShift::new`], drawing any random starting hue from `rng`.
    pub fn with_rng<R: Rng>(element: ElementId, config: OscillatorConfig, rng: &mut R) -> Self {
        let hue = config
            .starting_hue
            .unwrap_or_else(|| rng.gen_range(0.0..360.0));
        Self {
            element,
            hue,
            readout: None,
            current: None,
            config,
        }
    }

    /// Mirrors every computed color as text into `element`.
    pub fn attach_readout(&mut self, element: ElementId) {
        self.readout = Some(element);
    }

    pub fn detach_readout(&mut self) {
        self.readout = None;
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// Color written by the most recent update.
    pub fn current(&self) -> Option<Hsl> {
        self.current
    }

    /// Advances the hue by `dt` and evaluates saturation and lightness at
    /// `time`, without touching any surface.
    pub fn advance(&mut self, time: f64, dt: f64) -> Hsl {
        let hue = (self.hue + self.config.hue_delta(dt)).rem_euclid(360.0);
        // rem_euclid rounds tiny negative values up to exactly 360
        self.hue = if hue >= 360.0 { 0.0 } else { hue };
        let hsl = Hsl::new(
            self.hue,
            self.config.saturation_at(time),
            self.config.lightness_at(time),
        );
        self.current = Some(hsl);
        hsl
    }
}

impl AnimModule for ColorShift {
    fn update(&mut self, tick: Tick, surface: &mut dyn StyleSurface) -> Result<()> {
        let color = self.advance(tick.time, tick.dt).to_string();
        surface.set_property(self.element, &self.config.style_property, &color);
        if let Some(readout) = self.readout {
            surface.set_text(readout, &color);
        }
        tracing::trace!(element = self.element.0, %color, "color shift");
        Ok(())
    }

    fn label(&self) -> &str {
        "color-shift"
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::style::StyleTree;

    fn config(starting_hue: f64) -> OscillatorConfig {
        OscillatorConfig {
            starting_hue: Some(starting_hue),
            ..Default::default()
        }
    }

    #[test]
    fn one_rotation_per_minute_returns_to_start() {
        let mut shift = ColorShift::new(
            ElementId(0),
            OscillatorConfig {
                hue_speed_rpm: 1.0,
                ..config(45.0)
            },
        );
        for i in 1..=60 {
            shift.advance(f64::from(i) * 1000.0, 1000.0);
        }
        assert!((shift.hue() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn sixty_rpm_wraps_a_full_turn_in_one_second() {
        let mut shift = ColorShift::new(
            ElementId(0),
            OscillatorConfig {
                hue_speed_rpm: 60.0,
                ..config(0.0)
            },
        );
        shift.advance(1000.0, 1000.0);
        assert_eq!(shift.hue(), 0.0);
    }

    #[test]
    fn reverse_rotation_stays_below_a_full_turn() {
        let mut shift = ColorShift::new(
            ElementId(0),
            OscillatorConfig {
                hue_speed_rpm: -1.0,
                ..config(0.0)
            },
        );
        shift.advance(0.0, 1e-14);
        assert!((0.0..360.0).contains(&shift.hue()), "hue = {}", shift.hue());

        shift.advance(15_000.0, 15_000.0);
        assert!((shift.hue() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn saturation_and_lightness_depend_only_on_absolute_time() {
        let mut shift = ColorShift::new(ElementId(0), config(10.0));
        let a = shift.advance(12_345.0, 16.0);
        let b = shift.advance(12_345.0, 900.0);
        assert_eq!(a.s, b.s);
        assert_eq!(a.l, b.l);
        assert_ne!(a.h, b.h);

        let other = ColorShift::new(ElementId(1), config(200.0)).advance(12_345.0, 0.0);
        assert_eq!(other.s, a.s);
        assert_eq!(other.l, a.l);
    }

    #[test]
    fn swing_starts_at_midpoint_and_peaks_at_quarter_period() {
        let cfg = OscillatorConfig::default();
        assert!((cfg.saturation_at(0.0) - 65.0).abs() < 1e-9);
        // 1 cycle per minute peaks at 15 seconds
        assert!((cfg.saturation_at(15_000.0) - 100.0).abs() < 1e-9);
        assert!((cfg.saturation_at(45_000.0) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_bounds_flip_the_swing() {
        let cfg = OscillatorConfig {
            sat_min: 100.0,
            sat_max: 30.0,
            ..Default::default()
        };
        assert!((cfg.saturation_at(15_000.0) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn config_edits_apply_on_the_next_update() {
        let mut shift = ColorShift::new(ElementId(0), config(0.0));
        shift.config.hue_speed_rpm = 60.0 / 4.0;
        shift.advance(1000.0, 1000.0);
        assert!((shift.hue() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn random_starting_hue_is_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let shift = ColorShift::with_rng(ElementId(0), OscillatorConfig::default(), &mut rng);
            assert!((0.0..360.0).contains(&shift.hue()));
        }
    }

    #[test]
    fn update_writes_property_and_readout() {
        let mut tree = StyleTree::new();
        let root = tree.insert("html", None);
        let info = tree.insert("colorInfo", Some(root));

        let mut shift = ColorShift::new(
            root,
            OscillatorConfig {
                hue_speed_rpm: 0.0,
                ..config(120.0)
            },
        );
        shift.attach_readout(info);
        shift
            .update(Tick { time: 0.0, dt: 0.0 }, &mut tree)
            .unwrap();

        assert_eq!(
            tree.property(root, BACKGROUND_COLOR),
            Some("hsl(120.0, 65.0%, 57.5%)")
        );
        assert_eq!(tree.text(info), Some("hsl(120.0, 65.0%, 57.5%)"));
    }
}
