//! Core library for the Magick Shapes generator.
//!
//! The crate is split along the pieces of one animated page: a [`Scheduler`]
//! drives [`AnimModule`]s once per frame, a [`ColorShift`] oscillates the
//! background through HSL space, [`TextContrast`] keeps foreground colors
//! readable against it, and the geometry module traces the polygons and
//! `{n/k}` stars that the render module lays out on the canvas. Everything
//! that would touch a browser goes through the [`StyleSurface`] and
//! [`RenderSurface`] traits instead.

pub mod animator;
pub mod color;
pub mod config;
pub mod contrast;
pub mod error;
pub mod geometry;
pub mod oscillator;
pub mod presentation;
pub mod render;
pub mod scene;
pub mod style;

pub use animator::{AnimModule, FrameClock, FrameSource, ModuleHandle, Scheduler, Tick};
pub use color::{ColorSample, Hsl, Rgb};
pub use config::{AppConfig, CanvasConfig, PresentationConfig};
pub use contrast::{ContrastConfig, TextContrast};
pub use error::{Result, ShapesError};
pub use geometry::{
    regular_vertices, trace_path, ClosedPath, ShapeComponent, ShapeDescriptor, ShapeKind,
    SHAPE_DESCRIPTORS,
};
pub use oscillator::{ColorShift, OscillatorConfig};
pub use presentation::{ComboDeck, Presentation, PresentationEvent, COMBOS};
pub use render::{Drawing, RenderSurface, SvgDocument};
pub use scene::ShapeVisibility;
pub use style::{ElementId, StyleSurface, StyleTree};
