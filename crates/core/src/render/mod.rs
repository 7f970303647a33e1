use std::fmt::Write as _;
use std::path::Path;

use kurbo::Point;

use crate::{
    config::CanvasConfig,
    geometry::ClosedPath,
    scene::ShapeVisibility,
    Result,
};

/// Stroke reference shared by every primitive; the contrast module keeps the
/// `--line` custom property readable.
pub const LINE_STROKE: &str = "var(--line)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// One traced component of a visible shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePath {
    pub key: &'static str,
    pub path: ClosedPath,
}

/// Everything the canvas shows for one draw: the outer circle followed by
/// the visible shapes in descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub size: f64,
    pub stroke_width: f64,
    pub circle: Circle,
    pub paths: Vec<ShapePath>,
}

impl Drawing {
    pub fn compose(size: f64, visibility: &ShapeVisibility, canvas: &CanvasConfig) -> Self {
        let center = Point::new(size / 2.0, size / 2.0);
        let radius = size * canvas.radius_ratio;

        let paths = visibility
            .visible_descriptors()
            .flat_map(|d| {
                d.trace(center, radius)
                    .into_iter()
                    .map(move |path| ShapePath { key: d.key, path })
            })
            .collect();

        Self {
            size,
            stroke_width: canvas.stroke_width(size),
            circle: Circle { center, radius },
            paths,
        }
    }
}

/// Anything that can show a [`Drawing`].
pub trait RenderSurface {
    fn redraw(&mut self, drawing: &Drawing) -> Result<()>;
}

/// SVG rendering of the most recent drawing.
#[derive(Debug, Default, Clone)]
pub struct SvgDocument {
    size: f64,
    body: String,
    redraws: u64,
}

impl SvgDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Markup as shown live, stroked through `var(--line)`.
    pub fn markup(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {s} {s}">{body}</svg>"#,
            s = fmt_num(self.size),
            body = self.body
        )
    }

    /// Standalone snapshot with the current background and line colors baked
    /// in, so it renders the same outside the page.
    pub fn export(&self, background: &str, line: &str) -> String {
        let s = fmt_num(self.size);
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {s} {s}" width="{s}" height="{s}">"#,
                "<style>svg {{ background: {bg}; }} circle, path {{ stroke: {line}; }}</style>",
                r#"<rect width="{s}" height="{s}" fill="{bg}"/>"#,
                "{body}</svg>"
            ),
            s = s,
            bg = background,
            line = line,
            body = self.body
        )
    }

    pub fn write_to(&self, path: impl AsRef<Path>, background: &str, line: &str) -> Result<()> {
        std::fs::write(path.as_ref(), self.export(background, line))?;
        tracing::info!(path = %path.as_ref().display(), "wrote snapshot");
        Ok(())
    }
}

impl RenderSurface for SvgDocument {
    fn redraw(&mut self, drawing: &Drawing) -> Result<()> {
        let stroke = fmt_num(drawing.stroke_width);
        let mut body = String::new();

        let Circle { center, radius } = drawing.circle;
        let _ = write!(
            body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{LINE_STROKE}" stroke-width="{stroke}"/>"#,
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(radius),
        );
        for shape in &drawing.paths {
            let _ = write!(
                body,
                r#"<path data-shape="{}" d="{}" fill="none" stroke="{LINE_STROKE}" stroke-width="{stroke}" stroke-linejoin="round" stroke-linecap="round" opacity="0.95"/>"#,
                shape.key,
                shape.path.svg_data(),
            );
        }

        self.size = drawing.size;
        self.body = body;
        self.redraws += 1;
        tracing::debug!(paths = drawing.paths.len(), size = drawing.size, "redrew svg");
        Ok(())
    }
}

/// Up to three decimals, trailing zeros dropped.
fn fmt_num(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visibility(keys: &[&str]) -> ShapeVisibility {
        let mut vis = ShapeVisibility::new();
        vis.apply_combo(keys);
        vis
    }

    #[test]
    fn empty_selection_draws_only_the_circle() {
        let drawing = Drawing::compose(800.0, &ShapeVisibility::new(), &CanvasConfig::default());
        assert!(drawing.paths.is_empty());
        assert_eq!(drawing.circle.center, Point::new(400.0, 400.0));
        assert!((drawing.circle.radius - 336.0).abs() < 1e-9);
        assert_eq!(drawing.stroke_width, 3.0);
    }

    #[test]
    fn compound_shapes_contribute_one_path_per_component() {
        let drawing = Drawing::compose(
            800.0,
            &visibility(&["doubleSquare", "hexagon"]),
            &CanvasConfig::default(),
        );
        let keys: Vec<_> = drawing.paths.iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["hexagon", "doubleSquare", "doubleSquare"]);
    }

    #[test]
    fn svg_markup_contains_every_primitive() {
        let drawing = Drawing::compose(
            400.0,
            &visibility(&["pentagram"]),
            &CanvasConfig::default(),
        );
        let mut doc = SvgDocument::new();
        doc.redraw(&drawing).unwrap();

        let markup = doc.markup();
        assert!(markup.contains(r#"viewBox="0 0 400 400""#));
        assert!(markup.contains(r#"<circle cx="200" cy="200" r="168""#));
        assert!(markup.contains(r#"stroke-width="2""#));
        assert_eq!(markup.matches("<path").count(), 1);
        assert_eq!(markup.matches(" L ").count(), 5);
        assert_eq!(doc.redraws(), 1);
    }

    #[test]
    fn export_bakes_in_colors() {
        let mut doc = SvgDocument::new();
        doc.redraw(&Drawing::compose(800.0, &ShapeVisibility::new(), &CanvasConfig::default()))
            .unwrap();
        let svg = doc.export("hsl(10.0, 50.0%, 50.0%)", "#000000");
        assert!(svg.contains("background: hsl(10.0, 50.0%, 50.0%)"));
        assert!(svg.contains("stroke: #000000"));
        assert!(svg.contains(r#"width="800""#));
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(336.0), "336");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(1.23456), "1.235");
    }
}
