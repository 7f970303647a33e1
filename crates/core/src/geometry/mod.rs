//! Vertex placement and path tracing for regular polygons and `{n/k}` star
//! polygons.
//!
//! Everything here is pure. Angles are in radians, measured from the positive
//! x axis and increasing clockwise on screen (y grows downwards), so a
//! rotation of `-π/2` puts the first vertex at twelve o'clock.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, PI, TAU};
use std::fmt::Write as _;

use kurbo::{BezPath, Point};

/// Rotation that places the first vertex straight above the centre.
pub const TOP: f64 = -FRAC_PI_2;

/// One simple closed figure: `n` vertices visited `step` at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeComponent {
    pub n: usize,
    pub step: usize,
    pub rotation: f64,
}

impl ShapeComponent {
    pub const fn new(n: usize, step: usize, rotation: f64) -> Self {
        Self { n, step, rotation }
    }

    /// Whether stepping through the vertices yields one cycle over all of them.
    pub fn is_single_cycle(&self) -> bool {
        self.n >= 3 && self.step >= 1 && self.step < self.n && gcd(self.n, self.step) == 1
    }

    /// Places the vertices and traces the closed path for this component.
    pub fn trace(&self, center: Point, radius: f64) -> ClosedPath {
        let vertices = regular_vertices(self.n, center, radius, self.rotation);
        trace_path(&vertices, self.step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Simple(ShapeComponent),
    /// Overlapping simple figures sharing centre and radius. These are drawn
    /// as independent paths, never merged.
    Compound(&'static [ShapeComponent]),
}

/// A renderable shape family from the fixed descriptor table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDescriptor {
    pub key: &'static str,
    pub kind: ShapeKind,
}

impl ShapeDescriptor {
    const fn simple(key: &'static str, n: usize, step: usize) -> Self {
        Self {
            key,
            kind: ShapeKind::Simple(ShapeComponent::new(n, step, TOP)),
        }
    }

    const fn compound(key: &'static str, components: &'static [ShapeComponent]) -> Self {
        Self {
            key,
            kind: ShapeKind::Compound(components),
        }
    }

    pub fn components(&self) -> &[ShapeComponent] {
        match &self.kind {
            ShapeKind::Simple(component) => std::slice::from_ref(component),
            ShapeKind::Compound(components) => components,
        }
    }

    /// Traces one closed path per component.
    pub fn trace(&self, center: Point, radius: f64) -> Vec<ClosedPath> {
        self.components()
            .iter()
            .map(|component| component.trace(center, radius))
            .collect()
    }
}

static DOUBLE_TRIANGLE: [ShapeComponent; 2] = [
    ShapeComponent::new(3, 1, TOP),
    ShapeComponent::new(3, 1, TOP + FRAC_PI_3),
];

static DOUBLE_SQUARE: [ShapeComponent; 2] = [
    ShapeComponent::new(4, 1, 0.0),
    ShapeComponent::new(4, 1, -FRAC_PI_4),
];

static TRIPLE_TRIANGLE: [ShapeComponent; 3] = [
    ShapeComponent::new(3, 1, TOP),
    ShapeComponent::new(3, 1, TOP + 40.0 * PI / 180.0),
    ShapeComponent::new(3, 1, TOP + 80.0 * PI / 180.0),
];

/// The fixed descriptor table, in drawing order.
pub static SHAPE_DESCRIPTORS: [ShapeDescriptor; 16] = [
    ShapeDescriptor::simple("triangleUp", 3, 1),
    ShapeDescriptor::simple("tetragram", 4, 1),
    ShapeDescriptor::simple("hexagon", 6, 1),
    ShapeDescriptor::simple("pentagon", 5, 1),
    ShapeDescriptor::simple("pentagram", 5, 2),
    ShapeDescriptor::simple("heptagon", 7, 1),
    ShapeDescriptor::simple("octagon", 8, 1),
    ShapeDescriptor::simple("nonagon", 9, 1),
    ShapeDescriptor::simple("octagram", 8, 3),
    ShapeDescriptor::simple("heptagram_7_2", 7, 2),
    ShapeDescriptor::simple("heptagram_7_3", 7, 3),
    ShapeDescriptor::simple("nonagram_9_2", 9, 2),
    ShapeDescriptor::simple("nonagram_9_4", 9, 4),
    ShapeDescriptor::compound("doubleTriangle", &DOUBLE_TRIANGLE),
    ShapeDescriptor::compound("doubleSquare", &DOUBLE_SQUARE),
    ShapeDescriptor::compound("tripleTriangle", &TRIPLE_TRIANGLE),
];

/// Looks a descriptor up by key.
pub fn descriptor(key: &str) -> Option<&'static ShapeDescriptor> {
    SHAPE_DESCRIPTORS.iter().find(|d| d.key == key)
}

/// Returns `n` points evenly spaced on the circle of `radius` around
/// `center`, the first at angle `rotation`, each following one `2π/n`
/// further along.
pub fn regular_vertices(n: usize, center: Point, radius: f64, rotation: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let theta = rotation + i as f64 * TAU / n as f64;
            Point::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            )
        })
        .collect()
}

/// A closed polyline. The closing segment from the last point back to the
/// first is implied.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPath {
    pub points: Vec<Point>,
}

impl ClosedPath {
    /// Number of line segments including the closing one.
    pub fn segment_count(&self) -> usize {
        self.points.len()
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
            path.close_path();
        }
        path
    }

    /// SVG path data with three decimals. The start vertex is repeated as the
    /// first line target.
    pub fn svg_data(&self) -> String {
        let Some(first) = self.points.first() else {
            return String::new();
        };
        let mut d = format!("M {:.3} {:.3}", first.x, first.y);
        for point in &self.points {
            let _ = write!(d, " L {:.3} {:.3}", point.x, point.y);
        }
        d.push_str(" Z");
        d
    }
}

/// Walks `vertices` from index 0, jumping `step` indices each time, until an
/// index repeats.
///
/// Precondition: `step` and `vertices.len()` are coprime. Otherwise the walk
/// closes early and only covers `len / gcd(len, step)` vertices; this is not
/// corrected here. Steps of `len` or more wrap around.
pub fn trace_path(vertices: &[Point], step: usize) -> ClosedPath {
    let n = vertices.len();
    let mut points = Vec::with_capacity(n);
    if n == 0 {
        return ClosedPath { points };
    }

    let step = step % n;
    let mut visited = vec![false; n];
    let mut idx = 0;
    while !visited[idx] {
        visited[idx] = true;
        points.push(vertices[idx]);
        idx = (idx + step) % n;
    }
    ClosedPath { points }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
