//! Polygon measurement and figure classification.

use super::distance;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Tolerance for side, diagonal and slope comparisons.
pub const CLASSIFY_TOLERANCE: f64 = 0.1;

/// Recognized figure kinds for an ordered cycle of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FigureKind {
    Triangle,
    Square,
    Rectangle,
    Trapezoid,
    Polygon,
}

impl FigureKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            FigureKind::Triangle => "Triangle",
            FigureKind::Square => "Square",
            FigureKind::Rectangle => "Rectangle",
            FigureKind::Trapezoid => "Trapezoid",
            FigureKind::Polygon => "Polygon",
        }
    }
}

impl std::fmt::Display for FigureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sum of consecutive distances, wrapping from the last point to the first.
pub fn polygon_perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&a, &b)| distance(a, b))
        .sum()
}

/// Shoelace sum divided by two; positive for counter-clockwise in a y-up frame.
pub fn signed_polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice / 2.0
}

/// Absolute polygon area (shoelace formula).
pub fn polygon_area(points: &[Point]) -> f64 {
    signed_polygon_area(points).abs()
}

fn sides(points: &[Point]) -> [f64; 4] {
    std::array::from_fn(|i| distance(points[i], points[(i + 1) % 4]))
}

fn is_rectangle(points: &[Point]) -> bool {
    let s = sides(points);
    let d0 = distance(points[0], points[2]);
    let d1 = distance(points[1], points[3]);
    (s[0] - s[2]).abs() < CLASSIFY_TOLERANCE
        && (s[1] - s[3]).abs() < CLASSIFY_TOLERANCE
        && (d0 - d1).abs() < CLASSIFY_TOLERANCE
}

fn is_square(points: &[Point]) -> bool {
    let s = sides(points);
    is_rectangle(points) && s.iter().all(|side| (side - s[0]).abs() < CLASSIFY_TOLERANCE)
}

/// Absolute slope `|dy/dx|` of each side; vertical sides are infinite.
fn abs_slopes(points: &[Point]) -> [f64; 4] {
    std::array::from_fn(|i| {
        let a = points[i];
        let b = points[(i + 1) % 4];
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx == 0.0 { f64::INFINITY } else { (dy / dx).abs() }
    })
}

fn slopes_match(a: f64, b: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        return a.is_infinite() && b.is_infinite();
    }
    (a - b).abs() < CLASSIFY_TOLERANCE
}

/// For a trapezoid, the lengths of its parallel pair of opposite sides.
///
/// Returns `None` unless exactly one pair of opposite sides is parallel.
pub fn trapezoid_parallel_sides(points: &[Point]) -> Option<(f64, f64)> {
    if points.len() != 4 {
        return None;
    }
    let slopes = abs_slopes(points);
    let s = sides(points);
    let first = slopes_match(slopes[0], slopes[2]);
    let second = slopes_match(slopes[1], slopes[3]);
    match (first, second) {
        (true, false) => Some((s[0], s[2])),
        (false, true) => Some((s[1], s[3])),
        _ => None,
    }
}

/// Classify four points given in cycle order.
pub fn classify_quadrilateral(points: &[Point]) -> FigureKind {
    debug_assert_eq!(points.len(), 4);
    if is_square(points) {
        FigureKind::Square
    } else if is_rectangle(points) {
        FigureKind::Rectangle
    } else if trapezoid_parallel_sides(points).is_some() {
        FigureKind::Trapezoid
    } else {
        FigureKind::Polygon
    }
}

/// Classify an ordered cycle. Fewer than three points is not a figure.
pub fn classify_figure(points: &[Point]) -> Option<FigureKind> {
    match points.len() {
        0..=2 => None,
        3 => Some(FigureKind::Triangle),
        4 => Some(classify_quadrilateral(points)),
        _ => Some(FigureKind::Polygon),
    }
}
