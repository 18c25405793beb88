//! Pure geometry helpers: distances, hit tests and angle overlays.

mod cycle;
mod polygon;

pub use cycle::find_minimal_cycle;
pub use polygon::{
    FigureKind, classify_figure, classify_quadrilateral, polygon_area, polygon_perimeter,
    signed_polygon_area, trapezoid_parallel_sides,
};

use kurbo::{CubicBez, ParamCurve, Point};
use std::f64::consts::PI;

/// Number of chords used when sampling a cubic for hit testing.
pub const CURVE_SAMPLE_STEPS: usize = 20;

/// Radius of the angle arcs drawn around a point.
pub const ANGLE_ARC_RADIUS: f64 = 20.0;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Squared distance between two points.
pub fn distance_sq(a: Point, b: Point) -> f64 {
    (b - a).hypot2()
}

/// Project `p` onto segment `a`-`b`, clamping to the segment.
///
/// Returns `None` for a zero-length segment.
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> Option<Point> {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq == 0.0 {
        return None;
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    Some(a + seg * t)
}

/// Distance from a point to a line segment. A zero-length segment is a point.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    match project_onto_segment(p, a, b) {
        Some(proj) => distance(p, proj),
        None => distance(p, a),
    }
}

/// True if `query` lies within `threshold` of `center`.
pub fn is_point_hit(center: Point, query: Point, threshold: f64) -> bool {
    distance_sq(center, query) <= threshold * threshold
}

/// True if `query` lies within `threshold` of segment `a`-`b`.
///
/// Zero-length segments are never hit.
pub fn is_segment_hit(query: Point, a: Point, b: Point, threshold: f64) -> bool {
    project_onto_segment(query, a, b)
        .is_some_and(|proj| distance_sq(query, proj) <= threshold * threshold)
}

/// Segment test used by erasure: either endpoint or the projection.
pub fn is_segment_touched(query: Point, a: Point, b: Point, radius: f64) -> bool {
    is_point_hit(a, query, radius)
        || is_point_hit(b, query, radius)
        || is_segment_hit(query, a, b, radius)
}

/// True if any consecutive pair of `points` forms a segment hit.
pub fn is_polyline_hit(query: Point, points: &[Point], threshold: f64) -> bool {
    points
        .windows(2)
        .any(|w| is_segment_hit(query, w[0], w[1], threshold))
}

/// Sample a cubic at `CURVE_SAMPLE_STEPS` uniform parameter steps (inclusive of both ends).
pub fn sample_cubic(curve: &CubicBez) -> Vec<Point> {
    (0..=CURVE_SAMPLE_STEPS)
        .map(|i| curve.eval(i as f64 / CURVE_SAMPLE_STEPS as f64))
        .collect()
}

/// Erase test for a cubic: control points, then every sampled chord.
pub fn is_cubic_touched(query: Point, curve: &CubicBez, radius: f64) -> bool {
    if [curve.p0, curve.p3, curve.p1, curve.p2]
        .iter()
        .any(|&p| is_point_hit(p, query, radius))
    {
        return true;
    }
    sample_cubic(curve)
        .windows(2)
        .any(|w| is_segment_touched(query, w[0], w[1], radius))
}

/// Direction of `to` as seen from `from`, in degrees.
pub fn angle_degrees(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// Wrap an angle difference into `(-PI, PI]`.
pub fn normalize_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// One arc of the angle overlay drawn around a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleWedge {
    /// Direction of the first ray, in radians.
    pub start: f64,
    /// Signed sweep to the next ray, in `(-PI, PI]`.
    pub sweep: f64,
    /// Rounded measurement shown next to the arc.
    pub degrees: u32,
    /// Where the measurement text is centered.
    pub label_position: Point,
}

/// Compute the wedges between consecutive rays leaving `vertex`.
///
/// Needs at least two rays; otherwise returns nothing.
pub fn angle_wedges(vertex: Point, far_ends: &[Point], radius: f64) -> Vec<AngleWedge> {
    if far_ends.len() < 2 {
        return Vec::new();
    }
    let mut angles: Vec<f64> = far_ends
        .iter()
        .map(|p| (p.y - vertex.y).atan2(p.x - vertex.x))
        .collect();
    angles.sort_by(f64::total_cmp);

    (0..angles.len())
        .map(|i| {
            let start = angles[i];
            let end = angles[(i + 1) % angles.len()];
            let sweep = normalize_angle(end - start);
            let mut degrees = sweep.abs().to_degrees().round() as u32;
            if degrees > 180 {
                degrees = 360 - degrees;
            }
            let mid = start + sweep / 2.0;
            let text_radius = radius * 0.7;
            AngleWedge {
                start,
                sweep,
                degrees,
                label_position: Point::new(
                    vertex.x + mid.cos() * text_radius,
                    vertex.y + mid.sin() * text_radius,
                ),
            }
        })
        .collect()
}

/// Catmull-Rom tension used when smoothing curve gestures.
pub const CURVE_TENSION: f64 = 0.25;

/// Turn an ordered path of points into one cubic per consecutive pair.
///
/// Tangents follow the neighbouring points; end segments reuse their own
/// endpoint in place of the missing neighbour.
pub fn smooth_path(points: &[Point]) -> Vec<CubicBez> {
    if points.len() < 2 {
        return Vec::new();
    }
    (0..points.len() - 1)
        .map(|i| {
            let p1 = points[i];
            let p2 = points[i + 1];
            let p0 = if i > 0 { points[i - 1] } else { p1 };
            let p3 = points.get(i + 2).copied().unwrap_or(p2);
            let cp1 = p1 + (p2 - p0) * CURVE_TENSION;
            let cp2 = p2 - (p3 - p1) * CURVE_TENSION;
            CubicBez::new(p1, cp1, cp2, p2)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_point_self_hit() {
        for i in 0..50 {
            let p = Point::new(i as f64 * 17.3 - 400.0, 1e6 - i as f64 * 3.1);
            for t in [1e-9, 0.5, 1.0, 250.0] {
                assert!(is_point_hit(p, p, t));
            }
        }
    }

    #[test]
    fn test_point_hit_boundary() {
        let c = Point::new(0.0, 0.0);
        assert!(is_point_hit(c, Point::new(3.0, 4.0), 5.0));
        assert!(!is_point_hit(c, Point::new(3.0, 4.01), 5.0));
        assert!(is_point_hit(c, c, 0.0));
    }

    #[test]
    fn test_segment_distance_matches_sampled_reference() {
        let segments = [
            (Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
            (Point::new(-20.0, 35.0), Point::new(60.0, -80.0)),
            (Point::new(5.0, 5.0), Point::new(5.0, 90.0)),
        ];
        for (a, b) in segments {
            for k in 0..30 {
                let q = Point::new(k as f64 * 9.7 - 60.0, 70.0 - k as f64 * 6.1);
                let reference = (0..=10_000)
                    .map(|s| {
                        let t = s as f64 / 10_000.0;
                        distance(q, a.lerp(b, t))
                    })
                    .fold(f64::INFINITY, f64::min);
                let computed = point_segment_distance(q, a, b);
                assert!(computed <= reference + 1e-9);
                assert!(reference - computed < 0.02);
            }
        }
    }

    #[test]
    fn test_segment_hit_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!(is_segment_hit(Point::new(50.0, 5.0), a, b, 5.0));
        assert!(!is_segment_hit(Point::new(50.0, 5.1), a, b, 5.0));
        assert!(is_segment_hit(Point::new(103.0, 4.0), a, b, 5.0));
        assert!(!is_segment_hit(Point::new(106.0, 0.0), a, b, 5.0));
    }

    #[test]
    fn test_zero_length_segment_is_never_hit() {
        let a = Point::new(10.0, 10.0);
        assert!(!is_segment_hit(a, a, a, 100.0));
        assert!(is_segment_touched(a, a, a, 1.0));
    }

    #[test]
    fn test_polyline_hit() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert!(is_polyline_hit(Point::new(12.0, 5.0), &pts, 2.0));
        assert!(!is_polyline_hit(Point::new(5.0, 5.0), &pts, 2.0));
        assert!(!is_polyline_hit(Point::new(0.0, 0.0), &pts[..1], 2.0));
    }

    #[test]
    fn test_cubic_touched() {
        let curve = CubicBez::new((0.0, 0.0), (30.0, 60.0), (70.0, 60.0), (100.0, 0.0));
        assert_eq!(sample_cubic(&curve).len(), CURVE_SAMPLE_STEPS + 1);
        assert!(is_cubic_touched(Point::new(50.0, 45.0), &curve, 2.0));
        assert!(is_cubic_touched(Point::new(30.0, 61.0), &curve, 2.0));
        assert!(!is_cubic_touched(Point::new(50.0, 10.0), &curve, 2.0));
    }

    #[test]
    fn test_angle_wedges_right_angle() {
        let vertex = Point::new(0.0, 0.0);
        let wedges = angle_wedges(vertex, &[Point::new(10.0, 0.0), Point::new(0.0, 10.0)], ANGLE_ARC_RADIUS);
        assert_eq!(wedges.len(), 2);
        assert_eq!(wedges[0].degrees, 90);
        assert_eq!(wedges[1].degrees, 90);
        let label = wedges[0].label_position;
        assert!((label.x - 14.0 * (PI / 4.0).cos()).abs() < 1e-9);
        assert!((label.y - 14.0 * (PI / 4.0).sin()).abs() < 1e-9);
    }

    #[test]
    fn test_angle_wedges_need_two_rays() {
        assert!(angle_wedges(Point::ZERO, &[Point::new(1.0, 0.0)], 20.0).is_empty());
    }

    #[test]
    fn test_angle_wedges_three_rays() {
        let wedges = angle_wedges(
            Point::ZERO,
            &[Point::new(1.0, 0.0), Point::new(0.0, 1.0), Point::new(-1.0, -1.0)],
            20.0,
        );
        let degrees: Vec<u32> = wedges.iter().map(|w| w.degrees).collect();
        assert_eq!(degrees, vec![135, 90, 135]);
    }

    #[test]
    fn test_smooth_path_endpoints_and_tangents() {
        let pts = [Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)];
        let curves = smooth_path(&pts);
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].p0, pts[0]);
        assert_eq!(curves[0].p3, pts[1]);
        assert_eq!(curves[1].p3, pts[2]);
        // First segment: p0 falls back to p1
        assert!((curves[0].p1.x - 25.0).abs() < f64::EPSILON);
        assert!((curves[0].p1.y - 0.0).abs() < f64::EPSILON);
        // cp2 = p2 - (p3 - p1) * 0.25 with p3 = (100, 100)
        assert!((curves[0].p2.x - 75.0).abs() < f64::EPSILON);
        assert!((curves[0].p2.y + 25.0).abs() < f64::EPSILON);
        assert!(smooth_path(&pts[..1]).is_empty());
    }
}
