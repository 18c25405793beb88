//! Freehand stroke.

use super::{Item, ItemId, ItemKind, now_millis};
use crate::geometry::{is_point_hit, is_polyline_hit};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand polyline, immutable once committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeItem {
    pub(crate) id: ItemId,
    pub points: Vec<Point>,
    pub(crate) created_at: u64,
}

impl StrokeItem {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            created_at: now_millis(),
        }
    }
}

impl Item for StrokeItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Stroke
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn bounds(&self) -> Rect {
        let Some(&first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        is_polyline_hit(point, &self.points, tolerance)
    }

    fn touched_by(&self, point: Point, radius: f64) -> bool {
        self.points.iter().any(|&p| is_point_hit(p, point, radius))
            || is_polyline_hit(point, &self.points, radius)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((&first, rest)) = self.points.split_first() {
            path.move_to(first);
            for &p in rest {
                path.line_to(p);
            }
        }
        path
    }

    fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_stroke() {
        let stroke = StrokeItem::new(vec![Point::new(1.0, 1.0)]);
        assert!(!stroke.hit_test(Point::new(1.0, 1.0), 5.0));
        assert!(stroke.touched_by(Point::new(1.0, 1.0), 5.0));
    }

    #[test]
    fn test_bounds() {
        let stroke = StrokeItem::new(vec![Point::new(1.0, 5.0), Point::new(-3.0, 2.0), Point::new(4.0, 9.0)]);
        let b = stroke.bounds();
        assert!((b.x0 + 3.0).abs() < f64::EPSILON);
        assert!((b.y1 - 9.0).abs() < f64::EPSILON);
    }
}
