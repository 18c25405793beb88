//! Straight line between two point positions.

use super::{Item, ItemId, ItemKind, now_millis};
use crate::geometry::{is_segment_hit, is_segment_touched};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line. Endpoints are copied coordinates, not references to points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub(crate) id: ItemId,
    pub start: Point,
    pub end: Point,
    pub(crate) created_at: u64,
}

impl LineItem {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            created_at: now_millis(),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    pub fn as_kurbo(&self) -> kurbo::Line {
        kurbo::Line::new(self.start, self.end)
    }
}

impl Item for LineItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Line
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        is_segment_hit(point, self.start, self.end, tolerance)
    }

    fn touched_by(&self, point: Point, radius: f64) -> bool {
        is_segment_touched(point, self.start, self.end, radius)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}
