//! Placed point.

use super::{Item, ItemId, ItemKind, now_millis};
use crate::geometry::is_point_hit;
use kurbo::{BezPath, Circle, Point, Rect, Shape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A placed point. Lines attach to it by coordinate proximity only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointItem {
    pub(crate) id: ItemId,
    pub position: Point,
    /// Text drawn beside the point; empty for none.
    pub label: String,
    /// Whether the angles between attached lines are drawn.
    pub show_angle: bool,
    pub(crate) created_at: u64,
}

impl PointItem {
    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            label: String::new(),
            show_angle: false,
            created_at: now_millis(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Item for PointItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Point
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.position, self.position)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        is_point_hit(self.position, point, tolerance)
    }

    fn to_path(&self) -> BezPath {
        Circle::new(self.position, 1.0).to_path(0.1)
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite()
    }
}
