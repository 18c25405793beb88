//! Freestanding text label.

use super::{Item, ItemId, ItemKind, now_millis};
use crate::geometry::is_point_hit;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text annotation anchored at a world position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelItem {
    pub(crate) id: ItemId,
    pub position: Point,
    pub text: String,
    pub(crate) created_at: u64,
}

impl LabelItem {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            text: text.into(),
            created_at: now_millis(),
        }
    }
}

impl Item for LabelItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Label
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.position, self.position)
    }

    /// Labels are picked by their anchor.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        is_point_hit(self.position, point, tolerance)
    }

    fn to_path(&self) -> BezPath {
        BezPath::new()
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite()
    }
}
