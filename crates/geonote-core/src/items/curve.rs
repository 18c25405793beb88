//! Cubic Bezier segment produced by the curve tool.

use super::{Item, ItemId, ItemKind, now_millis};
use crate::geometry::is_cubic_touched;
use kurbo::{BezPath, CubicBez, ParamCurveExtrema, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored cubic segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveItem {
    pub(crate) id: ItemId,
    pub segment: CubicBez,
    pub(crate) created_at: u64,
}

impl CurveItem {
    pub fn new(segment: CubicBez) -> Self {
        Self {
            id: Uuid::new_v4(),
            segment,
            created_at: now_millis(),
        }
    }
}

impl Item for CurveItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Curve
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn bounds(&self) -> Rect {
        self.segment.bounding_box()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        is_cubic_touched(point, &self.segment, tolerance)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.segment.p0);
        path.curve_to(self.segment.p1, self.segment.p2, self.segment.p3);
        path
    }

    fn is_finite(&self) -> bool {
        let c = &self.segment;
        c.p0.is_finite() && c.p1.is_finite() && c.p2.is_finite() && c.p3.is_finite()
    }
}
