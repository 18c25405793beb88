//! Drawable items placed on the notebook.

mod curve;
mod label;
mod line;
mod point;
mod stroke;

pub use curve::CurveItem;
pub use label::LabelItem;
pub use line::LineItem;
pub use point::PointItem;
pub use stroke::StrokeItem;

use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Unique identifier for items. Tombstones are keyed by this.
pub type ItemId = Uuid;

/// The five item collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Point,
    Line,
    Stroke,
    Curve,
    Label,
}

/// Milliseconds since the Unix epoch. Used for ordering and display only.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Common trait for all items.
pub trait Item {
    /// Get the unique identifier.
    fn id(&self) -> ItemId;

    /// Which collection the item lives in.
    fn kind(&self) -> ItemKind;

    /// Creation time in milliseconds.
    fn created_at(&self) -> u64;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Pick test used by selection.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Brush test used by the eraser. Defaults to the pick test.
    fn touched_by(&self, point: Point, radius: f64) -> bool {
        self.hit_test(point, radius)
    }

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// False if any coordinate is NaN or infinite.
    fn is_finite(&self) -> bool;
}
