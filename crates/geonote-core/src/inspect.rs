//! Geometric inspection API in centimeters.
//!
//! [`GeometryApi`] is a thin borrowing wrapper over a [`Scene`] for hosts
//! that want to script the notebook (tests, consoles, automation). All
//! positions and lengths cross this boundary in centimeters.

use crate::geometry::{angle_degrees, distance};
use crate::items::{Item, ItemId, PointItem};
use crate::properties::PIXELS_PER_CM;
use crate::scene::Scene;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by the inspection API.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InspectError {
    #[error("No item with id {0}")]
    MissingItem(ItemId),
    #[error("Item {0} has been erased")]
    ErasedItem(ItemId),
    #[error("Invalid position ({x}, {y})")]
    InvalidPosition { x: f64, y: f64 },
    #[error("Cannot connect a point to itself")]
    DegenerateLine,
    #[error("Label text is empty")]
    EmptyText,
}

/// Result type for inspection operations.
pub type InspectResult<T> = Result<T, InspectError>;

/// A live point, in centimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointInfo {
    pub id: ItemId,
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub show_angle: bool,
}

/// A live label, in centimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelInfo {
    pub id: ItemId,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

fn to_world(x_cm: f64, y_cm: f64) -> InspectResult<Point> {
    if !x_cm.is_finite() || !y_cm.is_finite() {
        return Err(InspectError::InvalidPosition { x: x_cm, y: y_cm });
    }
    Ok(Point::new(x_cm * PIXELS_PER_CM, y_cm * PIXELS_PER_CM))
}

fn warn<T>(op: &str, result: InspectResult<T>) -> InspectResult<T> {
    result.inspect_err(|e| log::warn!("{op}: {e}"))
}

/// Scripting access to a scene.
pub struct GeometryApi<'a> {
    scene: &'a mut Scene,
}

impl<'a> GeometryApi<'a> {
    pub fn new(scene: &'a mut Scene) -> Self {
        Self { scene }
    }

    fn live_point(&self, id: ItemId) -> InspectResult<&PointItem> {
        let point = self.scene.point(id).ok_or(InspectError::MissingItem(id))?;
        if !self.scene.is_live(id) {
            return Err(InspectError::ErasedItem(id));
        }
        Ok(point)
    }

    /// Place a point, optionally labelled.
    pub fn create_point(&mut self, x_cm: f64, y_cm: f64, label: &str) -> InspectResult<ItemId> {
        let position = warn("create_point", to_world(x_cm, y_cm))?;
        Ok(self
            .scene
            .insert_point(PointItem::new(position).with_label(label)))
    }

    /// Draw a line between two live points.
    pub fn connect_points(&mut self, a: ItemId, b: ItemId) -> InspectResult<ItemId> {
        let result = (|| {
            let start = self.live_point(a)?.position;
            let end = self.live_point(b)?.position;
            if a == b || start == end {
                return Err(InspectError::DegenerateLine);
            }
            Ok((start, end))
        })();
        let (start, end) = warn("connect_points", result)?;
        Ok(self.scene.add_line(start, end))
    }

    /// Distance between two points in centimeters.
    pub fn distance_cm(&self, a: ItemId, b: ItemId) -> InspectResult<f64> {
        let result = self
            .live_point(a)
            .and_then(|pa| Ok(distance(pa.position, self.live_point(b)?.position)));
        warn("distance_cm", result).map(|d| d / PIXELS_PER_CM)
    }

    /// Direction from `a` to `b` in degrees.
    pub fn angle_degrees(&self, a: ItemId, b: ItemId) -> InspectResult<f64> {
        let result = self
            .live_point(a)
            .and_then(|pa| Ok(angle_degrees(pa.position, self.live_point(b)?.position)));
        warn("angle_degrees", result)
    }

    /// Length of a live line in centimeters.
    pub fn line_length_cm(&self, id: ItemId) -> InspectResult<f64> {
        let result = match self.scene.line(id) {
            None => Err(InspectError::MissingItem(id)),
            Some(_) if !self.scene.is_live(id) => Err(InspectError::ErasedItem(id)),
            Some(line) => Ok(line.length() / PIXELS_PER_CM),
        };
        warn("line_length_cm", result)
    }

    pub fn set_point_label(&mut self, id: ItemId, label: &str) -> InspectResult<()> {
        warn("set_point_label", self.live_point(id).map(|_| ()))?;
        self.scene.set_point_label(id, label);
        Ok(())
    }

    /// Flip the angle overlay of a point. Returns the new state.
    pub fn toggle_angle(&mut self, id: ItemId) -> InspectResult<bool> {
        warn("toggle_angle", self.live_point(id).map(|_| ()))?;
        self.scene
            .toggle_angle(id)
            .ok_or(InspectError::MissingItem(id))
    }

    /// Every live point, in insertion order.
    pub fn all_points(&self) -> Vec<PointInfo> {
        self.scene
            .live_points()
            .map(|p| PointInfo {
                id: p.id(),
                x: p.position.x / PIXELS_PER_CM,
                y: p.position.y / PIXELS_PER_CM,
                label: p.label.clone(),
                show_angle: p.show_angle,
            })
            .collect()
    }

    /// Place a freestanding label. The text is trimmed.
    pub fn create_label(&mut self, x_cm: f64, y_cm: f64, text: &str) -> InspectResult<ItemId> {
        let position = warn("create_label", to_world(x_cm, y_cm))?;
        let text = text.trim();
        if text.is_empty() {
            return warn("create_label", Err(InspectError::EmptyText));
        }
        Ok(self.scene.add_label(position, text))
    }

    pub fn remove_label(&mut self, id: ItemId) -> InspectResult<()> {
        let result = match self.scene.label(id) {
            None => Err(InspectError::MissingItem(id)),
            Some(_) if !self.scene.is_live(id) => Err(InspectError::ErasedItem(id)),
            Some(_) => Ok(()),
        };
        warn("remove_label", result)?;
        self.scene.remove_label(id);
        Ok(())
    }

    /// Every live label, in insertion order.
    pub fn labels(&self) -> Vec<LabelInfo> {
        self.scene
            .live_labels()
            .map(|l| LabelInfo {
                id: l.id(),
                x: l.position.x / PIXELS_PER_CM,
                y: l.position.y / PIXELS_PER_CM,
                text: l.text.clone(),
            })
            .collect()
    }

    /// Remove everything from the scene.
    pub fn clear(&mut self) {
        self.scene.clear();
    }
}
