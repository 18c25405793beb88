//! Grid-snapped point placement.

use super::{PreviewShape, Tool, ToolKind, ToolResponse};
use crate::config::{NotebookConfig, SerializableColor};
use crate::input::Modifiers;
use crate::scene::Scene;
use kurbo::Point;

const GHOST_RADIUS: f64 = 4.0;
const GHOST_OPACITY: f64 = 0.3;

/// Places a point on every press, snapped to the grid.
///
/// The step is the grid size, a quarter of it with shift held, or half of
/// it with ctrl held.
#[derive(Debug, Clone)]
pub struct PointTool {
    grid_size: f64,
    ghost: Option<Point>,
}

impl Default for PointTool {
    fn default() -> Self {
        Self {
            grid_size: 25.0,
            ghost: None,
        }
    }
}

impl PointTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snap `pos` to the grid step selected by `modifiers`.
    pub fn snap(&self, pos: Point, modifiers: Modifiers) -> Point {
        let step = if modifiers.shift {
            self.grid_size * 0.25
        } else if modifiers.ctrl {
            self.grid_size * 0.5
        } else {
            self.grid_size
        };
        Point::new((pos.x / step).round() * step, (pos.y / step).round() * step)
    }
}

impl Tool for PointTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Point
    }

    fn on_pointer_down(&mut self, scene: &mut Scene, pos: Point, modifiers: Modifiers) -> ToolResponse {
        let snapped = self.snap(pos, modifiers);
        if !snapped.is_finite() {
            return ToolResponse::None;
        }
        scene.add_point(snapped);
        log::debug!("Placed point at {snapped:?}");
        ToolResponse::SceneChanged
    }

    fn on_pointer_move(&mut self, _scene: &mut Scene, pos: Point, modifiers: Modifiers) -> ToolResponse {
        self.ghost = Some(self.snap(pos, modifiers));
        ToolResponse::None
    }

    fn preview(&self, _scene: &Scene) -> Vec<PreviewShape> {
        self.ghost
            .map(|center| PreviewShape::Circle {
                center,
                radius: GHOST_RADIUS,
                fill: Some(SerializableColor::black().with_opacity(GHOST_OPACITY)),
                stroke: None,
            })
            .into_iter()
            .collect()
    }

    fn apply_config(&mut self, config: &NotebookConfig) {
        self.grid_size = config.notebook.grid_size;
    }
}
