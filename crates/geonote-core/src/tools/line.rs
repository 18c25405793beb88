//! Point-to-point line tool.

use super::{GUIDE_COLOR, PreviewShape, Tool, ToolKind, ToolResponse};
use crate::config::NotebookConfig;
use crate::input::Modifiers;
use crate::items::{Item, ItemId};
use crate::scene::Scene;
use kurbo::Point;

/// Snap radius as a fraction of the grid size.
pub const LINE_SNAP_FACTOR: f64 = 0.8;

const GUIDE_OPACITY: f64 = 0.5;
const GUIDE_WIDTH: f64 = 1.0;

/// Connects two existing points.
///
/// The first click near a point sets the pending start; a click near a
/// different point commits the line. Clicks away from points do nothing.
#[derive(Debug, Clone)]
pub struct LineTool {
    start: Option<(ItemId, Point)>,
    hover: Option<Point>,
    snap_radius: f64,
}

impl Default for LineTool {
    fn default() -> Self {
        Self {
            start: None,
            hover: None,
            snap_radius: LINE_SNAP_FACTOR * 25.0,
        }
    }
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snap_radius(&self) -> f64 {
        self.snap_radius
    }

    /// Position of the pending start point, if any.
    pub fn pending_start(&self) -> Option<Point> {
        self.start.map(|(_, p)| p)
    }
}

impl Tool for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
    }

    fn on_pointer_down(&mut self, scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        let Some(target) = scene.nearest_point(pos, self.snap_radius) else {
            return ToolResponse::None;
        };
        let target = (target.id(), target.position);

        match self.start {
            Some((start_id, _)) if !scene.is_live(start_id) => {
                self.start = Some(target);
                ToolResponse::None
            }
            None => {
                self.start = Some(target);
                ToolResponse::None
            }
            Some((start_id, _)) if start_id == target.0 => ToolResponse::None,
            Some((_, start)) if start == target.1 => {
                log::debug!("Skipping zero-length line at {start:?}");
                ToolResponse::None
            }
            Some((_, start)) => {
                scene.add_line(start, target.1);
                log::debug!("Committed line {start:?} -> {:?}", target.1);
                self.start = None;
                ToolResponse::SceneChanged
            }
        }
    }

    fn on_pointer_move(&mut self, _scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        self.hover = Some(pos);
        ToolResponse::None
    }

    fn cancel(&mut self) {
        self.start = None;
    }

    fn is_active(&self) -> bool {
        self.start.is_some()
    }

    fn preview(&self, scene: &Scene) -> Vec<PreviewShape> {
        let (Some((start_id, start)), Some(hover)) = (self.start, self.hover) else {
            return Vec::new();
        };
        match scene.nearest_point(hover, self.snap_radius) {
            Some(target) if target.id() != start_id => vec![PreviewShape::Segment {
                from: start,
                to: target.position,
                color: GUIDE_COLOR.with_opacity(GUIDE_OPACITY),
                width: GUIDE_WIDTH,
                dashed: true,
            }],
            _ => Vec::new(),
        }
    }

    fn apply_config(&mut self, config: &NotebookConfig) {
        self.snap_radius = LINE_SNAP_FACTOR * config.notebook.grid_size;
    }
}
