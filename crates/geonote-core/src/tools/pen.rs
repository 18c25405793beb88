//! Freehand pen.

use super::{PreviewShape, Tool, ToolKind, ToolResponse};
use crate::config::{NotebookConfig, PenSettings};
use crate::input::Modifiers;
use crate::scene::Scene;
use kurbo::Point;

/// Records every pointer sample between down and up as one stroke.
#[derive(Debug, Clone, Default)]
pub struct PenTool {
    points: Vec<Point>,
    drawing: bool,
    settings: PenSettings,
}

impl PenTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points of the stroke being drawn.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Tool for PenTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pen
    }

    fn on_pointer_down(&mut self, _scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        self.points.clear();
        self.points.push(pos);
        self.drawing = true;
        ToolResponse::None
    }

    fn on_pointer_move(&mut self, _scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        if self.drawing {
            self.points.push(pos);
        }
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, scene: &mut Scene, _pos: Point, _modifiers: Modifiers) -> ToolResponse {
        if !self.drawing {
            return ToolResponse::None;
        }
        self.drawing = false;
        let points = std::mem::take(&mut self.points);
        if points.len() < 2 {
            return ToolResponse::None;
        }
        log::debug!("Committing stroke with {} points", points.len());
        scene.add_stroke(points);
        ToolResponse::SceneChanged
    }

    fn cancel(&mut self) {
        self.drawing = false;
        self.points.clear();
    }

    fn is_active(&self) -> bool {
        self.drawing
    }

    fn preview(&self, _scene: &Scene) -> Vec<PreviewShape> {
        if !self.drawing || self.points.len() < 2 {
            return Vec::new();
        }
        vec![PreviewShape::Polyline {
            points: self.points.clone(),
            color: self.settings.color.with_opacity(self.settings.opacity),
            width: self.settings.width,
        }]
    }

    fn apply_config(&mut self, config: &NotebookConfig) {
        self.settings = config.tools.pen.clone();
    }
}
