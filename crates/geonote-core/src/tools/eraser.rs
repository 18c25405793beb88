//! Brush eraser.

use super::{PreviewShape, Tool, ToolKind, ToolResponse};
use crate::config::{EraserSettings, NotebookConfig, SerializableColor};
use crate::input::Modifiers;
use crate::scene::Scene;
use kurbo::Point;

const RING_WIDTH: f64 = 2.0;
const FILL_ALPHA: f64 = 0.1;

/// Erases everything under the brush on press and while dragging.
#[derive(Debug, Clone, Default)]
pub struct EraserTool {
    erasing: bool,
    last_position: Option<Point>,
    settings: EraserSettings,
}

impl EraserTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(&self) -> f64 {
        self.settings.radius
    }

    fn erase(&self, scene: &mut Scene, pos: Point) -> ToolResponse {
        if scene.erase_at(pos, self.settings.radius) > 0 {
            ToolResponse::SceneChanged
        } else {
            ToolResponse::None
        }
    }
}

impl Tool for EraserTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eraser
    }

    fn on_pointer_down(&mut self, scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        self.erasing = true;
        self.last_position = Some(pos);
        self.erase(scene, pos)
    }

    fn on_pointer_move(&mut self, scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        self.last_position = Some(pos);
        if self.erasing {
            self.erase(scene, pos)
        } else {
            ToolResponse::None
        }
    }

    fn on_pointer_up(&mut self, _scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        self.erasing = false;
        self.last_position = Some(pos);
        ToolResponse::None
    }

    fn cancel(&mut self) {
        self.erasing = false;
    }

    fn is_active(&self) -> bool {
        self.erasing
    }

    fn preview(&self, _scene: &Scene) -> Vec<PreviewShape> {
        let Some(center) = self.last_position else {
            return Vec::new();
        };
        let black = SerializableColor::black();
        vec![PreviewShape::Circle {
            center,
            radius: self.settings.radius,
            fill: Some(black.with_opacity(FILL_ALPHA)),
            stroke: Some((black.with_opacity(self.settings.opacity), RING_WIDTH)),
        }]
    }

    fn apply_config(&mut self, config: &NotebookConfig) {
        self.settings = config.tools.eraser.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eraser() -> EraserTool {
        let mut tool = EraserTool::new();
        let mut config = NotebookConfig::default();
        config.tools.eraser.radius = 10.0;
        tool.apply_config(&config);
        tool
    }

    #[test]
    fn test_erase_on_press() {
        let mut scene = Scene::new();
        let near = scene.add_point(Point::new(55.0, 50.0));
        let far = scene.add_point(Point::new(70.0, 50.0));

        let mut tool = eraser();
        let response = tool.on_pointer_down(&mut scene, Point::new(50.0, 50.0), Modifiers::NONE);
        assert_eq!(response, ToolResponse::SceneChanged);
        assert!(!scene.is_live(near));
        assert!(scene.is_live(far));
    }

    #[test]
    fn test_drag_erases_along_path() {
        let mut scene = Scene::new();
        let a = scene.add_point(Point::new(0.0, 0.0));
        let b = scene.add_point(Point::new(100.0, 0.0));

        let mut tool = eraser();
        tool.on_pointer_down(&mut scene, Point::new(-50.0, 0.0), Modifiers::NONE);
        tool.on_pointer_move(&mut scene, Point::new(2.0, 0.0), Modifiers::NONE);
        tool.on_pointer_move(&mut scene, Point::new(98.0, 0.0), Modifiers::NONE);
        assert!(!scene.is_live(a));
        assert!(!scene.is_live(b));
    }

    #[test]
    fn test_hover_does_not_erase_but_tracks_position() {
        let mut scene = Scene::new();
        let a = scene.add_point(Point::new(0.0, 0.0));

        let mut tool = eraser();
        assert!(tool.preview(&scene).is_empty());
        let response = tool.on_pointer_move(&mut scene, Point::new(0.0, 0.0), Modifiers::NONE);
        assert_eq!(response, ToolResponse::None);
        assert!(scene.is_live(a));

        match &tool.preview(&scene)[..] {
            [PreviewShape::Circle { center, radius, .. }] => {
                assert_eq!(*center, Point::new(0.0, 0.0));
                assert!((radius - 10.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected preview {other:?}"),
        }
    }

    #[test]
    fn test_release_stops_erasing() {
        let mut scene = Scene::new();
        let mut tool = eraser();
        tool.on_pointer_down(&mut scene, Point::new(500.0, 500.0), Modifiers::NONE);
        tool.on_pointer_up(&mut scene, Point::new(500.0, 500.0), Modifiers::NONE);
        let a = scene.add_point(Point::new(0.0, 0.0));
        tool.on_pointer_move(&mut scene, Point::new(0.0, 0.0), Modifiers::NONE);
        assert!(scene.is_live(a));
    }
}
