//! Smooth curves dragged through existing points.

use super::{GUIDE_COLOR, PreviewShape, Tool, ToolKind, ToolResponse};
use crate::config::SerializableColor;
use crate::geometry::smooth_path;
use crate::input::Modifiers;
use crate::items::{Item, ItemId};
use crate::scene::Scene;
use kurbo::Point;

/// Points closer than this to the pointer can be picked up by a curve.
pub const CURVE_SNAP_RADIUS: f64 = 10.0;

const HOVER_COLOR: SerializableColor = SerializableColor::rgb(0x42, 0x99, 0xE1);
const HOVER_RADIUS: f64 = 6.0;
const HOVER_OPACITY: f64 = 0.3;
const GUIDE_OPACITY: f64 = 0.5;
const GUIDE_WIDTH: f64 = 1.0;
const VERTEX_RADIUS: f64 = 4.0;

type PathPoint = (ItemId, Point);

/// Collects points while dragging and emits one smoothed cubic per pair.
#[derive(Debug, Clone, Default)]
pub struct CurveTool {
    path: Vec<PathPoint>,
    dragging: bool,
    hovered: Option<PathPoint>,
}

impl CurveTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions collected so far.
    pub fn path(&self) -> Vec<Point> {
        self.path.iter().map(|&(_, p)| p).collect()
    }

    fn nearest(scene: &Scene, pos: Point) -> Option<PathPoint> {
        scene
            .nearest_point(pos, CURVE_SNAP_RADIUS)
            .map(|point| (point.id(), point.position))
    }

    fn reset(&mut self) {
        self.path.clear();
        self.dragging = false;
    }
}

impl Tool for CurveTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Curve
    }

    fn on_pointer_down(&mut self, scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        if self.is_active() {
            return ToolResponse::None;
        }
        if let Some(start) = Self::nearest(scene, pos) {
            self.path = vec![start];
            self.dragging = true;
        }
        ToolResponse::None
    }

    fn on_pointer_move(&mut self, scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        self.hovered = Self::nearest(scene, pos);
        if let (true, Some(hovered)) = (self.dragging, self.hovered) {
            let is_new = self.path.last().is_none_or(|&(id, _)| id != hovered.0);
            if is_new {
                self.path.push(hovered);
            }
        }
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, scene: &mut Scene, _pos: Point, _modifiers: Modifiers) -> ToolResponse {
        let points = self.path();
        let dragging = self.dragging;
        self.reset();
        if !dragging || points.len() < 2 {
            return ToolResponse::None;
        }
        let segments = smooth_path(&points);
        log::debug!("Committing {} curve segments", segments.len());
        for segment in segments {
            scene.add_curve(segment);
        }
        ToolResponse::SceneChanged
    }

    fn cancel(&mut self) {
        self.reset();
    }

    fn is_active(&self) -> bool {
        self.dragging
    }

    fn preview(&self, _scene: &Scene) -> Vec<PreviewShape> {
        let mut shapes = Vec::new();
        if !self.dragging {
            if let Some((_, center)) = self.hovered {
                shapes.push(PreviewShape::Circle {
                    center,
                    radius: HOVER_RADIUS,
                    fill: Some(HOVER_COLOR.with_opacity(HOVER_OPACITY)),
                    stroke: None,
                });
            }
            return shapes;
        }

        let mut points = self.path();
        if let Some((id, p)) = self.hovered {
            if self.path.last().is_some_and(|&(last, _)| last != id) {
                points.push(p);
            }
        }
        if points.len() < 2 {
            return shapes;
        }

        let guide = GUIDE_COLOR.with_opacity(GUIDE_OPACITY);
        shapes.push(PreviewShape::Curves {
            segments: smooth_path(&points),
            color: guide,
            width: GUIDE_WIDTH,
        });
        shapes.extend(points.into_iter().map(|center| PreviewShape::Circle {
            center,
            radius: VERTEX_RADIUS,
            fill: None,
            stroke: Some((guide, GUIDE_WIDTH)),
        }));
        shapes
    }
}
