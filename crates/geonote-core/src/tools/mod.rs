//! Tool system for the notebook.
//!
//! Every tool implements [`Tool`] and receives pointer events already
//! converted to world coordinates. [`ToolManager`] owns one instance of
//! each tool and dispatches to the active one by [`ToolKind`].

mod curve;
mod eraser;
mod label;
mod line;
mod pen;
mod point;
mod select;

pub use curve::{CURVE_SNAP_RADIUS, CurveTool};
pub use eraser::EraserTool;
pub use label::LabelTool;
pub use line::{LINE_SNAP_FACTOR, LineTool};
pub use pen::PenTool;
pub use point::PointTool;
pub use select::{PICK_THRESHOLD, SelectTool};

use crate::config::{NotebookConfig, SerializableColor};
use crate::input::Modifiers;
use crate::scene::Scene;
use kurbo::{BezPath, CubicBez, Point};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Muted gray used by snapping and text previews.
pub(crate) const GUIDE_COLOR: SerializableColor = SerializableColor::rgb(0x66, 0x66, 0x66);

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Eraser,
    Line,
    Point,
    Label,
    Curve,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Select,
        ToolKind::Pen,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Point,
        ToolKind::Label,
        ToolKind::Curve,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Pen => "Pen",
            ToolKind::Eraser => "Eraser",
            ToolKind::Line => "Line",
            ToolKind::Point => "Point",
            ToolKind::Label => "Label",
            ToolKind::Curve => "Curve",
        }
    }
}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolResponse {
    #[default]
    None,
    /// Items were added or erased.
    SceneChanged,
    /// The selection was updated; listeners should be notified.
    SelectionChanged,
}

/// Transient overlay drawn on top of the scene, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewShape {
    Polyline {
        points: Vec<Point>,
        color: Color,
        width: f64,
    },
    Segment {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
        dashed: bool,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    },
    Curves {
        segments: Vec<CubicBez>,
        color: Color,
        width: f64,
    },
    /// Outline of a selected item.
    Highlight {
        path: BezPath,
        color: Color,
        width: f64,
    },
    /// "T" shaped cursor shown while the label tool is idle.
    TextCursor { position: Point, color: Color },
    /// Text being typed at a label anchor.
    TextEntry { anchor: Point, text: String },
}

/// Common interface of all tools.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn on_pointer_down(&mut self, scene: &mut Scene, pos: Point, modifiers: Modifiers)
    -> ToolResponse;

    fn on_pointer_move(
        &mut self,
        _scene: &mut Scene,
        _pos: Point,
        _modifiers: Modifiers,
    ) -> ToolResponse {
        ToolResponse::None
    }

    fn on_pointer_up(
        &mut self,
        _scene: &mut Scene,
        _pos: Point,
        _modifiers: Modifiers,
    ) -> ToolResponse {
        ToolResponse::None
    }

    /// Discard any in-progress gesture. Never touches the scene.
    fn cancel(&mut self) {}

    /// Whether a gesture is in progress.
    fn is_active(&self) -> bool {
        false
    }

    /// Overlay for the current frame.
    fn preview(&self, scene: &Scene) -> Vec<PreviewShape>;

    /// Re-read settings after a configuration change.
    fn apply_config(&mut self, _config: &NotebookConfig) {}
}

/// Owns every tool and tracks which one is active.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    pub select: SelectTool,
    pub pen: PenTool,
    pub eraser: EraserTool,
    pub line: LineTool,
    pub point: PointTool,
    pub label: LabelTool,
    pub curve: CurveTool,
}

impl ToolManager {
    /// Create a tool manager configured from `config`.
    pub fn new(config: &NotebookConfig) -> Self {
        let mut tm = Self::default();
        tm.apply_config(config);
        tm
    }

    pub fn active(&self) -> &dyn Tool {
        self.tool(self.current_tool)
    }

    pub fn active_mut(&mut self) -> &mut dyn Tool {
        self.tool_mut(self.current_tool)
    }

    pub fn tool(&self, kind: ToolKind) -> &dyn Tool {
        match kind {
            ToolKind::Select => &self.select,
            ToolKind::Pen => &self.pen,
            ToolKind::Eraser => &self.eraser,
            ToolKind::Line => &self.line,
            ToolKind::Point => &self.point,
            ToolKind::Label => &self.label,
            ToolKind::Curve => &self.curve,
        }
    }

    pub fn tool_mut(&mut self, kind: ToolKind) -> &mut dyn Tool {
        match kind {
            ToolKind::Select => &mut self.select,
            ToolKind::Pen => &mut self.pen,
            ToolKind::Eraser => &mut self.eraser,
            ToolKind::Line => &mut self.line,
            ToolKind::Point => &mut self.point,
            ToolKind::Label => &mut self.label,
            ToolKind::Curve => &mut self.curve,
        }
    }

    /// Switch tools. A pending label is committed; other gestures are
    /// cancelled. The selection is kept.
    pub fn set_tool(&mut self, scene: &mut Scene, tool: ToolKind) -> ToolResponse {
        if tool == self.current_tool {
            return ToolResponse::None;
        }
        let response = match self.current_tool {
            ToolKind::Label => self.label.commit(scene),
            other => {
                self.tool_mut(other).cancel();
                ToolResponse::None
            }
        };
        log::debug!("Tool changed: {} -> {}", self.current_tool.name(), tool.name());
        self.current_tool = tool;
        response
    }

    /// Push configuration into every tool.
    pub fn apply_config(&mut self, config: &NotebookConfig) {
        for kind in ToolKind::ALL {
            self.tool_mut(kind).apply_config(config);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active().is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        let config = NotebookConfig::default();
        let mut scene = Scene::new();
        let mut tm = ToolManager::new(&config);
        assert_eq!(tm.current_tool, ToolKind::Select);
        assert_eq!(tm.active().kind(), ToolKind::Select);

        tm.set_tool(&mut scene, ToolKind::Pen);
        assert_eq!(tm.current_tool, ToolKind::Pen);
        assert_eq!(tm.active().kind(), ToolKind::Pen);
    }

    #[test]
    fn test_dispatch_matches_kind() {
        let tm = ToolManager::new(&NotebookConfig::default());
        for kind in ToolKind::ALL {
            assert_eq!(tm.tool(kind).kind(), kind);
        }
    }

    #[test]
    fn test_switch_cancels_gesture() {
        let mut scene = Scene::new();
        let mut tm = ToolManager::new(&NotebookConfig::default());
        tm.set_tool(&mut scene, ToolKind::Pen);
        tm.active_mut()
            .on_pointer_down(&mut scene, Point::new(0.0, 0.0), Modifiers::NONE);
        assert!(tm.is_active());

        tm.set_tool(&mut scene, ToolKind::Eraser);
        assert!(!tm.pen.is_active());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_switch_commits_label() {
        let mut scene = Scene::new();
        let mut tm = ToolManager::new(&NotebookConfig::default());
        tm.set_tool(&mut scene, ToolKind::Label);
        tm.active_mut()
            .on_pointer_down(&mut scene, Point::new(10.0, 20.0), Modifiers::NONE);
        tm.label.insert_text("hello");

        let response = tm.set_tool(&mut scene, ToolKind::Select);
        assert_eq!(response, ToolResponse::SceneChanged);
        assert_eq!(scene.live_labels().count(), 1);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = ToolKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ToolKind::ALL.len());
    }
}
