//! Freestanding text labels.

use super::{GUIDE_COLOR, PreviewShape, Tool, ToolKind, ToolResponse};
use crate::camera::Camera;
use crate::input::Modifiers;
use crate::scene::Scene;
use kurbo::Point;

const CURSOR_OPACITY: f64 = 0.5;

/// Opens a text entry where the pointer is pressed.
///
/// Enter, switching tools or a press elsewhere on the canvas commits the
/// trimmed text; Escape discards it. A committing press does not open a new
/// entry.
#[derive(Debug, Clone, Default)]
pub struct LabelTool {
    anchor: Option<Point>,
    text: String,
    hover: Option<Point>,
}

impl LabelTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.anchor.is_some()
    }

    /// World position of the open entry.
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// Screen position where an inline editor should be placed.
    pub fn editor_position(&self, camera: &Camera) -> Option<Point> {
        self.anchor.map(|p| camera.world_to_screen(p))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn insert_text(&mut self, s: &str) {
        if self.is_editing() {
            self.text.push_str(s);
        }
    }

    pub fn backspace(&mut self) {
        if self.is_editing() {
            self.text.pop();
        }
    }

    /// Close the entry, adding a label if the trimmed text is not empty.
    pub fn commit(&mut self, scene: &mut Scene) -> ToolResponse {
        let Some(anchor) = self.anchor.take() else {
            return ToolResponse::None;
        };
        let text = std::mem::take(&mut self.text);
        let text = text.trim();
        if text.is_empty() {
            return ToolResponse::None;
        }
        log::debug!("Committed label {text:?} at {anchor:?}");
        scene.add_label(anchor, text);
        ToolResponse::SceneChanged
    }

    /// Close the entry without touching the scene.
    pub fn discard(&mut self) {
        self.anchor = None;
        self.text.clear();
    }
}

impl Tool for LabelTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Label
    }

    fn on_pointer_down(&mut self, scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        if self.is_editing() {
            return self.commit(scene);
        }
        self.anchor = Some(pos);
        self.text.clear();
        ToolResponse::None
    }

    fn on_pointer_move(&mut self, _scene: &mut Scene, pos: Point, _modifiers: Modifiers) -> ToolResponse {
        self.hover = Some(pos);
        ToolResponse::None
    }

    fn cancel(&mut self) {
        self.discard();
    }

    fn is_active(&self) -> bool {
        self.is_editing()
    }

    fn preview(&self, _scene: &Scene) -> Vec<PreviewShape> {
        if let Some(anchor) = self.anchor {
            return vec![PreviewShape::TextEntry {
                anchor,
                text: self.text.clone(),
            }];
        }
        self.hover
            .map(|position| PreviewShape::TextCursor {
                position,
                color: GUIDE_COLOR.with_opacity(CURSOR_OPACITY),
            })
            .into_iter()
            .collect()
    }
}
