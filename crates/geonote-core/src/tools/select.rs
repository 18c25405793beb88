//! Click selection of points, lines and strokes.

use super::{PreviewShape, Tool, ToolKind, ToolResponse};
use crate::input::Modifiers;
use crate::items::{Item, ItemId};
use crate::scene::Scene;
use crate::selection::{SelectedItem, Selection, SelectionRef};
use kurbo::Point;
use peniko::Color;

/// Pick radius in world units.
pub const PICK_THRESHOLD: f64 = 10.0;

const HIGHLIGHT_COLOR: Color = Color::from_rgba8(0, 120, 255, 204);
const HIGHLIGHT_WIDTH: f64 = 2.0;
const POINT_RING_RADIUS: f64 = 6.0;

/// Hit-tests points, then lines, then strokes.
///
/// Picking a point also picks every line attached to it. Shift adds to the
/// selection, ctrl toggles, a plain click replaces, and a plain click on
/// empty space clears.
#[derive(Debug, Clone, Default)]
pub struct SelectTool {
    selection: Selection,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Snapshot of the live selected items.
    pub fn selected_items(&self, scene: &Scene) -> Vec<SelectedItem> {
        self.selection.snapshot(scene)
    }

    /// Ids of the selected points.
    pub fn selected_point_ids(&self) -> Vec<ItemId> {
        self.selection.point_ids().collect()
    }

    /// Drop the selection. Returns true if anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        let had_any = !self.selection.is_empty();
        self.selection.clear();
        had_any
    }

    fn pick_point(&mut self, scene: &Scene, hit: SelectionRef, position: Point, modifiers: Modifiers) {
        let attached: Vec<SelectionRef> = scene
            .lines_touching(position)
            .into_iter()
            .map(SelectionRef::of)
            .collect();
        let add_with_lines = |selection: &mut Selection| {
            selection.insert(hit);
            for line in &attached {
                selection.insert(*line);
            }
        };

        if modifiers.shift {
            if !self.selection.contains(hit.id) {
                add_with_lines(&mut self.selection);
            }
        } else if modifiers.ctrl {
            // Deselecting a point leaves its lines selected.
            if !self.selection.remove(hit.id) {
                add_with_lines(&mut self.selection);
            }
        } else {
            self.selection.replace(std::iter::once(hit).chain(attached.iter().copied()));
        }
    }

    fn pick_single(&mut self, hit: SelectionRef, modifiers: Modifiers) {
        if modifiers.shift {
            self.selection.insert(hit);
        } else if modifiers.ctrl {
            self.selection.toggle(hit);
        } else {
            self.selection.replace([hit]);
        }
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn on_pointer_down(&mut self, scene: &mut Scene, pos: Point, modifiers: Modifiers) -> ToolResponse {
        let scene = &*scene;
        if let Some(point) = scene.find_point_near(pos, PICK_THRESHOLD) {
            self.pick_point(scene, SelectionRef::of(point), point.position, modifiers);
            return ToolResponse::SelectionChanged;
        }

        let hit = scene
            .live_lines()
            .find(|line| line.hit_test(pos, PICK_THRESHOLD))
            .map(SelectionRef::of)
            .or_else(|| {
                scene
                    .live_strokes()
                    .find(|stroke| stroke.hit_test(pos, PICK_THRESHOLD))
                    .map(SelectionRef::of)
            });
        match hit {
            Some(hit) => {
                self.pick_single(hit, modifiers);
                ToolResponse::SelectionChanged
            }
            None if !modifiers.shift && !modifiers.ctrl => {
                self.selection.clear();
                ToolResponse::SelectionChanged
            }
            None => ToolResponse::None,
        }
    }

    fn preview(&self, scene: &Scene) -> Vec<PreviewShape> {
        self.selection
            .snapshot(scene)
            .into_iter()
            .map(|item| match item {
                SelectedItem::Point(point) => PreviewShape::Circle {
                    center: point.position,
                    radius: POINT_RING_RADIUS,
                    fill: None,
                    stroke: Some((HIGHLIGHT_COLOR, HIGHLIGHT_WIDTH)),
                },
                SelectedItem::Line(line) => PreviewShape::Highlight {
                    path: line.to_path(),
                    color: HIGHLIGHT_COLOR,
                    width: HIGHLIGHT_WIDTH,
                },
                SelectedItem::Stroke(stroke) => PreviewShape::Highlight {
                    path: stroke.to_path(),
                    color: HIGHLIGHT_COLOR,
                    width: HIGHLIGHT_WIDTH,
                },
            })
            .collect()
    }
}
