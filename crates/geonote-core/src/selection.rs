//! Selection set held by the select tool.
//!
//! The selection stores ids only; the scene stays the single source of
//! truth. Consumers receive [`SelectedItem`] snapshots cloned from the scene.

use crate::items::{Item, ItemId, ItemKind, LineItem, PointItem, StrokeItem};
use crate::scene::Scene;
use serde::{Deserialize, Serialize};

/// Reference to a selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionRef {
    pub kind: ItemKind,
    pub id: ItemId,
}

impl SelectionRef {
    pub fn new(kind: ItemKind, id: ItemId) -> Self {
        Self { kind, id }
    }

    pub fn of(item: &impl Item) -> Self {
        Self::new(item.kind(), item.id())
    }
}

/// Snapshot of a selected item, handed to selection listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectedItem {
    Point(PointItem),
    Line(LineItem),
    Stroke(StrokeItem),
}

impl SelectedItem {
    pub fn id(&self) -> ItemId {
        match self {
            SelectedItem::Point(p) => p.id(),
            SelectedItem::Line(l) => l.id(),
            SelectedItem::Stroke(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            SelectedItem::Point(_) => ItemKind::Point,
            SelectedItem::Line(_) => ItemKind::Line,
            SelectedItem::Stroke(_) => ItemKind::Stroke,
        }
    }
}

/// Ordered set of selected item references.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    refs: Vec<SelectionRef>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.refs.iter().any(|r| r.id == id)
    }

    /// Add a reference if it is not already selected. Returns true if added.
    pub fn insert(&mut self, r: SelectionRef) -> bool {
        if self.contains(r.id) {
            return false;
        }
        self.refs.push(r);
        true
    }

    /// Remove a reference. Returns true if it was selected.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.refs.len();
        self.refs.retain(|r| r.id != id);
        self.refs.len() != before
    }

    /// Flip membership of a reference.
    pub fn toggle(&mut self, r: SelectionRef) {
        if !self.remove(r.id) {
            self.refs.push(r);
        }
    }

    pub fn replace(&mut self, refs: impl IntoIterator<Item = SelectionRef>) {
        self.refs.clear();
        for r in refs {
            self.insert(r);
        }
    }

    pub fn clear(&mut self) {
        self.refs.clear();
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionRef> {
        self.refs.iter()
    }

    /// Ids of selected points, in selection order.
    pub fn point_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.refs
            .iter()
            .filter(|r| r.kind == ItemKind::Point)
            .map(|r| r.id)
    }

    /// Clone the selected items out of the scene, skipping erased ones.
    pub fn snapshot(&self, scene: &Scene) -> Vec<SelectedItem> {
        self.refs
            .iter()
            .filter(|r| scene.is_live(r.id))
            .filter_map(|r| match r.kind {
                ItemKind::Point => scene.point(r.id).cloned().map(SelectedItem::Point),
                ItemKind::Line => scene.line(r.id).cloned().map(SelectedItem::Line),
                ItemKind::Stroke => scene.stroke(r.id).cloned().map(SelectedItem::Stroke),
                ItemKind::Curve | ItemKind::Label => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_insert_is_deduplicated() {
        let mut scene = Scene::new();
        let id = scene.add_point(Point::new(1.0, 1.0));
        let mut selection = Selection::new();
        assert!(selection.insert(SelectionRef::new(ItemKind::Point, id)));
        assert!(!selection.insert(SelectionRef::new(ItemKind::Point, id)));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut scene = Scene::new();
        let id = scene.add_point(Point::new(1.0, 1.0));
        let r = SelectionRef::new(ItemKind::Point, id);
        let mut selection = Selection::new();
        selection.toggle(r);
        assert!(selection.contains(id));
        selection.toggle(r);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_snapshot_skips_erased() {
        let mut scene = Scene::new();
        let a = scene.add_point(Point::new(0.0, 0.0));
        let line = scene.add_line(Point::new(0.0, 0.0), Point::new(50.0, 0.0));
        let far = scene.add_point(Point::new(500.0, 500.0));

        let mut selection = Selection::new();
        selection.replace([
            SelectionRef::new(ItemKind::Point, a),
            SelectionRef::new(ItemKind::Line, line),
            SelectionRef::new(ItemKind::Point, far),
        ]);
        scene.erase_at(Point::new(500.0, 500.0), 1.0);

        let snapshot = selection.snapshot(&scene);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id(), a);
        assert_eq!(snapshot[1].kind(), ItemKind::Line);
        assert_eq!(selection.point_ids().collect::<Vec<_>>(), vec![a, far]);
    }
}
