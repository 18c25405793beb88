//! Scene store: the authoritative item collections and tombstones.

use crate::coord::{EndpointIndex, coincident};
use crate::geometry::distance_sq;
use crate::items::{CurveItem, Item, ItemId, LabelItem, LineItem, PointItem, StrokeItem};
use kurbo::{CubicBez, Point};
use std::collections::HashSet;

/// Every placed item, in insertion order, plus the set of erased ids.
///
/// Items are never removed individually: erasing records the id in a
/// tombstone set and the `live_*` views skip it. Only [`Scene::clear`]
/// empties the collections.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    points: Vec<PointItem>,
    lines: Vec<LineItem>,
    strokes: Vec<StrokeItem>,
    curves: Vec<CurveItem>,
    labels: Vec<LabelItem>,
    erased: HashSet<ItemId>,
    endpoints: EndpointIndex,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, position: Point) -> ItemId {
        self.insert_point(PointItem::new(position))
    }

    pub(crate) fn insert_point(&mut self, point: PointItem) -> ItemId {
        let id = point.id();
        self.points.push(point);
        id
    }

    pub fn add_line(&mut self, start: Point, end: Point) -> ItemId {
        let line = LineItem::new(start, end);
        let id = line.id();
        self.endpoints.insert(self.lines.len(), start, end);
        self.lines.push(line);
        id
    }

    pub fn add_stroke(&mut self, points: Vec<Point>) -> ItemId {
        let stroke = StrokeItem::new(points);
        let id = stroke.id();
        self.strokes.push(stroke);
        id
    }

    pub fn add_curve(&mut self, segment: CubicBez) -> ItemId {
        let curve = CurveItem::new(segment);
        let id = curve.id();
        self.curves.push(curve);
        id
    }

    pub fn add_label(&mut self, position: Point, text: impl Into<String>) -> ItemId {
        let label = LabelItem::new(position, text);
        let id = label.id();
        self.labels.push(label);
        id
    }

    /// Tombstone every live item touched by a brush of `radius` at `center`.
    ///
    /// All five collections are tested against the same live set before any
    /// tombstone is recorded. Returns how many items were newly erased.
    pub fn erase_at(&mut self, center: Point, radius: f64) -> usize {
        fn touched<'a, T: Item + 'a>(
            items: &'a [T],
            erased: &'a HashSet<ItemId>,
            center: Point,
            radius: f64,
        ) -> impl Iterator<Item = ItemId> + 'a {
            items
                .iter()
                .filter(move |item| !erased.contains(&item.id()) && item.touched_by(center, radius))
                .map(Item::id)
        }

        let hits: Vec<ItemId> = touched(&self.points, &self.erased, center, radius)
            .chain(touched(&self.lines, &self.erased, center, radius))
            .chain(touched(&self.strokes, &self.erased, center, radius))
            .chain(touched(&self.curves, &self.erased, center, radius))
            .chain(touched(&self.labels, &self.erased, center, radius))
            .collect();

        if !hits.is_empty() {
            log::debug!("Erased {} item(s) at ({:.1}, {:.1})", hits.len(), center.x, center.y);
        }
        let count = hits.len();
        self.erased.extend(hits);
        count
    }

    /// Empty every collection and forget all tombstones.
    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
        self.strokes.clear();
        self.curves.clear();
        self.labels.clear();
        self.erased.clear();
        self.endpoints.clear();
    }

    pub fn is_live(&self, id: ItemId) -> bool {
        !self.erased.contains(&id)
    }

    /// Tombstone a single item. Returns false if it was already erased.
    pub fn erase(&mut self, id: ItemId) -> bool {
        self.erased.insert(id)
    }

    pub fn live_points(&self) -> impl Iterator<Item = &PointItem> {
        self.points.iter().filter(|p| self.is_live(p.id()))
    }

    pub fn live_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().filter(|l| self.is_live(l.id()))
    }

    pub fn live_strokes(&self) -> impl Iterator<Item = &StrokeItem> {
        self.strokes.iter().filter(|s| self.is_live(s.id()))
    }

    pub fn live_curves(&self) -> impl Iterator<Item = &CurveItem> {
        self.curves.iter().filter(|c| self.is_live(c.id()))
    }

    pub fn live_labels(&self) -> impl Iterator<Item = &LabelItem> {
        self.labels.iter().filter(|l| self.is_live(l.id()))
    }

    /// Look up a point by id, erased or not.
    pub fn point(&self, id: ItemId) -> Option<&PointItem> {
        self.points.iter().find(|p| p.id() == id)
    }

    pub fn point_mut(&mut self, id: ItemId) -> Option<&mut PointItem> {
        self.points.iter_mut().find(|p| p.id() == id)
    }

    pub fn line(&self, id: ItemId) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.id() == id)
    }

    pub fn stroke(&self, id: ItemId) -> Option<&StrokeItem> {
        self.strokes.iter().find(|s| s.id() == id)
    }

    pub fn curve(&self, id: ItemId) -> Option<&CurveItem> {
        self.curves.iter().find(|c| c.id() == id)
    }

    pub fn label(&self, id: ItemId) -> Option<&LabelItem> {
        self.labels.iter().find(|l| l.id() == id)
    }

    /// First live point (in insertion order) within `threshold` of `p`.
    pub fn find_point_near(&self, p: Point, threshold: f64) -> Option<&PointItem> {
        self.live_points().find(|point| point.hit_test(p, threshold))
    }

    /// Closest live point strictly inside `radius` of `p`.
    ///
    /// Ties keep the earlier point.
    pub fn nearest_point(&self, p: Point, radius: f64) -> Option<&PointItem> {
        let mut best: Option<(&PointItem, f64)> = None;
        let mut limit = radius * radius;
        for point in self.live_points() {
            let d = distance_sq(point.position, p);
            if d < limit {
                limit = d;
                best = Some((point, d));
            }
        }
        best.map(|(point, _)| point)
    }

    /// Live lines with an endpoint coincident with `p`, in insertion order.
    pub fn lines_touching(&self, p: Point) -> Vec<&LineItem> {
        self.endpoints
            .candidates(p)
            .into_iter()
            .filter_map(|i| self.lines.get(i))
            .filter(|line| self.is_live(line.id()))
            .filter(|line| coincident(line.start, p) || coincident(line.end, p))
            .collect()
    }

    /// The far end of each live line touching `p`.
    pub fn far_endpoints(&self, p: Point) -> Vec<Point> {
        self.lines_touching(p)
            .into_iter()
            .map(|line| if coincident(line.start, p) { line.end } else { line.start })
            .collect()
    }

    /// Tombstone a label. Returns false if unknown or already erased.
    pub fn remove_label(&mut self, id: ItemId) -> bool {
        self.label(id).is_some() && self.erase(id)
    }

    /// Replace a point's label text. Returns false if the point is unknown.
    pub fn set_point_label(&mut self, id: ItemId, label: impl Into<String>) -> bool {
        match self.point_mut(id) {
            Some(point) => {
                point.label = label.into();
                true
            }
            None => false,
        }
    }

    /// Flip a point's angle overlay. Returns the new state.
    pub fn toggle_angle(&mut self, id: ItemId) -> Option<bool> {
        let point = self.point_mut(id)?;
        point.show_angle = !point.show_angle;
        Some(point.show_angle)
    }

    /// Number of stored items, erased ones included.
    pub fn len(&self) -> usize {
        self.points.len() + self.lines.len() + self.strokes.len() + self.curves.len() + self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tombstoned items.
    pub fn erased_count(&self) -> usize {
        self.erased.len()
    }
}
