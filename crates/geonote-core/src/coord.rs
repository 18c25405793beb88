//! Coordinate-proximity index for line endpoints.
//!
//! Two positions are coincident when both axes differ by less than one unit.
//! The index buckets endpoints into one-unit cells so a lookup only has to
//! inspect the 3x3 block of cells around the query.

use kurbo::Point;
use std::collections::HashMap;

/// Per-axis tolerance for treating two positions as the same place.
pub const COINCIDENT_TOLERANCE: f64 = 1.0;

/// True when `a` and `b` differ by less than one unit on both axes.
pub fn coincident(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < COINCIDENT_TOLERANCE && (a.y - b.y).abs() < COINCIDENT_TOLERANCE
}

/// Quantized cell holding a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    x: i64,
    y: i64,
}

impl CoordKey {
    pub fn of(p: Point) -> Self {
        Self {
            x: (p.x / COINCIDENT_TOLERANCE).floor() as i64,
            y: (p.y / COINCIDENT_TOLERANCE).floor() as i64,
        }
    }

    /// This cell and its eight neighbours.
    fn neighbourhood(self) -> impl Iterator<Item = CoordKey> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).map(move |dy| CoordKey {
                x: self.x.saturating_add(dx),
                y: self.y.saturating_add(dy),
            })
        })
    }
}

/// Map from cell to the indices of lines with an endpoint in that cell.
#[derive(Debug, Clone, Default)]
pub struct EndpointIndex {
    cells: HashMap<CoordKey, Vec<usize>>,
}

impl EndpointIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register both endpoints of the line stored at `index`.
    pub fn insert(&mut self, index: usize, start: Point, end: Point) {
        let a = CoordKey::of(start);
        let b = CoordKey::of(end);
        self.cells.entry(a).or_default().push(index);
        if b != a {
            self.cells.entry(b).or_default().push(index);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Line indices that may have an endpoint coincident with `p`, ascending.
    ///
    /// Callers still apply [`coincident`] to the actual endpoints.
    pub fn candidates(&self, p: Point) -> Vec<usize> {
        let mut found: Vec<usize> = CoordKey::of(p)
            .neighbourhood()
            .filter_map(|key| self.cells.get(&key))
            .flatten()
            .copied()
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }
}
