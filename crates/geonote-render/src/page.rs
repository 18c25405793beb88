//! Notebook page geometry.
//!
//! Pages sit side by side along the x axis starting at the world origin.
//! The outer corners of the spread are rounded; pages in between are plain
//! rectangles. Everything here is pure geometry so that it can be checked
//! without a GPU.

use geonote_core::NotebookConfig;
use kurbo::{BezPath, Line, Point, Rect};

/// Distance of the margin line from the outer edge, in grid cells.
pub const MARGIN_CELLS: f64 = 4.0;

/// One page of the spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRect {
    pub index: usize,
    pub rect: Rect,
    /// First page: rounded left corners.
    pub round_left: bool,
    /// Last page: rounded right corners.
    pub round_right: bool,
}

impl PageRect {
    /// Whether the page has no rounded corners.
    pub fn is_middle(&self) -> bool {
        !self.round_left && !self.round_right
    }

    /// Page outline, with quadratic corners on the rounded sides.
    pub fn outline(&self, corner_radius: f64) -> BezPath {
        let Rect { x0, y0, x1, y1 } = self.rect;
        let r = corner_radius
            .max(0.0)
            .min(self.rect.width() / 2.0)
            .min(self.rect.height() / 2.0);
        let left = if self.round_left { r } else { 0.0 };
        let right = if self.round_right { r } else { 0.0 };

        let mut path = BezPath::new();
        path.move_to((x0 + left, y0));
        path.line_to((x1 - right, y0));
        if self.round_right {
            path.quad_to((x1, y0), (x1, y0 + r));
        }
        path.line_to((x1, y1 - right));
        if self.round_right {
            path.quad_to((x1, y1), (x1 - r, y1));
        }
        path.line_to((x0 + left, y1));
        if self.round_left {
            path.quad_to((x0, y1), (x0, y1 - r));
        }
        path.line_to((x0, y0 + left));
        if self.round_left {
            path.quad_to((x0, y0), (x0 + r, y0));
        }
        path.close_path();
        path
    }

    /// Vertical margin line position. The first page (or a single page) has
    /// it on the left, the last page on the right, middle pages have none.
    pub fn margin_x(&self, grid_size: f64) -> Option<f64> {
        if self.round_left {
            Some(self.rect.x0 + grid_size * MARGIN_CELLS)
        } else if self.round_right {
            Some(self.rect.x1 - grid_size * MARGIN_CELLS)
        } else {
            None
        }
    }

    /// World x of each vertical grid line, page edges excluded.
    pub fn grid_columns(&self, grid_size: f64) -> Vec<f64> {
        interior_steps(self.rect.width(), grid_size)
            .map(|x| self.rect.x0 + x)
            .collect()
    }

    /// World y of each horizontal grid line, page edges excluded.
    pub fn grid_rows(&self, grid_size: f64) -> Vec<f64> {
        interior_steps(self.rect.height(), grid_size)
            .map(|y| self.rect.y0 + y)
            .collect()
    }

    /// Shadowed seam on the right edge, present on every page but the last.
    pub fn shadow_edge(&self) -> Option<Line> {
        (!self.round_right).then(|| {
            Line::new(
                Point::new(self.rect.x1, self.rect.y0),
                Point::new(self.rect.x1, self.rect.y1),
            )
        })
    }
}

fn interior_steps(extent: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = if step > 0.0 && extent.is_finite() {
        (extent / step).ceil() as usize
    } else {
        0
    };
    (1..count)
        .map(move |i| i as f64 * step)
        .filter(move |v| *v < extent)
}

/// Layout of the whole spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub page_count: usize,
}

impl PageLayout {
    pub fn new(page_width: f64, page_height: f64, page_count: usize) -> Self {
        Self {
            page_width,
            page_height,
            page_count,
        }
    }

    pub fn from_config(config: &NotebookConfig, page_count: usize) -> Self {
        Self::new(
            config.notebook.page_width,
            config.notebook.page_height,
            page_count,
        )
    }

    /// The page at `index`, if it exists.
    pub fn page(&self, index: usize) -> Option<PageRect> {
        if index >= self.page_count {
            return None;
        }
        let x0 = index as f64 * self.page_width;
        Some(PageRect {
            index,
            rect: Rect::new(x0, 0.0, x0 + self.page_width, self.page_height),
            round_left: index == 0,
            round_right: index + 1 == self.page_count,
        })
    }

    pub fn pages(&self) -> impl Iterator<Item = PageRect> + '_ {
        (0..self.page_count).filter_map(|i| self.page(i))
    }

    /// Pages overlapping the given world rectangle.
    pub fn visible_pages(&self, view: Rect) -> impl Iterator<Item = PageRect> + '_ {
        self.pages().filter(move |page| overlaps(page.rect, view))
    }

    /// Bounds of the whole spread.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.page_count as f64 * self.page_width,
            self.page_height,
        )
    }
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}
