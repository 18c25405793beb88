//! Measurements of the current selection for a properties panel.

use crate::geometry::{
    FigureKind, angle_degrees, classify_figure, distance, find_minimal_cycle, polygon_area,
    polygon_perimeter, trapezoid_parallel_sides,
};
use crate::selection::SelectedItem;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// World units per centimeter.
pub const PIXELS_PER_CM: f64 = 50.0;

/// Unit used when presenting lengths and areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementUnit {
    #[serde(rename = "pixels")]
    Pixels,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "units")]
    GridUnits,
}

impl MeasurementUnit {
    /// World units per one displayed unit.
    fn scale(self, grid_size: f64) -> f64 {
        match self {
            MeasurementUnit::Pixels => 1.0,
            MeasurementUnit::Centimeters => PIXELS_PER_CM,
            MeasurementUnit::GridUnits => grid_size,
        }
    }

    /// Format a world-space length.
    pub fn format_length(self, value: f64, grid_size: f64) -> String {
        let v = value / self.scale(grid_size);
        match self {
            MeasurementUnit::Pixels => format!("{v:.1}px"),
            MeasurementUnit::Centimeters => format!("{v:.2}cm"),
            MeasurementUnit::GridUnits => format!("{v:.2} units"),
        }
    }

    /// Format a world-space area.
    pub fn format_area(self, value: f64, grid_size: f64) -> String {
        let scale = self.scale(grid_size);
        let v = value / (scale * scale);
        match self {
            MeasurementUnit::Pixels => format!("{v:.1}px²"),
            MeasurementUnit::Centimeters => format!("{v:.2}cm²"),
            MeasurementUnit::GridUnits => format!("{v:.2} units²"),
        }
    }
}

/// How the area of a recognized figure is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AreaFormula {
    /// `A = s²`
    Square { side: f64 },
    /// `A = w × h`
    Rectangle { width: f64, height: f64 },
    /// `A = ½(a + b) × h`, with `a` and `b` the parallel sides.
    Trapezoid { a: f64, b: f64, height: f64 },
    /// `A = ½|Σ(xᵢyᵢ₊₁ - xᵢ₊₁yᵢ)|`
    Determinant,
}

/// Measurements for a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionReport {
    Line {
        length: f64,
        /// Direction in degrees, `atan2(dy, dx)`.
        angle: f64,
        dx: f64,
        dy: f64,
    },
    Point {
        position: Point,
    },
    /// Several items that do not close into a figure.
    Incomplete,
    Figure {
        kind: FigureKind,
        /// Vertices in cycle order.
        points: Vec<Point>,
        perimeter: f64,
        area: f64,
        formula: AreaFormula,
    },
}

impl SelectionReport {
    /// One-line human readable summary.
    pub fn summary(&self, unit: MeasurementUnit, grid_size: f64) -> String {
        match self {
            SelectionReport::Line { length, angle, .. } => format!(
                "Line: length {}, angle {angle:.1}°",
                unit.format_length(*length, grid_size)
            ),
            SelectionReport::Point { position } => format!(
                "Point: P({}, {})",
                unit.format_length(position.x, grid_size),
                unit.format_length(position.y, grid_size)
            ),
            SelectionReport::Incomplete => {
                "Figure: select points connected into a closed shape".to_string()
            }
            SelectionReport::Figure {
                kind,
                perimeter,
                area,
                ..
            } => format!(
                "{kind}: perimeter {}, area {}",
                unit.format_length(*perimeter, grid_size),
                unit.format_area(*area, grid_size)
            ),
        }
    }
}

fn coord_key(p: Point) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// Measure the selection.
///
/// Returns `None` for an empty selection or a lone stroke.
pub fn inspect_selection(items: &[SelectedItem]) -> Option<SelectionReport> {
    match items {
        [] => None,
        [SelectedItem::Line(line)] => {
            let dx = line.end.x - line.start.x;
            let dy = line.end.y - line.start.y;
            Some(SelectionReport::Line {
                length: line.length(),
                angle: angle_degrees(line.start, line.end),
                dx,
                dy,
            })
        }
        [SelectedItem::Point(point)] => Some(SelectionReport::Point {
            position: point.position,
        }),
        [SelectedItem::Stroke(_)] => None,
        _ => Some(inspect_figure(items)),
    }
}

fn inspect_figure(items: &[SelectedItem]) -> SelectionReport {
    let mut seen_points = HashSet::new();
    let mut seen_lines = HashSet::new();
    let mut points = Vec::new();
    let mut lines = Vec::new();
    for item in items {
        match item {
            SelectedItem::Point(p) => {
                if seen_points.insert(coord_key(p.position)) {
                    points.push(p.position);
                }
            }
            SelectedItem::Line(l) => {
                if seen_lines.insert((coord_key(l.start), coord_key(l.end))) {
                    lines.push((l.start, l.end));
                }
            }
            SelectedItem::Stroke(_) => {}
        }
    }

    let cycle = find_minimal_cycle(&points, &lines);
    let Some(kind) = classify_figure(&cycle) else {
        return SelectionReport::Incomplete;
    };
    let perimeter = polygon_perimeter(&cycle);
    let area = polygon_area(&cycle);
    let formula = match kind {
        FigureKind::Square => AreaFormula::Square {
            side: distance(cycle[0], cycle[1]),
        },
        FigureKind::Rectangle => AreaFormula::Rectangle {
            width: distance(cycle[0], cycle[1]),
            height: distance(cycle[1], cycle[2]),
        },
        FigureKind::Trapezoid => match trapezoid_parallel_sides(&cycle) {
            Some((a, b)) if a + b > 0.0 => AreaFormula::Trapezoid {
                a,
                b,
                height: 2.0 * area / (a + b),
            },
            _ => AreaFormula::Determinant,
        },
        FigureKind::Triangle | FigureKind::Polygon => AreaFormula::Determinant,
    };
    SelectionReport::Figure {
        kind,
        points: cycle,
        perimeter,
        area,
        formula,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{LineItem, PointItem, StrokeItem};

    fn line(a: (f64, f64), b: (f64, f64)) -> SelectedItem {
        SelectedItem::Line(LineItem::new(Point::new(a.0, a.1), Point::new(b.0, b.1)))
    }

    fn point(x: f64, y: f64) -> SelectedItem {
        SelectedItem::Point(PointItem::new(Point::new(x, y)))
    }

    #[test]
    fn test_format_length() {
        assert_eq!(MeasurementUnit::Pixels.format_length(100.0, 25.0), "100.0px");
        assert_eq!(MeasurementUnit::Centimeters.format_length(100.0, 25.0), "2.00cm");
        assert_eq!(MeasurementUnit::GridUnits.format_length(100.0, 25.0), "4.00 units");
    }

    #[test]
    fn test_format_area() {
        assert_eq!(MeasurementUnit::Pixels.format_area(10_000.0, 25.0), "10000.0px²");
        assert_eq!(MeasurementUnit::Centimeters.format_area(10_000.0, 25.0), "4.00cm²");
        assert_eq!(MeasurementUnit::GridUnits.format_area(10_000.0, 25.0), "16.00 units²");
    }

    #[test]
    fn test_unit_serde_names() {
        let json = serde_json::to_string(&MeasurementUnit::GridUnits).unwrap();
        assert_eq!(json, "\"units\"");
        let unit: MeasurementUnit = serde_json::from_str("\"cm\"").unwrap();
        assert_eq!(unit, MeasurementUnit::Centimeters);
    }

    #[test]
    fn test_single_line() {
        let report = inspect_selection(&[line((0.0, 0.0), (30.0, 40.0))]).unwrap();
        match report {
            SelectionReport::Line { length, dx, dy, angle } => {
                assert!((length - 50.0).abs() < f64::EPSILON);
                assert!((dx - 30.0).abs() < f64::EPSILON);
                assert!((dy - 40.0).abs() < f64::EPSILON);
                assert!((angle - 53.130_102_354).abs() < 1e-6);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_single_point_and_empty() {
        assert_eq!(
            inspect_selection(&[point(5.0, 6.0)]),
            Some(SelectionReport::Point {
                position: Point::new(5.0, 6.0)
            })
        );
        assert_eq!(inspect_selection(&[]), None);
        assert_eq!(
            inspect_selection(&[SelectedItem::Stroke(StrokeItem::new(vec![Point::ZERO]))]),
            None
        );
    }

    #[test]
    fn test_square_figure() {
        let items = [
            line((0.0, 0.0), (100.0, 0.0)),
            line((100.0, 0.0), (100.0, 100.0)),
            line((100.0, 100.0), (0.0, 100.0)),
            line((0.0, 100.0), (0.0, 0.0)),
        ];
        match inspect_selection(&items).unwrap() {
            SelectionReport::Figure {
                kind,
                perimeter,
                area,
                formula,
                points,
            } => {
                assert_eq!(kind, FigureKind::Square);
                assert_eq!(points.len(), 4);
                assert!((perimeter - 400.0).abs() < f64::EPSILON);
                assert!((area - 10_000.0).abs() < f64::EPSILON);
                assert_eq!(formula, AreaFormula::Square { side: 100.0 });
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_trapezoid_height_uses_parallel_sides() {
        let items = [
            line((0.0, 0.0), (50.0, 10.0)),
            line((50.0, 10.0), (50.0, 75.0)),
            line((50.0, 75.0), (0.0, 100.0)),
            line((0.0, 100.0), (0.0, 0.0)),
        ];
        match inspect_selection(&items).unwrap() {
            SelectionReport::Figure { kind, formula, .. } => {
                assert_eq!(kind, FigureKind::Trapezoid);
                match formula {
                    AreaFormula::Trapezoid { a, b, height } => {
                        assert!((a - 65.0).abs() < f64::EPSILON);
                        assert!((b - 100.0).abs() < f64::EPSILON);
                        assert!((height - 50.0).abs() < 1e-9);
                    }
                    other => panic!("unexpected formula {other:?}"),
                }
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_open_selection_is_incomplete() {
        let items = [
            point(0.0, 0.0),
            line((0.0, 0.0), (10.0, 0.0)),
            line((10.0, 0.0), (10.0, 10.0)),
        ];
        assert_eq!(inspect_selection(&items), Some(SelectionReport::Incomplete));
    }

    #[test]
    fn test_duplicate_items_are_merged() {
        let items = [
            point(0.0, 0.0),
            point(0.0, 0.0),
            line((0.0, 0.0), (100.0, 0.0)),
            line((0.0, 0.0), (100.0, 0.0)),
            line((100.0, 0.0), (50.0, 80.0)),
            line((50.0, 80.0), (0.0, 0.0)),
        ];
        match inspect_selection(&items).unwrap() {
            SelectionReport::Figure { kind, formula, .. } => {
                assert_eq!(kind, FigureKind::Triangle);
                assert_eq!(formula, AreaFormula::Determinant);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_summary() {
        let report = SelectionReport::Point {
            position: Point::new(100.0, 50.0),
        };
        assert_eq!(
            report.summary(MeasurementUnit::Centimeters, 25.0),
            "Point: P(2.00cm, 1.00cm)"
        );
    }
}
