//! Closed-walk search over selected points and lines.

use kurbo::Point;
use std::collections::HashMap;

/// Exact coordinate key. `-0.0` and `0.0` share a key.
fn exact_key(p: Point) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

struct Node {
    point: Point,
    /// Neighbour indices in first-seen order, without duplicates.
    connections: Vec<usize>,
}

#[derive(Default)]
struct Graph {
    nodes: Vec<Node>,
    index: HashMap<(u64, u64), usize>,
}

impl Graph {
    fn node(&mut self, p: Point) -> usize {
        let key = exact_key(p);
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(Node {
            point: p,
            connections: Vec::new(),
        });
        self.index.insert(key, i);
        i
    }

    fn connect(&mut self, a: usize, b: usize) {
        if !self.nodes[a].connections.contains(&b) {
            self.nodes[a].connections.push(b);
        }
        if !self.nodes[b].connections.contains(&a) {
            self.nodes[b].connections.push(a);
        }
    }

    fn closes(&self, current: usize, start: usize) -> bool {
        self.nodes[current].connections.contains(&start)
    }

    fn walk(&self, current: usize, start: usize, path: &mut Vec<usize>, visited: &mut [bool]) -> bool {
        if path.len() >= 3 && self.closes(current, start) {
            return true;
        }
        for &next in &self.nodes[current].connections {
            if visited[next] {
                continue;
            }
            visited[next] = true;
            path.push(next);
            if self.walk(next, start, path, visited) {
                return true;
            }
            path.pop();
            visited[next] = false;
        }
        false
    }
}

/// Find a closed walk of at least three distinct points.
///
/// Nodes are the selected points (in order) followed by line endpoints not
/// already present; lines become edges. Starting from each node in turn, a
/// depth-first search follows edges in insertion order and returns the
/// first path that can step back to its start. This is the first cycle
/// found, not necessarily the shortest. Returns an empty vector if there is
/// none.
pub fn find_minimal_cycle(points: &[Point], lines: &[(Point, Point)]) -> Vec<Point> {
    let mut graph = Graph::default();
    for &p in points {
        graph.node(p);
    }
    for &(a, b) in lines {
        let ia = graph.node(a);
        let ib = graph.node(b);
        if ia != ib {
            graph.connect(ia, ib);
        }
    }
    if graph.nodes.len() < 3 {
        return Vec::new();
    }

    let mut visited = vec![false; graph.nodes.len()];
    for start in 0..graph.nodes.len() {
        visited.iter_mut().for_each(|v| *v = false);
        visited[start] = true;
        let mut path = vec![start];
        if graph.walk(start, start, &mut path, &mut visited) {
            return path.into_iter().map(|i| graph.nodes[i].point).collect();
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_triangle_cycle() {
        let (a, b, c) = (p(0.0, 0.0), p(100.0, 0.0), p(50.0, 80.0));
        let cycle = find_minimal_cycle(&[a, b, c], &[(a, b), (b, c), (c, a)]);
        assert_eq!(cycle, vec![a, b, c]);
    }

    #[test]
    fn test_open_path_has_no_cycle() {
        let (a, b, c) = (p(0.0, 0.0), p(100.0, 0.0), p(50.0, 80.0));
        assert!(find_minimal_cycle(&[a, b, c], &[(a, b), (b, c)]).is_empty());
    }

    #[test]
    fn test_lines_only_square() {
        let (a, b, c, d) = (p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0));
        let cycle = find_minimal_cycle(&[], &[(a, b), (b, c), (c, d), (d, a)]);
        assert_eq!(cycle, vec![a, b, c, d]);
    }

    #[test]
    fn test_duplicate_lines_are_ignored() {
        let (a, b, c) = (p(0.0, 0.0), p(100.0, 0.0), p(50.0, 80.0));
        let cycle = find_minimal_cycle(&[], &[(a, b), (b, a), (a, b), (b, c), (c, a)]);
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn test_first_hit_not_shortest() {
        // Square with diagonal b-d: the triangle a,d,b exists, but the walk
        // reaches c from d before trying b.
        let (a, b, c, d) = (p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0));
        let cycle = find_minimal_cycle(&[], &[(a, d), (d, c), (c, b), (b, a), (b, d)]);
        assert_eq!(cycle, vec![a, d, c, b]);

        // With diagonal a-c, the path a,b,c already closes.
        let cycle = find_minimal_cycle(&[], &[(a, b), (b, c), (c, d), (d, a), (a, c)]);
        assert_eq!(cycle, vec![a, b, c]);
    }

    #[test]
    fn test_too_few_points() {
        let (a, b) = (p(0.0, 0.0), p(1.0, 0.0));
        assert!(find_minimal_cycle(&[a, b], &[(a, b)]).is_empty());
        assert!(find_minimal_cycle(&[], &[]).is_empty());
    }

    #[test]
    fn test_negative_zero_shares_key() {
        let (a, b, c) = (p(0.0, 0.0), p(100.0, 0.0), p(50.0, 80.0));
        let cycle = find_minimal_cycle(&[], &[(a, b), (b, c), (c, p(-0.0, 0.0))]);
        assert_eq!(cycle.len(), 3);
    }
}
