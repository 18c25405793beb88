//! End-to-end behaviour of the notebook through its public API.

use geonote_core::geometry::{
    FigureKind, classify_figure, find_minimal_cycle, point_segment_distance, polygon_area,
    polygon_perimeter,
};
use geonote_core::{
    Camera, ItemKind, MouseButton, Notebook, PointerEvent, Scene, ToolKind,
};
use kurbo::{Point, Vec2};

fn click(notebook: &mut Notebook, x: f64, y: f64) {
    let position = Point::new(x, y);
    notebook.handle_pointer_event(&PointerEvent::Down {
        position,
        button: MouseButton::Left,
    });
    notebook.handle_pointer_event(&PointerEvent::Up {
        position,
        button: MouseButton::Left,
    });
}

#[test]
fn line_tool_connects_exact_point_positions() {
    let mut notebook = Notebook::default();
    notebook.scene.add_point(Point::new(100.0, 100.0));
    notebook.scene.add_point(Point::new(200.0, 100.0));
    notebook.set_tool(ToolKind::Line);

    click(&mut notebook, 104.0, 97.0);
    click(&mut notebook, 195.0, 103.0);

    let lines: Vec<_> = notebook.scene.live_lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].start, Point::new(100.0, 100.0));
    assert_eq!(lines[0].end, Point::new(200.0, 100.0));
}

#[test]
fn square_is_classified_and_measured() {
    let square = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(0.0, 100.0),
    ];
    assert_eq!(classify_figure(&square), Some(FigureKind::Square));
    assert!((polygon_area(&square) - 10_000.0).abs() < f64::EPSILON);
    assert!((polygon_perimeter(&square) - 400.0).abs() < f64::EPSILON);
    assert!((square[0].distance(square[1]) - 100.0).abs() < f64::EPSILON);
}

#[test]
fn eraser_respects_radius() {
    let mut notebook = Notebook::default();
    let mut config = notebook.config().clone();
    config.tools.eraser.radius = 10.0;
    notebook.update_config(config).unwrap();

    let near = notebook.scene.add_point(Point::new(55.0, 50.0));
    let far = notebook.scene.add_point(Point::new(70.0, 50.0));
    notebook.set_tool(ToolKind::Eraser);
    click(&mut notebook, 50.0, 50.0);

    assert!(!notebook.scene.is_live(near));
    assert!(notebook.scene.is_live(far));
}

#[test]
fn selecting_a_point_takes_only_its_lines() {
    let mut notebook = Notebook::default();
    let p = notebook.scene.add_point(Point::new(100.0, 100.0));
    let a = notebook.scene.add_line(Point::new(100.0, 100.0), Point::new(200.0, 100.0));
    let b = notebook.scene.add_line(Point::new(100.0, 100.0), Point::new(100.0, 250.0));
    notebook.scene.add_line(Point::new(300.0, 300.0), Point::new(350.0, 300.0));
    notebook.scene.add_line(Point::new(200.0, 100.0), Point::new(250.0, 150.0));

    click(&mut notebook, 101.0, 101.0);

    let selected = notebook.selected_items();
    let ids: Vec<_> = selected.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec![p, a, b]);
    assert_eq!(selected[0].kind(), ItemKind::Point);
}

#[test]
fn cycle_search_closed_and_open() {
    let (a, b, c) = (Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(50.0, 80.0));
    let closed = find_minimal_cycle(&[a, b, c], &[(a, b), (b, c), (c, a)]);
    assert_eq!(closed.len(), 3);
    for p in [a, b, c] {
        assert!(closed.contains(&p));
    }
    assert!(find_minimal_cycle(&[a, b, c], &[(a, b), (b, c)]).is_empty());
}

#[test]
fn erase_is_idempotent() {
    let mut scene = Scene::new();
    scene.add_point(Point::new(0.0, 0.0));
    scene.add_line(Point::new(-50.0, 4.0), Point::new(50.0, 4.0));
    scene.add_stroke(vec![Point::new(3.0, -3.0), Point::new(40.0, -40.0)]);
    scene.add_label(Point::new(100.0, 100.0), "keep");

    scene.erase_at(Point::new(0.0, 0.0), 5.0);
    let once: Vec<_> = scene.live_points().map(|p| p.position).collect();
    let once_lines = scene.live_lines().count();
    let once_strokes = scene.live_strokes().count();
    let once_labels = scene.live_labels().count();

    assert_eq!(scene.erase_at(Point::new(0.0, 0.0), 5.0), 0);
    assert_eq!(scene.live_points().map(|p| p.position).collect::<Vec<_>>(), once);
    assert_eq!(scene.live_lines().count(), once_lines);
    assert_eq!(scene.live_strokes().count(), once_strokes);
    assert_eq!(scene.live_labels().count(), once_labels);
    assert_eq!(once_labels, 1);
}

#[test]
fn segment_distance_matches_sampled_reference() {
    let segments = [
        (Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
        (Point::new(-20.0, 35.0), Point::new(60.0, -15.0)),
        (Point::new(5.0, 5.0), Point::new(5.0, 90.0)),
    ];
    let queries = [
        Point::new(50.0, 20.0),
        Point::new(-40.0, 10.0),
        Point::new(130.0, -7.0),
        Point::new(10.0, 50.0),
    ];
    for (a, b) in segments {
        for q in queries {
            let reference = (0..=10_000)
                .map(|i| a.lerp(b, i as f64 / 10_000.0).distance(q))
                .fold(f64::INFINITY, f64::min);
            let d = point_segment_distance(q, a, b);
            assert!(d <= reference + 1e-9);
            assert!(reference - d < 0.02, "{d} vs {reference}");
        }
    }
}

#[test]
fn camera_round_trip_for_any_view() {
    let mut camera = Camera::new();
    for step in 0..40 {
        let t = step as f64;
        camera.pan(Vec2::new(t * 13.0 - 200.0, 90.0 - t * 7.0));
        camera.zoom_at(Point::new(t * 20.0, 300.0 - t * 5.0), (t - 20.0) * 35.0);
        for p in [Point::new(0.0, 0.0), Point::new(-1234.5, 987.25), Point::new(1e5, -3e4)] {
            let back = camera.screen_to_world(camera.world_to_screen(p));
            let scale = p.to_vec2().hypot().max(1.0);
            assert!((back - p).hypot() / scale < 1e-9);
        }
    }
}
