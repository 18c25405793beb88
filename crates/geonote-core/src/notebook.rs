//! Notebook state: scene, camera, tools, input and configuration.

use crate::camera::Camera;
use crate::config::{ConfigResult, NotebookConfig};
use crate::input::{InputState, KeyEvent, MouseButton, PointerEvent};
use crate::inspect::GeometryApi;
use crate::properties::{SelectionReport, inspect_selection};
use crate::scene::Scene;
use crate::selection::SelectedItem;
use crate::tools::{PreviewShape, ToolKind, ToolManager, ToolResponse};
use kurbo::{Point, Size};

/// Callback invoked with a fresh snapshot whenever the selection changes,
/// together with the configuration in effect at that moment.
pub type SelectionListener = Box<dyn FnMut(&[SelectedItem], &NotebookConfig)>;

/// Everything the event loop mutates and the renderer reads.
pub struct Notebook {
    /// All drawn items.
    pub scene: Scene,
    /// Camera for view transform.
    pub camera: Camera,
    /// Tool manager.
    pub tool_manager: ToolManager,
    /// Pointer and keyboard state.
    pub input: InputState,
    /// Viewport size in screen pixels.
    pub viewport_size: Size,
    config: NotebookConfig,
    page_count: usize,
    selection_listener: Option<SelectionListener>,
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new(NotebookConfig::default())
    }
}

impl Notebook {
    pub fn new(config: NotebookConfig) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera::new(),
            tool_manager: ToolManager::new(&config),
            input: InputState::new(),
            viewport_size: Size::new(800.0, 600.0),
            page_count: config.initial_page_count(),
            config,
            selection_listener: None,
        }
    }

    pub fn config(&self) -> &NotebookConfig {
        &self.config
    }

    /// Apply a new configuration without restarting.
    ///
    /// An invalid configuration is rejected and the current one stays in effect.
    pub fn update_config(&mut self, config: NotebookConfig) -> ConfigResult<()> {
        if let Err(e) = config.validate() {
            log::warn!("Rejected configuration update: {e}");
            return Err(e);
        }
        self.tool_manager.apply_config(&config);
        self.page_count = self.page_count.clamp(1, config.notebook.max_pages.max(1));
        self.config = config;
        log::debug!("Configuration updated");
        Ok(())
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Append a page. Returns false at the configured maximum.
    pub fn add_page(&mut self) -> bool {
        if self.page_count >= self.config.notebook.max_pages {
            return false;
        }
        self.page_count += 1;
        true
    }

    /// Drop the last page. The notebook always keeps one.
    pub fn remove_page(&mut self) -> bool {
        if self.page_count <= 1 {
            return false;
        }
        self.page_count -= 1;
        true
    }

    /// Register the selection listener, replacing any previous one.
    pub fn on_selection_change(
        &mut self,
        listener: impl FnMut(&[SelectedItem], &NotebookConfig) + 'static,
    ) {
        self.selection_listener = Some(Box::new(listener));
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tool_manager.current_tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        let response = self.tool_manager.set_tool(&mut self.scene, tool);
        self.respond(response);
    }

    /// Route a screen-space pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> ToolResponse {
        let pan = self.input.handle_pointer_event(event);
        let modifiers = self.input.modifiers;
        let response = match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                let world = self.camera.screen_to_world(position);
                self.tool_manager
                    .active_mut()
                    .on_pointer_down(&mut self.scene, world, modifiers)
            }
            PointerEvent::Down {
                button: MouseButton::Right,
                ..
            } => {
                self.cancel();
                ToolResponse::None
            }
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => {
                let world = self.camera.screen_to_world(position);
                self.tool_manager
                    .active_mut()
                    .on_pointer_up(&mut self.scene, world, modifiers)
            }
            PointerEvent::Move { position } => match pan {
                Some(delta) => {
                    self.camera.pan(delta);
                    ToolResponse::None
                }
                None => {
                    let world = self.camera.screen_to_world(position);
                    self.tool_manager
                        .active_mut()
                        .on_pointer_move(&mut self.scene, world, modifiers)
                }
            },
            PointerEvent::Scroll { position, delta } => {
                self.camera.zoom_at(position, -delta.y);
                ToolResponse::None
            }
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => ToolResponse::None,
        };
        self.respond(response);
        response
    }

    /// Route a key event. Modifiers are latched; label text is edited while
    /// a label entry is open.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> ToolResponse {
        self.input.handle_key_event(event);
        let KeyEvent::Pressed(key) = event else {
            return ToolResponse::None;
        };

        let response = if self.is_editing_label() {
            let label = &mut self.tool_manager.label;
            match key.as_str() {
                "Enter" => label.commit(&mut self.scene),
                "Escape" => {
                    label.discard();
                    ToolResponse::None
                }
                "Backspace" => {
                    label.backspace();
                    ToolResponse::None
                }
                text if is_printable(text) => {
                    label.insert_text(text);
                    ToolResponse::None
                }
                _ => ToolResponse::None,
            }
        } else if key == "Escape" {
            self.cancel();
            ToolResponse::None
        } else {
            ToolResponse::None
        };
        self.respond(response);
        response
    }

    /// Whether keystrokes currently go to an open label entry.
    pub fn is_editing_label(&self) -> bool {
        self.current_tool() == ToolKind::Label && self.tool_manager.label.is_editing()
    }

    /// Close an open label entry as if its input lost focus, keeping the text.
    pub fn commit_label(&mut self) -> ToolResponse {
        if !self.is_editing_label() {
            return ToolResponse::None;
        }
        let response = self.tool_manager.label.commit(&mut self.scene);
        self.respond(response);
        response
    }

    /// Discard the active tool's in-progress gesture.
    pub fn cancel(&mut self) {
        self.tool_manager.active_mut().cancel();
    }

    /// Flip the angle overlay on every selected point. Returns how many changed.
    pub fn toggle_angles(&mut self) -> usize {
        let mut changed = 0;
        for id in self.tool_manager.select.selected_point_ids() {
            if self.scene.is_live(id) && self.scene.toggle_angle(id).is_some() {
                changed += 1;
            }
        }
        if changed > 0 {
            self.notify_selection();
        }
        changed
    }

    /// Snapshot of the live selection.
    pub fn selected_items(&self) -> Vec<SelectedItem> {
        self.tool_manager.select.selected_items(&self.scene)
    }

    /// Measurements of the current selection.
    pub fn inspect_selection(&self) -> Option<SelectionReport> {
        inspect_selection(&self.selected_items())
    }

    /// Scripting access to the scene.
    pub fn geometry_api(&mut self) -> GeometryApi<'_> {
        GeometryApi::new(&mut self.scene)
    }

    /// Preview overlay of the active tool.
    pub fn preview(&self) -> Vec<PreviewShape> {
        self.tool_manager.active().preview(&self.scene)
    }

    /// Screen position for the inline label editor, while one is open.
    pub fn label_editor_position(&self) -> Option<Point> {
        self.tool_manager.label.editor_position(&self.camera)
    }

    /// Remove every item and drop the selection.
    pub fn clear(&mut self) {
        self.scene.clear();
        for kind in ToolKind::ALL {
            self.tool_manager.tool_mut(kind).cancel();
        }
        if self.tool_manager.select.clear_selection() {
            self.notify_selection();
        }
    }

    fn respond(&mut self, response: ToolResponse) {
        if response == ToolResponse::SelectionChanged {
            self.notify_selection();
        }
    }

    fn notify_selection(&mut self) {
        if let Some(listener) = self.selection_listener.as_mut() {
            let items = self.tool_manager.select.selected_items(&self.scene);
            listener(&items, &self.config);
        }
    }
}

fn is_printable(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::input::Modifiers;
    use crate::items::ItemKind;
    use crate::tools::Tool;
    use kurbo::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(notebook: &mut Notebook, x: f64, y: f64) -> ToolResponse {
        let position = Point::new(x, y);
        let response = notebook.handle_pointer_event(&PointerEvent::Down {
            position,
            button: MouseButton::Left,
        });
        notebook.handle_pointer_event(&PointerEvent::Up {
            position,
            button: MouseButton::Left,
        });
        response
    }

    fn key(notebook: &mut Notebook, name: &str) {
        notebook.handle_key_event(&KeyEvent::Pressed(name.to_string()));
        notebook.handle_key_event(&KeyEvent::Released(name.to_string()));
    }

    #[test]
    fn test_pointer_uses_world_coordinates() {
        let mut notebook = Notebook::default();
        notebook.camera.offset = Vec2::new(100.0, 50.0);
        notebook.camera.zoom = 2.0;
        notebook.set_tool(ToolKind::Point);

        press(&mut notebook, 150.0, 100.0);
        let point = notebook.scene.live_points().next().unwrap();
        assert_eq!(point.position, Point::new(25.0, 25.0));
    }

    #[test]
    fn test_middle_drag_pans_without_tool_moves() {
        let mut notebook = Notebook::default();
        notebook.set_tool(ToolKind::Pen);
        notebook.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Middle,
        });
        notebook.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(40.0, 30.0),
        });
        assert_eq!(notebook.camera.offset, Vec2::new(30.0, 20.0));
        assert!(!notebook.tool_manager.pen.is_active());
        assert!(notebook.tool_manager.pen.points().is_empty());
    }

    #[test]
    fn test_right_click_cancels() {
        let mut notebook = Notebook::default();
        notebook.scene.add_point(Point::new(0.0, 0.0));
        notebook.set_tool(ToolKind::Line);
        press(&mut notebook, 0.0, 0.0);
        assert!(notebook.tool_manager.line.is_active());

        notebook.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Right,
        });
        assert!(!notebook.tool_manager.line.is_active());
    }

    #[test]
    fn test_wheel_zooms_at_cursor() {
        let mut notebook = Notebook::default();
        let cursor = Point::new(200.0, 150.0);
        let before = notebook.camera.screen_to_world(cursor);
        notebook.handle_pointer_event(&PointerEvent::Scroll {
            position: cursor,
            delta: Vec2::new(0.0, -100.0),
        });
        assert!(notebook.camera.zoom > 1.0);
        let after = notebook.camera.screen_to_world(cursor);
        assert!((before - after).hypot() < 1e-9);
    }

    #[test]
    fn test_latched_shift_reaches_tools() {
        let mut notebook = Notebook::default();
        let a = notebook.scene.add_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let b = notebook.scene.add_line(Point::new(0.0, 50.0), Point::new(100.0, 50.0));

        press(&mut notebook, 50.0, 0.0);
        notebook.handle_key_event(&KeyEvent::Pressed("Shift".to_string()));
        assert_eq!(notebook.input.modifiers, Modifiers::shift());
        press(&mut notebook, 50.0, 50.0);
        notebook.handle_key_event(&KeyEvent::Released("Shift".to_string()));

        let ids: Vec<_> = notebook.selected_items().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_selection_listener_receives_snapshots() {
        let mut notebook = Notebook::default();
        notebook.scene.add_point(Point::new(0.0, 0.0));
        notebook.scene.add_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));

        let seen: Rc<RefCell<Vec<Vec<ItemKind>>>> = Rc::default();
        let sink = Rc::clone(&seen);
        notebook.on_selection_change(move |items, _config| {
            sink.borrow_mut().push(items.iter().map(|i| i.kind()).collect());
        });

        press(&mut notebook, 0.0, 0.0);
        press(&mut notebook, 500.0, 500.0);
        assert_eq!(
            *seen.borrow(),
            vec![vec![ItemKind::Point, ItemKind::Line], vec![]]
        );
    }

    #[test]
    fn test_label_typing() {
        let mut notebook = Notebook::default();
        notebook.set_tool(ToolKind::Label);
        press(&mut notebook, 40.0, 40.0);
        for k in ["H", "i", "!", "x", "Backspace", "Shift"] {
            key(&mut notebook, k);
        }
        assert_eq!(notebook.tool_manager.label.text(), "Hi!");
        assert_eq!(notebook.label_editor_position(), Some(Point::new(40.0, 40.0)));

        key(&mut notebook, "Enter");
        let label = notebook.scene.live_labels().next().unwrap();
        assert_eq!(label.text, "Hi!");
    }

    #[test]
    fn test_canvas_press_commits_label() {
        let mut notebook = Notebook::default();
        notebook.set_tool(ToolKind::Label);
        press(&mut notebook, 10.0, 20.0);
        key(&mut notebook, "a");
        key(&mut notebook, "b");
        press(&mut notebook, 300.0, 300.0);

        assert!(!notebook.is_editing_label());
        let labels: Vec<_> = notebook.scene.live_labels().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "ab");
        assert_eq!(labels[0].position, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_commit_label_on_blur() {
        let mut notebook = Notebook::default();
        assert_eq!(notebook.commit_label(), ToolResponse::None);

        notebook.set_tool(ToolKind::Label);
        press(&mut notebook, 40.0, 40.0);
        key(&mut notebook, "x");
        assert_eq!(notebook.commit_label(), ToolResponse::SceneChanged);
        assert_eq!(notebook.scene.live_labels().count(), 1);
        assert!(!notebook.is_editing_label());
    }

    #[test]
    fn test_escape_discards_label() {
        let mut notebook = Notebook::default();
        notebook.set_tool(ToolKind::Label);
        press(&mut notebook, 40.0, 40.0);
        key(&mut notebook, "a");
        key(&mut notebook, "Escape");
        notebook.set_tool(ToolKind::Select);
        assert!(notebook.scene.is_empty());
    }

    #[test]
    fn test_toggle_angles_on_selected_points() {
        let mut notebook = Notebook::default();
        let p = notebook.scene.add_point(Point::new(0.0, 0.0));
        press(&mut notebook, 0.0, 0.0);
        assert_eq!(notebook.toggle_angles(), 1);
        assert!(notebook.scene.point(p).unwrap().show_angle);
    }

    #[test]
    fn test_update_config_is_live() {
        let mut notebook = Notebook::default();
        let mut config = NotebookConfig::default();
        config.notebook.grid_size = 50.0;
        config.notebook.max_pages = 1;
        notebook.update_config(config).unwrap();

        assert!((notebook.tool_manager.line.snap_radius() - 40.0).abs() < f64::EPSILON);
        assert_eq!(notebook.page_count(), 1);
        assert!(!notebook.add_page());
    }

    #[test]
    fn test_invalid_config_update_keeps_previous() {
        let mut notebook = Notebook::default();
        let mut config = NotebookConfig::default();
        config.notebook.grid_size = 0.0;
        assert!(matches!(
            notebook.update_config(config),
            Err(ConfigError::InvalidValue { field: "notebook.gridSize", .. })
        ));

        let mut config = NotebookConfig::default();
        config.tools.eraser.radius = f64::NAN;
        assert!(notebook.update_config(config).is_err());

        let defaults = NotebookConfig::default();
        assert_eq!(notebook.config().notebook.grid_size, defaults.notebook.grid_size);
        assert_eq!(notebook.config().tools.eraser.radius, defaults.tools.eraser.radius);
        assert!((notebook.tool_manager.line.snap_radius() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_selection_listener_sees_current_config() {
        let mut notebook = Notebook::default();
        notebook.scene.add_point(Point::new(0.0, 0.0));

        let grids: Rc<RefCell<Vec<f64>>> = Rc::default();
        let sink = Rc::clone(&grids);
        notebook.on_selection_change(move |_items, config| {
            sink.borrow_mut().push(config.notebook.grid_size);
        });

        press(&mut notebook, 0.0, 0.0);
        let mut config = NotebookConfig::default();
        config.notebook.grid_size = 50.0;
        notebook.update_config(config).unwrap();
        press(&mut notebook, 500.0, 500.0);

        assert_eq!(*grids.borrow(), vec![25.0, 50.0]);
    }

    #[test]
    fn test_pages() {
        let mut notebook = Notebook::default();
        assert_eq!(notebook.page_count(), 2);
        assert!(notebook.add_page());
        assert_eq!(notebook.page_count(), 3);
        assert!(notebook.remove_page());
        assert!(notebook.remove_page());
        assert!(!notebook.remove_page());
        assert_eq!(notebook.page_count(), 1);
    }

    #[test]
    fn test_inspect_selection_and_clear() {
        let mut notebook = Notebook::default();
        notebook.scene.add_line(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        press(&mut notebook, 15.0, 20.0);
        assert!(matches!(
            notebook.inspect_selection(),
            Some(SelectionReport::Line { .. })
        ));

        notebook.clear();
        assert!(notebook.selected_items().is_empty());
        assert!(notebook.scene.is_empty());
    }
}
