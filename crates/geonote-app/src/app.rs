//! Application state and lifecycle.

use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use geonote_core::properties::inspect_selection;
use geonote_core::{
    ConfigError, KeyEvent, Modifiers, MouseButton as NotebookButton, Notebook, NotebookConfig,
    PointerEvent, SelectedItem,
};
use geonote_render::{RenderContext, Renderer, RendererError, VelloRenderer};
use kurbo::{Point, Size, Vec2};
use peniko::Color;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "GEONOTE_CONFIG";

/// Pixels scrolled per wheel line.
const LINE_SCROLL: f64 = 20.0;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Surface error: {0}")]
    Surface(String),
    #[error("Renderer error: {0}")]
    Renderer(#[from] RendererError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub notebook: NotebookConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Geonote".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::from_rgba8(240, 240, 240, 255),
            notebook: NotebookConfig::default(),
        }
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("geonote").join("config.json"))
}

/// Load the notebook configuration.
///
/// A file named by `$GEONOTE_CONFIG` must load; the per-user file is
/// optional and falls back to defaults.
pub fn load_notebook_config() -> AppResult<NotebookConfig> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        let path = PathBuf::from(path);
        log::info!("Loading config from {}", path.display());
        return Ok(NotebookConfig::load(&path)?);
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            log::info!("Loading config from {}", path.display());
            Ok(NotebookConfig::load_or_default(&path))
        }
        _ => {
            log::debug!("No config file, using defaults");
            Ok(NotebookConfig::default())
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    notebook_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // State
    notebook: Notebook,
    /// Last cursor position in physical pixels.
    cursor: Point,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application until the window is closed.
    pub async fn run() -> AppResult<()> {
        let notebook = load_notebook_config()?;
        let event_loop = EventLoop::new()?;
        let mut app = App::with_config(AppConfig {
            notebook,
            ..AppConfig::default()
        });
        event_loop.run_app(&mut app)?;
        Ok(())
    }

    /// Create the window, surface and renderers.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> AppResult<()> {
        log::info!("Creating window...");
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| AppError::Surface(e.to_string()))?,
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .map_err(|e| AppError::Surface(e.to_string()))?;
        // The surface borrows the window, which AppState keeps alive alongside it.
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };

        let device = &render_cx.devices[surface.dev_id].device;
        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let mut notebook = Notebook::new(self.config.notebook.clone());
        notebook.set_viewport_size(surface.config.width as f64, surface.config.height as f64);
        notebook.on_selection_change(|items, config| match selection_summary(items, config) {
            Some(summary) => log::info!("Selection: {summary}"),
            None => log::debug!("Selection: {} item(s)", items.len()),
        });

        log::info!(
            "Geonote initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        ShortcutRegistry::print_all();

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            notebook_renderer: VelloRenderer::new(),
            texture_blitter,
            notebook,
            cursor: Point::ZERO,
        });
        window.request_redraw();
        Ok(())
    }

    /// Build and present one frame, then schedule the next.
    fn render(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;
        let ctx = RenderContext::new(&state.notebook, Size::new(width as f64, height as f64))
            .with_scale_factor(state.window.scale_factor())
            .with_background(self.config.background_color);
        state.notebook_renderer.build_scene(&ctx);
        let base_color = state.notebook_renderer.background_color(&ctx);
        let scene = state.notebook_renderer.take_scene();

        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                state.window.request_redraw();
                return;
            }
        };

        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello renders through compute shaders into an Rgba8Unorm storage
        // texture, which is then blitted to the surface format.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            &scene,
            &render_texture_view,
            &params,
        ) {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());
        let mut blit_encoder =
            device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
        state.texture_blitter.copy(
            device,
            &mut blit_encoder,
            &render_texture_view,
            &surface_view,
        );
        queue.submit(std::iter::once(blit_encoder.finish()));

        surface_texture.present();
        state.window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of a key as the notebook understands it.
pub(crate) fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Named(named) => {
            let name = match named {
                NamedKey::Control => "Control",
                NamedKey::Shift => "Shift",
                NamedKey::Alt => "Alt",
                NamedKey::Super => "Meta",
                NamedKey::Enter => "Enter",
                NamedKey::Escape => "Escape",
                NamedKey::Backspace => "Backspace",
                NamedKey::Space => " ",
                _ => return None,
            };
            Some(name.to_string())
        }
        Key::Character(c) => Some(c.to_string()),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> Option<NotebookButton> {
    match button {
        MouseButton::Left => Some(NotebookButton::Left),
        MouseButton::Right => Some(NotebookButton::Right),
        MouseButton::Middle => Some(NotebookButton::Middle),
        _ => None,
    }
}

/// Summary of a selection in the configured unit, if it can be inspected.
pub(crate) fn selection_summary(items: &[SelectedItem], config: &NotebookConfig) -> Option<String> {
    let report = inspect_selection(items)?;
    Some(report.summary(config.notebook.measurement_unit, config.notebook.grid_size))
}

/// Apply a shortcut to the notebook.
pub(crate) fn apply_shortcut(notebook: &mut Notebook, action: ShortcutAction) {
    match action {
        ShortcutAction::Tool(kind) => {
            notebook.set_tool(kind);
            log::info!("Tool: {}", kind.name());
        }
        ShortcutAction::ToggleAngles => {
            let changed = notebook.toggle_angles();
            log::debug!("Toggled angles on {changed} point(s)");
        }
        ShortcutAction::AddPage => {
            if notebook.add_page() {
                log::info!("Pages: {}", notebook.page_count());
            } else {
                log::info!("Page limit reached");
            }
        }
        ShortcutAction::RemovePage => {
            if notebook.remove_page() {
                log::info!("Pages: {}", notebook.page_count());
            }
        }
        ShortcutAction::Cancel => notebook.cancel(),
    }
}

/// Route a key press or release. Shortcuts are ignored while a label is
/// being typed.
pub(crate) fn handle_key(notebook: &mut Notebook, name: String, pressed: bool) {
    if pressed && !notebook.is_editing_label() {
        let ctrl = notebook.input.modifiers.ctrl;
        if let Some(action) = ShortcutRegistry::action_for(&name, ctrl) {
            apply_shortcut(notebook, action);
            return;
        }
    }
    let event = if pressed {
        KeyEvent::Pressed(name)
    } else {
        KeyEvent::Released(name)
    };
    notebook.handle_key_event(&event);
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Initialization failed: {e}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::RedrawRequested) {
            self.render();
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Closing");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                state
                    .notebook
                    .set_viewport_size(size.width as f64, size.height as f64);
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.cursor = Point::new(position.x, position.y);
                state.notebook.handle_pointer_event(&PointerEvent::Move {
                    position: state.cursor,
                });
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let Some(button) = pointer_button(button) else {
                    return;
                };
                let position = state.cursor;
                let event = match btn_state {
                    ElementState::Pressed => PointerEvent::Down { position, button },
                    ElementState::Released => PointerEvent::Up { position, button },
                };
                state.notebook.handle_pointer_event(&event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => {
                        Vec2::new(x as f64 * LINE_SCROLL, y as f64 * LINE_SCROLL)
                    }
                    MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x, pos.y),
                };
                state.notebook.handle_pointer_event(&PointerEvent::Scroll {
                    position: state.cursor,
                    delta,
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let Some(name) = key_name(&event.logical_key) else {
                    return;
                };
                let pressed = event.state == ElementState::Pressed;
                handle_key(&mut state.notebook, name, pressed);
            }

            WindowEvent::Focused(false) => {
                state.notebook.commit_label();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let m = modifiers.state();
                state.notebook.input.set_modifiers(Modifiers {
                    shift: m.shift_key(),
                    ctrl: m.control_key(),
                    alt: m.alt_key(),
                    meta: m.super_key(),
                });
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geonote_core::ToolKind;
    use geonote_core::properties::MeasurementUnit;

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(&Key::Named(NamedKey::Control)).as_deref(), Some("Control"));
        assert_eq!(key_name(&Key::Named(NamedKey::Enter)).as_deref(), Some("Enter"));
        assert_eq!(key_name(&Key::Named(NamedKey::Space)).as_deref(), Some(" "));
        assert_eq!(key_name(&Key::Character("q".into())).as_deref(), Some("q"));
        assert_eq!(key_name(&Key::Named(NamedKey::F1)), None);
    }

    #[test]
    fn test_shortcuts_switch_tools_and_pages() {
        let mut notebook = Notebook::default();
        handle_key(&mut notebook, "l".into(), true);
        assert_eq!(notebook.current_tool(), ToolKind::Line);

        let pages = notebook.page_count();
        handle_key(&mut notebook, "+".into(), true);
        assert_eq!(notebook.page_count(), pages + 1);
        handle_key(&mut notebook, "-".into(), true);
        assert_eq!(notebook.page_count(), pages);
    }

    #[test]
    fn test_typing_a_label_bypasses_shortcuts() {
        let mut notebook = Notebook::default();
        handle_key(&mut notebook, "t".into(), true);
        assert_eq!(notebook.current_tool(), ToolKind::Label);
        notebook.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(50.0, 50.0),
            button: NotebookButton::Left,
        });
        assert!(notebook.is_editing_label());

        for key in ["p", "e", "n"] {
            handle_key(&mut notebook, key.into(), true);
        }
        assert_eq!(notebook.current_tool(), ToolKind::Label);
        assert_eq!(notebook.tool_manager.label.text(), "pen");

        handle_key(&mut notebook, "Enter".into(), true);
        assert_eq!(notebook.scene.live_labels().count(), 1);
    }

    #[test]
    fn test_ctrl_disables_plain_shortcuts() {
        let mut notebook = Notebook::default();
        handle_key(&mut notebook, "Control".into(), true);
        handle_key(&mut notebook, "p".into(), true);
        assert_eq!(notebook.current_tool(), ToolKind::Select);
        handle_key(&mut notebook, "Control".into(), false);
        handle_key(&mut notebook, "p".into(), true);
        assert_eq!(notebook.current_tool(), ToolKind::Pen);
    }

    #[test]
    fn test_selection_summary_follows_config() {
        let mut notebook = Notebook::default();
        notebook.scene.add_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        notebook.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(50.0, 0.0),
            button: NotebookButton::Left,
        });
        let items = notebook.selected_items();

        let mut config = NotebookConfig::default();
        config.notebook.measurement_unit = MeasurementUnit::Pixels;
        let px = selection_summary(&items, &config).unwrap();
        assert!(px.contains("100.0px"), "{px}");

        config.notebook.measurement_unit = MeasurementUnit::GridUnits;
        config.notebook.grid_size = 50.0;
        let units = selection_summary(&items, &config).unwrap();
        assert!(units.contains("2.00 units"), "{units}");

        assert_eq!(selection_summary(&[], &config), None);
    }

    #[test]
    fn test_button_mapping() {
        assert_eq!(pointer_button(MouseButton::Middle), Some(NotebookButton::Middle));
        assert_eq!(pointer_button(MouseButton::Back), None);
    }
}
