//! Renderer trait abstraction.

use geonote_core::Notebook;
use kurbo::{Rect, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
///
/// Holds a shared borrow of the notebook: building a frame can never
/// mutate the scene.
pub struct RenderContext<'a> {
    /// The notebook to render.
    pub notebook: &'a Notebook,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Color behind the pages.
    pub background_color: Color,
    /// Whether the active tool's preview layer is drawn.
    pub show_preview: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(notebook: &'a Notebook, viewport_size: Size) -> Self {
        Self {
            notebook,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(240, 240, 240, 255),
            show_preview: true,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Toggle the tool preview layer.
    pub fn with_preview(mut self, show: bool) -> Self {
        self.show_preview = show;
        self
    }

    /// World-space rectangle covered by the viewport.
    pub fn visible_world_rect(&self) -> Rect {
        self.notebook.camera.visible_world_rect(self.viewport_size)
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// Called once per frame. Must not fail: items that cannot be drawn are
    /// skipped.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
