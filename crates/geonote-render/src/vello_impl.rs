//! Vello-based renderer implementation.

use crate::page::{PageLayout, PageRect};
use crate::renderer::{RenderContext, Renderer};
use geonote_core::geometry::{ANGLE_ARC_RADIUS, angle_wedges};
use geonote_core::{Item, NotebookConfig, PreviewShape, SerializableColor};
use kurbo::{Affine, Arc, BezPath, Cap, Circle, Join, Line, Point, Rect, Stroke, Vec2};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, Layout, LayoutContext};
use peniko::{Brush, Color, Fill};
use vello::Scene;

/// Font size of free-standing labels.
const LABEL_FONT_SIZE: f32 = 14.0;
/// Padding of the white box behind a label.
const LABEL_PADDING: f64 = 4.0;
/// Font size of point names.
const POINT_LABEL_FONT_SIZE: f32 = 16.0;
/// Offset of a point name from its point.
const POINT_LABEL_OFFSET: f64 = 8.0;
/// Font size of angle measurements.
const ANGLE_FONT_SIZE: f32 = 4.0;
const LINE_WIDTH: f64 = 2.0;
const DASH: [f64; 2] = [5.0, 5.0];
/// Number of layers in a soft background line.
const BLUR_LAYERS: usize = 3;

/// Where a text layout is placed relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextAnchor {
    /// Anchor on the left edge, vertically centered.
    MiddleLeft,
    /// Anchor at the bottom-left corner.
    BottomLeft,
    /// Anchor at the center.
    Center,
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (system fonts, loaded once).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Current zoom level.
    zoom: f64,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            zoom: 1.0,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Zoom of the last built frame.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Draw a line as a few widening, fading layers.
    fn soft_line(
        &mut self,
        line: Line,
        color: SerializableColor,
        width: f64,
        blur: f64,
        transform: Affine,
    ) {
        for i in 0..BLUR_LAYERS {
            let stroke = Stroke::new(width + i as f64 * blur);
            let color = color.with_opacity(1.0 / (i + 1) as f64);
            self.scene.stroke(&stroke, transform, color, None, &line);
        }
    }

    fn render_page(&mut self, page: &PageRect, config: &NotebookConfig, transform: Affine) {
        let outline = page.outline(config.notebook.corner_radius);
        self.scene.fill(
            Fill::NonZero,
            transform,
            Color::from(config.colors.background),
            None,
            &outline,
        );

        let grid = config.notebook.grid_size;
        if config.display.show_grid {
            for x in page.grid_columns(grid) {
                let line = Line::new((x, page.rect.y0), (x, page.rect.y1));
                self.soft_line(
                    line,
                    config.colors.grid_lines,
                    config.lines.grid_line_width,
                    config.lines.grid_line_blur,
                    transform,
                );
            }
            for y in page.grid_rows(grid) {
                let line = Line::new((page.rect.x0, y), (page.rect.x1, y));
                self.soft_line(
                    line,
                    config.colors.grid_lines,
                    config.lines.grid_line_width,
                    config.lines.grid_line_blur,
                    transform,
                );
            }
        }

        if let Some(x) = page.margin_x(grid) {
            let line = Line::new((x, page.rect.y0), (x, page.rect.y1));
            self.soft_line(
                line,
                config.colors.margin_line,
                config.lines.margin_line_width,
                config.lines.margin_line_blur,
                transform,
            );
        }

        let border = Stroke::new(config.lines.border_width);
        self.scene.stroke(
            &border,
            transform,
            Color::from(config.colors.border),
            None,
            &outline,
        );

        if let Some(edge) = page.shadow_edge() {
            let shadow = Stroke::new(config.lines.border_width + 2.0);
            let offset = transform * Affine::translate((2.0, 0.0));
            self.scene.stroke(
                &shadow,
                offset,
                Color::from_rgba8(0, 0, 0, 26),
                None,
                &edge,
            );
        }
    }

    /// Lay out a single line of text.
    fn layout_text(&mut self, text: &str, font_size: f32, color: Color) -> Layout<Brush> {
        use parley::StyleProperty;

        let brush = Brush::Solid(color);
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::Brush(brush));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            "system-ui, sans-serif".into(),
        )));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
        layout
    }

    /// Top-left corner of a laid out text for the given anchor.
    fn text_origin(layout: &Layout<Brush>, anchor: Point, placement: TextAnchor) -> Point {
        let width = layout.width() as f64;
        let height = layout.height() as f64;
        match placement {
            TextAnchor::MiddleLeft => Point::new(anchor.x, anchor.y - height / 2.0),
            TextAnchor::BottomLeft => Point::new(anchor.x, anchor.y - height),
            TextAnchor::Center => Point::new(anchor.x - width / 2.0, anchor.y - height / 2.0),
        }
    }

    /// Draw the glyphs of a layout with its top-left corner at `origin`.
    fn draw_layout(
        &mut self,
        layout: &Layout<Brush>,
        origin: Point,
        color: Color,
        transform: Affine,
    ) -> usize {
        let brush = Brush::Solid(color);
        let text_transform = transform * Affine::translate(origin.to_vec2());
        let mut glyph_count = 0;

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                glyph_count += glyphs.len();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
        glyph_count
    }

    /// Draw text at an anchor. Returns the rectangle it occupies.
    fn render_text(
        &mut self,
        text: &str,
        anchor: Point,
        placement: TextAnchor,
        font_size: f32,
        color: Color,
        transform: Affine,
    ) -> Rect {
        let layout = self.layout_text(text, font_size, color);
        let origin = Self::text_origin(&layout, anchor, placement);
        let glyphs = self.draw_layout(&layout, origin, color, transform);
        let size = kurbo::Size::new(layout.width() as f64, layout.height() as f64);

        // No usable system font: show where the text would be.
        if glyphs == 0 && !text.trim().is_empty() {
            log::trace!("No glyphs for {text:?}; drawing placeholder");
            let width = (text.chars().count() as f64 * font_size as f64 * 0.6).max(size.width);
            let height = (font_size as f64 * 1.2).max(size.height);
            let rect = Rect::from_origin_size(origin, (width, height));
            self.scene.fill(
                Fill::NonZero,
                transform,
                color.with_alpha(0.4),
                None,
                &rect,
            );
            return rect;
        }
        Rect::from_origin_size(origin, size)
    }

    /// Label text on a padded white box. Returns the text rectangle.
    fn render_label(&mut self, text: &str, position: Point, color: Color, transform: Affine) -> Rect {
        let layout = self.layout_text(text, LABEL_FONT_SIZE, color);
        let origin = Self::text_origin(&layout, position, TextAnchor::MiddleLeft);
        let width = layout.width() as f64;
        let height = (layout.height() as f64).max(LABEL_FONT_SIZE as f64);
        let rect = Rect::from_origin_size(origin, (width, height));
        if !text.is_empty() {
            let backdrop = rect.inflate(LABEL_PADDING, LABEL_PADDING);
            self.scene
                .fill(Fill::NonZero, transform, Color::WHITE, None, &backdrop);
            if self.draw_layout(&layout, origin, color, transform) == 0 {
                log::trace!("No glyphs for label {text:?}");
            }
        }
        rect
    }

    fn render_points(&mut self, ctx: &RenderContext, transform: Affine) {
        let notebook = ctx.notebook;
        let settings = &notebook.config().tools.point;
        let color = Color::from(settings.color);

        for point in notebook.scene.live_points() {
            if !point.is_finite() {
                log::trace!("Skipping non-finite point {}", point.id());
                continue;
            }
            let dot = Circle::new(point.position, settings.radius);
            self.scene.fill(Fill::NonZero, transform, color, None, &dot);

            if !point.label.is_empty() {
                let anchor = point.position
                    + Vec2::new(POINT_LABEL_OFFSET, -POINT_LABEL_OFFSET);
                self.render_text(
                    &point.label,
                    anchor,
                    TextAnchor::BottomLeft,
                    POINT_LABEL_FONT_SIZE,
                    Color::BLACK,
                    transform,
                );
            }
        }
    }

    fn render_lines(&mut self, ctx: &RenderContext, transform: Affine) {
        let notebook = ctx.notebook;
        let color = Color::from(notebook.config().colors.stroke);
        let stroke = Stroke::new(LINE_WIDTH).with_caps(Cap::Round);

        for line in notebook.scene.live_lines() {
            if !line.is_finite() {
                log::trace!("Skipping non-finite line {}", line.id());
                continue;
            }
            self.scene
                .stroke(&stroke, transform, color, None, &line.as_kurbo());
        }
    }

    fn render_strokes(&mut self, ctx: &RenderContext, transform: Affine) {
        let notebook = ctx.notebook;
        let pen = &notebook.config().tools.pen;
        let color = pen.color.with_opacity(pen.opacity);
        let stroke = Stroke::new(pen.width)
            .with_caps(Cap::Round)
            .with_join(Join::Round);

        for item in notebook.scene.live_strokes() {
            if !item.is_finite() {
                log::trace!("Skipping non-finite stroke {}", item.id());
                continue;
            }
            self.scene
                .stroke(&stroke, transform, color, None, &item.to_path());
        }
    }

    /// Rays, arcs and measurements around points with the angle overlay on.
    fn render_angles(&mut self, ctx: &RenderContext, transform: Affine) {
        let notebook = ctx.notebook;
        let config = notebook.config();
        let color = Color::from(config.colors.angle);
        let stroke = Stroke::new(1.0);

        for point in notebook.scene.live_points() {
            if !point.show_angle || !point.is_finite() {
                continue;
            }
            let vertex = point.position;
            let far_ends = notebook.scene.far_endpoints(vertex);
            for wedge in angle_wedges(vertex, &far_ends, ANGLE_ARC_RADIUS) {
                let ray_end = vertex
                    + Vec2::from_angle(wedge.start) * ANGLE_ARC_RADIUS;
                self.scene
                    .stroke(&stroke, transform, color, None, &Line::new(vertex, ray_end));

                let arc = Arc::new(
                    vertex,
                    Vec2::new(ANGLE_ARC_RADIUS, ANGLE_ARC_RADIUS),
                    wedge.start,
                    wedge.sweep,
                    0.0,
                );
                self.scene.stroke(&stroke, transform, color, None, &arc);

                if config.display.show_angle_measurements {
                    self.render_text(
                        &format!("{}°", wedge.degrees),
                        wedge.label_position,
                        TextAnchor::Center,
                        ANGLE_FONT_SIZE,
                        color,
                        transform,
                    );
                }
            }
        }
    }

    fn render_labels(&mut self, ctx: &RenderContext, transform: Affine) {
        let notebook = ctx.notebook;
        let color = Color::from(notebook.config().colors.stroke);

        for label in notebook.scene.live_labels() {
            if !label.is_finite() {
                log::trace!("Skipping non-finite label {}", label.id());
                continue;
            }
            self.render_label(&label.text, label.position, color, transform);
        }
    }

    fn render_curves(&mut self, ctx: &RenderContext, transform: Affine) {
        let notebook = ctx.notebook;
        let color = Color::from(notebook.config().colors.stroke);
        let stroke = Stroke::new(LINE_WIDTH).with_caps(Cap::Round);

        for curve in notebook.scene.live_curves() {
            if !curve.is_finite() {
                log::trace!("Skipping non-finite curve {}", curve.id());
                continue;
            }
            self.scene
                .stroke(&stroke, transform, color, None, &curve.segment);
        }
    }

    fn render_preview(&mut self, shape: &PreviewShape, transform: Affine) {
        match shape {
            PreviewShape::Polyline {
                points,
                color,
                width,
            } => {
                if points.len() < 2 {
                    return;
                }
                let mut path = BezPath::new();
                path.move_to(points[0]);
                for p in &points[1..] {
                    path.line_to(*p);
                }
                let stroke = Stroke::new(*width)
                    .with_caps(Cap::Round)
                    .with_join(Join::Round);
                self.scene.stroke(&stroke, transform, *color, None, &path);
            }
            PreviewShape::Segment {
                from,
                to,
                color,
                width,
                dashed,
            } => {
                let mut stroke = Stroke::new(*width);
                if *dashed {
                    stroke = stroke.with_dashes(0.0, DASH);
                }
                self.scene
                    .stroke(&stroke, transform, *color, None, &Line::new(*from, *to));
            }
            PreviewShape::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let circle = Circle::new(*center, *radius);
                if let Some(fill) = fill {
                    self.scene.fill(Fill::NonZero, transform, *fill, None, &circle);
                }
                if let Some((color, width)) = stroke {
                    self.scene
                        .stroke(&Stroke::new(*width), transform, *color, None, &circle);
                }
            }
            PreviewShape::Curves {
                segments,
                color,
                width,
            } => {
                let stroke = Stroke::new(*width);
                for segment in segments {
                    self.scene.stroke(&stroke, transform, *color, None, segment);
                }
            }
            PreviewShape::Highlight { path, color, width } => {
                let stroke = Stroke::new(*width)
                    .with_caps(Cap::Round)
                    .with_join(Join::Round);
                self.scene.stroke(&stroke, transform, *color, None, path);
            }
            PreviewShape::TextCursor { position, color } => {
                let Point { x, y } = *position;
                let stroke = Stroke::new(1.0);
                let mut path = BezPath::new();
                path.move_to((x, y - 10.0));
                path.line_to((x, y + 10.0));
                path.move_to((x - 5.0, y - 10.0));
                path.line_to((x + 5.0, y - 10.0));
                path.move_to((x - 5.0, y + 10.0));
                path.line_to((x + 5.0, y + 10.0));
                self.scene.stroke(&stroke, transform, *color, None, &path);
                self.render_text(
                    "T",
                    Point::new(x, y - 15.0),
                    TextAnchor::Center,
                    LABEL_FONT_SIZE,
                    *color,
                    transform,
                );
            }
            PreviewShape::TextEntry { anchor, text } => {
                let rect = self.render_label(text, *anchor, Color::BLACK, transform);
                let caret = Line::new((rect.x1 + 1.0, rect.y0), (rect.x1 + 1.0, rect.y1));
                self.scene.stroke(
                    &Stroke::new(1.0),
                    transform,
                    Color::from_rgba8(100, 100, 100, 200),
                    None,
                    &caret,
                );
            }
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        let notebook = ctx.notebook;
        let config = notebook.config();
        self.zoom = notebook.camera.zoom;

        let transform = notebook.camera.transform();

        let layout = PageLayout::from_config(config, notebook.page_count());
        let view = ctx.visible_world_rect();
        for page in layout.visible_pages(view) {
            self.render_page(&page, config, transform);
        }

        if config.display.show_dots {
            self.render_points(ctx, transform);
        }
        self.render_lines(ctx, transform);
        self.render_strokes(ctx, transform);
        self.render_angles(ctx, transform);
        self.render_labels(ctx, transform);
        self.render_curves(ctx, transform);

        if ctx.show_preview {
            for shape in notebook.preview() {
                self.render_preview(&shape, transform);
            }
        }
    }
}
