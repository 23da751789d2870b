//! Display-list scene building.
//!
//! Everything is emitted in screen space (pixels, Y-down). Paint order is
//! grid, areas in document order, axes, then transient overlays (draw
//! preview and kind highlight).

use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{Point, Rect, Size};
use layoutvibe_core::camera::Camera;
use layoutvibe_core::interaction::Operation;
use layoutvibe_core::selection::HandleKind;
use layoutvibe_core::shapes::{AreaKind, Rectangle};
use peniko::Color;

const GRID_COLOR: Color = Color::from_rgba8(232, 232, 232, 255);
const AXIS_COLOR: Color = Color::from_rgba8(85, 85, 85, 255);
const LABEL_COLOR: Color = Color::from_rgba8(51, 51, 51, 255);
const ACTIVE_FILL: Color = Color::from_rgba8(74, 222, 128, 128);
const ACTIVE_STROKE: Color = Color::from_rgba8(34, 197, 94, 255);
const INACTIVE_FILL: Color = Color::from_rgba8(248, 113, 113, 128);
const INACTIVE_STROKE: Color = Color::from_rgba8(239, 68, 68, 255);
const HATCH_COLOR: Color = Color::from_rgba8(100, 100, 100, 179);
const PREVIEW_COLOR: Color = Color::from_rgba8(0, 0, 255, 128);
const HIGHLIGHT_COLOR: Color = Color::from_rgba8(255, 165, 0, 255);

/// Approximate number of grid lines across the drawable area.
const GRID_LINES: f64 = 20.0;
const HATCH_STEP: f64 = 8.0;
const TICK_LENGTH: f64 = 5.0;
const LABEL_FONT_SIZE: f64 = 10.0;
const LABEL_GAP: f64 = 3.0;

/// Horizontal text anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One drawing primitive.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    /// Restrict following commands to `rect` until the matching `PopClip`.
    PushClip(Rect),
    PopClip,
    Text {
        position: Point,
        text: String,
        size: f64,
        align: TextAlign,
        color: Color,
    },
}

/// A built frame: background plus display list.
#[derive(Debug, Clone)]
pub struct Scene {
    pub size: Size,
    pub background: Color,
    commands: Vec<DrawCommand>,
}

impl Scene {
    fn new(size: Size, background: Color) -> Self {
        Self {
            size,
            background,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.push(DrawCommand::Line { from, to, color, width });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn text(&mut self, position: Point, text: String, align: TextAlign) {
        self.push(DrawCommand::Text {
            position,
            text,
            size: LABEL_FONT_SIZE,
            align,
            color: LABEL_COLOR,
        });
    }
}

/// A "nice" step (1, 2, 5 or 10 times a power of ten) that divides `range`
/// into roughly `approx_count` parts.
pub fn nice_step(range: f64, approx_count: f64) -> f64 {
    if range <= 0.0 || approx_count <= 0.0 {
        return 1.0;
    }
    let rough = range / approx_count;
    let magnitude = 10f64.powf(rough.log10().floor());
    let fraction = rough / magnitude;
    if fraction > 5.0 {
        10.0 * magnitude
    } else if fraction > 2.5 {
        5.0 * magnitude
    } else if fraction > 1.5 {
        2.0 * magnitude
    } else {
        magnitude
    }
}

/// World values `0, step, 2*step, ...` up to `max` plus half a step.
fn steps(max: f64, step: f64) -> impl Iterator<Item = f64> {
    (0u32..)
        .map(move |i| f64::from(i) * step)
        .take_while(move |value| *value <= max + step / 2.0)
}

/// Build the display list for a frame.
pub fn build_scene(ctx: &RenderContext) -> RenderResult<Scene> {
    let camera = ctx.frame.camera;
    let size = ctx.viewport_size();
    if !(size.width > camera.axis_margin && size.height > camera.axis_margin) {
        return Err(RendererError::InvalidViewport(format!(
            "{}x{} leaves no drawable area",
            size.width, size.height
        )));
    }
    if !(camera.scale.is_finite() && camera.scale > 0.0) {
        return Err(RendererError::RenderFailed(format!("invalid scale {}", camera.scale)));
    }

    let mut scene = Scene::new(size, ctx.background_color);

    if ctx.grid_style == GridStyle::Lines {
        render_grid(&mut scene, camera);
    }

    let selected_id = ctx.frame.selected.map(|shape| shape.id.as_str());
    for shape in ctx.frame.shapes {
        let selected = selected_id == Some(shape.id.as_str());
        render_area(&mut scene, ctx, shape, selected);
    }

    render_axes(&mut scene, camera);

    if ctx.frame.operation == Operation::Draw {
        if let Some(draw_rect) = ctx.frame.draw_rect {
            let g = draw_rect.normalized();
            scene.stroke_rect(camera.world_rect_to_screen(g.x, g.y, g.w, g.h), PREVIEW_COLOR, 1.0);
        }
    }

    if let Some(kind) = &ctx.highlight_kind {
        for rect in crate::summary::highlight_rects(ctx.frame.shapes, kind, camera) {
            scene.stroke_rect(rect, HIGHLIGHT_COLOR, 4.0);
        }
    }

    log::trace!("Built scene with {} commands", scene.len());
    Ok(scene)
}

fn render_grid(scene: &mut Scene, camera: &Camera) {
    let area = camera.drawing_area();
    let world = camera.visible_world_size();

    let step_x = nice_step(world.width, GRID_LINES);
    for wx in steps(world.width, step_x) {
        let sx = camera.world_to_screen(Point::new(wx, 0.0)).x;
        if sx >= area.x0 && sx <= area.x1 {
            scene.line(Point::new(sx, area.y0), Point::new(sx, area.y1), GRID_COLOR, 0.5);
        }
    }

    let step_y = nice_step(world.height, GRID_LINES);
    for wy in steps(world.height, step_y) {
        let sy = camera.world_to_screen(Point::new(0.0, wy)).y;
        if sy >= area.y0 && sy <= area.y1 {
            scene.line(Point::new(area.x0, sy), Point::new(area.x1, sy), GRID_COLOR, 0.5);
        }
    }
}

fn area_colors(kind: &AreaKind) -> (Color, Color) {
    match kind {
        AreaKind::Active => (ACTIVE_FILL, ACTIVE_STROKE),
        _ => (INACTIVE_FILL, INACTIVE_STROKE),
    }
}

fn render_area(scene: &mut Scene, ctx: &RenderContext, shape: &Rectangle, selected: bool) {
    let camera = ctx.frame.camera;
    let area = camera.drawing_area();
    let rect = camera.world_rect_to_screen(shape.x, shape.y, shape.w, shape.h);

    // Culled when entirely outside the drawable region.
    if rect.x1 < area.x0 || rect.x0 > area.x1 || rect.y1 < area.y0 || rect.y0 > area.y1 {
        return;
    }

    let (fill, stroke) = area_colors(&shape.kind);
    scene.push(DrawCommand::FillRect { rect, color: fill });

    if shape.kind == AreaKind::Dead {
        let visible = rect.intersect(area);
        scene.push(DrawCommand::PushClip(visible));
        render_hatch(scene, rect, visible);
        scene.push(DrawCommand::PopClip);
    }

    scene.stroke_rect(rect, stroke, 1.0);

    if selected {
        scene.stroke_rect(rect.inflate(1.0, 1.0), ctx.selection_color, 2.0);
        let geometry = shape.geometry();
        let handle_size = Size::new(ctx.handle_size, ctx.handle_size);
        for kind in HandleKind::ALL {
            let center = camera.world_to_screen(kind.position(&geometry));
            scene.push(DrawCommand::FillRect {
                rect: Rect::from_center_size(center, handle_size),
                color: ctx.selection_color,
            });
        }
    }
}

/// 45 degree hatch lines across `rect`, `HATCH_STEP` apart. Only lines that
/// cross `visible` are emitted.
fn render_hatch(scene: &mut Scene, rect: Rect, visible: Rect) {
    let (w, h) = (rect.width(), rect.height());
    // Line k runs from (x0 + d - h, y0) to (x0 + d, y1) with d = k * step - h.
    let d_min = (visible.x0 - rect.x0) + h - (visible.y1 - rect.y0);
    let d_max = (visible.x1 - rect.x0) + h - (visible.y0 - rect.y0);
    let first = ((d_min + h) / HATCH_STEP).ceil().max(0.0);
    let last = ((d_max + h) / HATCH_STEP)
        .floor()
        .min(((w + 2.0 * h) / HATCH_STEP).ceil() - 1.0);
    if last < first {
        return;
    }
    for k in first as u64..=last as u64 {
        let d = k as f64 * HATCH_STEP - h;
        scene.line(
            Point::new(rect.x0 + d - h, rect.y0),
            Point::new(rect.x0 + d, rect.y1),
            HATCH_COLOR,
            1.0,
        );
    }
}

fn render_axes(scene: &mut Scene, camera: &Camera) {
    let margin = camera.axis_margin;
    let width = camera.viewport.width;
    let baseline = camera.viewport.height - margin;
    let world = camera.visible_world_size();

    // Y axis; the origin label is left to the X axis.
    scene.line(Point::new(margin, 0.0), Point::new(margin, baseline + 1.0), AXIS_COLOR, 1.0);
    let step_y = nice_step(world.height, (baseline / (LABEL_FONT_SIZE * 3.5)).floor());
    for wy in steps(world.height, step_y) {
        let ty = camera.world_to_screen(Point::new(0.0, wy)).y;
        if ty < 0.0 || ty > baseline + 1.0 {
            continue;
        }
        scene.line(Point::new(margin - TICK_LENGTH, ty), Point::new(margin, ty), AXIS_COLOR, 1.0);
        if wy.abs() > 1e-6 {
            scene.text(
                Point::new(margin - TICK_LENGTH - LABEL_GAP, ty),
                format!("{:.0}", wy),
                TextAlign::Right,
            );
        }
    }

    // X axis
    scene.line(Point::new(margin - 1.0, baseline), Point::new(width, baseline), AXIS_COLOR, 1.0);
    let step_x = nice_step(world.width, ((width - margin) / (LABEL_FONT_SIZE * 4.5)).floor());
    for wx in steps(world.width, step_x) {
        let tx = camera.world_to_screen(Point::new(wx, 0.0)).x;
        if tx < margin - 1.0 || tx > width {
            continue;
        }
        scene.line(Point::new(tx, baseline), Point::new(tx, baseline + TICK_LENGTH), AXIS_COLOR, 1.0);
        scene.text(
            Point::new(tx, baseline + TICK_LENGTH + LABEL_GAP),
            format!("{:.0}", wx),
            TextAlign::Center,
        );
    }
}

/// Renderer that keeps the last built display list.
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    scene: Option<Scene>,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last successfully built scene.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.scene = Some(build_scene(ctx)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutvibe_core::canvas::Canvas;
    use layoutvibe_core::interaction::{DrawRect, Frame, InteractionManager};

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_viewport_size(800.0, 600.0);
        canvas
    }

    fn build(canvas: &Canvas) -> Scene {
        let manager = InteractionManager::new();
        build_scene(&RenderContext::new(manager.frame(canvas))).unwrap()
    }

    fn fill_count(scene: &Scene) -> usize {
        scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count()
    }

    fn texts(scene: &Scene) -> Vec<&str> {
        scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_nice_step() {
        assert!((nice_step(770.0, 20.0) - 50.0).abs() < f64::EPSILON);
        assert!((nice_step(100.0, 20.0) - 5.0).abs() < f64::EPSILON);
        assert!((nice_step(30.0, 20.0) - 2.0).abs() < f64::EPSILON);
        assert!((nice_step(0.0, 20.0) - 1.0).abs() < f64::EPSILON);
        assert!((nice_step(10.0, 0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_scene_has_grid_and_axes() {
        let scene = build(&canvas());
        assert_eq!(fill_count(&scene), 0);
        assert!(scene.len() > 10);

        // Grid lines stay inside the drawable area.
        let inside = |p: &Point| p.x >= 30.0 && p.x <= 800.0 && p.y >= 0.0 && p.y <= 570.0;
        for command in scene.commands() {
            if let DrawCommand::Line { from, to, width, .. } = command {
                if (*width - 0.5).abs() < f64::EPSILON {
                    assert!(inside(from) && inside(to));
                }
            }
        }

        // The origin is labelled once, on the X axis.
        assert_eq!(texts(&scene).iter().filter(|t| **t == "0").count(), 1);
    }

    #[test]
    fn test_grid_can_be_disabled() {
        let canvas = canvas();
        let manager = InteractionManager::new();
        let with_grid = build_scene(&RenderContext::new(manager.frame(&canvas))).unwrap();
        let without = build_scene(&RenderContext::new(manager.frame(&canvas)).with_grid(GridStyle::None)).unwrap();
        assert!(without.len() < with_grid.len());
    }

    #[test]
    fn test_areas_are_culled() {
        let mut canvas = canvas();
        canvas.document.add_shape(Rectangle::new(10.0, 10.0, 20.0, 20.0));
        canvas.document.add_shape(Rectangle::new(5000.0, 10.0, 20.0, 20.0));
        assert_eq!(fill_count(&build(&canvas)), 1);
    }

    #[test]
    fn test_area_colors_by_kind() {
        let mut canvas = canvas();
        canvas.document.add_shape(Rectangle::with_id("w", 10.0, 10.0, 20.0, 20.0, AreaKind::Wall));
        let scene = build(&canvas);
        let fill = scene.commands().iter().find_map(|c| match c {
            DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
            _ => None,
        });
        let (rect, color) = fill.unwrap();
        let rgba = color.to_rgba8();
        assert_eq!((rgba.r, rgba.g, rgba.b), (248, 113, 113));
        // World (10,10)-(30,30) on a 600px canvas with a 30px margin.
        assert_eq!(rect, Rect::new(40.0, 540.0, 60.0, 560.0));
    }

    #[test]
    fn test_dead_area_is_hatched() {
        let mut canvas = canvas();
        canvas.document.add_shape(Rectangle::with_id("d", 10.0, 10.0, 40.0, 20.0, AreaKind::Dead));
        let scene = build(&canvas);
        let commands = scene.commands();
        let start = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::PushClip(_)))
            .unwrap();
        let end = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::PopClip))
            .unwrap();
        assert!(end > start + 1);
        assert!(commands[start + 1..end].iter().all(|c| matches!(c, DrawCommand::Line { .. })));
    }

    #[test]
    fn test_hatch_is_bounded_by_the_visible_region() {
        let mut canvas = canvas();
        canvas.camera.scale = 10.0;
        canvas
            .document
            .add_shape(Rectangle::with_id("d", 0.0, 0.0, 10000.0, 10000.0, AreaKind::Dead));
        let scene = build(&canvas);
        let area = canvas.camera.drawing_area();
        let clip = scene.commands().iter().find_map(|c| match c {
            DrawCommand::PushClip(rect) => Some(*rect),
            _ => None,
        });
        assert_eq!(clip, Some(area));

        let hatch: Vec<_> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { from, to, .. } if to.x > from.x && to.y > from.y => Some((*from, *to)),
                _ => None,
            })
            .collect();
        // (770 + 570) / 8 lines cross the drawable area, give or take the ends.
        assert!(hatch.len() > 100 && hatch.len() < 200, "{}", hatch.len());
        // every emitted line crosses the visible region at 45 degrees
        for (from, to) in hatch {
            let x_at = |y: f64| from.x + (y - from.y);
            assert!(x_at(area.y1) >= area.x0 - 1e-6 && x_at(area.y0) <= area.x1 + 1e-6);
            assert!(((to.x - from.x) - (to.y - from.y)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_selected_area_has_handles() {
        let mut canvas = canvas();
        let shape = Rectangle::new(10.0, 10.0, 20.0, 20.0);
        let id = shape.id.clone();
        canvas.document.add_shape(shape);
        canvas.select(id);
        let scene = build(&canvas);
        // One area fill plus eight handles.
        assert_eq!(fill_count(&scene), 9);
        let outline = scene.commands().iter().any(|c| {
            matches!(c, DrawCommand::StrokeRect { rect, width, .. }
                if (*width - 2.0).abs() < f64::EPSILON && *rect == Rect::new(39.0, 539.0, 61.0, 561.0))
        });
        assert!(outline);
    }

    #[test]
    fn test_draw_preview_only_while_drawing() {
        let canvas = canvas();
        let draw_rect = Some(DrawRect {
            anchor: Point::new(20.0, 20.0),
            w: -10.0,
            h: 5.0,
        });
        let frame = Frame {
            shapes: &[],
            selected: None,
            camera: &canvas.camera,
            operation: Operation::Draw,
            draw_rect,
        };
        let scene = build_scene(&RenderContext::new(frame)).unwrap();
        let preview = scene.commands().iter().any(|c| {
            matches!(c, DrawCommand::StrokeRect { rect, .. } if *rect == Rect::new(40.0, 545.0, 50.0, 550.0))
        });
        assert!(preview);

        let idle = Frame { operation: Operation::None, ..frame };
        let scene = build_scene(&RenderContext::new(idle)).unwrap();
        assert!(!scene.commands().iter().any(|c| matches!(c, DrawCommand::StrokeRect { .. })));
    }

    #[test]
    fn test_highlight_kind() {
        let mut canvas = canvas();
        canvas.document.add_shape(Rectangle::with_id("w", 10.0, 10.0, 20.0, 20.0, AreaKind::Wall));
        canvas.document.add_shape(Rectangle::new(50.0, 10.0, 20.0, 20.0));
        let manager = InteractionManager::new();
        let ctx = RenderContext::new(manager.frame(&canvas)).with_highlight(Some(AreaKind::Wall));
        let scene = build_scene(&ctx).unwrap();
        let highlights = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeRect { width, .. } if (*width - 4.0).abs() < f64::EPSILON))
            .count();
        assert_eq!(highlights, 1);
    }

    #[test]
    fn test_invalid_viewport() {
        let mut canvas = Canvas::new();
        canvas.set_viewport_size(20.0, 600.0);
        let manager = InteractionManager::new();
        let result = build_scene(&RenderContext::new(manager.frame(&canvas)));
        assert!(matches!(result, Err(RendererError::InvalidViewport(_))));
    }

    #[test]
    fn test_display_list_renderer_keeps_scene() {
        let canvas = canvas();
        let manager = InteractionManager::new();
        let mut renderer = DisplayListRenderer::new();
        assert!(renderer.scene().is_none());
        renderer.build_scene(&RenderContext::new(manager.frame(&canvas))).unwrap();
        assert!(renderer.scene().is_some());
        assert!(renderer.scene().unwrap().len() > 0);
    }
}
