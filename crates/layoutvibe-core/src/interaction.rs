//! Pointer-driven interaction: draw, drag and resize gestures.
//!
//! The manager interprets raw pointer events (screen coordinates) as
//! operations on the canvas. Only one gesture is active at a time and every
//! pointer-up returns to [`Operation::None`]. Rendering, history and the
//! coordinate display are reached through the [`Collaborator`] trait.

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::input::{MouseButton, PointerEvent};
use crate::selection::{Cursor, HandleKind, handle_at_point, resize_geometry};
use crate::shapes::{Geometry, Rectangle};
use crate::snap::{SnapMode, collect_snap_targets, snap_geometry};
use kurbo::{Point, Vec2};

/// The operation currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    None,
    Draw,
    Drag,
    Resize,
}

/// In-progress draw rectangle: world anchor plus signed extent.
///
/// The sign of `w`/`h` records the drag direction; [`DrawRect::normalized`]
/// turns it into a regular geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub anchor: Point,
    pub w: f64,
    pub h: f64,
}

impl DrawRect {
    fn new(anchor: Point) -> Self {
        Self { anchor, w: 0.0, h: 0.0 }
    }

    /// Min corner (clamped to the positive quadrant) and absolute size.
    pub fn normalized(&self) -> Geometry {
        let x2 = self.anchor.x + self.w;
        let y2 = self.anchor.y + self.h;
        Geometry::new(
            self.anchor.x.min(x2).max(0.0),
            self.anchor.y.min(y2).max(0.0),
            self.w.abs(),
            self.h.abs(),
        )
    }
}

/// Gesture context. Carries the per-operation state that only lives between
/// pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Draw(DrawRect),
    Drag {
        /// Pointer minus area origin at press time (world units).
        offset: Vec2,
        /// Set once the area has actually been moved.
        moved: bool,
    },
    Resize {
        handle: HandleKind,
    },
}

/// Everything a renderer needs to paint one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub shapes: &'a [Rectangle],
    pub selected: Option<&'a Rectangle>,
    pub camera: &'a Camera,
    pub operation: Operation,
    pub draw_rect: Option<DrawRect>,
}

/// Callbacks from the interaction core to the rest of the application.
pub trait Collaborator {
    /// Paint the current state.
    fn request_repaint(&mut self, frame: &Frame<'_>);

    /// A gesture completed and its result should be recorded in history.
    fn checkpoint(&mut self, canvas: &mut Canvas) {
        canvas.checkpoint();
    }

    /// World position under the pointer, on every move.
    fn report_coords(&mut self, world: Point);

    /// Selection or selected geometry changed (property inspector).
    fn selection_changed(&mut self, _selected: Option<&Rectangle>) {}
}

/// Interprets pointer events as draw/drag/resize gestures.
#[derive(Debug, Clone)]
pub struct InteractionManager {
    gesture: Gesture,
    /// Screen position of the last press, kept until pointer-up.
    press_point: Option<Point>,
    cursor: Cursor,
}

impl Default for InteractionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionManager {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
            press_point: None,
            cursor: Cursor::Default,
        }
    }

    /// The operation currently in progress.
    pub fn operation(&self) -> Operation {
        match self.gesture {
            Gesture::Idle => Operation::None,
            Gesture::Draw(_) => Operation::Draw,
            Gesture::Drag { .. } => Operation::Drag,
            Gesture::Resize { .. } => Operation::Resize,
        }
    }

    /// The in-progress draw rectangle, while drawing.
    pub fn draw_rect(&self) -> Option<DrawRect> {
        match self.gesture {
            Gesture::Draw(rect) => Some(rect),
            _ => None,
        }
    }

    /// The handle being dragged, while resizing.
    pub fn active_handle(&self) -> Option<HandleKind> {
        match self.gesture {
            Gesture::Resize { handle } => Some(handle),
            _ => None,
        }
    }

    /// Whether a drag gesture has moved its area.
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Drag { moved: true, .. })
    }

    /// Current cursor hint.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Build the frame for the current state.
    pub fn frame<'a>(&self, canvas: &'a Canvas) -> Frame<'a> {
        Frame {
            shapes: &canvas.document.shapes,
            selected: canvas.selected(),
            camera: &canvas.camera,
            operation: self.operation(),
            draw_rect: self.draw_rect(),
        }
    }

    fn repaint(&self, canvas: &Canvas, collab: &mut dyn Collaborator) {
        collab.request_repaint(&self.frame(canvas));
    }

    /// Dispatch a pointer event. Wheel and leave events are not gestures and
    /// are ignored here.
    pub fn handle_event(
        &mut self,
        canvas: &mut Canvas,
        event: PointerEvent,
        collab: &mut dyn Collaborator,
    ) {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(canvas, position, button, collab),
            PointerEvent::Move { position } => self.pointer_move(canvas, position, collab),
            PointerEvent::Up { position, .. } => self.pointer_up(canvas, position, collab),
            PointerEvent::Leave | PointerEvent::Wheel { .. } => {}
        }
    }

    /// Pointer pressed at `screen`.
    pub fn pointer_down(
        &mut self,
        canvas: &mut Canvas,
        screen: Point,
        button: MouseButton,
        collab: &mut dyn Collaborator,
    ) {
        self.press_point = Some(screen);
        if !button.is_primary() {
            return;
        }

        let world = canvas.camera.screen_to_world(screen);
        if !canvas.camera.is_inside_drawing_area(screen) {
            self.gesture = Gesture::Idle;
            canvas.clear_selection();
            collab.selection_changed(None);
            self.repaint(canvas, collab);
            return;
        }

        let hit_handle = canvas
            .selected()
            .and_then(|shape| handle_at_point(shape, world, canvas.camera.scale, &canvas.config));
        if let Some(handle) = hit_handle {
            log::debug!("Resize from handle {}", handle.name());
            self.gesture = Gesture::Resize { handle };
            self.cursor = handle.cursor();
            return;
        }

        match canvas.document.shape_at_point(world) {
            Some(shape) => {
                let offset = world - Point::new(shape.x, shape.y);
                let id = shape.id.clone();
                log::debug!("Drag '{id}'");
                canvas.select(id);
                self.gesture = Gesture::Drag { offset, moved: false };
            }
            None => {
                canvas.clear_selection();
                let anchor = Point::new(world.x.max(0.0), world.y.max(0.0));
                self.gesture = Gesture::Draw(DrawRect::new(anchor));
            }
        }

        collab.selection_changed(canvas.selected());
        self.repaint(canvas, collab);
    }

    /// Pointer moved to `screen`.
    pub fn pointer_move(&mut self, canvas: &mut Canvas, screen: Point, collab: &mut dyn Collaborator) {
        let world = canvas.camera.screen_to_world(screen);
        collab.report_coords(world);

        // Gestures that began outside the drawable area have no effect.
        let started_inside = self
            .press_point
            .is_some_and(|p| canvas.camera.is_inside_drawing_area(p));
        if !started_inside && self.gesture != Gesture::Idle {
            return;
        }

        match self.gesture {
            Gesture::Resize { handle } => self.perform_resize(canvas, handle, world, collab),
            Gesture::Drag { offset, .. } => self.perform_drag(canvas, offset, world, collab),
            Gesture::Draw(rect) => {
                self.gesture = Gesture::Draw(DrawRect {
                    anchor: rect.anchor,
                    w: world.x.max(0.0) - rect.anchor.x,
                    h: world.y.max(0.0) - rect.anchor.y,
                });
                self.repaint(canvas, collab);
            }
            Gesture::Idle => self.cursor = self.hover_cursor(canvas, screen),
        }
    }

    fn perform_resize(
        &mut self,
        canvas: &mut Canvas,
        handle: HandleKind,
        world: Point,
        collab: &mut dyn Collaborator,
    ) {
        let Some(id) = canvas.selected_id().map(str::to_owned) else {
            return;
        };
        let Some(shape) = canvas.document.get_shape(&id) else {
            return;
        };
        let config = &canvas.config;
        let candidate = resize_geometry(handle, shape.geometry(), world, config.min_shape_size);
        let targets = collect_snap_targets(&canvas.document.shapes, Some(&id));
        let snapped = snap_geometry(
            candidate,
            &targets,
            SnapMode::Resize(handle),
            config.snap_threshold,
            config.min_shape_size,
        );

        if let Some(shape) = canvas.document.get_shape_mut(&id) {
            shape.apply_geometry(snapped);
        }
        collab.selection_changed(canvas.selected());
        self.repaint(canvas, collab);
    }

    fn perform_drag(
        &mut self,
        canvas: &mut Canvas,
        offset: Vec2,
        world: Point,
        collab: &mut dyn Collaborator,
    ) {
        let Some(id) = canvas.selected_id().map(str::to_owned) else {
            return;
        };
        let Some(shape) = canvas.document.get_shape(&id) else {
            return;
        };
        self.gesture = Gesture::Drag { offset, moved: true };

        let origin = world - offset;
        let candidate = Geometry::new(origin.x, origin.y, shape.w, shape.h);
        let targets = collect_snap_targets(&canvas.document.shapes, Some(&id));
        let snapped = snap_geometry(
            candidate,
            &targets,
            SnapMode::Move,
            canvas.config.snap_threshold,
            canvas.config.min_shape_size,
        );

        if let Some(shape) = canvas.document.get_shape_mut(&id) {
            shape.x = snapped.x.max(0.0);
            shape.y = snapped.y.max(0.0);
        }
        collab.selection_changed(canvas.selected());
        self.repaint(canvas, collab);
    }

    /// Pointer released at `screen`. Always ends the gesture.
    pub fn pointer_up(&mut self, canvas: &mut Canvas, screen: Point, collab: &mut dyn Collaborator) {
        match self.gesture {
            Gesture::Draw(rect) => {
                if let Some(press) = self.press_point {
                    self.finalize_draw(canvas, rect, press, screen, collab);
                }
            }
            Gesture::Drag { moved, .. } => {
                if moved && canvas.selected().is_some() {
                    log::debug!("Drag finished");
                    collab.checkpoint(canvas);
                }
            }
            Gesture::Resize { .. } => {
                let min_size = canvas.config.min_shape_size;
                if let Some(shape) = canvas.selected_mut() {
                    shape.clamp(min_size);
                    log::debug!("Resize finished: {:?}", shape.geometry());
                    collab.checkpoint(canvas);
                }
            }
            Gesture::Idle => {}
        }

        self.gesture = Gesture::Idle;
        self.press_point = None;
        self.cursor = self.hover_cursor(canvas, screen);
        self.repaint(canvas, collab);
    }

    fn finalize_draw(
        &mut self,
        canvas: &mut Canvas,
        rect: DrawRect,
        press: Point,
        release: Point,
        collab: &mut dyn Collaborator,
    ) {
        let threshold = canvas.config.drag_start_threshold;
        let dx = (release.x - press.x).abs();
        let dy = (release.y - press.y).abs();
        if dx <= threshold && dy <= threshold {
            return;
        }

        let min_size = canvas.config.min_shape_size;
        let targets = collect_snap_targets(&canvas.document.shapes, None);
        let geometry = snap_geometry(
            rect.normalized(),
            &targets,
            SnapMode::Move,
            canvas.config.snap_threshold,
            min_size,
        );

        if geometry.w >= min_size && geometry.h >= min_size {
            let shape = Rectangle::new(geometry.x, geometry.y, geometry.w, geometry.h);
            log::debug!("Created area '{}' at {:?}", shape.id, geometry);
            let id = shape.id.clone();
            canvas.document.add_shape(shape);
            canvas.select(id);
            collab.checkpoint(canvas);
            collab.selection_changed(canvas.selected());
        }
    }

    /// Cursor for a pointer hovering at `screen` with no gesture active.
    pub fn hover_cursor(&self, canvas: &Canvas, screen: Point) -> Cursor {
        if !canvas.camera.is_inside_drawing_area(screen) {
            return Cursor::Default;
        }
        let Some(shape) = canvas.selected() else {
            return Cursor::Crosshair;
        };
        let world = canvas.camera.screen_to_world(screen);
        if let Some(handle) = handle_at_point(shape, world, canvas.camera.scale, &canvas.config) {
            handle.cursor()
        } else if shape.is_point_inside(world) {
            Cursor::Move
        } else {
            Cursor::Crosshair
        }
    }

    /// Recompute the cursor for a pointer position (e.g. after a zoom).
    pub fn refresh_cursor(&mut self, canvas: &Canvas, screen: Point) {
        self.cursor = self.hover_cursor(canvas, screen);
    }

    /// Reset the cursor as if the pointer were off the canvas.
    pub fn reset_cursor(&mut self) {
        self.cursor = Cursor::Default;
    }
}
