//! Camera module for the screen/world transform and zoom.
//!
//! World space is Y-up with the origin at the lower-left corner of the
//! drawable area. Screen space is Y-down with the origin at the canvas
//! top-left; the drawable area is inset by the axis margin on the left and
//! bottom edges.

use kurbo::{Point, Rect, Size};

use crate::config::AXIS_MARGIN;

/// Default zoom level ("100%").
pub const BASE_SCALE: f64 = 1.0;

/// Camera manages the view transform for the canvas.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-to-screen zoom factor.
    pub scale: f64,
    /// Minimum allowed zoom level.
    pub min_scale: f64,
    /// Maximum allowed zoom level.
    pub max_scale: f64,
    /// Pixels reserved for the axes.
    pub axis_margin: f64,
    /// Canvas size in screen pixels.
    pub viewport: Size,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            scale: BASE_SCALE,
            min_scale: 0.1,
            max_scale: 10.0,
            axis_margin: AXIS_MARGIN,
            viewport: Size::new(800.0, 600.0),
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera for a canvas of the given size.
    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            viewport: Size::new(width, height),
            ..Self::default()
        }
    }

    /// Screen y of the world X axis.
    fn baseline(&self) -> f64 {
        self.viewport.height - self.axis_margin
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.axis_margin) / self.scale,
            (self.baseline() - screen_point.y) / self.scale,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.scale + self.axis_margin,
            self.baseline() - world_point.y * self.scale,
        )
    }

    /// Convert a world-space rectangle (lower-left origin) to a screen rect.
    pub fn world_rect_to_screen(&self, x: f64, y: f64, w: f64, h: f64) -> Rect {
        let top_left = self.world_to_screen(Point::new(x, y + h));
        Rect::new(
            top_left.x,
            top_left.y,
            top_left.x + w * self.scale,
            top_left.y + h * self.scale,
        )
    }

    /// Whether a screen point lies in the drawable area (right of the Y axis,
    /// above the X axis).
    pub fn is_inside_drawing_area(&self, screen_point: Point) -> bool {
        screen_point.x > self.axis_margin && screen_point.y < self.baseline()
    }

    /// Screen rectangle of the drawable area.
    pub fn drawing_area(&self) -> Rect {
        Rect::new(self.axis_margin, 0.0, self.viewport.width, self.baseline())
    }

    /// Visible world extent (width, height) of the drawable area.
    pub fn visible_world_size(&self) -> Size {
        Size::new(
            (self.viewport.width - self.axis_margin) / self.scale,
            self.baseline() / self.scale,
        )
    }

    /// Set the zoom level, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    /// Zoom in by one step.
    pub fn zoom_in(&mut self, factor: f64) {
        self.set_scale(self.scale * factor);
    }

    /// Zoom out by one step.
    pub fn zoom_out(&mut self, factor: f64) {
        self.set_scale(self.scale / factor);
    }

    /// Apply a wheel step: negative delta zooms in, anything else zooms out.
    pub fn zoom_wheel(&mut self, delta_y: f64, factor: f64) {
        if delta_y < 0.0 {
            self.zoom_in(factor);
        } else {
            self.zoom_out(factor);
        }
    }

    /// Reset zoom to 100%.
    pub fn reset(&mut self) {
        self.scale = BASE_SCALE;
    }

    /// Set the canvas size.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width, height);
    }
}
