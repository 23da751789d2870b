//! Selection handles: positions, hit-testing and the resize geometry they drive.

use crate::config::EditorConfig;
use crate::shapes::{Geometry, Rectangle};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer cursor hint shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cursor {
    /// Outside the drawable area.
    #[default]
    Default,
    /// Empty drawable area.
    Crosshair,
    /// Over the selected area's body.
    Move,
    /// Diagonal resize (top-left / bottom-right).
    NwseResize,
    /// Diagonal resize (top-right / bottom-left).
    NeswResize,
    /// Vertical resize.
    NsResize,
    /// Horizontal resize.
    EwResize,
}

/// One of the eight resize handles of a rectangle.
///
/// Names follow `<row><column>`: `t`/`m`/`b` for top, middle, bottom and
/// `l`/`m`/`r` for left, middle, right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    TopLeft,
    TopMiddle,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

impl HandleKind {
    /// All handles in hit-test order. Corners come before the edge midpoints
    /// on their row, so they win on overlap.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::TopMiddle,
        HandleKind::TopRight,
        HandleKind::MiddleLeft,
        HandleKind::MiddleRight,
        HandleKind::BottomLeft,
        HandleKind::BottomMiddle,
        HandleKind::BottomRight,
    ];

    /// Short name (`tl`, `tm`, ...).
    pub fn name(self) -> &'static str {
        match self {
            HandleKind::TopLeft => "tl",
            HandleKind::TopMiddle => "tm",
            HandleKind::TopRight => "tr",
            HandleKind::MiddleLeft => "ml",
            HandleKind::MiddleRight => "mr",
            HandleKind::BottomLeft => "bl",
            HandleKind::BottomMiddle => "bm",
            HandleKind::BottomRight => "br",
        }
    }

    /// Resize cursor for this handle.
    pub fn cursor(self) -> Cursor {
        match self {
            HandleKind::TopLeft | HandleKind::BottomRight => Cursor::NwseResize,
            HandleKind::TopRight | HandleKind::BottomLeft => Cursor::NeswResize,
            HandleKind::TopMiddle | HandleKind::BottomMiddle => Cursor::NsResize,
            HandleKind::MiddleLeft | HandleKind::MiddleRight => Cursor::EwResize,
        }
    }

    /// Whether dragging this handle moves the left edge.
    pub fn controls_left(self) -> bool {
        self.name().contains('l')
    }

    /// Whether dragging this handle moves the right edge.
    pub fn controls_right(self) -> bool {
        self.name().contains('r')
    }

    /// Whether dragging this handle moves the top edge.
    pub fn controls_top(self) -> bool {
        self.name().contains('t')
    }

    /// Whether dragging this handle moves the bottom edge.
    pub fn controls_bottom(self) -> bool {
        self.name().contains('b')
    }

    /// World position of this handle on the given geometry.
    pub fn position(self, g: &Geometry) -> Point {
        let mid_x = g.x + g.w / 2.0;
        let mid_y = g.y + g.h / 2.0;
        match self {
            HandleKind::TopLeft => Point::new(g.x, g.top()),
            HandleKind::TopMiddle => Point::new(mid_x, g.top()),
            HandleKind::TopRight => Point::new(g.right(), g.top()),
            HandleKind::MiddleLeft => Point::new(g.x, mid_y),
            HandleKind::MiddleRight => Point::new(g.right(), mid_y),
            HandleKind::BottomLeft => Point::new(g.x, g.y),
            HandleKind::BottomMiddle => Point::new(mid_x, g.y),
            HandleKind::BottomRight => Point::new(g.right(), g.y),
        }
    }
}

/// A selection handle with its position and hit radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Handle type.
    pub kind: HandleKind,
    /// Position in world coordinates.
    pub position: Point,
    /// Hit radius in world units (depends on zoom).
    pub hit_radius: f64,
}

impl Handle {
    /// Both-axis hit test against a world point.
    pub fn hit_test(&self, point: Point) -> bool {
        (point.x - self.position.x).abs() <= self.hit_radius
            && (point.y - self.position.y).abs() <= self.hit_radius
    }

    /// Cursor hint for this handle.
    pub fn cursor(&self) -> Cursor {
        self.kind.cursor()
    }
}

/// Get the eight handles of a shape at the given zoom scale.
///
/// Positions do not depend on the scale; only the hit radius does.
pub fn get_handles(shape: &Rectangle, scale: f64, config: &EditorConfig) -> [Handle; 8] {
    let geometry = shape.geometry();
    let hit_radius = config.handle_hit_radius(scale);
    HandleKind::ALL.map(|kind| Handle {
        kind,
        position: kind.position(&geometry),
        hit_radius,
    })
}

/// Return the first handle (in [`HandleKind::ALL`] order) under a world point.
pub fn handle_at_point(
    shape: &Rectangle,
    point: Point,
    scale: f64,
    config: &EditorConfig,
) -> Option<HandleKind> {
    get_handles(shape, scale, config)
        .into_iter()
        .find(|handle| handle.hit_test(point))
        .map(|handle| handle.kind)
}

/// Candidate geometry for dragging `handle` of `original` to `pointer`.
///
/// The pointer is clamped to the positive quadrant first. Each new width or
/// height is floored at `min_size` before it feeds the dependent origin, so the
/// opposite edge stays put.
pub fn resize_geometry(
    handle: HandleKind,
    original: Geometry,
    pointer: Point,
    min_size: f64,
) -> Geometry {
    let px = pointer.x.max(0.0);
    let py = pointer.y.max(0.0);
    let Geometry { x, y, w, h } = original;

    let new_w = if handle.controls_left() {
        (x + w - px).max(min_size)
    } else if handle.controls_right() {
        (px - x).max(min_size)
    } else {
        w
    };
    let new_h = if handle.controls_top() {
        (y + h - py).max(min_size)
    } else if handle.controls_bottom() {
        (py - y).max(min_size)
    } else {
        h
    };

    let new_x = if handle.controls_left() { x + w - new_w } else { x };
    let new_y = if handle.controls_top() { y + h - new_h } else { y };

    Geometry::new(new_x, new_y, new_w, new_h)
}
