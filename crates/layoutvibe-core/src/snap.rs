//! Edge snapping for aligning areas to each other and to the axes.
//!
//! Candidate edges snap to the *first* target within the threshold, in
//! target-list order, rather than the closest one.

use crate::selection::HandleKind;
use crate::shapes::{Geometry, Rectangle};

/// What a snap target belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTargetKind {
    /// Left edge of another area.
    Left,
    /// Right edge of another area.
    Right,
    /// Bottom edge of another area.
    Bottom,
    /// Top edge of another area.
    Top,
    /// The world Y axis (x = 0).
    AxisX,
    /// The world X axis (y = 0).
    AxisY,
}

impl SnapTargetKind {
    /// Whether this target constrains x coordinates.
    pub fn is_vertical_line(self) -> bool {
        matches!(self, SnapTargetKind::Left | SnapTargetKind::Right | SnapTargetKind::AxisX)
    }
}

/// A line that candidate edges can snap to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// The x (vertical line) or y (horizontal line) coordinate.
    pub value: f64,
    /// Type of snap target.
    pub kind: SnapTargetKind,
}

/// Which candidate edges take part in snapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapMode {
    /// Whole-shape move or a freshly drawn shape: all four edges are live.
    Move,
    /// Resizing with a handle: only the edges the handle controls are live.
    Resize(HandleKind),
}

/// Collect snap targets from every shape except `exclude`, followed by the two axes.
pub fn collect_snap_targets(shapes: &[Rectangle], exclude: Option<&str>) -> Vec<SnapTarget> {
    let mut targets = Vec::with_capacity(shapes.len() * 4 + 2);
    for shape in shapes {
        if exclude.is_some_and(|id| id == shape.id) {
            continue;
        }
        targets.push(SnapTarget { value: shape.x, kind: SnapTargetKind::Left });
        targets.push(SnapTarget { value: shape.right(), kind: SnapTargetKind::Right });
        targets.push(SnapTarget { value: shape.y, kind: SnapTargetKind::Bottom });
        targets.push(SnapTarget { value: shape.top(), kind: SnapTargetKind::Top });
    }
    targets.push(SnapTarget { value: 0.0, kind: SnapTargetKind::AxisX });
    targets.push(SnapTarget { value: 0.0, kind: SnapTargetKind::AxisY });
    targets
}

/// First target on the given axis strictly within `threshold` of `value`.
fn first_match(value: f64, targets: &[SnapTarget], vertical: bool, threshold: f64) -> Option<f64> {
    targets
        .iter()
        .filter(|t| t.kind.is_vertical_line() == vertical)
        .find(|t| (value - t.value).abs() < threshold)
        .map(|t| t.value)
}

/// Snap one axis, returning the new `(origin, size)`. `live` says whether
/// the near (left/bottom) and far (right/top) edges take part.
fn snap_axis(
    origin: f64,
    size: f64,
    live: (bool, bool),
    targets: &[SnapTarget],
    vertical: bool,
    threshold: f64,
    min_size: f64,
) -> (f64, f64) {
    let (low, high) = live;
    let low_snap = if low { first_match(origin, targets, vertical, threshold) } else { None };
    let high_snap = if high { first_match(origin + size, targets, vertical, threshold) } else { None };

    match (low_snap, high_snap) {
        // Both edges live: translate. The near edge wins, even when it already
        // sits on its target.
        (Some(snapped), _) if high => (snapped, size),
        (None, Some(snapped)) if low => (snapped - size, size),
        // Near edge only: far edge stays fixed.
        (Some(snapped), _) => (snapped, (size - (snapped - origin)).max(min_size)),
        // Far edge only: origin stays fixed.
        (None, Some(snapped)) => (origin, (snapped - origin).max(min_size)),
        (None, None) => (origin, size),
    }
}

/// Snap a candidate geometry against `targets`.
///
/// Pure: the result only depends on the arguments. The returned geometry is
/// clamped to `x, y >= 0` and `w, h >= min_size`.
pub fn snap_geometry(
    candidate: Geometry,
    targets: &[SnapTarget],
    mode: SnapMode,
    threshold: f64,
    min_size: f64,
) -> Geometry {
    let (left, right, bottom, top) = match mode {
        SnapMode::Move => (true, true, true, true),
        SnapMode::Resize(handle) => {
            // A handle controls at most one edge per axis; left and bottom take
            // precedence when the name mentions both.
            let left = handle.controls_left();
            let right = !left && handle.controls_right();
            let bottom = handle.controls_bottom();
            let top = !bottom && handle.controls_top();
            (left, right, bottom, top)
        }
    };

    let (x, w) = snap_axis(candidate.x, candidate.w, (left, right), targets, true, threshold, min_size);
    let (y, h) = snap_axis(candidate.y, candidate.h, (bottom, top), targets, false, threshold, min_size);

    Geometry::new(x, y, w, h).clamped(min_size)
}
