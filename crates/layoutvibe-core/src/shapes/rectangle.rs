//! Rectangle area.

use super::{AreaKind, ShapeId, generate_id};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Plain `(x, y, w, h)` geometry, used for candidate positions during a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y + self.h
    }

    /// Clamp to `x, y >= 0` and `w, h >= min_size`.
    pub fn clamped(self, min_size: f64) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
            w: self.w.max(min_size),
            h: self.h.max(min_size),
        }
    }
}

/// A rectangular floor-plan area in world coordinates.
///
/// `(x, y)` is the lower-left corner (world space is Y-up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// User-visible identifier, unique within a layout.
    pub id: ShapeId,
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
    /// Area classification (rendering only).
    pub kind: AreaKind,
}

impl Rectangle {
    /// Create a new area with a generated id.
    ///
    /// The origin is clamped to the positive quadrant. The size is taken as
    /// given; callers floor it with [`Rectangle::clamp`] against their configured minimum.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::with_id(generate_id(), x, y, w, h, AreaKind::default())
    }

    /// Create an area with an explicit id and kind.
    ///
    /// An empty id is replaced with a generated one.
    pub fn with_id(id: impl Into<ShapeId>, x: f64, y: f64, w: f64, h: f64, kind: AreaKind) -> Self {
        let id = id.into();
        Self {
            id: if id.trim().is_empty() { generate_id() } else { id },
            x: x.max(0.0),
            y: y.max(0.0),
            w,
            h,
            kind,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.y + self.h
    }

    /// Whether a world point lies in the closed rectangle.
    pub fn is_point_inside(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.top()
    }

    /// Current geometry.
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.x, self.y, self.w, self.h)
    }

    /// Write geometry back without clamping.
    ///
    /// Only used while a resize gesture is in progress; the gesture clamps on release.
    pub fn apply_geometry(&mut self, geometry: Geometry) {
        self.x = geometry.x;
        self.y = geometry.y;
        self.w = geometry.w;
        self.h = geometry.h;
    }

    /// Overwrite the geometry, clamping to the positive quadrant and minimum size.
    pub fn set_geometry(&mut self, x: f64, y: f64, w: f64, h: f64, min_size: f64) {
        self.x = x.max(0.0);
        self.y = y.max(0.0);
        self.w = w.max(min_size);
        self.h = h.max(min_size);
    }

    /// Re-apply the clamping invariants in place.
    pub fn clamp(&mut self, min_size: f64) {
        self.set_geometry(self.x, self.y, self.w, self.h, min_size);
    }

    /// Move the origin, keeping it non-negative.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x = (self.x + dx).max(0.0);
        self.y = (self.y + dy).max(0.0);
    }

    /// Copy with a fresh id, shifted by `offset` on both axes.
    pub fn duplicate(&self, offset: f64) -> Self {
        Self::with_id(
            generate_id(),
            self.x + offset,
            self.y + offset,
            self.w,
            self.h,
            self.kind.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(10.0, 20.0, 100.0, 50.0);
        assert!((rect.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.w - 100.0).abs() < f64::EPSILON);
        assert!((rect.h - 50.0).abs() < f64::EPSILON);
        assert_eq!(rect.kind, AreaKind::Active);
        assert!(!rect.id.is_empty());
    }

    #[test]
    fn test_creation_clamps_origin() {
        let mut rect = Rectangle::new(-5.0, -1.0, 0.5, 1.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.w, 0.5);

        rect.clamp(4.0);
        assert_eq!((rect.w, rect.h), (4.0, 4.0));
    }

    #[test]
    fn test_empty_id_is_regenerated() {
        let rect = Rectangle::with_id("  ", 0.0, 0.0, 5.0, 5.0, AreaKind::Wall);
        assert!(!rect.id.trim().is_empty());
        let named = Rectangle::with_id("kitchen", 0.0, 0.0, 5.0, 5.0, AreaKind::Wall);
        assert_eq!(named.id, "kitchen");
    }

    #[test]
    fn test_point_inside_is_closed() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.is_point_inside(Point::new(5.0, 5.0)));
        assert!(rect.is_point_inside(Point::new(0.0, 0.0)));
        assert!(rect.is_point_inside(Point::new(10.0, 10.0)));
        assert!(!rect.is_point_inside(Point::new(10.01, 5.0)));
        assert!(!rect.is_point_inside(Point::new(5.0, -0.01)));
    }

    #[test]
    fn test_translate_clamps_at_origin() {
        let mut rect = Rectangle::new(1.0, 1.0, 5.0, 5.0);
        rect.translate(-3.0, 2.0);
        assert_eq!(rect.x, 0.0);
        assert!((rect.y - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_geometry_clamped() {
        let g = Geometry::new(-1.0, 3.0, 1.0, 7.0).clamped(2.0);
        assert_eq!(g, Geometry::new(0.0, 3.0, 2.0, 7.0));
        assert!((g.right() - 2.0).abs() < f64::EPSILON);
        assert!((g.top() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate() {
        let rect = Rectangle::with_id("d", 1.0, 2.0, 5.0, 6.0, AreaKind::Dead);
        let copy = rect.duplicate(10.0);
        assert_ne!(copy.id, rect.id);
        assert!((copy.x - 11.0).abs() < f64::EPSILON);
        assert!((copy.y - 12.0).abs() < f64::EPSILON);
        assert_eq!(copy.kind, AreaKind::Dead);
    }
}
