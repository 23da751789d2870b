//! Canvas document, history and editing commands.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::shapes::{AreaKind, Rectangle, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of history entries to keep.
const MAX_HISTORY: usize = 100;

/// Rejected identity edit. The area keeps its previous id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("area id must not be empty")]
    Empty,
    #[error("area id '{0}' is already in use")]
    Duplicate(String),
}

/// An ordered collection of areas. Order is draw order: the last area is on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub shapes: Vec<Rectangle>,
}

impl LayoutDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from a list of areas.
    pub fn from_shapes(shapes: Vec<Rectangle>) -> Self {
        Self { shapes }
    }

    /// Append an area on top.
    pub fn add_shape(&mut self, shape: Rectangle) {
        self.shapes.push(shape);
    }

    /// Remove an area by id.
    pub fn remove_shape(&mut self, id: &str) -> Option<Rectangle> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    pub fn get_shape(&self, id: &str) -> Option<&Rectangle> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn get_shape_mut(&mut self, id: &str) -> Option<&mut Rectangle> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get_shape(id).is_some()
    }

    /// Topmost area containing a world point.
    pub fn shape_at_point(&self, point: Point) -> Option<&Rectangle> {
        self.shapes.iter().rev().find(|s| s.is_point_inside(point))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// Linear history of document states.
///
/// Behaves like a browser session history: the cursor points at the entry
/// matching the current state, a new checkpoint drops everything after the
/// cursor, and replacing overwrites the current entry in place.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Vec<Rectangle>>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl History {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: Vec<Rectangle>) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Record a new entry after the current one.
    pub fn push(&mut self, state: Vec<Rectangle>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(state);
        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Overwrite the current entry.
    pub fn replace(&mut self, state: Vec<Rectangle>) {
        self.entries[self.cursor] = state;
    }

    /// Step back. Returns the state to restore.
    pub fn back(&mut self) -> Option<&[Rectangle]> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].as_slice())
    }

    /// Step forward. Returns the state to restore.
    pub fn forward(&mut self) -> Option<&[Rectangle]> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].as_slice())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The canvas state: document, history, view, selection and clipboard.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The areas being edited.
    pub document: LayoutDocument,
    /// Undo/redo entries.
    pub history: History,
    /// View transform.
    pub camera: Camera,
    /// Tunables.
    pub config: EditorConfig,
    /// Currently selected area (at most one).
    selection: Option<ShapeId>,
    /// Last copied area.
    clipboard: Option<Rectangle>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create a canvas using the given configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        let camera = Camera {
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            axis_margin: config.axis_margin,
            ..Camera::default()
        };
        Self {
            document: LayoutDocument::new(),
            history: History::default(),
            camera,
            config,
            selection: None,
            clipboard: None,
        }
    }

    /// Set the canvas size in pixels.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.camera.set_viewport(width, height);
    }

    /// Select an area by id.
    pub fn select(&mut self, id: impl Into<ShapeId>) {
        self.selection = Some(id.into());
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// The selected area, if it still exists.
    pub fn selected(&self) -> Option<&Rectangle> {
        self.document.get_shape(self.selection.as_deref()?)
    }

    pub fn selected_mut(&mut self) -> Option<&mut Rectangle> {
        let id = self.selection.as_deref()?;
        self.document.get_shape_mut(id)
    }

    /// Record the current document as a new history entry.
    pub fn checkpoint(&mut self) {
        self.history.push(self.document.shapes.clone());
    }

    /// Overwrite the current history entry with the current document.
    pub fn replace_checkpoint(&mut self) {
        self.history.replace(self.document.shapes.clone());
    }

    /// Step back in history. Clears the selection.
    pub fn undo(&mut self) -> bool {
        match self.history.back() {
            Some(state) => {
                self.document.shapes = state.to_vec();
                self.selection = None;
                true
            }
            None => false,
        }
    }

    /// Step forward in history. Clears the selection.
    pub fn redo(&mut self) -> bool {
        match self.history.forward() {
            Some(state) => {
                self.document.shapes = state.to_vec();
                self.selection = None;
                true
            }
            None => false,
        }
    }

    /// Replace the whole layout (load, import, new). The current history entry
    /// is overwritten rather than a new one pushed.
    pub fn load_layout(&mut self, mut shapes: Vec<Rectangle>, scale: f64) {
        for shape in &mut shapes {
            shape.clamp(self.config.min_shape_size);
        }
        self.document = LayoutDocument::from_shapes(shapes);
        self.camera.set_scale(scale);
        self.selection = None;
        self.replace_checkpoint();
    }

    /// Start an empty layout at 100% zoom.
    pub fn new_layout(&mut self) {
        self.load_layout(Vec::new(), crate::camera::BASE_SCALE);
    }

    /// Delete the selected area. Returns whether a checkpoint is due.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.take() else {
            return false;
        };
        self.document.remove_shape(&id).is_some()
    }

    /// Change the selected area's id.
    ///
    /// The new id is trimmed. Empty or colliding ids are rejected and the
    /// previous id is kept. Returns whether a checkpoint is due.
    pub fn rename_selected(&mut self, new_id: &str) -> Result<bool, IdError> {
        let Some(current) = self.selection.clone() else {
            return Ok(false);
        };
        let new_id = new_id.trim();
        if new_id.is_empty() {
            return Err(IdError::Empty);
        }
        if new_id != current && self.document.contains_id(new_id) {
            return Err(IdError::Duplicate(new_id.to_string()));
        }
        match self.document.get_shape_mut(&current) {
            Some(shape) => {
                shape.id = new_id.to_string();
                self.selection = Some(new_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Change the selected area's kind. Returns whether a checkpoint is due.
    pub fn set_selected_kind(&mut self, kind: AreaKind) -> bool {
        match self.selected_mut() {
            Some(shape) => {
                shape.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Move the selected area by a world delta, keeping it in the positive
    /// quadrant. Returns whether a checkpoint is due.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        match self.selected_mut() {
            Some(shape) => {
                shape.translate(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Copy the selected area to the clipboard. Returns whether anything was copied.
    pub fn copy_selected(&mut self) -> bool {
        match self.selected().cloned() {
            Some(shape) => {
                self.clipboard = Some(shape);
                true
            }
            None => false,
        }
    }

    /// Paste the clipboard as a new, offset area and select it.
    ///
    /// Returns the new id; a checkpoint is due when one is returned.
    pub fn paste(&mut self) -> Option<ShapeId> {
        let copy = self.clipboard.as_ref()?.duplicate(self.config.paste_offset);
        let id = copy.id.clone();
        self.document.add_shape(copy);
        self.selection = Some(id.clone());
        Some(id)
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in(self.config.zoom_factor);
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out(self.config.zoom_factor);
    }

    /// Wheel zoom: negative delta zooms in.
    pub fn zoom_wheel(&mut self, delta_y: f64) {
        self.camera.zoom_wheel(delta_y, self.config.zoom_factor);
    }

    /// Reset the zoom to 100%.
    pub fn reset_view(&mut self) {
        self.camera.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Rectangle {
        Rectangle::with_id(id, x, y, w, h, AreaKind::Active)
    }

    #[test]
    fn test_document_creation() {
        let doc = LayoutDocument::new();
        assert!(doc.is_empty());
        assert!(doc.shape_at_point(Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_add_and_remove_shape() {
        let mut doc = LayoutDocument::new();
        doc.add_shape(rect("a", 0.0, 0.0, 10.0, 10.0));
        assert_eq!(doc.len(), 1);
        assert!(doc.get_shape("a").is_some());

        let removed = doc.remove_shape("a");
        assert!(removed.is_some());
        assert!(doc.is_empty());
        assert!(doc.remove_shape("a").is_none());
    }

    #[test]
    fn test_shape_at_point_prefers_topmost() {
        let mut doc = LayoutDocument::new();
        doc.add_shape(rect("bottom", 0.0, 0.0, 100.0, 100.0));
        doc.add_shape(rect("top", 50.0, 50.0, 100.0, 100.0));

        assert_eq!(doc.shape_at_point(Point::new(75.0, 75.0)).map(|s| s.id.as_str()), Some("top"));
        assert_eq!(doc.shape_at_point(Point::new(25.0, 25.0)).map(|s| s.id.as_str()), Some("bottom"));
        assert!(doc.shape_at_point(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_undo_redo() {
        let mut canvas = Canvas::new();
        assert!(!canvas.undo());

        canvas.document.add_shape(rect("a", 0.0, 0.0, 10.0, 10.0));
        canvas.checkpoint();
        canvas.document.add_shape(rect("b", 20.0, 0.0, 10.0, 10.0));
        canvas.checkpoint();
        canvas.select("b");

        assert!(canvas.undo());
        assert_eq!(canvas.document.len(), 1);
        assert!(canvas.selected_id().is_none());

        assert!(canvas.undo());
        assert!(canvas.document.is_empty());
        assert!(!canvas.undo());

        assert!(canvas.redo());
        assert!(canvas.redo());
        assert_eq!(canvas.document.len(), 2);
        assert!(!canvas.redo());
    }

    #[test]
    fn test_checkpoint_truncates_redo() {
        let mut canvas = Canvas::new();
        canvas.document.add_shape(rect("a", 0.0, 0.0, 10.0, 10.0));
        canvas.checkpoint();
        assert!(canvas.undo());
        assert!(canvas.history.can_redo());

        canvas.document.add_shape(rect("c", 0.0, 0.0, 10.0, 10.0));
        canvas.checkpoint();
        assert!(!canvas.history.can_redo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::default();
        for i in 0..(MAX_HISTORY + 20) {
            history.push(vec![rect(&i.to_string(), 0.0, 0.0, 5.0, 5.0)]);
        }
        assert_eq!(history.len(), MAX_HISTORY);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_load_layout_replaces_history_entry() {
        let mut canvas = Canvas::new();
        canvas.load_layout(vec![rect("a", 0.0, 0.0, 10.0, 10.0)], 2.0);
        assert_eq!(canvas.history.len(), 1);
        assert!(!canvas.history.can_undo());
        assert!((canvas.camera.scale - 2.0).abs() < f64::EPSILON);

        canvas.new_layout();
        assert!(canvas.document.is_empty());
        assert!((canvas.camera.scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(canvas.history.len(), 1);
    }

    #[test]
    fn test_load_layout_floors_to_configured_minimum() {
        let mut canvas = Canvas::with_config(EditorConfig {
            min_shape_size: 5.0,
            ..EditorConfig::default()
        });
        canvas.load_layout(vec![rect("a", 0.0, 0.0, 0.5, 12.0), rect("b", 20.0, 0.0, 3.0, 3.0)], 1.0);
        let sizes: Vec<_> = canvas.document.shapes.iter().map(|s| (s.w, s.h)).collect();
        assert_eq!(sizes, vec![(5.0, 12.0), (5.0, 5.0)]);
    }

    #[test]
    fn test_delete_selected() {
        let mut canvas = Canvas::new();
        canvas.document.add_shape(rect("a", 0.0, 0.0, 10.0, 10.0));
        assert!(!canvas.delete_selected());

        canvas.select("a");
        assert!(canvas.delete_selected());
        assert!(canvas.document.is_empty());
        assert!(canvas.selected_id().is_none());
    }

    #[test]
    fn test_rename_rejects_empty_and_duplicates() {
        let mut canvas = Canvas::new();
        canvas.document.add_shape(rect("a", 0.0, 0.0, 10.0, 10.0));
        canvas.document.add_shape(rect("b", 20.0, 0.0, 10.0, 10.0));
        canvas.select("a");

        assert_eq!(canvas.rename_selected("   "), Err(IdError::Empty));
        assert_eq!(canvas.rename_selected("b"), Err(IdError::Duplicate("b".to_string())));
        assert!(canvas.document.contains_id("a"));

        assert_eq!(canvas.rename_selected("  kitchen "), Ok(true));
        assert!(canvas.document.contains_id("kitchen"));
        assert_eq!(canvas.selected_id(), Some("kitchen"));
    }

    #[test]
    fn test_rename_to_same_id_is_allowed() {
        let mut canvas = Canvas::new();
        canvas.document.add_shape(rect("a", 0.0, 0.0, 10.0, 10.0));
        canvas.select("a");
        assert_eq!(canvas.rename_selected("a"), Ok(true));
    }

    #[test]
    fn test_set_kind_and_nudge() {
        let mut canvas = Canvas::new();
        canvas.document.add_shape(rect("a", 0.5, 3.0, 10.0, 10.0));
        canvas.select("a");

        assert!(canvas.set_selected_kind(AreaKind::Wall));
        assert!(canvas.nudge_selected(-1.0, 1.0));
        let shape = canvas.selected().unwrap();
        assert_eq!(shape.kind, AreaKind::Wall);
        assert_eq!(shape.x, 0.0);
        assert!((shape.y - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_copy_paste_offsets_and_selects() {
        let mut canvas = Canvas::new();
        canvas.document.add_shape(Rectangle::with_id("a", 5.0, 5.0, 10.0, 20.0, AreaKind::Dead));
        assert!(canvas.paste().is_none());

        canvas.select("a");
        assert!(canvas.copy_selected());
        let id = canvas.paste().unwrap();

        assert_eq!(canvas.document.len(), 2);
        assert_eq!(canvas.selected_id(), Some(id.as_str()));
        let pasted = canvas.selected().unwrap();
        assert!((pasted.x - 15.0).abs() < f64::EPSILON);
        assert!((pasted.y - 15.0).abs() < f64::EPSILON);
        assert!((pasted.h - 20.0).abs() < f64::EPSILON);
        assert_eq!(pasted.kind, AreaKind::Dead);
    }

    #[test]
    fn test_zoom_commands() {
        let mut canvas = Canvas::new();
        canvas.zoom_in();
        assert!((canvas.camera.scale - 1.1).abs() < 1e-12);
        canvas.zoom_wheel(3.0);
        assert!((canvas.camera.scale - 1.0).abs() < 1e-12);
        canvas.zoom_out();
        canvas.reset_view();
        assert!((canvas.camera.scale - 1.0).abs() < f64::EPSILON);
    }
}
