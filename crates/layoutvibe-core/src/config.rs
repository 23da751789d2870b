//! Editor tunables.

use serde::{Deserialize, Serialize};

/// Minimum width/height of an area in world units.
pub const MIN_SHAPE_SIZE: f64 = 2.0;

/// Distance (world units) within which an edge snaps to a target.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Screen-space displacement (pixels) a draw gesture must exceed to create an area.
pub const DRAG_START_THRESHOLD: f64 = 5.0;

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Space reserved for axis labels along the left and bottom canvas edges.
pub const AXIS_MARGIN: f64 = 30.0;

/// Configuration shared by the interaction core and its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pixels between the canvas edge and the world axes.
    pub axis_margin: f64,
    /// Handle square size on screen.
    pub handle_size: f64,
    /// Divisor applied to the handle size to get the hit radius.
    pub handle_hit_divisor: f64,
    /// Minimum area width/height.
    pub min_shape_size: f64,
    /// Edge snapping distance in world units.
    pub snap_threshold: f64,
    /// Click vs. draw distinction in screen pixels.
    pub drag_start_threshold: f64,
    /// Multiplicative zoom step.
    pub zoom_factor: f64,
    /// Lower zoom bound.
    pub min_scale: f64,
    /// Upper zoom bound.
    pub max_scale: f64,
    /// Arrow-key move step in world units.
    pub nudge_step: f64,
    /// Offset applied to pasted areas.
    pub paste_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            axis_margin: AXIS_MARGIN,
            handle_size: HANDLE_SIZE,
            handle_hit_divisor: 1.5,
            min_shape_size: MIN_SHAPE_SIZE,
            snap_threshold: SNAP_THRESHOLD,
            drag_start_threshold: DRAG_START_THRESHOLD,
            zoom_factor: 1.1,
            min_scale: 0.1,
            max_scale: 10.0,
            nudge_step: 1.0,
            paste_offset: 10.0,
        }
    }
}

impl EditorConfig {
    /// Handle hit radius in world units at the given zoom scale.
    pub fn handle_hit_radius(&self, scale: f64) -> f64 {
        (self.handle_size / scale) / self.handle_hit_divisor
    }
}
