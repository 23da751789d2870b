//! Renderer trait abstraction.

use kurbo::Size;
use layoutvibe_core::interaction::Frame;
use layoutvibe_core::shapes::AreaKind;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    #[default]
    Lines,
}

impl GridStyle {
    /// Toggle between the styles.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::None,
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Editor state to paint.
    pub frame: Frame<'a>,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    /// Selection outline and handle color.
    pub selection_color: Color,
    /// Handle square size in pixels.
    pub handle_size: f64,
    /// Areas of this kind get an extra highlight outline.
    pub highlight_kind: Option<AreaKind>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(frame: Frame<'a>) -> Self {
        Self {
            frame,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            grid_style: GridStyle::Lines,
            selection_color: Color::from_rgba8(0, 123, 255, 255),
            handle_size: layoutvibe_core::config::HANDLE_SIZE,
            highlight_kind: None,
        }
    }

    /// Canvas size in pixels.
    pub fn viewport_size(&self) -> Size {
        self.frame.camera.viewport
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Set the handle size.
    pub fn with_handle_size(mut self, size: f64) -> Self {
        self.handle_size = size;
        self
    }

    /// Highlight all areas of a kind.
    pub fn with_highlight(mut self, kind: Option<AreaKind>) -> Self {
        self.highlight_kind = kind;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the drawing commands for a frame.
    ///
    /// Called after every state-affecting step.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;
}
