//! LayoutVibe Render Library
//!
//! Renderer abstraction for the floor-plan editor. Scenes are built as a
//! backend-independent display list in screen space, so any 2D backend can
//! paint them.

mod renderer;
pub mod scene;
pub mod summary;

pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{DisplayListRenderer, DrawCommand, Scene, TextAlign, build_scene};
pub use summary::{highlight_rects, svg_summary};
