//! LayoutVibe Core Library
//!
//! Platform-agnostic data structures and editing logic for the LayoutVibe
//! floor-plan editor: rectangular areas in a Y-up world measured in meters,
//! edge snapping, selection handles and the pointer state machine.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod format;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod storage;

pub use camera::Camera;
pub use canvas::{Canvas, History, IdError, LayoutDocument};
pub use config::EditorConfig;
pub use format::{FormatError, SavedLayout};
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{Collaborator, DrawRect, Frame, InteractionManager, Operation};
pub use selection::{Cursor, Handle, HandleKind};
pub use shapes::{AreaKind, Geometry, Rectangle, ShapeId};
pub use snap::{SnapMode, SnapTarget, SnapTargetKind};
pub use storage::{MemoryStorage, Storage, StorageError};
