//! Main application coordinator.

use kurbo::Point;
use layoutvibe_core::camera::BASE_SCALE;
use layoutvibe_core::canvas::{Canvas, IdError};
use layoutvibe_core::config::EditorConfig;
use layoutvibe_core::format::{EXPORT_FILE_NAME, FormatError, SavedLayout, export_areas, import_areas};
use layoutvibe_core::input::{Key, KeyEvent, PointerEvent};
use layoutvibe_core::interaction::{Collaborator, Frame, InteractionManager};
use layoutvibe_core::selection::Cursor;
use layoutvibe_core::shapes::{AreaKind, Rectangle};
use layoutvibe_core::storage::{DEFAULT_LAYOUT_KEY, Storage, StorageError};
use layoutvibe_render::{
    DisplayListRenderer, GridStyle, RenderContext, Renderer, RendererError, Scene, svg_summary,
};
use peniko::Color;
use pollster::block_on;
use std::path::PathBuf;
use thiserror::Error;

/// Coordinate display while the pointer is off the canvas.
pub const COORDS_PLACEHOLDER: &str = "X:--, Y:--";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Invalid id: {0}")]
    Id(#[from] IdError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub grid_style: GridStyle,
    pub background_color: Color,
    /// Directory for saved layouts; the platform data directory when unset.
    pub storage_dir: Option<PathBuf>,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "LayoutVibe".to_string(),
            width: 1280,
            height: 800,
            grid_style: GridStyle::Lines,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            storage_dir: None,
            editor: EditorConfig::default(),
        }
    }
}

/// Property inspector contents for the selected area.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspector {
    pub id: String,
    pub kind: AreaKind,
    pub dimensions: String,
}

impl Inspector {
    fn from_shape(shape: &Rectangle) -> Self {
        Self {
            id: shape.id.clone(),
            kind: shape.kind.clone(),
            dimensions: format!(
                "X:{:.1}, Y:{:.1}, W:{:.1}, H:{:.1}",
                shape.x, shape.y, shape.w, shape.h
            ),
        }
    }
}

/// The collaborator half of the app: everything the interaction core calls
/// back into.
struct Shell {
    renderer: DisplayListRenderer,
    grid_style: GridStyle,
    background_color: Color,
    handle_size: f64,
    highlight: Option<AreaKind>,
    coords_text: String,
    inspector: Option<Inspector>,
}

impl Collaborator for Shell {
    fn request_repaint(&mut self, frame: &Frame<'_>) {
        let ctx = RenderContext::new(*frame)
            .with_background(self.background_color)
            .with_grid(self.grid_style)
            .with_handle_size(self.handle_size)
            .with_highlight(self.highlight.clone());
        if let Err(e) = self.renderer.build_scene(&ctx) {
            log::error!("Failed to build scene: {}", e);
        }
    }

    fn checkpoint(&mut self, canvas: &mut Canvas) {
        canvas.checkpoint();
        log::debug!("History checkpoint ({} entries)", canvas.history.len());
    }

    fn report_coords(&mut self, world: Point) {
        self.coords_text = format!("X:{:.1}, Y:{:.1}", world.x, world.y);
    }

    fn selection_changed(&mut self, selected: Option<&Rectangle>) {
        self.highlight = None;
        self.inspector = selected.map(Inspector::from_shape);
    }
}

/// The floor-plan editor application.
pub struct App {
    config: AppConfig,
    canvas: Canvas,
    interaction: InteractionManager,
    shell: Shell,
    storage: Box<dyn Storage>,
    id_field_focused: bool,
    status: String,
}

impl App {
    /// Create an app backed by file storage.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        use layoutvibe_core::storage::FileStorage;

        let storage = match &config.storage_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => FileStorage::default_location()?,
        };
        log::info!("Storing layouts in {}", storage.base_path().display());
        Ok(Self::with_storage(config, Box::new(storage)))
    }

    /// Create an app with an explicit storage backend.
    pub fn with_storage(config: AppConfig, storage: Box<dyn Storage>) -> Self {
        let mut canvas = Canvas::with_config(config.editor.clone());
        canvas.set_viewport_size(f64::from(config.width), f64::from(config.height));
        let shell = Shell {
            renderer: DisplayListRenderer::new(),
            grid_style: config.grid_style,
            background_color: config.background_color,
            handle_size: config.editor.handle_size,
            highlight: None,
            coords_text: COORDS_PLACEHOLDER.to_string(),
            inspector: None,
        };
        let mut app = Self {
            config,
            canvas,
            interaction: InteractionManager::new(),
            shell,
            storage,
            id_field_focused: false,
            status: String::new(),
        };
        app.repaint();
        // Pick up the layout saved by the previous session.
        match app.load() {
            Ok(true) => {}
            Ok(false) => app.status.clear(),
            Err(e) => log::warn!("Starting with an empty layout: {}", e),
        }
        app
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn interaction(&self) -> &InteractionManager {
        &self.interaction
    }

    /// The last built scene.
    pub fn scene(&self) -> Option<&Scene> {
        self.shell.renderer.scene()
    }

    pub fn coords_text(&self) -> &str {
        &self.shell.coords_text
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn inspector(&self) -> Option<&Inspector> {
        self.shell.inspector.as_ref()
    }

    pub fn cursor(&self) -> Cursor {
        self.interaction.cursor()
    }

    /// Zoom level as a percentage, e.g. "110%".
    pub fn zoom_text(&self) -> String {
        format!("{:.0}%", self.canvas.camera.scale * 100.0)
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        log::info!("{}", self.status);
    }

    /// Rebuild the scene from the current state.
    pub fn repaint(&mut self) {
        let frame = self.interaction.frame(&self.canvas);
        self.shell.request_repaint(&frame);
    }

    /// Canvas was resized.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_viewport_size(width, height);
        self.repaint();
    }

    /// Route a pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Wheel { position, delta_y } => {
                self.canvas.zoom_wheel(delta_y);
                self.repaint();
                self.interaction.refresh_cursor(&self.canvas, position);
            }
            PointerEvent::Leave => {
                self.shell.coords_text = COORDS_PLACEHOLDER.to_string();
            }
            other => self.interaction.handle_event(&mut self.canvas, other, &mut self.shell),
        }
    }

    /// The id field of the property inspector gained or lost focus.
    pub fn set_id_field_focus(&mut self, focused: bool) {
        self.id_field_focused = focused;
    }

    /// Handle a key press. Returns whether the key was consumed.
    ///
    /// Editing shortcuts are left to the text field while it has focus.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if self.id_field_focused {
            return false;
        }
        let modifiers = event.modifiers;
        match &event.key {
            Key::Character(c) if modifiers.command() => match c.to_ascii_lowercase() {
                'c' => self.copy_selected(),
                'v' => self.paste(),
                'z' if modifiers.shift => self.redo(),
                'z' => self.undo(),
                'y' => self.redo(),
                _ => false,
            },
            Key::Delete | Key::Backspace => self.delete_selected(),
            key => match key.arrow_direction() {
                Some((dx, dy)) => {
                    let step = self.canvas.config.nudge_step;
                    self.nudge_selected(dx * step, dy * step)
                }
                None => false,
            },
        }
    }

    fn refresh_inspector(&mut self) {
        self.shell.selection_changed(self.canvas.selected());
    }

    /// Record a history entry after an edit and repaint.
    fn commit_edit(&mut self) {
        self.canvas.checkpoint();
        self.refresh_inspector();
        self.repaint();
    }

    /// Reset transient state after the whole layout was replaced.
    fn after_replace(&mut self, message: &str) {
        self.shell.highlight = None;
        self.refresh_inspector();
        self.interaction.reset_cursor();
        self.repaint();
        self.set_status(message);
    }

    pub fn copy_selected(&mut self) -> bool {
        if !self.canvas.copy_selected() {
            return false;
        }
        let id = self.canvas.selected_id().unwrap_or_default().to_string();
        self.set_status(format!("Area \"{}\" copied.", id));
        true
    }

    pub fn paste(&mut self) -> bool {
        match self.canvas.paste() {
            Some(id) => {
                self.commit_edit();
                self.set_status(format!("Area pasted (ID: {}).", id));
                true
            }
            None => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        if !self.canvas.undo() {
            return false;
        }
        self.after_replace("History restored.");
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.canvas.redo() {
            return false;
        }
        self.after_replace("History restored.");
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.canvas.selected_id().map(str::to_owned) else {
            return false;
        };
        if !self.canvas.delete_selected() {
            return false;
        }
        self.commit_edit();
        self.interaction.reset_cursor();
        self.set_status(format!("Area {} deleted.", id));
        true
    }

    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        if !self.canvas.nudge_selected(dx, dy) {
            return false;
        }
        self.commit_edit();
        true
    }

    /// Apply an id edit from the inspector.
    ///
    /// A rejected id leaves the area unchanged and the inspector shows the
    /// previous id again.
    pub fn rename_selected(&mut self, new_id: &str) -> Result<bool, AppError> {
        match self.canvas.rename_selected(new_id) {
            Ok(true) => {
                self.commit_edit();
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                log::warn!("Rejected id edit '{}': {}", new_id, e);
                self.status = e.to_string();
                self.refresh_inspector();
                Err(e.into())
            }
        }
    }

    pub fn set_selected_kind(&mut self, kind: AreaKind) -> bool {
        if !self.canvas.set_selected_kind(kind) {
            return false;
        }
        self.commit_edit();
        true
    }

    pub fn zoom_in(&mut self) {
        self.canvas.zoom_in();
        self.repaint();
    }

    pub fn zoom_out(&mut self) {
        self.canvas.zoom_out();
        self.repaint();
    }

    pub fn reset_view(&mut self) {
        self.canvas.reset_view();
        self.repaint();
        self.set_status("View reset.");
    }

    pub fn toggle_grid(&mut self) {
        self.shell.grid_style = self.shell.grid_style.next();
        self.repaint();
    }

    /// Start an empty layout.
    pub fn new_layout(&mut self) {
        self.canvas.new_layout();
        self.after_replace("New layout created.");
    }

    /// Replace the layout with the areas of an export file. Returns the
    /// number of areas imported.
    pub fn import_json(&mut self, json: &str) -> Result<usize, AppError> {
        let shapes = match import_areas(json) {
            Ok(shapes) => shapes,
            Err(e) => {
                log::error!("Import failed: {}", e);
                self.status = format!("Import failed: {}", e);
                return Err(e.into());
            }
        };
        let count = shapes.len();
        self.canvas.load_layout(shapes, BASE_SCALE);
        self.after_replace("Import successful.");
        Ok(count)
    }

    /// Serialize all areas as an export file.
    pub fn export_json(&mut self) -> Result<String, AppError> {
        match export_areas(&self.canvas.document.shapes) {
            Ok(json) => {
                self.set_status(format!(
                    "Exported {} areas as {}.",
                    self.canvas.document.len(),
                    EXPORT_FILE_NAME
                ));
                Ok(json)
            }
            Err(e) => {
                self.status = format!("Export failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Save the layout and zoom level under the default key.
    pub fn save(&mut self) -> Result<(), AppError> {
        let layout = SavedLayout::new(self.canvas.document.shapes.clone(), self.canvas.camera.scale);
        if let Err(e) = block_on(self.storage.save(DEFAULT_LAYOUT_KEY, &layout)) {
            log::error!("Failed to save layout: {}", e);
            self.status = format!("Save failed: {}", e);
            return Err(e.into());
        }
        self.set_status("Layout saved.");
        Ok(())
    }

    /// Load the saved layout. Returns `false` when nothing was saved.
    pub fn load(&mut self) -> Result<bool, AppError> {
        match block_on(self.storage.load(DEFAULT_LAYOUT_KEY)) {
            Ok(layout) => {
                self.canvas.load_layout(layout.shapes, layout.view.scale);
                self.after_replace("Layout loaded.");
                Ok(true)
            }
            Err(StorageError::NotFound(_)) => {
                self.set_status("No saved layout found.");
                Ok(false)
            }
            Err(e) => {
                log::error!("Failed to load layout: {}", e);
                self.status = format!("Load failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// SVG legend of area counts per kind.
    pub fn summary_svg(&self) -> String {
        svg_summary(&self.canvas.document.shapes)
    }

    /// Highlight every area of `kind`; the same kind again clears it.
    pub fn toggle_highlight(&mut self, kind: AreaKind) {
        if self.shell.highlight.as_ref() == Some(&kind) {
            self.shell.highlight = None;
        } else {
            self.canvas.clear_selection();
            self.shell.inspector = None;
            self.shell.highlight = Some(kind);
        }
        self.repaint();
    }

    pub fn highlighted_kind(&self) -> Option<&AreaKind> {
        self.shell.highlight.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutvibe_core::input::{Modifiers, MouseButton};
    use layoutvibe_core::storage::MemoryStorage;

    fn app() -> App {
        let config = AppConfig {
            width: 800,
            height: 600,
            ..AppConfig::default()
        };
        App::with_storage(config, Box::new(MemoryStorage::new()))
    }

    fn drag(app: &mut App, from: (f64, f64), to: (f64, f64)) {
        app.handle_pointer(PointerEvent::Down {
            position: Point::new(from.0, from.1),
            button: MouseButton::Left,
        });
        app.handle_pointer(PointerEvent::Move {
            position: Point::new(to.0, to.1),
        });
        app.handle_pointer(PointerEvent::Up {
            position: Point::new(to.0, to.1),
            button: MouseButton::Left,
        });
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(Key::Character(c), Modifiers::ctrl())
    }

    #[test]
    fn test_draw_creates_area() {
        let mut app = app();
        drag(&mut app, (100.0, 100.0), (200.0, 50.0));

        let shapes = &app.canvas().document.shapes;
        assert_eq!(shapes.len(), 1);
        assert_eq!((shapes[0].x, shapes[0].y, shapes[0].w, shapes[0].h), (70.0, 470.0, 100.0, 50.0));
        let inspector = app.inspector().unwrap();
        assert_eq!(inspector.dimensions, "X:70.0, Y:470.0, W:100.0, H:50.0");
        assert!(app.canvas().history.can_undo());
        assert!(app.scene().is_some());
    }

    #[test]
    fn test_coordinate_display() {
        let mut app = app();
        assert_eq!(app.coords_text(), COORDS_PLACEHOLDER);
        app.handle_pointer(PointerEvent::Move {
            position: Point::new(100.0, 100.0),
        });
        assert_eq!(app.coords_text(), "X:70.0, Y:470.0");
        app.handle_pointer(PointerEvent::Leave);
        assert_eq!(app.coords_text(), COORDS_PLACEHOLDER);
    }

    #[test]
    fn test_copy_paste_undo_redo() {
        let mut app = app();
        drag(&mut app, (100.0, 100.0), (200.0, 50.0));

        assert!(app.handle_key(&ctrl('c')));
        assert!(app.handle_key(&ctrl('v')));
        let shapes = &app.canvas().document.shapes;
        assert_eq!(shapes.len(), 2);
        assert_eq!((shapes[1].x, shapes[1].y), (80.0, 480.0));
        assert_eq!(app.canvas().selected_id(), Some(shapes[1].id.as_str()));

        assert!(app.handle_key(&ctrl('z')));
        assert_eq!(app.canvas().document.len(), 1);
        assert!(app.inspector().is_none());

        assert!(app.handle_key(&ctrl('y')));
        assert_eq!(app.canvas().document.len(), 2);

        assert!(app.handle_key(&ctrl('z')));
        assert!(app.handle_key(&KeyEvent::new(Key::Character('Z'), Modifiers::ctrl_shift())));
        assert_eq!(app.canvas().document.len(), 2);
    }

    #[test]
    fn test_delete_and_arrow_keys() {
        let mut app = app();
        drag(&mut app, (100.0, 100.0), (200.0, 50.0));

        assert!(app.handle_key(&KeyEvent::plain(Key::ArrowUp)));
        assert!((app.canvas().document.shapes[0].y - 471.0).abs() < f64::EPSILON);
        assert!(app.handle_key(&KeyEvent::plain(Key::ArrowLeft)));
        assert!((app.canvas().document.shapes[0].x - 69.0).abs() < f64::EPSILON);

        assert!(app.handle_key(&KeyEvent::plain(Key::Backspace)));
        assert!(app.canvas().document.is_empty());
        assert!(!app.handle_key(&KeyEvent::plain(Key::Delete)));
    }

    #[test]
    fn test_keys_ignored_while_editing_id() {
        let mut app = app();
        drag(&mut app, (100.0, 100.0), (200.0, 50.0));
        app.set_id_field_focus(true);
        assert!(!app.handle_key(&KeyEvent::plain(Key::Delete)));
        assert!(!app.handle_key(&KeyEvent::plain(Key::ArrowUp)));
        assert!(!app.handle_key(&ctrl('z')));
        assert_eq!(app.canvas().document.len(), 1);

        app.set_id_field_focus(false);
        assert!(app.handle_key(&KeyEvent::plain(Key::Delete)));
    }

    #[test]
    fn test_rename_rejects_duplicates() {
        let mut app = app();
        drag(&mut app, (100.0, 100.0), (200.0, 50.0));
        app.rename_selected("hall").unwrap();
        drag(&mut app, (300.0, 100.0), (400.0, 50.0));

        assert!(matches!(app.rename_selected("hall"), Err(AppError::Id(IdError::Duplicate(_)))));
        assert!(matches!(app.rename_selected("   "), Err(AppError::Id(IdError::Empty))));
        assert_ne!(app.inspector().unwrap().id, "hall");

        assert!(app.rename_selected(" office ").unwrap());
        assert_eq!(app.inspector().unwrap().id, "office");
    }

    #[test]
    fn test_kind_edit() {
        let mut app = app();
        assert!(!app.set_selected_kind(AreaKind::Wall));
        drag(&mut app, (100.0, 100.0), (200.0, 50.0));
        assert!(app.set_selected_kind(AreaKind::Wall));
        assert_eq!(app.inspector().unwrap().kind, AreaKind::Wall);
        let svg = app.summary_svg();
        assert!(svg.contains(r#"data-shape-type="wall""#) && svg.contains(": 1x"));
    }

    #[test]
    fn test_zoom() {
        let mut app = app();
        app.handle_pointer(PointerEvent::Wheel {
            position: Point::new(100.0, 100.0),
            delta_y: -1.0,
        });
        assert_eq!(app.zoom_text(), "110%");
        app.zoom_out();
        assert_eq!(app.zoom_text(), "100%");
        for _ in 0..100 {
            app.zoom_in();
        }
        assert!((app.canvas().camera.scale - 10.0).abs() < f64::EPSILON);
        app.reset_view();
        assert_eq!(app.zoom_text(), "100%");
    }

    #[test]
    fn test_export_import() {
        let mut app = app();
        assert!(matches!(app.export_json(), Err(AppError::Format(FormatError::Empty))));

        drag(&mut app, (100.0, 100.0), (200.0, 50.0));
        let json = app.export_json().unwrap();

        app.zoom_in();
        app.new_layout();
        assert!(app.canvas().document.is_empty());

        app.zoom_in();
        assert_eq!(app.import_json(&json).unwrap(), 1);
        assert_eq!(app.zoom_text(), "100%");
        assert!(app.canvas().selected_id().is_none());
        assert!(app.import_json("{}").is_err());
        assert_eq!(app.canvas().document.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let mut app = app();
        assert!(!app.load().unwrap());

        drag(&mut app, (100.0, 100.0), (200.0, 50.0));
        app.zoom_in();
        app.save().unwrap();
        app.new_layout();

        assert!(app.load().unwrap());
        assert_eq!(app.canvas().document.len(), 1);
        assert_eq!(app.zoom_text(), "110%");
    }

    #[test]
    fn test_startup_restores_saved_layout() {
        let storage = MemoryStorage::new();
        let layout = SavedLayout::new(
            vec![Rectangle::with_id("hall", 10.0, 20.0, 30.0, 40.0, AreaKind::Passive)],
            1.5,
        );
        block_on(storage.save(DEFAULT_LAYOUT_KEY, &layout)).unwrap();

        let app = App::with_storage(AppConfig::default(), Box::new(storage));
        assert_eq!(app.canvas().document.len(), 1);
        assert_eq!(app.canvas().document.shapes[0].id, "hall");
        assert_eq!(app.zoom_text(), "150%");
        assert_eq!(app.status(), "Layout loaded.");
        assert!(!app.canvas().history.can_undo());
    }

    #[test]
    fn test_startup_without_saved_layout() {
        let app = app();
        assert!(app.canvas().document.is_empty());
        assert!(app.status().is_empty());
    }

    #[test]
    fn test_highlight_toggle() {
        let mut app = app();
        drag(&mut app, (100.0, 100.0), (200.0, 50.0));
        app.toggle_highlight(AreaKind::Active);
        assert_eq!(app.highlighted_kind(), Some(&AreaKind::Active));
        assert!(app.canvas().selected_id().is_none());
        app.toggle_highlight(AreaKind::Active);
        assert!(app.highlighted_kind().is_none());
    }
}
