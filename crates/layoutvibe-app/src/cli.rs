//! Command-line commands over layout files.

use crate::app::AppError;
use crate::shortcuts::ShortcutRegistry;
use layoutvibe_core::config::EditorConfig;
use layoutvibe_core::format::{FormatError, SavedLayout, export_areas, import_areas};
use layoutvibe_core::shapes::Rectangle;
use layoutvibe_render::svg_summary;
use std::fs;
use std::path::Path;

pub const USAGE: &str = "usage: layoutvibe <summary|normalize> <file> | layoutvibe shortcuts";

/// Read areas from an export file (`areas`) or a saved layout (`shapes`),
/// floored at the default minimum size.
pub fn read_areas(path: &Path) -> Result<Vec<Rectangle>, AppError> {
    let json = fs::read_to_string(path)?;
    let mut shapes = match import_areas(&json) {
        Ok(shapes) => shapes,
        Err(FormatError::MissingArray(_)) => SavedLayout::from_json(&json)?.shapes,
        Err(e) => return Err(e.into()),
    };
    let min_size = EditorConfig::default().min_shape_size;
    for shape in &mut shapes {
        shape.clamp(min_size);
    }
    Ok(shapes)
}

/// Run a command and return what it prints.
pub fn run(args: &[String]) -> Result<String, AppError> {
    match args {
        [command, file] if command == "summary" => Ok(svg_summary(&read_areas(Path::new(file))?)),
        [command, file] if command == "normalize" => Ok(export_areas(&read_areas(Path::new(file))?)?),
        [command] if command == "shortcuts" => Ok(ShortcutRegistry::help_text()),
        _ => Err(AppError::Usage(USAGE.to_string())),
    }
}
