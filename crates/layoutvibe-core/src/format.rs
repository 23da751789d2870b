//! Serialization contract for areas, export files and saved editor state.
//!
//! An area serializes to
//! `{ "id": ..., "type": ..., "shape": { "type": "rectangle", "coords": [x, y, w, h] } }`
//! with coordinates rounded to two decimals. Parsing is lenient: malformed
//! entries are skipped one by one and never fail the whole batch.

use crate::camera::BASE_SCALE;
use crate::shapes::{AreaKind, Rectangle, generate_id};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Suggested file name for exports.
pub const EXPORT_FILE_NAME: &str = "layout.json";

/// The only geometry tag currently understood.
pub const RECTANGLE_TAG: &str = "rectangle";

/// Errors for whole-document parsing and export.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid format: expected an array field '{0}'")]
    MissingArray(&'static str),
    #[error("nothing to export")]
    Empty,
}

/// Geometry part of an area record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(rename = "type")]
    pub shape_type: String,
    pub coords: [f64; 4],
}

/// Serialized form of one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AreaKind,
    pub shape: ShapeRecord,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl From<&Rectangle> for AreaRecord {
    fn from(shape: &Rectangle) -> Self {
        Self {
            id: shape.id.clone(),
            kind: shape.kind.clone(),
            shape: ShapeRecord {
                shape_type: RECTANGLE_TAG.to_string(),
                coords: [round2(shape.x), round2(shape.y), round2(shape.w), round2(shape.h)],
            },
        }
    }
}

/// Loose numeric coercion: numbers, numeric strings, booleans and null.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Parse one area entry. Returns `None` for anything malformed.
///
/// Accepts the full record or a bare `{ "type": "rectangle", "coords": [...] }`.
pub fn parse_area(entry: &Value) -> Option<Rectangle> {
    let shape_info = entry.get("shape").filter(|s| !s.is_null()).unwrap_or(entry);
    if shape_info.get("type").and_then(Value::as_str) != Some(RECTANGLE_TAG) {
        return None;
    }
    let coords = shape_info.get("coords")?.as_array()?;
    if coords.len() != 4 {
        return None;
    }
    let mut values = [0.0; 4];
    for (slot, value) in values.iter_mut().zip(coords) {
        *slot = coerce_number(value)?;
    }
    let [x, y, w, h] = values;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }

    let id = match entry.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => generate_id(),
    };
    let kind = entry
        .get("type")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(AreaKind::from_tag)
        .unwrap_or_default();

    Some(Rectangle::with_id(id, x, y, w, h, kind))
}

/// Parse a list of area entries, skipping malformed ones.
///
/// Ids stay unique: an entry whose id was already taken gets a generated one.
pub fn parse_areas(entries: &[Value]) -> Vec<Rectangle> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let Some(mut shape) = parse_area(entry) else {
                log::warn!("Skipping malformed area entry #{index}");
                return None;
            };
            if !seen.insert(shape.id.clone()) {
                let fresh = generate_id();
                log::warn!("Area entry #{index} reuses id \"{}\", renamed to \"{}\"", shape.id, fresh);
                seen.insert(fresh.clone());
                shape.id = fresh;
            }
            Some(shape)
        })
        .collect()
}

fn array_field<'a>(root: &'a Value, field: &'static str) -> Result<&'a Vec<Value>, FormatError> {
    root.get(field)
        .and_then(Value::as_array)
        .ok_or(FormatError::MissingArray(field))
}

/// Export file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFile {
    pub areas: Vec<AreaRecord>,
}

/// Serialize areas as a pretty-printed export file.
pub fn export_areas(shapes: &[Rectangle]) -> Result<String, FormatError> {
    if shapes.is_empty() {
        return Err(FormatError::Empty);
    }
    let file = ExportFile {
        areas: shapes.iter().map(AreaRecord::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Parse an export file (`{ "areas": [...] }`).
pub fn import_areas(json: &str) -> Result<Vec<Rectangle>, FormatError> {
    let root: Value = serde_json::from_str(json)?;
    let areas = array_field(&root, "areas")?;
    Ok(parse_areas(areas))
}

/// Persisted view settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub scale: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { scale: BASE_SCALE }
    }
}

#[derive(Serialize)]
struct SavedLayoutRecord {
    shapes: Vec<AreaRecord>,
    view: ViewState,
}

/// Saved editor state: all areas plus the zoom level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavedLayout {
    pub shapes: Vec<Rectangle>,
    pub view: ViewState,
}

impl SavedLayout {
    pub fn new(shapes: Vec<Rectangle>, scale: f64) -> Self {
        Self {
            shapes,
            view: ViewState { scale },
        }
    }

    /// Serialize to `{ "shapes": [...], "view": { "scale": s } }`.
    pub fn to_json(&self) -> Result<String, FormatError> {
        let record = SavedLayoutRecord {
            shapes: self.shapes.iter().map(AreaRecord::from).collect(),
            view: self.view,
        };
        Ok(serde_json::to_string(&record)?)
    }

    /// Parse saved state. A missing or non-positive scale falls back to 100%.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        let root: Value = serde_json::from_str(json)?;
        let shapes = parse_areas(array_field(&root, "shapes")?);
        let scale = root
            .get("view")
            .and_then(|view| view.get("scale"))
            .and_then(Value::as_f64)
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(BASE_SCALE);
        Ok(Self::new(shapes, scale))
    }
}
