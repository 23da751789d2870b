//! Per-kind area summary as an SVG legend.

use kurbo::Rect;
use layoutvibe_core::camera::Camera;
use layoutvibe_core::shapes::{AreaKind, Rectangle};
use svg::Document;
use svg::node::element::{Group, Rectangle as Swatch, Text};

const ROW_START: f64 = 20.0;
const ROW_STEP: f64 = 25.0;

fn kind_color(kind: &AreaKind) -> &'static str {
    match kind {
        AreaKind::Active => "rgba(59, 130, 246, 0.7)",
        AreaKind::Passive => "rgba(107, 114, 128, 0.7)",
        AreaKind::Wall => "rgba(55, 65, 81, 0.7)",
        _ => "#ccc",
    }
}

/// Count areas per kind, in order of first appearance.
pub fn count_by_kind(shapes: &[Rectangle]) -> Vec<(AreaKind, usize)> {
    let mut counts: Vec<(AreaKind, usize)> = Vec::new();
    for shape in shapes {
        match counts.iter_mut().find(|(kind, _)| *kind == shape.kind) {
            Some((_, count)) => *count += 1,
            None => counts.push((shape.kind.clone(), 1)),
        }
    }
    counts
}

/// Render the summary legend: one row per kind with a color swatch and
/// its count, or a centered message when there are no areas.
///
/// Each row is a `<g data-shape-type="...">` group so a host can make it
/// clickable and drive [`highlight_rects`].
pub fn svg_summary(shapes: &[Rectangle]) -> String {
    let mut document = Document::new()
        .set("width", "100%")
        .set("height", 100)
        .set("viewBox", (0, 0, 280, 100));
    let counts = count_by_kind(shapes);

    if counts.is_empty() {
        document = document.add(
            Text::new("No areas to display.")
                .set("x", "50%")
                .set("y", "50%")
                .set("text-anchor", "middle"),
        );
    }

    let mut y = ROW_START;
    for (kind, count) in &counts {
        let tag = kind.as_str();
        let swatch = Swatch::new()
            .set("x", 10)
            .set("y", y - 12.0)
            .set("width", 15)
            .set("height", 15)
            .set("fill", kind_color(kind))
            .set("rx", 3);
        let label = Text::new(format!("Typ '{tag}': {count}x"))
            .set("x", 35)
            .set("y", y);
        let row = Group::new()
            .set("data-shape-type", tag)
            .set("style", "cursor: pointer")
            .add(swatch)
            .add(label);
        document = document.add(row);
        y += ROW_STEP;
    }

    document.to_string()
}

/// Screen rectangles of every area of `kind`.
pub fn highlight_rects(shapes: &[Rectangle], kind: &AreaKind, camera: &Camera) -> Vec<Rect> {
    shapes
        .iter()
        .filter(|shape| shape.kind == *kind)
        .map(|shape| camera.world_rect_to_screen(shape.x, shape.y, shape.w, shape.h))
        .collect()
}
