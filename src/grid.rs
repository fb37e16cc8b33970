use crate::geometry::{Point, Rect};
use crate::render::DrawCommand;
use slint::Color;

/// Screen spacing below which the grid is not drawn.
pub const MIN_GRID_SPACING: f64 = 4.0;

/// Generate line commands for the background grid.
///
/// Lines sit at multiples of `spacing` in world coordinates, so the grid
/// moves with pan and scales with zoom.
///
/// # Arguments
/// * `canvas` - Canvas area in screen coordinates
/// * `pan` - Current pan (world units)
/// * `zoom` - Current zoom level
/// * `spacing` - Grid spacing in world units
/// * `color` - Line color
pub fn grid_lines(canvas: &Rect, pan: Point, zoom: f64, spacing: f64, color: Color) -> Vec<DrawCommand> {
    let effective_spacing = spacing * zoom;

    // Skip if spacing is too small to be visible
    if effective_spacing.is_nan() || effective_spacing < MIN_GRID_SPACING {
        return Vec::new();
    }

    let offset_x = (pan.x * zoom).rem_euclid(effective_spacing);
    let offset_y = (pan.y * zoom).rem_euclid(effective_spacing);
    let max = canvas.max();
    let mut lines = Vec::new();

    let mut x = canvas.x + offset_x;
    while x <= max.x {
        lines.push(DrawCommand::Line {
            from: Point::new(x, canvas.y),
            to: Point::new(x, max.y),
            color,
            thickness: 1.0,
        });
        x += effective_spacing;
    }

    let mut y = canvas.y + offset_y;
    while y <= max.y {
        lines.push(DrawCommand::Line {
            from: Point::new(canvas.x, y),
            to: Point::new(max.x, y),
            color,
            thickness: 1.0,
        });
        y += effective_spacing;
    }

    lines
}
