//! Node layout: size a node from its title and pins and place pin icons and
//! labels inside it.
//!
//! Inputs stack down the left edge and outputs down the right edge, flow
//! pins first. Icons are inset by `node_padding`, so every connection point
//! lies inside the node rectangle.

use crate::geometry::Rect;
use crate::graph::{Node, Pin};
use crate::style::Style;

/// Gap between a pin icon and its label.
const LABEL_GAP: f64 = 4.0;

fn text_width(text: &str, style: &Style) -> f64 {
    text.chars().count() as f64 * style.char_width
}

/// Horizontal space taken by one pin row: icon, gap, label.
fn row_width(pin: &Pin, style: &Style) -> f64 {
    let label = text_width(&pin.name, style);
    if label > 0.0 {
        style.pin_size + LABEL_GAP + label
    } else {
        style.pin_size
    }
}

/// Compute a node's size and the rectangles of all its pins.
///
/// The node's top-left corner is kept; width and height are recomputed.
pub fn layout_node(node: &mut Node, style: &Style) {
    let left_rows = node.flow_inputs().len() + node.data_inputs().len();
    let right_rows = node.flow_outputs().len() + node.data_outputs().len();
    let rows = left_rows.max(right_rows);

    let left_width = node.input_pins().map(|p| row_width(p, style)).fold(0.0, f64::max);
    let right_width = node.output_pins().map(|p| row_width(p, style)).fold(0.0, f64::max);
    let title_len = node.name.chars().count() + node.icon.chars().count() + usize::from(!node.icon.is_empty());
    let title_width = title_len as f64 * style.char_width + 2.0 * style.node_padding;
    let pins_width = left_width + right_width + 4.0 * style.node_padding;

    let width = style.min_node_width.max(title_width).max(pins_width);
    let height = if rows == 0 {
        style.header_height + style.node_padding
    } else {
        style.header_height + 2.0 * style.node_padding + rows as f64 * style.pin_spacing
    };
    node.rect = Rect::new(node.rect.x, node.rect.y, width, height);

    let rect = node.rect;
    let row_center = |row: usize| {
        rect.y + style.header_height + style.node_padding + (row as f64 + 0.5) * style.pin_spacing
    };
    let half = style.pin_size / 2.0;

    let mut row = 0;
    for pin in node.pins_mut().filter(|p| p.stream() == crate::graph::Stream::Input) {
        let cy = row_center(row);
        pin.icon_rect = Rect::new(rect.x + style.node_padding, cy - half, style.pin_size, style.pin_size);
        let label_x = pin.icon_rect.x + style.pin_size + LABEL_GAP;
        pin.label_rect = Rect::new(label_x, cy - style.font_size / 2.0, text_width(&pin.name, style), style.font_size);
        row += 1;
    }

    let mut row = 0;
    for pin in node.pins_mut().filter(|p| p.stream() == crate::graph::Stream::Output) {
        let cy = row_center(row);
        let icon_x = rect.x + rect.width - style.node_padding - style.pin_size;
        pin.icon_rect = Rect::new(icon_x, cy - half, style.pin_size, style.pin_size);
        let label_width = text_width(&pin.name, style);
        let label_x = icon_x - LABEL_GAP - label_width;
        pin.label_rect = Rect::new(label_x, cy - style.font_size / 2.0, label_width, style.font_size);
        row += 1;
    }
}
