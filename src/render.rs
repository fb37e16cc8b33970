//! Draw-command generation.
//!
//! Every command is already in screen coordinates; the rendering backend only
//! rasterizes. Commands are emitted back to front: background, grid, arcs,
//! nodes (backmost first), anchors, the pending wire and the selection box.

use crate::geometry::{Point, Rect, ViewTransform};
use crate::graph::{Action, Arc, Graph, Node, Pin, Stream};
use crate::grid::grid_lines;
use crate::style::{EditorConfig, Style};
use slint::Color;

/// A primitive for the rendering backend.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FilledRect {
        rect: Rect,
        color: Color,
        rounding: f64,
    },
    StrokedRect {
        rect: Rect,
        color: Color,
        rounding: f64,
        thickness: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        thickness: f64,
    },
    Polyline {
        points: Vec<Point>,
        color: Color,
        thickness: f64,
    },
    FilledPolyline {
        points: Vec<Point>,
        color: Color,
    },
    Text {
        position: Point,
        text: String,
        color: Color,
        size: f64,
    },
}

/// Per-frame overlays owned by the controller rather than the graph.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    /// Wire being dragged, world coordinates
    pub pending_wire: Option<Vec<Point>>,
    /// Rubber band, screen coordinates
    pub selection_box: Option<Rect>,
}

/// Build the full command list for one frame.
pub fn build_frame(
    graph: &Graph,
    transform: &ViewTransform,
    canvas: &Rect,
    config: &EditorConfig,
    overlay: &Overlay,
) -> Vec<DrawCommand> {
    let style = graph.style();
    let mut commands = vec![DrawCommand::FilledRect {
        rect: *canvas,
        color: graph.background,
        rounding: 0.0,
    }];

    if config.show_grid {
        commands.extend(grid_lines(
            canvas,
            transform.pan,
            transform.zoom,
            config.grid_spacing,
            style.grid_color,
        ));
    }

    for arc in graph.arcs() {
        draw_arc(&mut commands, arc, transform, style);
    }

    for node in graph.nodes().iter().rev() {
        draw_node(&mut commands, node, transform, style);
    }

    if let Some(arc) = graph.sole_selected_arc().and_then(|id| graph.arc(id)) {
        for anchor in [&arc.start, &arc.end] {
            let color = if anchor.selected || anchor.hovering {
                style.arc_selected
            } else {
                style.anchor_color
            };
            let size = style.anchor_size * transform.zoom;
            commands.push(DrawCommand::FilledRect {
                rect: Rect::from_center(transform.world_to_screen(anchor.position()), size, size),
                color,
                rounding: size / 2.0,
            });
        }
    }

    if let Some(wire) = &overlay.pending_wire {
        commands.push(DrawCommand::Polyline {
            points: wire.iter().map(|p| transform.world_to_screen(*p)).collect(),
            color: style.arc_hovered,
            thickness: style.arc_thickness * transform.zoom,
        });
    }

    if let Some(rect) = overlay.selection_box {
        commands.push(DrawCommand::FilledRect {
            rect,
            color: style.selection_fill,
            rounding: 0.0,
        });
        commands.push(DrawCommand::StrokedRect {
            rect,
            color: style.selection_stroke,
            rounding: 0.0,
            thickness: 1.0,
        });
    }

    commands
}

fn draw_arc(commands: &mut Vec<DrawCommand>, arc: &Arc, transform: &ViewTransform, style: &Style) {
    if arc.polyline().len() < 2 {
        return;
    }
    let color = if arc.selected {
        style.arc_selected
    } else if arc.hovering {
        style.arc_hovered
    } else {
        style.arc_color
    };
    commands.push(DrawCommand::Polyline {
        points: arc.polyline().iter().map(|p| transform.world_to_screen(*p)).collect(),
        color,
        thickness: style.arc_thickness * transform.zoom,
    });
}

fn draw_node(commands: &mut Vec<DrawCommand>, node: &Node, transform: &ViewTransform, style: &Style) {
    let zoom = transform.zoom;
    let rect = transform.rect_to_screen(&node.rect);
    let rounding = style.node_rounding * zoom;

    commands.push(DrawCommand::FilledRect {
        rect,
        color: style.node_body,
        rounding,
    });
    let header = Rect::new(rect.x, rect.y, rect.width, (style.header_height * zoom).min(rect.height));
    commands.push(DrawCommand::FilledRect {
        rect: header,
        color: node.color,
        rounding,
    });

    let border = if node.selected {
        style.node_border_selected
    } else if node.hovering {
        style.node_border_hovered
    } else {
        style.node_border
    };
    commands.push(DrawCommand::StrokedRect {
        rect,
        color: border,
        rounding,
        thickness: style.border_thickness * zoom,
    });

    let title = if node.icon.is_empty() {
        node.name.clone()
    } else {
        format!("{} {}", node.icon, node.name)
    };
    let font = style.font_size * zoom;
    commands.push(DrawCommand::Text {
        position: Point::new(
            rect.x + style.node_padding * zoom,
            header.y + (header.height - font) / 2.0,
        ),
        text: title,
        color: style.text_color,
        size: font,
    });

    for (_, pin) in node.pins() {
        draw_pin(commands, pin, transform, style);
    }
}

fn draw_pin(commands: &mut Vec<DrawCommand>, pin: &Pin, transform: &ViewTransform, style: &Style) {
    let icon = transform.rect_to_screen(&pin.icon_rect);
    let color = if pin.connectable {
        style.pin_connectable
    } else if pin.hovering || pin.selected {
        style.pin_hovered
    } else {
        match pin.action() {
            Action::Flow => style.flow_pin,
            Action::Data => style.data_pin,
        }
    };

    match pin.action() {
        Action::Flow => {
            // Arrow pointing in the direction of flow
            commands.push(DrawCommand::FilledPolyline {
                points: vec![
                    icon.origin(),
                    Point::new(icon.max().x, icon.center().y),
                    Point::new(icon.x, icon.max().y),
                ],
                color,
            });
        }
        Action::Data if pin.is_connected() => commands.push(DrawCommand::FilledRect {
            rect: icon,
            color,
            rounding: icon.width / 2.0,
        }),
        Action::Data => commands.push(DrawCommand::StrokedRect {
            rect: icon,
            color,
            rounding: icon.width / 2.0,
            thickness: transform.zoom,
        }),
    }

    if !pin.name.is_empty() {
        let label = transform.rect_to_screen(&pin.label_rect);
        let mut text = pin.name.clone();
        if pin.required && pin.stream() == Stream::Input {
            text.push('*');
        }
        commands.push(DrawCommand::Text {
            position: label.origin(),
            text,
            color: style.text_color,
            size: style.font_size * transform.zoom,
        });
    }
}
