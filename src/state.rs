use crate::geometry::{Point, Rect};
use crate::graph::{AnchorEnd, ArcId, Graph, NodePin, SelectedItem};
use crate::hit_test::Hit;

/// Mode of the canvas interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Normal,
    /// Selected nodes follow the pointer
    NodeMoving,
    /// A wire is being dragged out of `source`
    PinConnecting { source: NodePin },
    /// Rubber-band selection; corners in screen coordinates
    SelectionBox { origin: Point, current: Point },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Normal => "normal",
            InteractionState::NodeMoving => "node-moving",
            InteractionState::PinConnecting { .. } => "pin-connecting",
            InteractionState::SelectionBox { .. } => "selection-box",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, InteractionState::Normal)
    }

    /// The selection rectangle in screen coordinates, while box-selecting
    pub fn selection_rect(&self) -> Option<Rect> {
        match self {
            InteractionState::SelectionBox { origin, current } => Some(Rect::from_corners(*origin, *current)),
            _ => None,
        }
    }

    pub fn connection_source(&self) -> Option<NodePin> {
        match self {
            InteractionState::PinConnecting { source } => Some(*source),
            _ => None,
        }
    }
}

/// An anchor being dragged. Runs alongside [`InteractionState::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorDrag {
    pub arc: ArcId,
    pub end: AnchorEnd,
}

/// Re-derive every transient flag of `graph` from this frame's hit and mode.
///
/// Clears hover and connectable state, then marks the hovered entity, the
/// connection source and every pin the source could legally connect to.
pub fn apply_transient_flags(graph: &mut Graph, hit: Hit, state: &InteractionState, anchor_drag: Option<AnchorDrag>) {
    graph.clear_transient_state();

    let source = state.connection_source();
    let connectable: Vec<NodePin> = match source {
        Some(source) => graph
            .nodes()
            .iter()
            .flat_map(|n| n.pins().map(|(handle, _)| handle))
            .filter(|handle| graph.is_connectable(source, *handle))
            .collect(),
        None => Vec::new(),
    };

    for node in graph.nodes_mut() {
        let id = node.id();
        node.hovering = hit.node() == Some(id);
        for pin in node.pins_mut() {
            pin.selected = false;
        }
    }
    if let Some(source) = source {
        if let Some(pin) = graph.pin_flags_mut(source) {
            pin.selected = true;
        }
    }
    for handle in connectable {
        if let Some(pin) = graph.pin_flags_mut(handle) {
            pin.connectable = true;
        }
    }
    if let Some(handle) = hit.pin() {
        if let Some(pin) = graph.pin_flags_mut(handle) {
            pin.hovering = true;
        }
    }

    match hit {
        Hit::Arc(id) => {
            if let Some(arc) = graph.arc_mut(id) {
                arc.hovering = true;
            }
        }
        Hit::Anchor(id, end) => {
            if let Some(arc) = graph.arc_mut(id) {
                arc.anchor_mut(end).hovering = true;
            }
        }
        Hit::None | Hit::Node(_) | Hit::Pin(_) => {}
    }

    let dragged = anchor_drag.filter(|drag| graph.is_selected(SelectedItem::Arc(drag.arc)));
    for arc in graph.arcs_mut() {
        let end = dragged.filter(|drag| drag.arc == arc.id()).map(|drag| drag.end);
        arc.start.selected = end == Some(AnchorEnd::Start);
        arc.end.selected = end == Some(AnchorEnd::End);
    }
}
