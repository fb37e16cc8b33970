use crate::error::{ConnectError, GraphError, Result};
use crate::geometry::{Point, Rect};
use crate::layout::layout_node;
use crate::links;
use crate::selection::SelectionManager;
use crate::style::Style;
use serde::{Deserialize, Serialize};
use slint::{Color, Model, VecModel};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Opaque handle of a [`Node`] inside its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Opaque handle of an [`Arc`] inside its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArcId(pub u32);

/// What a pin carries: control flow or a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Flow,
    Data,
}

/// Direction of a pin relative to its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stream {
    Input,
    Output,
}

/// Handle of a pin: the owning node plus the pin's slot in one of the node's
/// four pin lists.
///
/// Pins are created with their node and never added or removed afterwards,
/// so a `NodePin` stays valid for as long as its node exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePin {
    pub node: NodeId,
    pub action: Action,
    pub stream: Stream,
    pub index: usize,
}

impl NodePin {
    pub fn new(node: NodeId, action: Action, stream: Stream, index: usize) -> Self {
        Self { node, action, stream, index }
    }
}

/// Something that can be selected on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectedItem {
    Node(NodeId),
    Arc(ArcId),
}

/// A typed connection terminal on a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub name: String,
    pub docs: String,
    /// Type tag; connected pins must carry the same tag
    pub dtype: String,
    pub required: bool,
    action: Action,
    stream: Stream,
    arcs: Vec<ArcId>,
    /// Icon rectangle in world coordinates, set by the layout pass
    pub icon_rect: Rect,
    /// Label rectangle in world coordinates, set by the layout pass
    pub label_rect: Rect,
    pub hovering: bool,
    pub selected: bool,
    pub connectable: bool,
}

impl Pin {
    pub fn new(name: impl Into<String>, dtype: impl Into<String>, action: Action, stream: Stream) -> Self {
        Self {
            name: name.into(),
            docs: String::new(),
            dtype: dtype.into(),
            required: false,
            action,
            stream,
            arcs: Vec::new(),
            icon_rect: Rect::default(),
            label_rect: Rect::default(),
            hovering: false,
            selected: false,
            connectable: false,
        }
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    /// Arcs attached to this pin, in connection order
    pub fn arcs(&self) -> &[ArcId] {
        &self.arcs
    }

    pub fn is_connected(&self) -> bool {
        !self.arcs.is_empty()
    }

    /// World position where arcs attach (centre of the icon)
    pub fn connection_point(&self) -> Point {
        self.icon_rect.center()
    }

    pub(crate) fn translate(&mut self, delta: Point) {
        self.icon_rect = self.icon_rect.translated(delta);
        self.label_rect = self.label_rect.translated(delta);
    }
}

/// A placed node instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    pub name: String,
    pub docs: String,
    /// Emblem glyph drawn in the header
    pub icon: String,
    pub color: Color,
    /// Position and size in world coordinates
    pub rect: Rect,
    flow_inputs: Vec<Pin>,
    flow_outputs: Vec<Pin>,
    data_inputs: Vec<Pin>,
    data_outputs: Vec<Pin>,
    pub hovering: bool,
    pub selected: bool,
}

impl Node {
    /// Create a node without pins at `position` (top-left, world coordinates).
    ///
    /// The node receives its id when added to a [`Graph`]; its size is
    /// computed by the layout pass at that point.
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            id: NodeId(0),
            name: name.into(),
            docs: String::new(),
            icon: String::new(),
            color: Color::from_rgb_u8(70, 110, 160),
            rect: Rect::new(position.x, position.y, 0.0, 0.0),
            flow_inputs: Vec::new(),
            flow_outputs: Vec::new(),
            data_inputs: Vec::new(),
            data_outputs: Vec::new(),
            hovering: false,
            selected: false,
        }
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Add a pin, filing it under the list matching its action and stream.
    pub fn with_pin(mut self, pin: Pin) -> Self {
        self.push_pin(pin);
        self
    }

    /// Add a pin and return its slot index within its list.
    ///
    /// Any arcs carried by `pin` are dropped: arcs are only created through
    /// [`Graph::connect_pins`].
    pub(crate) fn push_pin(&mut self, mut pin: Pin) -> usize {
        pin.arcs.clear();
        let list = self.pin_list_mut(pin.action, pin.stream);
        list.push(pin);
        list.len() - 1
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.rect.origin()
    }

    pub fn flow_inputs(&self) -> &[Pin] {
        &self.flow_inputs
    }

    pub fn flow_outputs(&self) -> &[Pin] {
        &self.flow_outputs
    }

    pub fn data_inputs(&self) -> &[Pin] {
        &self.data_inputs
    }

    pub fn data_outputs(&self) -> &[Pin] {
        &self.data_outputs
    }

    pub fn pin_list(&self, action: Action, stream: Stream) -> &[Pin] {
        match (action, stream) {
            (Action::Flow, Stream::Input) => &self.flow_inputs,
            (Action::Flow, Stream::Output) => &self.flow_outputs,
            (Action::Data, Stream::Input) => &self.data_inputs,
            (Action::Data, Stream::Output) => &self.data_outputs,
        }
    }

    fn pin_list_mut(&mut self, action: Action, stream: Stream) -> &mut Vec<Pin> {
        match (action, stream) {
            (Action::Flow, Stream::Input) => &mut self.flow_inputs,
            (Action::Flow, Stream::Output) => &mut self.flow_outputs,
            (Action::Data, Stream::Input) => &mut self.data_inputs,
            (Action::Data, Stream::Output) => &mut self.data_outputs,
        }
    }

    /// All pins with their handles: flow inputs, flow outputs, data inputs,
    /// data outputs. This is also the hit-test order.
    pub fn pins(&self) -> impl Iterator<Item = (NodePin, &Pin)> + '_ {
        const ORDER: [(Action, Stream); 4] = [
            (Action::Flow, Stream::Input),
            (Action::Flow, Stream::Output),
            (Action::Data, Stream::Input),
            (Action::Data, Stream::Output),
        ];
        let id = self.id;
        ORDER.into_iter().flat_map(move |(action, stream)| {
            self.pin_list(action, stream)
                .iter()
                .enumerate()
                .map(move |(index, pin)| (NodePin::new(id, action, stream, index), pin))
        })
    }

    pub(crate) fn pins_mut(&mut self) -> impl Iterator<Item = &mut Pin> + '_ {
        self.flow_inputs
            .iter_mut()
            .chain(self.flow_outputs.iter_mut())
            .chain(self.data_inputs.iter_mut())
            .chain(self.data_outputs.iter_mut())
    }

    /// Input pins regardless of action (flow first)
    pub fn input_pins(&self) -> impl Iterator<Item = &Pin> + '_ {
        self.flow_inputs.iter().chain(self.data_inputs.iter())
    }

    /// Output pins regardless of action (flow first)
    pub fn output_pins(&self) -> impl Iterator<Item = &Pin> + '_ {
        self.flow_outputs.iter().chain(self.data_outputs.iter())
    }

    pub fn pin_count(&self) -> usize {
        self.flow_inputs.len() + self.flow_outputs.len() + self.data_inputs.len() + self.data_outputs.len()
    }

    pub fn pin(&self, handle: NodePin) -> Option<&Pin> {
        self.pin_list(handle.action, handle.stream).get(handle.index)
    }

    pub(crate) fn pin_mut(&mut self, handle: NodePin) -> Option<&mut Pin> {
        self.pin_list_mut(handle.action, handle.stream).get_mut(handle.index)
    }

    /// Every arc attached to any of this node's pins
    pub fn attached_arcs(&self) -> Vec<ArcId> {
        let mut arcs: Vec<ArcId> = self.pins().flat_map(|(_, pin)| pin.arcs.iter().copied()).collect();
        arcs.sort();
        arcs.dedup();
        arcs
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }

    pub(crate) fn translate(&mut self, delta: Point) {
        self.rect = self.rect.translated(delta);
        for pin in self.pins_mut() {
            pin.translate(delta);
        }
    }
}

/// Which end of an [`Arc`] an [`Anchor`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorEnd {
    Start,
    End,
}

/// Draggable re-routing handle at one end of an arc.
///
/// The anchor sits at its pin's connection point plus `offset`; the arc runs
/// straight from the pin to the anchor before curving.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub offset: Point,
    position: Point,
    pub selected: bool,
    pub hovering: bool,
}

impl Anchor {
    pub fn with_offset(offset: Point) -> Self {
        Self { offset, ..Self::default() }
    }

    /// World position, refreshed whenever the arc is re-tessellated
    pub fn position(&self) -> Point {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

/// A wire from one output pin to one input pin.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    id: ArcId,
    pub name: String,
    pub docs: String,
    output: NodePin,
    input: NodePin,
    pub start: Anchor,
    pub end: Anchor,
    polyline: Vec<Point>,
    pub hovering: bool,
    pub selected: bool,
}

impl Arc {
    fn new(id: ArcId, output: NodePin, input: NodePin) -> Self {
        Self {
            id,
            name: String::new(),
            docs: String::new(),
            output,
            input,
            start: Anchor::default(),
            end: Anchor::default(),
            polyline: Vec::new(),
            hovering: false,
            selected: false,
        }
    }

    pub fn id(&self) -> ArcId {
        self.id
    }

    /// Output-side endpoint
    pub fn output(&self) -> NodePin {
        self.output
    }

    /// Input-side endpoint
    pub fn input(&self) -> NodePin {
        self.input
    }

    pub fn anchor(&self, end: AnchorEnd) -> &Anchor {
        match end {
            AnchorEnd::Start => &self.start,
            AnchorEnd::End => &self.end,
        }
    }

    pub(crate) fn anchor_mut(&mut self, end: AnchorEnd) -> &mut Anchor {
        match end {
            AnchorEnd::Start => &mut self.start,
            AnchorEnd::End => &mut self.end,
        }
    }

    /// Tessellated route in world coordinates. Used for both drawing and
    /// distance hit-testing.
    pub fn polyline(&self) -> &[Point] {
        &self.polyline
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.output.node == node || self.input.node == node
    }

    pub(crate) fn set_polyline(&mut self, polyline: Vec<Point>) {
        self.polyline = polyline;
    }
}

/// Pan and zoom of the canvas looking at a graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub pan: Point,
    pub zoom: f64,
}

impl Default for View {
    fn default() -> Self {
        Self { pan: Point::ZERO, zoom: 1.0 }
    }
}

/// The editable flow-graph document.
///
/// Owns every [`Node`] and [`Arc`]. Nodes are kept in z-order: index 0 is the
/// frontmost node, hit-tested first and drawn last. Cross references (arc to
/// pin, pin to arc) are handles resolved through the graph.
#[derive(Debug, Clone)]
pub struct Graph {
    pub id: String,
    pub name: String,
    pub background: Color,
    pub view: View,
    style: Style,
    nodes: Vec<Node>,
    arcs: Vec<Arc>,
    selection: SelectionManager,
    next_node_id: u32,
    next_arc_id: u32,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("graph", "Untitled")
    }
}

impl Graph {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            background: Color::from_rgb_u8(30, 30, 34),
            view: View::default(),
            style: Style::default(),
            nodes: Vec::new(),
            arcs: Vec::new(),
            selection: SelectionManager::new(),
            next_node_id: 1,
            next_arc_id: 1,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.set_style(style);
        self
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replace the style, re-running layout and tessellation for everything.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
        for node in &mut self.nodes {
            layout_node(node, &self.style);
        }
        self.retessellate_all();
    }

    // === Queries ===

    /// Nodes front to back
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub(crate) fn arcs_mut(&mut self) -> &mut [Arc] {
        &mut self.arcs
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn arc(&self, id: ArcId) -> Option<&Arc> {
        self.arcs.iter().find(|a| a.id == id)
    }

    pub(crate) fn arc_mut(&mut self, id: ArcId) -> Option<&mut Arc> {
        self.arcs.iter_mut().find(|a| a.id == id)
    }

    pub fn pin(&self, handle: NodePin) -> Result<&Pin> {
        self.node(handle.node)
            .and_then(|n| n.pin(handle))
            .ok_or(GraphError::PinNotFound(handle))
    }

    fn pin_mut(&mut self, handle: NodePin) -> Result<&mut Pin> {
        self.node_mut(handle.node)
            .and_then(|n| n.pin_mut(handle))
            .ok_or(GraphError::PinNotFound(handle))
    }

    /// Z-order index of a node (0 = front)
    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// The arc if it is the only selected item of its kind
    pub fn sole_selected_arc(&self) -> Option<ArcId> {
        self.selection.sole_arc()
    }

    /// Bounding box of all nodes
    pub fn bounds(&self) -> Option<Rect> {
        self.nodes.iter().map(|n| n.rect).reduce(|acc, r| acc.union(&r))
    }

    // === Node lifecycle ===

    /// Add a node as the frontmost node and lay it out.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.insert_node(node, id, 0);
        id
    }

    pub(crate) fn insert_node(&mut self, mut node: Node, id: NodeId, z_index: usize) {
        node.set_id(id);
        node.hovering = false;
        node.selected = false;
        for pin in node.pins_mut() {
            pin.arcs.clear();
            pin.hovering = false;
            pin.selected = false;
            pin.connectable = false;
        }
        layout_node(&mut node, &self.style);
        self.next_node_id = self.next_node_id.max(id.0 + 1);
        let z_index = z_index.min(self.nodes.len());
        self.nodes.insert(z_index, node);
        debug!(node = id.0, "node added");
    }

    /// Remove a node and every arc attached to it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        let index = self.node_index(id).ok_or(GraphError::NodeNotFound(id))?;
        let attached = self.nodes[index].attached_arcs();
        for arc in &attached {
            self.remove_arc(*arc)?;
        }
        self.selection.remove(SelectedItem::Node(id));
        let node = self.nodes.remove(index);
        debug!(node = id.0, arcs = attached.len(), "node removed");
        Ok(node)
    }

    /// Move a node to the front of the z-order
    pub fn bring_to_front(&mut self, id: NodeId) -> Result<()> {
        let index = self.node_index(id).ok_or(GraphError::NodeNotFound(id))?;
        let node = self.nodes.remove(index);
        self.nodes.insert(0, node);
        Ok(())
    }

    // === Connections ===

    /// Validate two endpoints and return them as `(output, input)`.
    ///
    /// Checks, in order: different nodes, opposite streams, equal action,
    /// equal dtype, then the single-flow-continuation rule on the output and
    /// the single-data-source rule on the input.
    pub fn reorder_connectable_pins(&self, a: NodePin, b: NodePin) -> Result<(NodePin, NodePin)> {
        let pin_a = self.pin(a)?;
        let pin_b = self.pin(b)?;

        if a.node == b.node {
            return Err(ConnectError::SameNode.into());
        }
        if pin_a.stream == pin_b.stream {
            return Err(ConnectError::SameStream.into());
        }
        if pin_a.action != pin_b.action {
            return Err(ConnectError::ActionMismatch.into());
        }

        let ((output, out_pin), (input, in_pin)) = match (pin_a.stream, pin_b.stream) {
            (Stream::Output, Stream::Input) => ((a, pin_a), (b, pin_b)),
            (Stream::Input, Stream::Output) => ((b, pin_b), (a, pin_a)),
            (Stream::Input, Stream::Input) | (Stream::Output, Stream::Output) => {
                return Err(ConnectError::SameStream.into())
            }
        };

        if out_pin.dtype != in_pin.dtype {
            return Err(ConnectError::DtypeMismatch {
                output: out_pin.dtype.clone(),
                input: in_pin.dtype.clone(),
            }
            .into());
        }

        match out_pin.action {
            Action::Flow if out_pin.is_connected() => return Err(ConnectError::FanOutViolation.into()),
            Action::Flow | Action::Data => {}
        }
        match in_pin.action {
            Action::Data if in_pin.is_connected() => return Err(ConnectError::FanInViolation.into()),
            Action::Data | Action::Flow => {}
        }

        Ok((output, input))
    }

    /// Whether `a` and `b` could be connected right now.
    pub fn is_connectable(&self, a: NodePin, b: NodePin) -> bool {
        self.reorder_connectable_pins(a, b).is_ok()
    }

    /// Connect two pins with a new arc.
    ///
    /// The endpoints may be given in either order unless `no_reorder` is set,
    /// in which case `a` must be the output and `b` the input.
    pub fn connect_pins(&mut self, a: NodePin, b: NodePin, no_reorder: bool) -> Result<ArcId> {
        let id = ArcId(self.next_arc_id);
        let arc = self.connect_with_id(a, b, no_reorder, id)?;
        Ok(arc)
    }

    pub(crate) fn connect_with_id(
        &mut self,
        a: NodePin,
        b: NodePin,
        no_reorder: bool,
        id: ArcId,
    ) -> Result<ArcId> {
        let (output, input) = self.reorder_connectable_pins(a, b)?;
        if no_reorder && (output, input) != (a, b) {
            return Err(ConnectError::Reversed.into());
        }
        if self.arc(id).is_some() {
            return Err(GraphError::InvalidSnapshot(format!("duplicate arc id {}", id.0)));
        }

        self.pin_mut(output)?.arcs.push(id);
        self.pin_mut(input)?.arcs.push(id);
        let mut arc = Arc::new(id, output, input);
        arc.start.offset = Point::new(self.style.anchor_lead, 0.0);
        arc.end.offset = Point::new(-self.style.anchor_lead, 0.0);
        self.arcs.push(arc);
        self.next_arc_id = self.next_arc_id.max(id.0 + 1);
        self.retessellate_arc(id);
        debug!(arc = id.0, from = output.node.0, to = input.node.0, "pins connected");
        Ok(id)
    }

    /// Remove an arc and detach it from both of its pins.
    pub fn remove_arc(&mut self, id: ArcId) -> Result<Arc> {
        let index = self
            .arcs
            .iter()
            .position(|a| a.id == id)
            .ok_or(GraphError::ArcNotFound(id))?;
        let (output, input) = (self.arcs[index].output, self.arcs[index].input);
        for end in [output, input] {
            if let Ok(pin) = self.pin_mut(end) {
                pin.arcs.retain(|a| *a != id);
            }
        }
        self.selection.remove(SelectedItem::Arc(id));
        debug!(arc = id.0, "arc removed");
        Ok(self.arcs.remove(index))
    }

    /// Remove selected arcs, then selected nodes (with their arcs).
    ///
    /// Returns the number of removed nodes and arcs.
    pub fn remove_selected(&mut self) -> (usize, usize) {
        let before = self.arcs.len();
        let arcs: Vec<ArcId> = self.selection.arcs().collect();
        let nodes: Vec<NodeId> = self.selection.nodes().collect();
        for arc in arcs {
            let _ = self.remove_arc(arc);
        }
        let mut removed_nodes = 0;
        for node in nodes {
            if self.remove_node(node).is_ok() {
                removed_nodes += 1;
            }
        }
        (removed_nodes, before - self.arcs.len())
    }

    // === Movement ===

    /// Translate every selected node by `delta` (world units) and re-route
    /// the arcs attached to them.
    pub fn move_selected_nodes(&mut self, delta: Point) {
        let mut moved = HashSet::new();
        for node in self.nodes.iter_mut().filter(|n| n.selected) {
            node.translate(delta);
            moved.insert(node.id);
        }
        if !moved.is_empty() {
            self.retessellate_touching(&moved);
        }
    }

    /// Translate one node regardless of selection.
    pub fn move_node(&mut self, id: NodeId, delta: Point) -> Result<()> {
        let node = self.node_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        node.translate(delta);
        self.retessellate_touching(&HashSet::from([id]));
        Ok(())
    }

    /// Place an anchor so that it sits at `world` and re-route its arc.
    pub fn set_anchor_position(&mut self, id: ArcId, end: AnchorEnd, world: Point) -> Result<()> {
        let arc = self.arc(id).ok_or(GraphError::ArcNotFound(id))?;
        let pin = match end {
            AnchorEnd::Start => arc.output,
            AnchorEnd::End => arc.input,
        };
        let base = self.pin(pin)?.connection_point();
        if let Some(arc) = self.arc_mut(id) {
            arc.anchor_mut(end).offset = world - base;
        }
        self.retessellate_arc(id);
        Ok(())
    }

    // === Tessellation ===

    fn retessellate_arc(&mut self, id: ArcId) {
        let nodes = &self.nodes;
        let style = &self.style;
        if let Some(arc) = self.arcs.iter_mut().find(|a| a.id == id) {
            links::retessellate(nodes, arc, style);
        }
    }

    fn retessellate_touching(&mut self, moved: &HashSet<NodeId>) {
        let nodes = &self.nodes;
        let style = &self.style;
        let mut count = 0;
        for arc in self
            .arcs
            .iter_mut()
            .filter(|a| moved.contains(&a.output.node) || moved.contains(&a.input.node))
        {
            links::retessellate(nodes, arc, style);
            count += 1;
        }
        trace!(count, "arcs re-tessellated");
    }

    pub(crate) fn retessellate_all(&mut self) {
        let nodes = &self.nodes;
        let style = &self.style;
        for arc in &mut self.arcs {
            links::retessellate(nodes, arc, style);
        }
    }

    // === Selection ===

    fn set_selected_flag(&mut self, item: SelectedItem, selected: bool) -> Result<()> {
        match item {
            SelectedItem::Node(id) => {
                self.node_mut(id).ok_or(GraphError::NodeNotFound(id))?.selected = selected;
            }
            SelectedItem::Arc(id) => {
                let arc = self.arc_mut(id).ok_or(GraphError::ArcNotFound(id))?;
                arc.selected = selected;
                if !selected {
                    arc.start.selected = false;
                    arc.end.selected = false;
                }
            }
        }
        if selected {
            self.selection.insert(item);
        } else {
            self.selection.remove(item);
        }
        Ok(())
    }

    pub fn is_selected(&self, item: SelectedItem) -> bool {
        self.selection.contains(item)
    }

    pub fn select(&mut self, item: SelectedItem) -> Result<()> {
        self.set_selected_flag(item, true)
    }

    pub fn unselect(&mut self, item: SelectedItem) -> Result<()> {
        self.set_selected_flag(item, false)
    }

    pub fn flip_select(&mut self, item: SelectedItem) -> Result<()> {
        let selected = self.selection.contains(item);
        self.set_selected_flag(item, !selected)
    }

    /// Clear every selection, then select `item`.
    pub fn select_only(&mut self, item: SelectedItem) -> Result<()> {
        match item {
            SelectedItem::Node(id) if self.node(id).is_none() => return Err(GraphError::NodeNotFound(id)),
            SelectedItem::Arc(id) if self.arc(id).is_none() => return Err(GraphError::ArcNotFound(id)),
            _ => {}
        }
        self.unselect_all();
        self.select(item)
    }

    pub fn unselect_all(&mut self) {
        for node in &mut self.nodes {
            node.selected = false;
            for pin in node.pins_mut() {
                pin.selected = false;
            }
        }
        for arc in &mut self.arcs {
            arc.selected = false;
            arc.start.selected = false;
            arc.end.selected = false;
        }
        self.selection.clear();
    }

    /// Make exactly `ids` the selected nodes; arcs are unselected.
    pub fn select_nodes_exactly(&mut self, ids: &HashSet<NodeId>) {
        self.unselect_all();
        for node in &mut self.nodes {
            node.selected = ids.contains(&node.id);
        }
        self.selection
            .replace_nodes(self.nodes.iter().filter(|n| n.selected).map(|n| n.id));
    }

    /// Apply a click on `item`: with `toggle` flip it, otherwise collapse the
    /// selection to it.
    pub fn click_select(&mut self, item: SelectedItem, toggle: bool) -> Result<()> {
        match item {
            SelectedItem::Node(id) if self.node(id).is_none() => return Err(GraphError::NodeNotFound(id)),
            SelectedItem::Arc(id) if self.arc(id).is_none() => return Err(GraphError::ArcNotFound(id)),
            _ => {}
        }
        self.selection.handle_interaction(item, toggle);
        self.sync_selection_flags();
        Ok(())
    }

    /// Publish the selected node ids to a Slint model.
    pub fn selection_to_model(&self, model: &VecModel<i32>) {
        self.selection.sync_to_model(model);
    }

    /// Adopt the node selection held by a Slint model. Unknown ids are dropped.
    pub fn selection_from_model(&mut self, model: &dyn Model<Data = i32>) {
        self.selection.sync_from_model(model);
        let known: HashSet<NodeId> = self.selection.nodes().filter(|id| self.node(*id).is_some()).collect();
        self.select_nodes_exactly(&known);
    }

    fn sync_selection_flags(&mut self) {
        for node in &mut self.nodes {
            node.selected = self.selection.contains(SelectedItem::Node(node.id));
        }
        for arc in &mut self.arcs {
            arc.selected = self.selection.contains(SelectedItem::Arc(arc.id));
            if !arc.selected {
                arc.start.selected = false;
                arc.end.selected = false;
            }
        }
    }

    // === Transient state ===

    /// Reset every hovering/connectable flag. Selection is left alone.
    pub fn clear_transient_state(&mut self) {
        for node in &mut self.nodes {
            node.hovering = false;
            for pin in node.pins_mut() {
                pin.hovering = false;
                pin.connectable = false;
            }
        }
        for arc in &mut self.arcs {
            arc.hovering = false;
            arc.start.hovering = false;
            arc.end.hovering = false;
        }
    }

    pub(crate) fn pin_flags_mut(&mut self, handle: NodePin) -> Option<&mut Pin> {
        self.pin_mut(handle).ok()
    }
}
