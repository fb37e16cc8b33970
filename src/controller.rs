//! Interactive canvas controller.
//!
//! [`CanvasController`] owns a [`Graph`] for one editing session. The host
//! calls [`CanvasController::update`] once per frame with raw input and gets
//! back the draw commands for that frame.
//!
//! # Example
//!
//! ```ignore
//! use flowgraph_editor::{CanvasController, EditorConfig, FrameInput, Graph};
//!
//! let mut ctrl = CanvasController::new(Graph::default(), EditorConfig::default());
//!
//! // Every frame
//! let input = FrameInput::new(canvas_rect)
//!     .at(pointer)
//!     .with_left(left_down)
//!     .with_scroll(wheel_ticks);
//! for command in ctrl.update(&input) {
//!     backend.draw(command);
//! }
//! ```

use crate::error::Result;
use crate::geometry::{Point, Rect, ViewTransform};
use crate::graph::{Graph, NodeId, SelectedItem};
use crate::hit_test::{nodes_in_selection_box, Hit, HitTester};
use crate::input::{FrameInput, PointerFrame, PointerTracker};
use crate::links::pending_wire;
use crate::render::{build_frame, DrawCommand, Overlay};
use crate::state::{apply_transient_flags, AnchorDrag, InteractionState};
use crate::style::EditorConfig;
use crate::template::TemplateRegistry;
use tracing::{debug, trace};

/// Screen margin kept around the graph by [`CanvasController::frame_all`].
const FRAME_MARGIN: f64 = 40.0;

/// Pan/zoom view state plus the interaction state machine for one graph.
#[derive(Debug)]
pub struct CanvasController {
    graph: Graph,
    config: EditorConfig,
    state: InteractionState,
    anchor_drag: Option<AnchorDrag>,
    tracker: PointerTracker,
    /// What was under the pointer when the left button went down
    press_hit: Hit,
    hit: Hit,
    panning: bool,
    canvas: Rect,
    pointer_world: Point,
}

impl CanvasController {
    pub fn new(graph: Graph, config: EditorConfig) -> Self {
        Self {
            graph,
            config,
            state: InteractionState::Normal,
            anchor_drag: None,
            tracker: PointerTracker::new(),
            press_hit: Hit::None,
            hit: Hit::None,
            panning: false,
            canvas: Rect::default(),
            pointer_world: Point::ZERO,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Direct access to the document. Transient flags are re-derived on the
    /// next [`update`](Self::update).
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// End the session and hand the graph back.
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// What was under the pointer during the last update
    pub fn hit(&self) -> Hit {
        self.hit
    }

    pub fn anchor_drag(&self) -> Option<AnchorDrag> {
        self.anchor_drag
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn zoom(&self) -> f64 {
        self.graph.view.zoom
    }

    pub fn pan(&self) -> Point {
        self.graph.view.pan
    }

    /// Set the zoom factor, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.graph.view.zoom = self.config.clamp_zoom(zoom);
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.graph.view.pan = pan;
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform::new(self.canvas.origin(), self.graph.view.pan, self.graph.view.zoom)
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.transform().screen_to_world(screen)
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.transform().world_to_screen(world)
    }

    // === Per-frame update ===

    /// Process one frame of input and return that frame's draw commands.
    pub fn update(&mut self, input: &FrameInput) -> Vec<DrawCommand> {
        self.canvas = input.canvas;
        let frame = self.tracker.update(input, self.config.drag_threshold);

        if input.scroll.is_finite() && input.scroll != 0.0 && input.pointer_over_canvas() {
            self.zoom_at(input.pointer, input.scroll);
        }

        let was_panning = self.panning;
        self.panning = input.buttons.middle || (input.modifiers.alt && input.buttons.left);
        if self.panning && was_panning {
            let zoom = self.zoom();
            self.graph.view.pan += frame.delta / zoom;
        }

        let transform = self.transform();
        self.pointer_world = transform.screen_to_world(input.pointer);
        self.hit = if input.pointer_over_canvas() || self.tracker.is_dragging() {
            HitTester::for_zoom(&self.config, self.zoom()).hit(&self.graph, self.pointer_world)
        } else {
            Hit::None
        };
        if frame.left_pressed {
            self.press_hit = self.hit;
        }

        if input.modifiers.alt {
            // Pan mode: no selection, movement or connection
            self.cancel();
        } else if !input.buttons.middle {
            self.step(input, &frame);
        }

        apply_transient_flags(&mut self.graph, self.hit, &self.state, self.anchor_drag);
        self.draw()
    }

    /// Draw commands for the current state without processing input.
    pub fn draw(&self) -> Vec<DrawCommand> {
        let transform = self.transform();
        let overlay = Overlay {
            pending_wire: self.state.connection_source().and_then(|source| {
                let pin = self.graph.pin(source).ok()?;
                Some(pending_wire(
                    pin.connection_point(),
                    source.stream,
                    self.pointer_world,
                    self.graph.style(),
                ))
            }),
            selection_box: self.state.selection_rect(),
        };
        build_frame(&self.graph, &transform, &self.canvas, &self.config, &overlay)
    }

    fn set_state(&mut self, state: InteractionState) {
        if self.state != state {
            if std::mem::discriminant(&self.state) != std::mem::discriminant(&state) {
                debug!(from = self.state.name(), to = state.name(), "interaction state changed");
            }
            self.state = state;
        }
    }

    /// Drop any gesture in progress and return to [`InteractionState::Normal`].
    pub fn cancel(&mut self) {
        self.anchor_drag = None;
        self.set_state(InteractionState::Normal);
    }

    fn step(&mut self, input: &FrameInput, frame: &PointerFrame) {
        let zoom = self.zoom();
        match self.state {
            InteractionState::Normal => self.step_normal(input, frame),
            InteractionState::NodeMoving => {
                if frame.dragging {
                    self.graph.move_selected_nodes(frame.delta / zoom);
                }
                if !input.buttons.left {
                    self.set_state(InteractionState::Normal);
                }
            }
            InteractionState::PinConnecting { source } => {
                if !input.buttons.left {
                    if let Hit::Pin(target) = self.hit {
                        if target.node != source.node {
                            match self.graph.connect_pins(source, target, false) {
                                Ok(arc) => debug!(arc = arc.0, "connection created"),
                                Err(err) => debug!(%err, "connection rejected"),
                            }
                        }
                    }
                    self.set_state(InteractionState::Normal);
                }
            }
            InteractionState::SelectionBox { origin, .. } => {
                if input.buttons.left {
                    self.set_state(InteractionState::SelectionBox {
                        origin,
                        current: input.pointer,
                    });
                    self.apply_box_selection();
                } else {
                    self.set_state(InteractionState::Normal);
                }
            }
        }
    }

    fn step_normal(&mut self, input: &FrameInput, frame: &PointerFrame) {
        if frame.drag_started {
            self.start_drag(input, frame);
        } else if frame.dragging {
            if let Some(drag) = self.anchor_drag {
                let _ = self.graph.set_anchor_position(drag.arc, drag.end, self.pointer_world);
            }
        }

        if frame.clicked {
            self.click(input.modifiers.ctrl);
        }
        if frame.left_released {
            self.anchor_drag = None;
        }
    }

    fn start_drag(&mut self, input: &FrameInput, frame: &PointerFrame) {
        let origin = frame.press_origin.unwrap_or(input.pointer);
        match self.press_hit {
            Hit::Anchor(arc, end) => {
                trace!(arc = arc.0, ?end, "anchor drag started");
                self.anchor_drag = Some(AnchorDrag { arc, end });
                let _ = self.graph.set_anchor_position(arc, end, self.pointer_world);
            }
            Hit::Pin(source) => {
                self.set_state(InteractionState::PinConnecting { source });
            }
            Hit::Node(node) => {
                if !self.graph.is_selected(SelectedItem::Node(node)) {
                    let _ = self.graph.select_only(SelectedItem::Node(node));
                }
                self.set_state(InteractionState::NodeMoving);
                // Catch up with the travel spent crossing the drag threshold
                self.graph.move_selected_nodes((input.pointer - origin) / self.zoom());
            }
            Hit::Arc(_) | Hit::None => {
                self.set_state(InteractionState::SelectionBox {
                    origin,
                    current: input.pointer,
                });
                self.apply_box_selection();
            }
        }
    }

    /// Left button released without a drag.
    fn click(&mut self, ctrl: bool) {
        let item = match self.hit {
            Hit::Node(node) => Some(SelectedItem::Node(node)),
            Hit::Pin(pin) => Some(SelectedItem::Node(pin.node)),
            Hit::Arc(arc) => Some(SelectedItem::Arc(arc)),
            Hit::Anchor(..) => return,
            Hit::None => None,
        };
        match (item, ctrl) {
            (Some(item), true) => {
                let _ = self.graph.flip_select(item);
            }
            (Some(item), false) => {
                let _ = self.graph.select_only(item);
            }
            (None, true) => {}
            (None, false) => self.graph.unselect_all(),
        }
    }

    fn apply_box_selection(&mut self) {
        if let Some(rect) = self.state.selection_rect() {
            let world = self.transform().rect_to_world(&rect);
            let nodes = nodes_in_selection_box(&self.graph, &world);
            self.graph.select_nodes_exactly(&nodes);
        }
    }

    /// Change zoom by `ticks` steps keeping the world point under `pointer`
    /// fixed on screen. Non-finite `ticks` are ignored.
    pub fn zoom_at(&mut self, pointer: Point, ticks: f64) {
        if !ticks.is_finite() {
            return;
        }
        let before = self.screen_to_world(pointer);
        let zoom = self.config.clamp_zoom(self.zoom() + ticks * self.config.zoom_step);
        self.graph.view.zoom = zoom;
        self.graph.view.pan = (pointer - self.canvas.origin()) / zoom - before;
        trace!(zoom, "zoom changed");
    }

    // === Commands ===

    /// Remove all selected arcs and nodes.
    pub fn delete_selected(&mut self) -> (usize, usize) {
        self.cancel();
        let removed = self.graph.remove_selected();
        debug!(nodes = removed.0, arcs = removed.1, "selection deleted");
        removed
    }

    /// Instantiate `kind` from `registry` with its top-left corner at the
    /// screen position `at`.
    pub fn add_node_from_template(&mut self, registry: &TemplateRegistry, kind: &str, at: Point) -> Result<NodeId> {
        let node = registry.instantiate(kind, self.screen_to_world(at))?;
        Ok(self.graph.add_node(node))
    }

    /// Fit every node into the canvas.
    pub fn frame_all(&mut self) {
        let Some(bounds) = self.graph.bounds() else {
            return;
        };
        if self.canvas.width <= 0.0 || self.canvas.height <= 0.0 {
            return;
        }
        let avail_w = (self.canvas.width - 2.0 * FRAME_MARGIN).max(1.0);
        let avail_h = (self.canvas.height - 2.0 * FRAME_MARGIN).max(1.0);
        let fit = (avail_w / bounds.width.max(1.0)).min(avail_h / bounds.height.max(1.0));
        let zoom = self.config.clamp_zoom(fit);
        self.graph.view.zoom = zoom;
        self.graph.view.pan = (self.canvas.center() - self.canvas.origin()) / zoom - bounds.center();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Action, Node, NodePin, Pin, Stream};

    const CANVAS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    fn input(x: f64, y: f64, left: bool) -> FrameInput {
        FrameInput::new(CANVAS).at(Point::new(x, y)).with_left(left)
    }

    fn controller() -> (CanvasController, NodeId, NodeId) {
        let mut graph = Graph::default();
        let a = graph.add_node(
            Node::new("A", Point::new(100.0, 100.0))
                .with_pin(Pin::new("out", "", Action::Flow, Stream::Output)),
        );
        let b = graph.add_node(
            Node::new("B", Point::new(400.0, 100.0))
                .with_pin(Pin::new("in", "", Action::Flow, Stream::Input)),
        );
        let mut ctrl = CanvasController::new(graph, EditorConfig::default());
        ctrl.update(&input(0.0, 0.0, false));
        (ctrl, a, b)
    }

    fn header(ctrl: &CanvasController, node: NodeId) -> Point {
        ctrl.world_to_screen(ctrl.graph().node(node).unwrap().position() + Point::new(5.0, 5.0))
    }

    #[test]
    fn test_click_selects_node_then_empty_clears() {
        let (mut ctrl, a, _) = controller();
        let p = header(&ctrl, a);
        ctrl.update(&input(p.x, p.y, true));
        ctrl.update(&input(p.x, p.y, false));
        assert!(ctrl.graph().node(a).unwrap().selected);

        ctrl.update(&input(700.0, 500.0, true));
        ctrl.update(&input(700.0, 500.0, false));
        assert!(ctrl.graph().selection().is_empty());
    }

    #[test]
    fn test_drag_node_moves_it_by_pointer_travel() {
        let (mut ctrl, a, _) = controller();
        let p = header(&ctrl, a);
        ctrl.update(&input(p.x, p.y, true));
        ctrl.update(&input(p.x + 10.0, p.y, true));
        assert_eq!(*ctrl.state(), InteractionState::NodeMoving);
        ctrl.update(&input(p.x + 30.0, p.y + 20.0, true));
        ctrl.update(&input(p.x + 30.0, p.y + 20.0, false));

        assert!(ctrl.state().is_normal());
        assert_eq!(ctrl.graph().node(a).unwrap().position(), Point::new(130.0, 120.0));
    }

    #[test]
    fn test_pin_drag_connects() {
        let (mut ctrl, a, b) = controller();
        let out = NodePin::new(a, Action::Flow, Stream::Output, 0);
        let inp = NodePin::new(b, Action::Flow, Stream::Input, 0);
        let from = ctrl.world_to_screen(ctrl.graph().pin(out).unwrap().connection_point());
        let to = ctrl.world_to_screen(ctrl.graph().pin(inp).unwrap().connection_point());

        ctrl.update(&input(from.x, from.y, true));
        ctrl.update(&input(from.x + 50.0, from.y, true));
        assert_eq!(ctrl.state().connection_source(), Some(out));
        let commands = ctrl.update(&input(to.x, to.y, true));
        assert!(commands.iter().any(|c| matches!(c, DrawCommand::Polyline { .. })));
        ctrl.update(&input(to.x, to.y, false));

        assert!(ctrl.state().is_normal());
        assert_eq!(ctrl.graph().arcs().len(), 1);
        assert_eq!(ctrl.graph().arcs()[0].output(), out);
    }

    #[test]
    fn test_scroll_zoom_keeps_point_under_pointer() {
        let (mut ctrl, _, _) = controller();
        let pointer = Point::new(300.0, 200.0);
        let before = ctrl.screen_to_world(pointer);
        ctrl.update(&FrameInput::new(CANVAS).at(pointer).with_scroll(3.0));
        assert!((ctrl.zoom() - 1.3).abs() < 1e-9);
        assert!(ctrl.screen_to_world(pointer).distance_to(before) < 1e-9);
    }

    #[test]
    fn test_middle_drag_pans() {
        let (mut ctrl, _, _) = controller();
        ctrl.update(&FrameInput::new(CANVAS).at(Point::new(100.0, 100.0)).with_middle(true));
        ctrl.update(&FrameInput::new(CANVAS).at(Point::new(150.0, 80.0)).with_middle(true));
        assert_eq!(ctrl.pan(), Point::new(50.0, -20.0));
        assert!(ctrl.state().is_normal());
    }

    #[test]
    fn test_alt_drag_pans_instead_of_moving() {
        let (mut ctrl, a, _) = controller();
        let p = header(&ctrl, a);
        ctrl.update(&input(p.x, p.y, true).with_alt(true));
        ctrl.update(&input(p.x + 40.0, p.y, true).with_alt(true));
        ctrl.update(&input(p.x + 40.0, p.y, false).with_alt(true));
        assert_eq!(ctrl.graph().node(a).unwrap().position(), Point::new(100.0, 100.0));
        assert_eq!(ctrl.pan(), Point::new(40.0, 0.0));
        assert!(!ctrl.graph().node(a).unwrap().selected);
    }

    #[test]
    fn test_delete_selected() {
        let (mut ctrl, a, _) = controller();
        ctrl.graph_mut().select(SelectedItem::Node(a)).unwrap();
        assert_eq!(ctrl.delete_selected(), (1, 0));
        assert_eq!(ctrl.graph().nodes().len(), 1);
    }

    #[test]
    fn test_add_node_from_template_uses_world_position() {
        let (mut ctrl, _, _) = controller();
        ctrl.set_zoom(2.0);
        let mut registry = TemplateRegistry::new();
        registry.register(
            "print",
            crate::template::NodeTemplate::new("Print", slint::Color::from_rgb_u8(1, 2, 3)),
        );
        let id = ctrl
            .add_node_from_template(&registry, "print", Point::new(200.0, 100.0))
            .unwrap();
        assert_eq!(ctrl.graph().node(id).unwrap().position(), Point::new(100.0, 50.0));
        assert!(ctrl.add_node_from_template(&registry, "nope", Point::ZERO).is_err());
    }

    #[test]
    fn test_frame_all_brings_nodes_into_view() {
        let (mut ctrl, _, _) = controller();
        ctrl.set_pan(Point::new(-5000.0, 3000.0));
        ctrl.frame_all();
        let bounds = ctrl.graph().bounds().unwrap();
        let screen = ctrl.transform().rect_to_screen(&bounds);
        assert!(CANVAS.contains(screen.origin()));
        assert!(CANVAS.contains(screen.max()));
    }
}
