//! # Flow-Graph Editor Core
//!
//! Data model and interaction engine for visual flow-graph editors: nodes
//! with typed input/output pins, wired together by curved arcs and edited
//! with a pointer.
//!
//! ## Features
//!
//! - **Validated connections** - Flow/data pins, dtype matching and fan-in/fan-out rules
//! - **Arena + handles** - Nodes and arcs are owned by the [`Graph`]; cross references are ids
//! - **Immediate-mode friendly** - One [`CanvasController::update`] call per frame returns draw commands
//! - **Single polyline** - Arcs are tessellated once and the same polyline is drawn and hit-tested
//! - **Backend agnostic** - Output is a list of [`DrawCommand`]s in screen coordinates
//!
//! ## Quick Start
//!
//! ```ignore
//! use flowgraph_editor::*;
//!
//! let mut graph = Graph::new("main", "Main");
//! let a = graph.add_node(
//!     Node::new("Start", Point::new(0.0, 0.0))
//!         .with_pin(Pin::new("next", "", Action::Flow, Stream::Output)),
//! );
//! let b = graph.add_node(
//!     Node::new("Print", Point::new(250.0, 0.0))
//!         .with_pin(Pin::new("exec", "", Action::Flow, Stream::Input)),
//! );
//! graph.connect_pins(
//!     NodePin::new(a, Action::Flow, Stream::Output, 0),
//!     NodePin::new(b, Action::Flow, Stream::Input, 0),
//!     false,
//! )?;
//!
//! let mut ctrl = CanvasController::new(graph, EditorConfig::default());
//! let commands = ctrl.update(&FrameInput::new(Rect::new(0.0, 0.0, 800.0, 600.0)));
//! ```
//!
//! ## Modules
//!
//! - [`graph`] - [`Graph`], [`Node`], [`Pin`], [`Arc`] and connection validation
//! - [`hit_test`] - What is under the pointer
//! - [`controller`] - Pan/zoom and the interaction state machine
//! - [`path`] / [`links`] - Bezier routing and adaptive tessellation
//! - [`render`] / [`grid`] - Draw-command generation
//! - [`template`] / [`snapshot`] - Node catalog and serializable graph form

pub mod controller;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod input;
pub mod layout;
pub mod links;
pub mod path;
pub mod render;
pub mod selection;
pub mod snapshot;
pub mod state;
pub mod style;
pub mod template;

pub use controller::CanvasController;
pub use error::{ConnectError, GraphError, Result};
pub use geometry::{distance_to_polyline, point_in_circle, Point, Rect, ViewTransform};
pub use graph::{
    Action, Anchor, AnchorEnd, Arc, ArcId, Graph, Node, NodeId, NodePin, Pin, SelectedItem, Stream, View,
};
pub use grid::grid_lines;
pub use hit_test::{nodes_in_selection_box, Hit, HitTester};
pub use input::{Buttons, FrameInput, Modifiers, PointerTracker};
pub use layout::layout_node;
pub use links::pending_wire;
pub use path::{tessellate_route, CubicBezier};
pub use render::{build_frame, DrawCommand, Overlay};
pub use selection::SelectionManager;
pub use snapshot::{ArcSnapshot, GraphSnapshot, NodeSnapshot};
pub use state::{AnchorDrag, InteractionState};
pub use style::{EditorConfig, Style};
pub use template::{NodeTemplate, PinTemplate, TemplateRegistry};
