//! Serializable form of a [`Graph`].
//!
//! Only persistent data is captured: transient flags, selection and layout
//! rectangles are rebuilt on load. Arcs are re-created through the normal
//! connection validation, so a snapshot cannot smuggle in an invalid graph.

use crate::error::{GraphError, Result};
use crate::geometry::Point;
use crate::graph::{ArcId, Graph, Node, NodeId, NodePin, View};
use crate::style::{color_serde, Style};
use crate::template::PinTemplate;
use serde::{Deserialize, Serialize};
use slint::Color;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub docs: String,
    #[serde(default)]
    pub icon: String,
    #[serde(with = "color_serde")]
    pub color: Color,
    pub position: Point,
    /// Pins in list order: flow inputs, flow outputs, data inputs, data outputs
    pub pins: Vec<PinTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSnapshot {
    pub id: ArcId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub docs: String,
    pub output: NodePin,
    pub input: NodePin,
    #[serde(default)]
    pub start_offset: Point,
    #[serde(default)]
    pub end_offset: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub id: String,
    pub name: String,
    #[serde(with = "color_serde")]
    pub background: Color,
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub style: Style,
    /// Front to back
    pub nodes: Vec<NodeSnapshot>,
    pub arcs: Vec<ArcSnapshot>,
}

impl NodeSnapshot {
    fn capture(node: &Node) -> Self {
        Self {
            id: node.id(),
            name: node.name.clone(),
            docs: node.docs.clone(),
            icon: node.icon.clone(),
            color: node.color,
            position: node.position(),
            pins: node
                .pins()
                .map(|(_, pin)| PinTemplate {
                    name: pin.name.clone(),
                    docs: pin.docs.clone(),
                    dtype: pin.dtype.clone(),
                    action: pin.action(),
                    stream: pin.stream(),
                    required: pin.required,
                })
                .collect(),
        }
    }

    fn restore(&self) -> Node {
        let template = crate::template::NodeTemplate {
            name: self.name.clone(),
            docs: self.docs.clone(),
            icon: self.icon.clone(),
            color: self.color,
            pins: self.pins.clone(),
        };
        template.instantiate(self.position)
    }
}

impl Graph {
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            background: self.background,
            view: self.view,
            style: self.style().clone(),
            nodes: self.nodes().iter().map(NodeSnapshot::capture).collect(),
            arcs: self
                .arcs()
                .iter()
                .map(|arc| ArcSnapshot {
                    id: arc.id(),
                    name: arc.name.clone(),
                    docs: arc.docs.clone(),
                    output: arc.output(),
                    input: arc.input(),
                    start_offset: arc.start.offset,
                    end_offset: arc.end.offset,
                })
                .collect(),
        }
    }

    /// Rebuild a graph, keeping node and arc ids and the node z-order.
    ///
    /// Fails with [`GraphError::InvalidSnapshot`] on duplicate ids or on an
    /// arc that does not pass connection validation.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Graph> {
        let mut graph = Graph::new(snapshot.id.clone(), snapshot.name.clone()).with_style(snapshot.style.clone());
        graph.background = snapshot.background;
        graph.view = snapshot.view;

        for node in &snapshot.nodes {
            if graph.node(node.id).is_some() {
                return Err(GraphError::InvalidSnapshot(format!("duplicate node id {}", node.id.0)));
            }
            let z_index = graph.nodes().len();
            graph.insert_node(node.restore(), node.id, z_index);
        }

        for arc in &snapshot.arcs {
            graph
                .connect_with_id(arc.output, arc.input, true, arc.id)
                .map_err(|err| GraphError::InvalidSnapshot(format!("arc {}: {}", arc.id.0, err)))?;
            if let Some(restored) = graph.arc_mut(arc.id) {
                restored.name = arc.name.clone();
                restored.docs = arc.docs.clone();
                restored.start.offset = arc.start_offset;
                restored.end.offset = arc.end_offset;
            }
        }
        graph.retessellate_all();

        debug!(nodes = graph.nodes().len(), arcs = graph.arcs().len(), "graph restored");
        Ok(graph)
    }
}
