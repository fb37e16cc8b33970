//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use flowgraph_editor::{Action, Graph, Node, NodeId, NodePin, Pin, Point, Stream};

/// Node with one flow input and one flow output.
pub fn flow_node(name: &str, x: f64, y: f64) -> Node {
    Node::new(name, Point::new(x, y))
        .with_pin(Pin::new("exec", "", Action::Flow, Stream::Input))
        .with_pin(Pin::new("then", "", Action::Flow, Stream::Output))
}

/// Node with one data input and one data output of `dtype`.
pub fn data_node(name: &str, x: f64, y: f64, dtype: &str) -> Node {
    Node::new(name, Point::new(x, y))
        .with_pin(Pin::new("value", dtype, Action::Data, Stream::Input))
        .with_pin(Pin::new("result", dtype, Action::Data, Stream::Output))
}

pub fn flow_out(node: NodeId) -> NodePin {
    NodePin::new(node, Action::Flow, Stream::Output, 0)
}

pub fn flow_in(node: NodeId) -> NodePin {
    NodePin::new(node, Action::Flow, Stream::Input, 0)
}

pub fn data_out(node: NodeId) -> NodePin {
    NodePin::new(node, Action::Data, Stream::Output, 0)
}

pub fn data_in(node: NodeId) -> NodePin {
    NodePin::new(node, Action::Data, Stream::Input, 0)
}

/// Check the arc bookkeeping invariants of a graph: every arc is listed on
/// exactly its two pins, endpoints are compatible, fan rules hold.
pub fn assert_graph_consistent(graph: &Graph) {
    for arc in graph.arcs() {
        let output = graph.pin(arc.output()).expect("output pin resolves");
        let input = graph.pin(arc.input()).expect("input pin resolves");
        assert_eq!(output.stream(), Stream::Output);
        assert_eq!(input.stream(), Stream::Input);
        assert_eq!(output.action(), input.action());
        assert_eq!(output.dtype, input.dtype);
        assert_eq!(output.arcs().iter().filter(|a| **a == arc.id()).count(), 1);
        assert_eq!(input.arcs().iter().filter(|a| **a == arc.id()).count(), 1);
    }
    for node in graph.nodes() {
        for (handle, pin) in node.pins() {
            assert_eq!(handle.stream, pin.stream());
            assert_eq!(handle.action, pin.action());
            for id in pin.arcs() {
                let arc = graph.arc(*id).expect("pin references live arc");
                assert!(arc.output() == handle || arc.input() == handle);
            }
            match (pin.action(), pin.stream()) {
                (Action::Flow, Stream::Output) | (Action::Data, Stream::Input) => {
                    assert!(pin.arcs().len() <= 1)
                }
                _ => {}
            }
        }
    }
}
