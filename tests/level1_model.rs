//! Level 1: Graph Model Tests
//!
//! Node lifecycle, z-order and cascade deletion.

mod common;

use common::*;
use flowgraph_editor::{Graph, GraphError, NodeId, Point, SelectedItem};

#[test]
fn test_new_graph_is_empty() {
    let graph = Graph::new("g", "Empty");
    assert!(graph.nodes().is_empty());
    assert!(graph.arcs().is_empty());
    assert!(graph.selection().is_empty());
    assert_eq!(graph.bounds(), None);
}

#[test]
fn test_nodes_get_distinct_ids_and_newest_is_front() {
    let mut graph = Graph::default();
    let ids: Vec<NodeId> = (0..5)
        .map(|i| graph.add_node(flow_node("N", i as f64 * 200.0, 0.0)))
        .collect();

    let mut sorted = ids.clone();
    sorted.dedup();
    assert_eq!(sorted.len(), 5);
    let order: Vec<NodeId> = graph.nodes().iter().map(|n| n.id()).collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(order, expected);
}

#[test]
fn test_remove_node_twice_is_not_found() {
    let mut graph = Graph::default();
    let a = graph.add_node(flow_node("A", 0.0, 0.0));
    assert!(graph.remove_node(a).is_ok());
    assert_eq!(graph.remove_node(a).unwrap_err(), GraphError::NodeNotFound(a));
}

/// Node with two arcs is removed; arc count drops by two and the surviving
/// endpoints no longer reference them.
#[test]
fn test_cascade_delete_scenario() {
    let mut graph = Graph::default();
    let src = graph.add_node(flow_node("Src", 0.0, 0.0));
    let mid = graph.add_node(flow_node("Mid", 250.0, 0.0));
    let dst = graph.add_node(flow_node("Dst", 500.0, 0.0));
    let first = graph.connect_pins(flow_out(src), flow_in(mid), false).unwrap();
    let second = graph.connect_pins(flow_out(mid), flow_in(dst), false).unwrap();
    let unrelated = graph.connect_pins(flow_out(dst), flow_in(src), false).unwrap();
    assert_eq!(graph.arcs().len(), 3);

    graph.remove_node(mid).unwrap();

    assert_eq!(graph.arcs().len(), 1);
    assert!(graph.arc(unrelated).is_some());
    for pin in [flow_out(src), flow_in(dst)] {
        let arcs = graph.pin(pin).unwrap().arcs();
        assert!(!arcs.contains(&first) && !arcs.contains(&second));
    }
    assert_graph_consistent(&graph);
}

#[test]
fn test_bounds_cover_all_nodes() {
    let mut graph = Graph::default();
    let a = graph.add_node(flow_node("A", -100.0, -50.0));
    let b = graph.add_node(flow_node("B", 300.0, 400.0));
    let bounds = graph.bounds().unwrap();
    assert_eq!(bounds.origin(), Point::new(-100.0, -50.0));
    assert_eq!(bounds.max(), graph.node(b).unwrap().rect.max());
    assert!(bounds.contains(graph.node(a).unwrap().rect.center()));
}

#[test]
fn test_remove_selected_handles_mixed_selection() {
    let mut graph = Graph::default();
    let a = graph.add_node(flow_node("A", 0.0, 0.0));
    let b = graph.add_node(flow_node("B", 250.0, 0.0));
    let c = graph.add_node(flow_node("C", 500.0, 0.0));
    let ab = graph.connect_pins(flow_out(a), flow_in(b), false).unwrap();
    graph.connect_pins(flow_out(b), flow_in(c), false).unwrap();

    graph.select(SelectedItem::Arc(ab)).unwrap();
    graph.select(SelectedItem::Node(c)).unwrap();
    let (nodes, arcs) = graph.remove_selected();

    assert_eq!((nodes, arcs), (1, 2));
    assert!(graph.arcs().is_empty());
    assert!(graph.selection().is_empty());
    assert_graph_consistent(&graph);
}

#[test]
fn test_moving_nodes_keeps_arcs_attached() {
    let mut graph = Graph::default();
    let a = graph.add_node(flow_node("A", 0.0, 0.0));
    let b = graph.add_node(flow_node("B", 250.0, 0.0));
    let arc = graph.connect_pins(flow_out(a), flow_in(b), false).unwrap();

    graph.select(SelectedItem::Node(a)).unwrap();
    graph.select(SelectedItem::Node(b)).unwrap();
    graph.move_selected_nodes(Point::new(-40.0, 75.0));

    let polyline = graph.arc(arc).unwrap().polyline();
    assert_eq!(polyline[0], graph.pin(flow_out(a)).unwrap().connection_point());
    assert_eq!(
        *polyline.last().unwrap(),
        graph.pin(flow_in(b)).unwrap().connection_point()
    );
}

#[test]
fn test_selection_flag_follows_graph_selection_only() {
    let mut graph = Graph::default();
    let mut node = flow_node("A", 0.0, 0.0);
    node.selected = true;
    let a = graph.add_node(node);

    // A flag set before insertion does not leak into the graph
    assert!(!graph.node(a).unwrap().selected);
    assert!(!graph.is_selected(SelectedItem::Node(a)));
    graph.move_selected_nodes(Point::new(50.0, 0.0));
    assert_eq!(graph.node(a).unwrap().position(), Point::new(0.0, 0.0));

    let b = graph.add_node(flow_node("B", 300.0, 0.0));
    graph.connect_pins(flow_out(a), flow_in(b), false).unwrap();
    graph.select(SelectedItem::Node(b)).unwrap();
    assert!(graph.node(b).unwrap().selected);

    // Edit a removed node by hand and put it back
    let mut removed = graph.remove_node(b).unwrap();
    removed.rect.x += 500.0;
    removed.selected = true;
    let b = graph.add_node(removed);

    let node = graph.node(b).unwrap();
    assert!(!node.selected);
    assert!(!graph.is_selected(SelectedItem::Node(b)));
    assert_eq!(node.position(), Point::new(800.0, 0.0));
    assert!(node
        .pins()
        .all(|(_, pin)| node.rect.contains(pin.connection_point()) && !pin.is_connected()));
    assert_eq!(graph.remove_selected(), (0, 0));
    assert_graph_consistent(&graph);
}
