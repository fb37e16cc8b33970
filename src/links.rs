//! Arc routing.
//!
//! Resolves an arc's endpoints to pin connection points, places its anchors
//! and tessellates the route into the polyline cached on the [`Arc`]. The
//! same polyline is drawn and hit-tested, so what the user sees is what the
//! pointer hits.

use crate::geometry::Point;
use crate::graph::{Arc, Node, NodePin, Stream};
use crate::path::tessellate_route;
use crate::style::Style;

fn connection_point(nodes: &[Node], handle: NodePin) -> Option<Point> {
    nodes
        .iter()
        .find(|n| n.id() == handle.node)
        .and_then(|n| n.pin(handle))
        .map(|p| p.connection_point())
}

/// Recompute anchor positions and the polyline of `arc`.
///
/// An arc whose endpoints cannot be resolved keeps an empty polyline and is
/// therefore neither drawn nor hit.
pub(crate) fn retessellate(nodes: &[Node], arc: &mut Arc, style: &Style) {
    let (Some(from), Some(to)) = (
        connection_point(nodes, arc.output()),
        connection_point(nodes, arc.input()),
    ) else {
        arc.set_polyline(Vec::new());
        return;
    };

    let start = from + arc.start.offset;
    let end = to + arc.end.offset;
    arc.start.set_position(start);
    arc.end.set_position(end);
    arc.set_polyline(tessellate_route(
        from,
        start,
        end,
        to,
        style.bezier_curvature,
        style.bezier_min_offset,
        style.tessellation_tolerance,
    ));
}

/// Polyline of the wire drawn while a connection is being dragged.
///
/// `source` is the pin the drag started on and `pointer` the current world
/// position of the pointer. The curve always leaves an output to the right,
/// so a drag from an input pin is routed from the pointer to the pin.
pub fn pending_wire(source: Point, source_stream: Stream, pointer: Point, style: &Style) -> Vec<Point> {
    let (from, to) = match source_stream {
        Stream::Output => (source, pointer),
        Stream::Input => (pointer, source),
    };
    tessellate_route(
        from,
        from,
        to,
        to,
        style.bezier_curvature,
        style.bezier_min_offset,
        style.tessellation_tolerance,
    )
}
