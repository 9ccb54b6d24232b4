use log::debug;
use ndarray::Array2;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use unordered_pair::UnorderedPair;

use crate::grid::Grid;
use crate::location::Location;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum FlowNode {
    Source,
    Sink,
    Cell(Location),
}

/// One directed arc of the residual graph. `residual` is the remaining capacity and is the
/// only state the solver mutates.
#[derive(Copy, Clone, Debug)]
pub(crate) struct FlowArc {
    pub(crate) residual: i64,
    pub(crate) cost: i64,
}

/// The bipartite flow network derived from a grid for one solve, discarded afterwards.
pub(crate) struct FlowNetwork {
    pub(crate) graph: DiGraph<FlowNode, FlowArc>,
    pub(crate) source: NodeIndex,
    pub(crate) sink: NodeIndex,
}

/// The reverse residual counterpart of `arc`.
///
/// Arcs are always inserted in forward/reverse pairs and never removed, so the partner of an
/// arc is found by flipping the low bit of its index.
pub(crate) fn reverse_of(arc: EdgeIndex) -> EdgeIndex {
    EdgeIndex::new(arc.index() ^ 1)
}

fn add_arc(graph: &mut DiGraph<FlowNode, FlowArc>, from: NodeIndex, to: NodeIndex, cost: i64) {
    graph.add_edge(from, to, FlowArc { residual: 1, cost });
    graph.add_edge(to, from, FlowArc { residual: 0, cost: -cost });
}

impl FlowNetwork {
    /// Build the network: source and sink, one node per non-black cell, unit arcs
    /// `source -> even cell` and `odd cell -> sink` at cost 0, and a unit arc
    /// `even cell -> odd cell` at cost `-gain` for every valid pair.
    pub(crate) fn from_grid(grid: &Grid) -> Self {
        let (n, m) = (grid.n(), grid.m());
        // naively allocate for a fully pairable grid, which usually isn't too far off
        let mut graph = DiGraph::with_capacity(n * m + 2, 6 * n * m);

        let source = graph.add_node(FlowNode::Source);
        let sink = graph.add_node(FlowNode::Sink);

        let mut cells: Array2<Option<NodeIndex>> = Array2::from_elem((n, m), None);
        for i in 0..n {
            for j in 0..m {
                let location = Location(i, j);
                if grid.is_forbidden(location) {
                    continue;
                }

                let node = graph.add_node(FlowNode::Cell(location));
                cells[location.as_index()] = Some(node);
                match location.parity() {
                    0 => add_arc(&mut graph, source, node, 0),
                    _ => add_arc(&mut graph, node, sink, 0),
                }
            }
        }

        for pair in grid.valid_pairs() {
            let UnorderedPair(a, b) = pair;
            // matching arcs always run from the even side of the bipartition to the odd side
            let (even, odd) = match a.parity() {
                0 => (a, b),
                _ => (b, a),
            };

            add_arc(
                &mut graph,
                cells[even.as_index()].unwrap(),
                cells[odd.as_index()].unwrap(),
                -grid.gain(pair),
            );
        }

        debug!(
            "built flow network with {} nodes and {} arcs",
            graph.node_count(),
            graph.edge_count()
        );

        Self { graph, source, sink }
    }
}
