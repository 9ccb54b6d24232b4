use std::collections::{HashSet, VecDeque};

use itertools::Itertools;
use log::debug;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use unordered_pair::UnorderedPair;

use crate::error::SolverFailure;
use crate::grid::Grid;
use crate::location::Location;
use crate::network::{reverse_of, FlowArc, FlowNetwork, FlowNode};

/// A pairing and its score, as produced by [`solve`] or [`solve_naive`].
#[derive(Clone, Debug)]
pub struct Solution {
    /// The chosen pairs. Always a matching: every cell appears in at most one pair.
    pub pairs: Vec<UnorderedPair<Location>>,
    /// The score of `pairs` under the rules' formula: the sum of pair costs plus the value
    /// of every unpaired non-black cell.
    pub score: i64,
}

/// Find a minimum-score pairing of `grid`, exactly.
///
/// # Method
/// Let C be the sum of values over non-black cells. For any matching P,
/// `score(P) = Σ cost + Σ unpaired value = C - Σ gain`, so minimizing the score is the same
/// as maximizing the total gain of the matching. The grid adjacency graph is bipartite under
/// the parity of `i + j`, so the maximum-gain matching is a min-cost flow problem: unit arcs
/// from a source to every even cell and from every odd cell to a sink, and a unit arc of
/// cost `-gain` per valid pair.
///
/// The flow is found by successive shortest augmenting paths. Each round runs Bellman-Ford
/// over the positive-residual arcs (costs are negative, so Dijkstra is out), then augments
/// one unit along a shortest source-to-sink path; every bottleneck is exactly 1 because all
/// arcs have unit capacity. Once the sink is unreachable or the shortest path no longer has
/// negative cost, no further augmentation can increase the gain and the flow is optimal.
/// The saturated even-to-odd arcs are exactly the chosen pairs, and the final score is
/// `C + K` where K is the accumulated cost of the flow.
///
/// Runs in O(V²E) in the worst case; each solve builds fresh residual state and no state
/// survives the call. Fails with a [`SolverFailure`] only if an internal invariant breaks,
/// never on any valid grid.
pub fn solve(grid: &Grid) -> Result<Solution, SolverFailure> {
    let mut network = FlowNetwork::from_grid(grid);
    let (flow, cost) = min_cost_flow(&mut network)?;
    debug!("flow finished: {} pairs at accumulated cost {}", flow, cost);

    decode(grid, &network, flow, cost)
}

/// The greedy baseline: walk the valid pairs in ascending cost order, keeping every pair
/// that conflicts with none already kept. Cheap, and usually not optimal; [`solve`] never
/// scores worse.
pub fn solve_naive(grid: &Grid) -> Solution {
    let mut used: HashSet<Location> = HashSet::new();
    let mut pairs = Vec::new();

    for pair in grid.valid_pairs().sorted_by_key(|pair| grid.cost(*pair)) {
        if !used.contains(&pair.0) && !used.contains(&pair.1) {
            used.insert(pair.0);
            used.insert(pair.1);
            pairs.push(pair);
        }
    }

    let score = grid.score_of(&pairs);
    Solution { pairs, score }
}

fn min_cost_flow(network: &mut FlowNetwork) -> Result<(i64, i64), SolverFailure> {
    let mut flow = 0;
    let mut total_cost = 0;

    loop {
        let Some((distance, path)) =
            shortest_augmenting_path(&network.graph, network.source, network.sink)?
        else {
            break;
        };

        // a non-negative path cannot increase the total gain; the current flow is optimal
        if distance >= 0 {
            break;
        }

        for arc in path {
            network.graph[arc].residual -= 1;
            network.graph[reverse_of(arc)].residual += 1;
        }

        flow += 1;
        total_cost += distance;
        debug!("augmented along a cost {} path; {} pairs so far", distance, flow);
    }

    Ok((flow, total_cost))
}

/// Queue-based Bellman-Ford from `source` over arcs with positive residual capacity.
///
/// Returns the shortest distance to `sink` and the arcs of one shortest path, or [`None`] if
/// the sink is unreachable. Distances must be recomputed from scratch after every
/// augmentation, since augmenting flips residual arcs along the path.
///
/// As long as every prior augmentation followed a true shortest path, the residual graph
/// holds no negative cycle and every node settles within `V` dequeues. Exceeding that bound
/// is a fatal [`SolverFailure::RelaxationDiverged`].
fn shortest_augmenting_path(
    graph: &DiGraph<FlowNode, FlowArc>,
    source: NodeIndex,
    sink: NodeIndex,
) -> Result<Option<(i64, Vec<EdgeIndex>)>, SolverFailure> {
    let order = graph.node_count();
    let mut dist: Vec<Option<i64>> = vec![None; order];
    let mut pred: Vec<Option<EdgeIndex>> = vec![None; order];
    let mut in_queue = vec![false; order];
    let mut dequeues = vec![0usize; order];
    let mut queue = VecDeque::with_capacity(order);

    dist[source.index()] = Some(0);
    queue.push_back(source);
    in_queue[source.index()] = true;

    while let Some(u) = queue.pop_front() {
        in_queue[u.index()] = false;
        dequeues[u.index()] += 1;
        if dequeues[u.index()] > order {
            return Err(SolverFailure::RelaxationDiverged);
        }

        // queued nodes always have a known distance
        let here = dist[u.index()].unwrap();
        for arc in graph.edges(u) {
            if arc.weight().residual == 0 {
                continue;
            }

            let through = here + arc.weight().cost;
            let v = arc.target();
            if dist[v.index()].map_or(true, |known| through < known) {
                dist[v.index()] = Some(through);
                pred[v.index()] = Some(arc.id());
                if !in_queue[v.index()] {
                    queue.push_back(v);
                    in_queue[v.index()] = true;
                }
            }
        }
    }

    let Some(distance) = dist[sink.index()] else {
        return Ok(None);
    };

    let mut path = Vec::new();
    let mut at = sink;
    while let Some(arc) = pred[at.index()] {
        path.push(arc);
        at = graph.edge_endpoints(arc).unwrap().0;
    }
    path.reverse();

    Ok(Some((distance, path)))
}

/// Collect the saturated matching arcs back into cell pairs and cross-check the score.
///
/// The score is recomputed directly from the pair set with the rules' formula and compared
/// against `C + K`; a mismatch means the solve went wrong somewhere and is reported rather
/// than returning a silently wrong optimum.
fn decode(
    grid: &Grid,
    network: &FlowNetwork,
    flow: i64,
    cost: i64,
) -> Result<Solution, SolverFailure> {
    let graph = &network.graph;
    let mut pairs = Vec::with_capacity(flow as usize);

    for arc in graph.edge_references() {
        if let (FlowNode::Cell(a), FlowNode::Cell(b)) = (graph[arc.source()], graph[arc.target()])
        {
            // forward matching arcs run even to odd; saturation means the pair was selected
            if a.parity() == 0 && arc.weight().residual == 0 {
                pairs.push(UnorderedPair(a, b));
            }
        }
    }

    let from_flow = grid.total_value() + cost;
    let direct = grid.score_of(&pairs);
    if direct != from_flow {
        return Err(SolverFailure::ScoreMismatch { from_flow, direct });
    }

    Ok(Solution { pairs, score: direct })
}
