//! Connectivity linearization: extract ordered draw lines from an
//! undirected landmark-adjacency graph.
//!
//! Facial-feature captures describe geometry as landmark points plus
//! explicit undirected connections (which points belong to one
//! continuous stroke). The plotter needs ordered point sequences, so
//! each connected component is walked into one or more lines:
//!
//! - degree-1 nodes are stroke endpoints; each unconsumed endpoint
//!   seeds a walk,
//! - a component without endpoints is a single point or a closed loop,
//! - leftover nodes of tangled components (degree >= 3 everywhere) are
//!   swept with additional walks so every node lands in exactly one
//!   output line.
//!
//! Neighbor iteration is sorted by landmark id throughout, which makes
//! the walk order of branching components reproducible instead of
//! depending on collection iteration order.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Dfs;

use crate::capture::{Connection, LandmarkPoint};
use crate::types::{PipelineError, Point, Polyline};

/// Extract ordered lines from a feature's landmark connectivity graph.
///
/// Every input landmark appears in exactly one output line; total output
/// point count equals the input landmark count. Duplicate and self
/// connections are tolerated (collapsed and skipped respectively).
///
/// # Errors
///
/// Returns [`PipelineError::UnknownLandmark`] if a connection references
/// an index that is not present in `points`.
pub fn linearize(
    feature: &str,
    points: &[LandmarkPoint],
    connections: &[Connection],
) -> Result<Vec<Polyline>, PipelineError> {
    // Later duplicates of an index win, matching the capture contract.
    let positions: BTreeMap<u32, Point> =
        points.iter().map(|lm| (lm.index, lm.point())).collect();

    let mut graph: UnGraph<u32, ()> = UnGraph::new_undirected();
    let mut node_of: BTreeMap<u32, NodeIndex> = BTreeMap::new();
    for &id in positions.keys() {
        node_of.insert(id, graph.add_node(id));
    }

    for conn in connections {
        if conn.start == conn.end {
            continue;
        }
        let a = *node_of
            .get(&conn.start)
            .ok_or_else(|| unknown_landmark(feature, conn.start))?;
        let b = *node_of
            .get(&conn.end)
            .ok_or_else(|| unknown_landmark(feature, conn.end))?;
        // update_edge collapses duplicate connections into one edge.
        graph.update_edge(a, b, ());
    }

    let mut lines = Vec::new();
    let mut consumed: BTreeSet<u32> = BTreeSet::new();

    // Components are discovered in ascending id order.
    for &id in positions.keys() {
        if consumed.contains(&id) {
            continue;
        }

        let component = component_ids(&graph, node_of[&id]);
        let endpoints: Vec<u32> = component
            .iter()
            .copied()
            .filter(|cid| degree(&graph, node_of[cid]) == 1)
            .collect();

        if endpoints.is_empty() && component.len() == 1 {
            // Isolated landmark: a one-point dot line.
            consumed.insert(id);
            lines.push(Polyline::new(vec![positions[&id]]));
            continue;
        }

        if endpoints.is_empty() {
            // Closed loop: walk from the lowest id until exhausted.
            lines.push(walk(&graph, &node_of, &positions, id, &mut consumed));
        } else {
            for ep in endpoints {
                if !consumed.contains(&ep) {
                    lines.push(walk(&graph, &node_of, &positions, ep, &mut consumed));
                }
            }
        }

        // Sweep nodes no walk reached (only possible in components where
        // every remaining node has degree >= 2, e.g. figure-eight loops).
        for &cid in &component {
            if !consumed.contains(&cid) {
                lines.push(walk(&graph, &node_of, &positions, cid, &mut consumed));
            }
        }
    }

    Ok(lines)
}

/// Walk from `start`, repeatedly stepping to the lowest-id unconsumed
/// neighbor, consuming every visited node. Returns the visited order.
fn walk(
    graph: &UnGraph<u32, ()>,
    node_of: &BTreeMap<u32, NodeIndex>,
    positions: &BTreeMap<u32, Point>,
    start: u32,
    consumed: &mut BTreeSet<u32>,
) -> Polyline {
    let mut order = vec![start];
    consumed.insert(start);
    let mut current = start;

    loop {
        let next = sorted_neighbors(graph, node_of[&current])
            .into_iter()
            .find(|n| !consumed.contains(n));
        let Some(next) = next else {
            break;
        };
        consumed.insert(next);
        order.push(next);
        current = next;
    }

    Polyline::new(order.into_iter().map(|id| positions[&id]).collect())
}

/// All landmark ids reachable from `start`, ascending.
fn component_ids(graph: &UnGraph<u32, ()>, start: NodeIndex) -> Vec<u32> {
    let mut ids = Vec::new();
    let mut dfs = Dfs::new(graph, start);
    while let Some(idx) = dfs.next(graph) {
        ids.push(graph[idx]);
    }
    ids.sort_unstable();
    ids
}

/// Neighbor landmark ids in ascending order.
fn sorted_neighbors(graph: &UnGraph<u32, ()>, idx: NodeIndex) -> Vec<u32> {
    let mut ids: Vec<u32> = graph.neighbors(idx).map(|n| graph[n]).collect();
    ids.sort_unstable();
    ids
}

/// Distinct-neighbor degree of a node.
fn degree(graph: &UnGraph<u32, ()>, idx: NodeIndex) -> usize {
    graph.neighbors(idx).count()
}

fn unknown_landmark(feature: &str, index: u32) -> PipelineError {
    PipelineError::UnknownLandmark {
        feature: feature.to_owned(),
        index,
    }
}
