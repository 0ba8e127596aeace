//! Random spanning trees via Kruskal's algorithm
//!
//! Every unordered pair of nodes becomes a candidate edge with an independent
//! uniform weight. The minimum spanning tree over those weights is a random
//! tree that always connects the full node set.

use rand::Rng;

use crate::gs_disjoint_set::DisjointSet;
use crate::gs_interface::{Edge, NodeId};

/// Build a random spanning tree over `node_ids`.
///
/// Returns `n - 1` edges for `n >= 1` (none for an empty or single-node input),
/// in the order Kruskal accepted them. Ids are expected to be unique.
pub fn generate_mst<R: Rng + ?Sized>(node_ids: &[NodeId], rng: &mut R) -> Vec<Edge> {
    let target = node_ids.len().saturating_sub(1);
    let mut result = Vec::with_capacity(target);
    if target == 0 {
        return result;
    }

    let mut candidates = candidate_edges(node_ids, rng);
    // stable: equal weights keep generation order
    candidates.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut sets = DisjointSet::new(node_ids.len());
    for (i, j, weight) in candidates {
        if sets.union(i, j) {
            result.push(Edge {
                source: node_ids[i].clone(),
                target: node_ids[j].clone(),
                weight,
            });
            if result.len() == target {
                break;
            }
        }
    }

    log::debug!(
        "spanning tree over {} nodes: {} edges",
        node_ids.len(),
        result.len()
    );

    result
}

/// All `n (n - 1) / 2` candidate pairs `(i, j, weight)` with `i < j`, in
/// generation order
fn candidate_edges<R: Rng + ?Sized>(
    node_ids: &[NodeId],
    rng: &mut R,
) -> Vec<(usize, usize, f64)> {
    let n = node_ids.len();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            edges.push((i, j, rng.gen::<f64>()));
        }
    }
    edges
}
