//! Connected random topologies
//!
//! A random spanning tree guarantees connectivity; extra edges are then added
//! by rejection sampling until the requested density is reached.

use hashbrown::HashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::gs_interface::{
    check_unit_interval, GossipResult, GraphData, Link, Node, NodeId, LINK_VALUE,
};
use crate::gs_mst::generate_mst;

/// Rejection sampling gives up after this many attempts per possible pair and
/// fills the remainder from the list of still-missing pairs.
pub const SAMPLING_ATTEMPTS_PER_PAIR: usize = 32;

/// Id for the node at `index`: `A`..`Z`, then the letter followed by
/// `index / 26` (`A1`, `B1`, .., `Z1`, `A2`, ..).
pub fn node_id_for_index(index: usize) -> NodeId {
    let letter = char::from(b'A' + (index % 26) as u8);
    if index >= 26 {
        format!("{}{}", letter, index / 26)
    } else {
        letter.to_string()
    }
}

/// Number of extra edges added on top of a spanning tree for `density`
pub fn extra_edge_target(node_count: usize, tree_edges: usize, density: f64) -> usize {
    let possible = node_count * node_count.saturating_sub(1) / 2;
    let free = possible.saturating_sub(tree_edges);
    (free as f64 * density).floor() as usize
}

/// Generate a connected random graph with exactly one informed node.
///
/// `density = 0` yields just the spanning tree, `density = 1` the complete
/// graph. Density outside [0, 1] is rejected. Zero nodes yield an empty graph.
pub fn generate_initial_graph<R: Rng + ?Sized>(
    node_count: usize,
    density: f64,
    rng: &mut R,
) -> GossipResult<GraphData> {
    check_unit_interval("density", density)?;

    if node_count == 0 {
        return Ok(GraphData::default());
    }

    let informed_index = rng.gen_range(0..node_count);
    let nodes: Vec<Node> = (0..node_count)
        .map(|i| Node {
            id: node_id_for_index(i),
            informed: i == informed_index,
        })
        .collect();

    let node_ids: Vec<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();

    let mut links: Vec<Link> = generate_mst(&node_ids, rng)
        .into_iter()
        .map(|edge| Link {
            source: edge.source,
            target: edge.target,
            value: LINK_VALUE,
        })
        .collect();

    if density > 0.0 {
        let wanted = extra_edge_target(node_count, links.len(), density);
        add_extra_edges(&node_ids, &mut links, wanted, rng);
    }

    log::debug!(
        "graph: {} nodes, {} links, informed {}",
        nodes.len(),
        links.len(),
        nodes[informed_index].id
    );

    Ok(GraphData { nodes, links })
}

// unordered pair key over node indices
fn pair(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn add_extra_edges<R: Rng + ?Sized>(
    node_ids: &[NodeId],
    links: &mut Vec<Link>,
    wanted: usize,
    rng: &mut R,
) {
    if wanted == 0 {
        return;
    }

    let n = node_ids.len();
    let index: hashbrown::HashMap<&str, usize> = node_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut present: HashSet<(usize, usize)> = links
        .iter()
        .map(|l| pair(index[l.source.as_str()], index[l.target.as_str()]))
        .collect();

    let max_attempts = SAMPLING_ATTEMPTS_PER_PAIR * (n * (n - 1) / 2);
    let mut added = 0;
    let mut attempts = 0;

    while added < wanted && attempts < max_attempts {
        attempts += 1;
        let source = rng.gen_range(0..n);
        let target = rng.gen_range(0..n);
        if source == target {
            continue;
        }

        if present.insert(pair(source, target)) {
            links.push(Link {
                source: node_ids[source].clone(),
                target: node_ids[target].clone(),
                value: LINK_VALUE,
            });
            added += 1;
        }
    }

    if added < wanted {
        log::warn!(
            "rejection sampling stopped after {} attempts ({}/{} extra edges), filling from missing pairs",
            attempts,
            added,
            wanted
        );

        let mut missing: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|p| !present.contains(p))
            .collect();
        missing.shuffle(rng);

        for (source, target) in missing.into_iter().take(wanted - added) {
            present.insert((source, target));
            links.push(Link {
                source: node_ids[source].clone(),
                target: node_ids[target].clone(),
                value: LINK_VALUE,
            });
        }
    }
}
