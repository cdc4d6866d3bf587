use std::collections::HashMap;

use crate::error::ObraError;

/// Detect cycles in a directed graph of task ids using a 3-colour DFS.
/// An edge `(from, to)` means `from` points at `to`: a child at its parent,
/// or a task at a task it depends on.
pub fn detect_cycle(nodes: &[i64], edges: &[(i64, i64)]) -> Result<(), ObraError> {
    let mut adj: HashMap<i64, Vec<i64>> = HashMap::new();
    for &node in nodes {
        adj.entry(node).or_default();
    }
    for &(from, to) in edges {
        adj.entry(from).or_default().push(to);
    }

    // 0=white, 1=gray, 2=black
    let mut color: HashMap<i64, u8> = adj.keys().map(|&n| (n, 0)).collect();

    let mut starts: Vec<i64> = adj.keys().copied().collect();
    starts.sort_unstable();
    for node in starts {
        if color[&node] == 0 {
            if let Some(at) = cycle_dfs(node, &adj, &mut color) {
                return Err(ObraError::cycle_detected(format!(
                    "Cycle detected through task {at}"
                )));
            }
        }
    }
    Ok(())
}

/// Returns the node closing the back edge, if any.
fn cycle_dfs(node: i64, adj: &HashMap<i64, Vec<i64>>, color: &mut HashMap<i64, u8>) -> Option<i64> {
    color.insert(node, 1);
    if let Some(neighbors) = adj.get(&node) {
        for &neighbor in neighbors {
            match color.get(&neighbor) {
                Some(1) => return Some(neighbor),
                Some(0) | None => {
                    if let Some(at) = cycle_dfs(neighbor, adj, color) {
                        return Some(at);
                    }
                }
                _ => {}
            }
        }
    }
    color.insert(node, 2);
    None
}

/// Check whether adding `from → to` to the existing edges closes a cycle.
pub fn would_create_cycle(
    nodes: &[i64],
    existing_edges: &[(i64, i64)],
    from: i64,
    to: i64,
) -> Result<(), ObraError> {
    let mut edges = existing_edges.to_vec();
    edges.push((from, to));
    detect_cycle(nodes, &edges)
}
