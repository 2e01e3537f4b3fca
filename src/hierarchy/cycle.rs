//! Fundamental-cycle search used by the whole-graph cycle guard.

use hashbrown::HashSet;
use super::coarsen::WorkingGraph;

/// First cycle of a DFS-tree cycle basis, or `None` for a forest.
///
/// Components are rooted at their highest live id and explored depth-first
/// with ascending neighbor order; the first non-tree edge closes the cycle.
pub(crate) fn first_cycle(graph: &WorkingGraph) -> Option<Vec<usize>> {
    let n = graph.capacity();
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut used: Vec<Option<HashSet<usize>>> = vec![None; n];

    for root in graph.live_nodes().rev() {
        if used[root].is_some() {
            continue;
        }
        pred[root] = Some(root);
        used[root] = Some(HashSet::new());
        let mut stack = vec![root];

        while let Some(z) = stack.pop() {
            for &nbr in graph.neighbors(z) {
                match &used[nbr] {
                    None => {
                        pred[nbr] = Some(z);
                        used[nbr] = Some([z].into_iter().collect());
                        stack.push(nbr);
                    }
                    Some(pn) => {
                        let tree_edge = used[z].as_ref().is_some_and(|zu| zu.contains(&nbr));
                        if tree_edge {
                            continue;
                        }
                        let mut cycle = vec![nbr, z];
                        let mut p = pred[z]?;
                        while !pn.contains(&p) {
                            cycle.push(p);
                            p = pred[p]?;
                        }
                        cycle.push(p);
                        return Some(cycle);
                    }
                }
            }
        }
    }
    None
}
