//! Bounded all-pairs hop distance.

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

/// Hop distances of one level. Pairs farther apart than `max_hop` are unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopDistances {
    max_hop: usize,
    dist: Array2<Option<usize>>,
}

impl HopDistances {
    pub fn max_hop(&self) -> usize {
        self.max_hop
    }

    pub fn num_node(&self) -> usize {
        self.dist.nrows()
    }

    /// Distance between `i` and `j`, `None` beyond `max_hop`.
    pub fn get(&self, i: usize, j: usize) -> Option<usize> {
        self.dist[[i, j]]
    }

    pub fn as_array(&self) -> &Array2<Option<usize>> {
        &self.dist
    }

    /// Distances as floats with unset pairs at `f64::INFINITY`.
    pub fn to_f64(&self) -> Array2<f64> {
        self.dist.mapv(|d| d.map_or(f64::INFINITY, |d| d as f64))
    }

    pub fn is_symmetric(&self) -> bool {
        self.dist == self.dist.t()
    }
}

/// Hop distance up to `max_hop` over an undirected edge list.
///
/// Reachability at exactly `d` steps is read off the boolean `d`-th power of
/// the adjacency matrix. Powers are assigned from the radius down to `0` so
/// the shortest distance overwrites longer ones. No shortest path is longer
/// than `num_node - 1`, so the radius is capped there whatever `max_hop` is.
pub fn hop_distance(num_node: usize, edges: &[(usize, usize)], max_hop: usize) -> HopDistances {
    let mut a = Array2::<f64>::zeros((num_node, num_node));
    for &(i, j) in edges {
        a[[j, i]] = 1.0;
        a[[i, j]] = 1.0;
    }

    let radius = max_hop.min(num_node.saturating_sub(1));
    let mut transfer = Vec::with_capacity(radius + 1);
    let mut power = Array2::<f64>::eye(num_node);
    transfer.push(power.clone());
    for _ in 0..radius {
        power = power.dot(&a);
        power.mapv_inplace(|x| if x > 0.0 { 1.0 } else { 0.0 });
        transfer.push(power.clone());
    }

    let mut dist = Array2::from_elem((num_node, num_node), None);
    for (d, arrive) in transfer.iter().enumerate().rev() {
        Zip::from(&mut dist).and(arrive).for_each(|h, &reach| {
            if reach > 0.0 {
                *h = Some(d);
            }
        });
    }

    HopDistances { max_hop, dist }
}
