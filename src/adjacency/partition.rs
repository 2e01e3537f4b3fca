//! Partition strategies: splitting a normalized adjacency into kernel slices.

use std::cmp::Ordering;
use ndarray::{Array2, Array3, Axis};

use crate::config::{MAX_HOP_LIMIT, PartitionStrategy};
use crate::{Error, Result};
use super::hop::HopDistances;

/// Hops that count as connected: `0, dilation, 2·dilation, ..` up to `max_hop`.
pub fn valid_hops(max_hop: usize, dilation: usize) -> Result<Vec<usize>> {
    if dilation == 0 {
        return Err(Error::EmptyHopSet { max_hop, dilation });
    }
    if max_hop > MAX_HOP_LIMIT {
        return Err(Error::InvalidParameter(format!(
            "max_hop {max_hop} exceeds the limit of {MAX_HOP_LIMIT}"
        )));
    }
    Ok((0..=max_hop).step_by(dilation).collect())
}

/// Binary adjacency over pairs whose hop distance is in `hops`.
pub fn hop_adjacency(hop: &HopDistances, hops: &[usize]) -> Array2<f64> {
    hop.as_array()
        .mapv(|d| match d {
            Some(d) if hops.contains(&d) => 1.0,
            _ => 0.0,
        })
}

/// Split `normalized` into slices per `strategy`, stacked on axis 0.
pub fn partition(
    strategy: PartitionStrategy,
    hop: &HopDistances,
    normalized: &Array2<f64>,
    center: usize,
    hops: &[usize],
) -> Array3<f64> {
    let slices = match strategy {
        PartitionStrategy::Uniform => vec![normalized.clone()],
        PartitionStrategy::Distance => hops
            .iter()
            .map(|&h| at_hop(hop, normalized, h))
            .collect(),
        PartitionStrategy::Spatial => spatial(hop, normalized, center, hops),
    };
    stack(&slices, normalized.nrows())
}

/// Entries of `normalized` whose hop distance is exactly `h`.
fn at_hop(hop: &HopDistances, normalized: &Array2<f64>, h: usize) -> Array2<f64> {
    let mut out = Array2::zeros(normalized.raw_dim());
    for ((j, i), &d) in hop.as_array().indexed_iter() {
        if d == Some(h) {
            out[[j, i]] = normalized[[j, i]];
        }
    }
    out
}

/// Root / centripetal / centrifugal split.
///
/// For an edge `(j, i)` at hop `h` the distances of `j` and `i` to the center
/// are compared; unset distances count as infinite and compare equal to each
/// other. Hop 0 yields the root slice alone, every other hop yields
/// root + closer and then farther.
fn spatial(
    hop: &HopDistances,
    normalized: &Array2<f64>,
    center: usize,
    hops: &[usize],
) -> Vec<Array2<f64>> {
    let n = normalized.nrows();
    let to_center = |node: usize| hop.get(node, center).unwrap_or(usize::MAX);

    let mut slices = Vec::with_capacity(2 * hops.len());
    for &h in hops {
        let mut root = Array2::<f64>::zeros((n, n));
        let mut close = Array2::<f64>::zeros((n, n));
        let mut further = Array2::<f64>::zeros((n, n));

        for i in 0..n {
            for j in 0..n {
                if hop.get(j, i) != Some(h) {
                    continue;
                }
                let target = match to_center(j).cmp(&to_center(i)) {
                    Ordering::Equal => &mut root,
                    Ordering::Greater => &mut close,
                    Ordering::Less => &mut further,
                };
                target[[j, i]] = normalized[[j, i]];
            }
        }

        if h == 0 {
            slices.push(root);
        } else {
            slices.push(root + &close);
            slices.push(further);
        }
    }
    slices
}

fn stack(slices: &[Array2<f64>], n: usize) -> Array3<f64> {
    let mut out = Array3::zeros((slices.len(), n, n));
    for (k, slice) in slices.iter().enumerate() {
        out.index_axis_mut(Axis(0), k).assign(slice);
    }
    out
}
