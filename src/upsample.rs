//! Spatial upsampling from a coarse level back onto its finer parent.
//!
//! Surviving nodes carry their coarse row over unchanged. A node removed by
//! coarsening is rebuilt as the mean of the coarse nodes it was folded into.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::model::NodeMapping;
use crate::{Error, Result};

/// Fine level whose rebuilt nodes are halved after averaging.
///
/// Tied to the NTU-RGB+D hierarchy: four of the five level-2 nodes are
/// rebuilt from the single top-level node.
pub const UPSAMPLE_DAMPING_LEVEL: usize = 2;

/// Map `[coarse_nodes, channels]` features onto `fine_level`.
pub fn upsample(
    mapping: &NodeMapping,
    fine_level: usize,
    fine_nodes: usize,
    features: ArrayView2<'_, f64>,
) -> Result<Array2<f64>> {
    let coarse_nodes = mapping.survivors.len();
    if features.nrows() != coarse_nodes {
        return Err(Error::ShapeMismatch { expected: coarse_nodes, got: features.nrows() });
    }
    let damping = if fine_level == UPSAMPLE_DAMPING_LEVEL { 2.0 } else { 1.0 };

    let mut out = Array2::<f64>::zeros((fine_nodes, features.ncols()));
    for (coarse, &fine) in mapping.survivors.iter().enumerate() {
        out.row_mut(fine).assign(&features.row(coarse));
    }
    for joint in &mapping.restored {
        let sum = joint
            .sources
            .iter()
            .fold(Array1::<f64>::zeros(features.ncols()), |acc, &s| acc + &features.row(s));
        let mean = sum / (joint.sources.len() as f64 * damping);
        out.row_mut(joint.fine).assign(&mean);
    }
    Ok(out)
}

/// Average `[fine_nodes, channels]` features into their coarse owners.
pub fn pool(mapping: &NodeMapping, features: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    let fine_nodes = mapping.fine_len();
    if features.nrows() != fine_nodes {
        return Err(Error::ShapeMismatch { expected: fine_nodes, got: features.nrows() });
    }
    let mut out = Array2::<f64>::zeros((mapping.absorbed.len(), features.ncols()));
    for (coarse, set) in mapping.absorbed.iter().enumerate() {
        let rows = features.select(Axis(0), set);
        if let Some(mean) = rows.mean_axis(Axis(0)) {
            out.row_mut(coarse).assign(&mean);
        }
    }
    Ok(out)
}
