//! Adjacency normalization.

use ndarray::{Array2, Axis};

/// Random-walk normalization over in-edges: `AD[j, i] = A[j, i] / Σ_k A[k, i]`.
///
/// Every column with a nonzero sum adds up to 1; zero columns stay zero.
pub fn normalize_digraph(a: &Array2<f64>) -> Array2<f64> {
    let inv_degree = a
        .sum_axis(Axis(0))
        .mapv(|d| if d > 0.0 { d.recip() } else { 0.0 });
    a * &inv_degree
}
