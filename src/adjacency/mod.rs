//! # Adjacency Partitioner
//!
//! Turns a level's topology into the stacked adjacency tensor consumed by
//! the graph convolution:
//!
//! ```text
//! edges ──hop_distance──▶ HopDistances ──valid hops──▶ binary A
//!       ──normalize_digraph──▶ AD ──partition(strategy)──▶ [K, n, n]
//! ```
//!
//! Levels are independent of each other.

pub mod hop;
pub mod normalize;
pub mod partition;

use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::model::LevelGraph;
use crate::{Error, Result};

pub use hop::{HopDistances, hop_distance};
pub use normalize::normalize_digraph;
pub use partition::{hop_adjacency, partition, valid_hops};

/// Adjacency artifacts of one level. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelAdjacency {
    pub hop: HopDistances,
    /// Normalized adjacency over the valid hop set, `[n, n]`.
    pub normalized: Array2<f64>,
    /// Partition slices, `[K, n, n]`.
    pub partitions: Array3<f64>,
}

impl LevelAdjacency {
    pub fn build(level: &LevelGraph, config: &GraphConfig) -> Result<Self> {
        let hops = valid_hops(config.max_hop, config.dilation)?;
        let hop = hop_distance(level.num_node, &level.edges, config.max_hop);
        let normalized = normalize_digraph(&hop_adjacency(&hop, &hops));
        let partitions = partition(config.strategy, &hop, &normalized, level.center, &hops);

        tracing::debug!(
            level = level.level,
            slices = partitions.shape()[0],
            strategy = ?config.strategy,
            "partitioned adjacency"
        );

        Ok(Self { hop, normalized, partitions })
    }

    pub fn num_slices(&self) -> usize {
        self.partitions.shape()[0]
    }

    /// Check every matrix is sized for `level`.
    pub fn validate(&self, level: &LevelGraph) -> Result<()> {
        let n = level.num_node;
        let square = (n, n);
        let slices = self.partitions.dim();
        if self.hop.as_array().dim() != square
            || self.normalized.dim() != square
            || (slices.1, slices.2) != square
            || slices.0 == 0
        {
            return Err(Error::InvalidSkeleton(format!(
                "level {}: adjacency shapes {:?} / {:?} / {:?} do not fit {n} nodes",
                level.level,
                self.hop.as_array().dim(),
                self.normalized.dim(),
                slices,
            )));
        }
        Ok(())
    }
}
