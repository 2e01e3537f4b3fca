//! # skeleton-graph: Multi-Resolution Skeletal Graph Hierarchy
//!
//! Builds a hierarchy of progressively coarser skeleton graphs from the
//! 25-joint NTU-RGB+D layout and partitions every level's adjacency into
//! the per-hop slices consumed by a spatial-temporal graph convolution.
//!
//! ## Design Principles
//!
//! 1. **Build once, read forever**: everything is computed in
//!    [`SkeletonGraph::new`] and is immutable afterwards
//! 2. **One-way data flow**: `Skeleton` → `hierarchy` → `adjacency`
//! 3. **Explicit tables**: relabeling, center tracking and node absorption
//!    are recorded in index tables, never re-derived
//! 4. **Deterministic**: no randomness, no hash-order dependence
//!
//! ## Quick Start
//!
//! ```rust
//! use skeleton_graph::{GraphConfig, SkeletonGraph};
//!
//! # fn example() -> skeleton_graph::Result<()> {
//! let graph = SkeletonGraph::new(GraphConfig::default())?;
//!
//! assert_eq!(graph.num_node(0)?, 25);
//! assert_eq!(graph.center(0)?, 20);
//!
//! // 3 slices per level: hop-0 root, hop-1 root+centripetal, hop-1 centrifugal
//! for level in 0..graph.levels() {
//!     let a = graph.adjacency_tensor(level)?;
//!     assert_eq!(a.shape()[0], 3);
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Partition Strategies
//!
//! | Strategy | Slices | Description |
//! |----------|--------|-------------|
//! | Spatial | 1 + 2·hops | Root / closer-to-center / farther-from-center (default) |
//! | Distance | 1 + hops | One slice per valid hop distance |
//! | Uniform | 1 | The whole normalized adjacency |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod hierarchy;
pub mod adjacency;
pub mod upsample;
pub mod export;

use ndarray::{Array2, Array3, ArrayView2};
use serde::{Deserialize, Serialize};

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Skeleton, LevelGraph, NodeMapping, RestoredJoint,
    NTU_NUM_JOINTS, NTU_CENTER_JOINT,
};

// ============================================================================
// Re-exports: Configuration
// ============================================================================

pub use config::{GraphConfig, PartitionStrategy, MAX_HOP_LIMIT};

// ============================================================================
// Re-exports: Construction
// ============================================================================

pub use hierarchy::{HierarchyBuilder, PassOutcome};
pub use adjacency::{HopDistances, LevelAdjacency, hop_distance, normalize_digraph, valid_hops};
pub use upsample::UPSAMPLE_DAMPING_LEVEL;

// ============================================================================
// Top-level SkeletonGraph handle
// ============================================================================

/// The primary entry point. A `SkeletonGraph` owns the level hierarchy and
/// the partitioned adjacency tensor of every level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonGraph {
    config: GraphConfig,
    levels: Vec<LevelGraph>,
    adjacency: Vec<LevelAdjacency>,
}

impl SkeletonGraph {
    /// Build the hierarchy for the NTU-RGB+D skeleton.
    pub fn new(config: GraphConfig) -> Result<Self> {
        Self::with_skeleton(&Skeleton::ntu_rgbd(), config)
    }

    /// Build the hierarchy for an arbitrary skeleton.
    ///
    /// Coarsening is tuned for the NTU-RGB+D topology; other skeletons may
    /// fail with [`Error::CoarseningStalled`] at some level.
    pub fn with_skeleton(skeleton: &Skeleton, config: GraphConfig) -> Result<Self> {
        config.validate()?;

        let levels = HierarchyBuilder::new(skeleton, config.levels).build()?;

        let adjacency = levels
            .iter()
            .map(|level| LevelAdjacency::build(level, &config))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { config, levels, adjacency })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Number of levels in the hierarchy.
    pub fn levels(&self) -> usize {
        self.levels.len()
    }

    /// Topology of a single level.
    pub fn level(&self, level: usize) -> Result<&LevelGraph> {
        self.levels.get(level).ok_or(Error::InvalidLevel { level, levels: self.levels.len() })
    }

    pub fn num_node(&self, level: usize) -> Result<usize> {
        Ok(self.level(level)?.num_node)
    }

    /// Center node id at `level` (diagnostic).
    pub fn center(&self, level: usize) -> Result<usize> {
        Ok(self.level(level)?.center)
    }

    /// Coarse → fine mapping. `None` for level 0.
    pub fn node_mapping(&self, level: usize) -> Result<Option<&NodeMapping>> {
        Ok(self.level(level)?.node_mapping.as_ref())
    }

    fn level_adjacency(&self, level: usize) -> Result<&LevelAdjacency> {
        self.adjacency.get(level).ok_or(Error::InvalidLevel { level, levels: self.levels.len() })
    }

    /// Stacked partition tensor, shape `[K, num_node, num_node]`.
    pub fn adjacency_tensor(&self, level: usize) -> Result<&Array3<f64>> {
        Ok(&self.level_adjacency(level)?.partitions)
    }

    /// Un-partitioned normalized adjacency, shape `[num_node, num_node]`.
    pub fn normalized_adjacency(&self, level: usize) -> Result<&Array2<f64>> {
        Ok(&self.level_adjacency(level)?.normalized)
    }

    pub fn hop_distances(&self, level: usize) -> Result<&HopDistances> {
        Ok(&self.level_adjacency(level)?.hop)
    }

    /// Partition slice count per level (the convolution's spatial kernel size).
    pub fn spatial_kernel_sizes(&self) -> Vec<usize> {
        self.adjacency.iter().map(|a| a.partitions.shape()[0]).collect()
    }

    /// Redistribute a `[num_node(level), channels]` feature matrix onto
    /// level `level - 1`.
    pub fn upsample(&self, level: usize, features: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let invalid = Error::InvalidLevel { level, levels: self.levels.len() };
        let Some(fine_level) = level.checked_sub(1) else {
            return Err(invalid);
        };
        let mapping = self.node_mapping(level)?.ok_or(invalid)?;
        let fine_nodes = self.level(fine_level)?.num_node;
        upsample::upsample(mapping, fine_level, fine_nodes, features)
    }

    /// Check the invariants [`SkeletonGraph::new`] establishes: one adjacency
    /// entry per level, a node mapping on every level but the base, ids in
    /// range and tensor shapes matching each level's node count.
    ///
    /// Run on every imported document.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if self.levels.is_empty() {
            return Err(Error::InvalidParameter("graph has no levels".into()));
        }
        if self.adjacency.len() != self.levels.len() {
            return Err(Error::InvalidParameter(format!(
                "{} adjacency entries for {} levels",
                self.adjacency.len(),
                self.levels.len()
            )));
        }
        for (l, (level, adjacency)) in self.levels.iter().zip(&self.adjacency).enumerate() {
            if level.level != l {
                return Err(Error::InvalidSkeleton(format!(
                    "level {l} is labeled as level {}",
                    level.level
                )));
            }
            level.validate(self.levels[..l].last())?;
            adjacency.validate(level)?;
        }
        Ok(())
    }

    /// Average a `[num_node(level - 1), channels]` feature matrix into the
    /// nodes of `level`.
    pub fn pool(&self, level: usize, features: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let mapping = self
            .node_mapping(level)?
            .ok_or(Error::InvalidLevel { level, levels: self.levels.len() })?;
        upsample::pool(mapping, features)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid skeleton: {0}")]
    InvalidSkeleton(String),

    #[error("Disconnected skeleton: joints {unreachable:?} unreachable from the center")]
    DisconnectedSkeleton { unreachable: Vec<usize> },

    #[error("Coarsening did not converge at level {level}: {nodes} nodes left unchanged")]
    CoarseningStalled { level: usize, nodes: usize },

    #[error("Center node removed while coarsening level {level}")]
    CenterLost { level: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty hop set for max_hop={max_hop}, dilation={dilation}")]
    EmptyHopSet { max_hop: usize, dilation: usize },

    #[error("Level {level} out of range (hierarchy has {levels} levels)")]
    InvalidLevel { level: usize, levels: usize },

    #[error("Shape mismatch: expected {expected} rows, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
