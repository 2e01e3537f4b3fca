//! Graph construction parameters.

use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Largest accepted `max_hop`. Hop distances on any level stop growing long
/// before this, and every extra hop costs one dense matrix product.
pub const MAX_HOP_LIMIT: usize = 64;

// ============================================================================
// Partition strategy
// ============================================================================

/// How a level's normalized adjacency is split into kernel slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionStrategy {
    /// One slice: the whole normalized adjacency.
    Uniform,
    /// One slice per valid hop distance.
    Distance,
    /// Root / centripetal / centrifugal split relative to the center node.
    #[default]
    Spatial,
}

// ============================================================================
// GraphConfig
// ============================================================================

/// Parameters for [`SkeletonGraph`](crate::SkeletonGraph) construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Largest hop distance that counts as connected.
    pub max_hop: usize,
    /// Spacing between valid hops (`0, dilation, 2·dilation, ..`).
    pub dilation: usize,
    /// Number of hierarchy levels, including the base skeleton.
    pub levels: usize,
    pub strategy: PartitionStrategy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_hop: 1,
            dilation: 1,
            levels: 4,
            strategy: PartitionStrategy::Spatial,
        }
    }
}

impl GraphConfig {
    pub fn with_max_hop(mut self, max_hop: usize) -> Self {
        self.max_hop = max_hop;
        self
    }

    pub fn with_dilation(mut self, dilation: usize) -> Self {
        self.dilation = dilation;
        self
    }

    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_strategy(mut self, strategy: PartitionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dilation == 0 {
            return Err(Error::EmptyHopSet { max_hop: self.max_hop, dilation: self.dilation });
        }
        if self.max_hop > MAX_HOP_LIMIT {
            return Err(Error::InvalidParameter(format!(
                "max_hop {} exceeds the limit of {MAX_HOP_LIMIT}",
                self.max_hop
            )));
        }
        if self.max_hop % self.dilation != 0 {
            return Err(Error::InvalidParameter(format!(
                "dilation {} does not evenly divide max_hop {}",
                self.dilation, self.max_hop
            )));
        }
        if self.levels == 0 {
            return Err(Error::InvalidParameter("levels must be at least 1".into()));
        }
        Ok(())
    }
}
