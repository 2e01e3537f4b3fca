//! # Skeleton Graph Model
//!
//! Plain data describing the base skeleton and every level of the hierarchy.
//! These types cross every boundary: hierarchy ↔ adjacency ↔ upsample ↔ export.
//!
//! Design rule: no ndarray types here.
//! This module is pure data. It does no I/O and holds no numeric kernels.

pub mod skeleton;
pub mod level;

pub use skeleton::{Skeleton, NTU_NUM_JOINTS, NTU_CENTER_JOINT, NTU_BONES};
pub use level::{LevelGraph, NodeMapping, RestoredJoint};
