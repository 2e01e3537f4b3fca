//! Base skeleton topology.

use std::collections::VecDeque;
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Joint count of the NTU-RGB+D layout.
pub const NTU_NUM_JOINTS: usize = 25;

/// Spine joint (joint 21 in the dataset's 1-based numbering).
pub const NTU_CENTER_JOINT: usize = 21 - 1;

/// NTU-RGB+D bones, 1-based as published by the dataset.
pub const NTU_BONES: [(usize, usize); 24] = [
    (1, 2), (2, 21), (3, 21), (4, 3), (5, 21),
    (6, 5), (7, 6), (8, 7), (9, 21), (10, 9),
    (11, 10), (12, 11), (1, 13), (14, 13), (15, 14),
    (16, 15), (1, 17), (18, 17), (19, 18), (20, 19),
    (22, 8), (23, 8), (24, 12), (25, 12),
];

/// A joint graph: joints `0..num_joints`, undirected bones, one center joint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skeleton {
    pub num_joints: usize,
    /// 0-based undirected bones.
    pub bones: Vec<(usize, usize)>,
    pub center: usize,
}

impl Skeleton {
    pub fn new(num_joints: usize, bones: Vec<(usize, usize)>, center: usize) -> Self {
        Self { num_joints, bones, center }
    }

    /// The 25-joint NTU-RGB+D skeleton centered on the spine.
    pub fn ntu_rgbd() -> Self {
        let bones = NTU_BONES.iter().map(|&(i, j)| (i - 1, j - 1)).collect();
        Self::new(NTU_NUM_JOINTS, bones, NTU_CENTER_JOINT)
    }

    /// Check index ranges and connectivity.
    ///
    /// A joint unreachable from the center would leave its hop distances
    /// unset at every radius and produce all-zero adjacency rows.
    pub fn validate(&self) -> Result<()> {
        if self.num_joints == 0 {
            return Err(Error::InvalidSkeleton("skeleton has no joints".into()));
        }
        if self.center >= self.num_joints {
            return Err(Error::InvalidSkeleton(format!(
                "center {} out of range for {} joints",
                self.center, self.num_joints
            )));
        }
        if let Some(&(i, j)) = self.bones.iter().find(|&&(i, j)| i >= self.num_joints || j >= self.num_joints) {
            return Err(Error::InvalidSkeleton(format!(
                "bone ({i}, {j}) out of range for {} joints",
                self.num_joints
            )));
        }

        let unreachable = self.unreachable_from_center();
        if !unreachable.is_empty() {
            return Err(Error::DisconnectedSkeleton { unreachable });
        }
        Ok(())
    }

    /// Joints with no path to the center, ascending.
    pub fn unreachable_from_center(&self) -> Vec<usize> {
        let mut adj = vec![Vec::new(); self.num_joints];
        for &(i, j) in &self.bones {
            adj[i].push(j);
            adj[j].push(i);
        }

        let mut seen = vec![false; self.num_joints];
        let mut queue = VecDeque::from([self.center]);
        seen[self.center] = true;
        while let Some(node) = queue.pop_front() {
            for &next in &adj[node] {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }

        (0..self.num_joints).filter(|&j| !seen[j]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntu_layout() {
        let s = Skeleton::ntu_rgbd();
        assert_eq!(s.num_joints, 25);
        assert_eq!(s.center, 20);
        assert_eq!(s.bones.len(), 24);
        assert_eq!(s.bones[0], (0, 1));
        assert_eq!(s.bones[1], (1, 20));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_ntu_spine_has_four_bones() {
        let s = Skeleton::ntu_rgbd();
        let degree = s.bones.iter().filter(|&&(i, j)| i == 20 || j == 20).count();
        assert_eq!(degree, 4);
    }

    #[test]
    fn test_disconnected_skeleton() {
        let s = Skeleton::new(5, vec![(0, 1), (1, 2), (3, 4)], 0);
        match s.validate() {
            Err(Error::DisconnectedSkeleton { unreachable }) => assert_eq!(unreachable, vec![3, 4]),
            other => panic!("expected DisconnectedSkeleton, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            Skeleton::new(3, vec![(0, 3)], 0).validate(),
            Err(Error::InvalidSkeleton(_))
        ));
        assert!(matches!(
            Skeleton::new(3, vec![(0, 1), (1, 2)], 7).validate(),
            Err(Error::InvalidSkeleton(_))
        ));
        assert!(matches!(
            Skeleton::new(0, vec![], 0).validate(),
            Err(Error::InvalidSkeleton(_))
        ));
    }

    #[test]
    fn test_single_joint_is_connected() {
        assert!(Skeleton::new(1, vec![], 0).validate().is_ok());
    }
}
