//! # Hierarchy Builder
//!
//! Coarsens the base skeleton level by level. For the NTU-RGB+D skeleton
//! the default four levels have 25, 11, 5 and 1 nodes.
//!
//! ```text
//! level L graph ──coarsen──▶ survivors ──relabel──▶ level L+1 graph
//!                    │                                   ▲
//!                    └── removals ──▶ NodeMapping ───────┘
//! ```
//!
//! Node ids are relabeled densely after every level through an explicit
//! remapping table; the center is carried through the same table.

pub mod coarsen;
mod cycle;

use std::collections::VecDeque;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::model::{LevelGraph, NodeMapping, RestoredJoint, Skeleton};
use crate::{Error, Result};
use coarsen::{Coarsener, Removal, WorkingGraph, MAX_DEGREE_THRESHOLD};

pub use coarsen::PassOutcome;

/// Builds the level stack for one skeleton.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder<'a> {
    skeleton: &'a Skeleton,
    levels: usize,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(skeleton: &'a Skeleton, levels: usize) -> Self {
        Self { skeleton, levels }
    }

    /// Produce exactly `levels` levels, base skeleton first.
    pub fn build(&self) -> Result<Vec<LevelGraph>> {
        self.skeleton.validate()?;
        let base = LevelGraph::new(
            0,
            self.skeleton.num_joints,
            self.skeleton.bones.iter().copied(),
            self.skeleton.center,
            None,
        );
        info!(level = 0, nodes = base.num_node, center = base.center, "built base level");

        let mut levels = Vec::with_capacity(self.levels);
        levels.push(base);
        for level in 1..self.levels {
            let next = coarsen_level(&levels[level - 1])?;
            levels.push(next);
        }
        Ok(levels)
    }
}

/// Coarsen `prev` into the next level.
pub fn coarsen_level(prev: &LevelGraph) -> Result<LevelGraph> {
    let level = prev.level + 1;

    let mut coarsener = Coarsener::new(prev);
    for start in 1..=MAX_DEGREE_THRESHOLD {
        let outcome = coarsener.pass(start);
        if outcome != PassOutcome::NoChange {
            debug!(level, start, ?outcome, remaining = coarsener.graph().len(), "coarsening pass");
        }
    }

    let (graph, removals) = coarsener.into_parts();
    let remaining = graph.len();
    if remaining == prev.num_node {
        return Err(Error::CoarseningStalled { level, nodes: remaining });
    }

    // old id → new id
    let mut relabel: Vec<Option<usize>> = vec![None; prev.num_node];
    let mut survivors = Vec::with_capacity(remaining);
    for old in graph.live_nodes() {
        relabel[old] = Some(survivors.len());
        survivors.push(old);
    }

    let center = relabel[prev.center].ok_or(Error::CenterLost { level })?;

    let links: Vec<(usize, usize)> = graph
        .links()
        .into_iter()
        .filter_map(|(u, v)| Some((relabel[u]?, relabel[v]?)))
        .collect();

    let mapping = node_mapping(prev, &relabel, survivors, &removals)?;
    let next = LevelGraph::new(level, remaining, links, center, Some(mapping));

    let fragments = WorkingGraph::from_level(&next).component_count();
    if fragments > 1 {
        warn!(level, fragments, "coarsened level is not connected");
    }
    info!(level, nodes = next.num_node, center, "built level");

    Ok(next)
}

/// Assign every removed node of `prev` to a surviving node.
///
/// A removed node is folded into the lowest-id survivor among the neighbors
/// it was merged into. When none of them survived it falls back to the
/// nearest survivor in `prev`.
fn node_mapping(
    prev: &LevelGraph,
    relabel: &[Option<usize>],
    survivors: Vec<usize>,
    removals: &[Removal],
) -> Result<NodeMapping> {
    let mut absorbed: Vec<Vec<usize>> = survivors.iter().map(|&s| vec![s]).collect();
    let mut restored = Vec::with_capacity(removals.len());

    for removal in removals {
        let mut sources: SmallVec<[usize; 4]> =
            removal.anchors.iter().filter_map(|&a| relabel[a]).collect();
        if sources.is_empty() {
            let nearest = nearest_survivor(prev, removal.node, relabel)
                .ok_or_else(|| Error::DisconnectedSkeleton { unreachable: vec![removal.node] })?;
            sources.push(nearest);
        }
        sources.sort_unstable();
        sources.dedup();

        absorbed[sources[0]].push(removal.node);
        restored.push(RestoredJoint { fine: removal.node, sources });
    }

    for set in &mut absorbed {
        set.sort_unstable();
    }
    restored.sort_by_key(|r| r.fine);

    Ok(NodeMapping { absorbed, survivors, restored })
}

/// Closest survivor to `node` in `prev` by hop count; ties go to the lowest id.
fn nearest_survivor(prev: &LevelGraph, node: usize, relabel: &[Option<usize>]) -> Option<usize> {
    let graph = WorkingGraph::from_level(prev);
    let mut seen = vec![false; prev.num_node];
    seen[node] = true;
    let mut frontier = VecDeque::from([node]);

    while !frontier.is_empty() {
        let mut next = VecDeque::new();
        for &n in &frontier {
            for &m in graph.neighbors(n) {
                if !seen[m] {
                    seen[m] = true;
                    next.push_back(m);
                }
            }
        }
        if let Some(found) = next.iter().filter_map(|&m| relabel[m]).min() {
            return Some(found);
        }
        frontier = next;
    }
    None
}
