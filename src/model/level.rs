//! One level of the skeleton hierarchy.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Error, Result};

/// Topology of a single hierarchy level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGraph {
    pub level: usize,
    pub num_node: usize,
    /// Dense ids `0..num_node`.
    pub nodes: Vec<usize>,
    /// Undirected edges `(u, v)` with `u <= v`, sorted, one self-loop per node.
    pub edges: Vec<(usize, usize)>,
    pub center: usize,
    /// How this level was folded out of the previous one. `None` at level 0.
    pub node_mapping: Option<NodeMapping>,
}

impl LevelGraph {
    /// Assemble a level from non-loop edges; self-loops are added here.
    pub(crate) fn new(
        level: usize,
        num_node: usize,
        links: impl IntoIterator<Item = (usize, usize)>,
        center: usize,
        node_mapping: Option<NodeMapping>,
    ) -> Self {
        let mut edges: Vec<(usize, usize)> = links
            .into_iter()
            .filter(|&(u, v)| u != v)
            .map(|(u, v)| (u.min(v), u.max(v)))
            .chain((0..num_node).map(|i| (i, i)))
            .collect();
        edges.sort_unstable();
        edges.dedup();

        Self {
            level,
            num_node,
            nodes: (0..num_node).collect(),
            edges,
            center,
            node_mapping,
        }
    }

    /// Edges that are not self-loops.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied().filter(|&(u, v)| u != v)
    }

    /// Distinct neighbors of `node`, excluding itself, ascending.
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .links()
            .filter_map(|(u, v)| {
                if u == node { Some(v) }
                else if v == node { Some(u) }
                else { None }
            })
            .collect();
        out.sort_unstable();
        out
    }

    pub fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }

    /// Check ids against `num_node` and the mapping against the finer level
    /// `prev` (`None` for the base level).
    pub fn validate(&self, prev: Option<&LevelGraph>) -> Result<()> {
        let invalid = |what: String| Error::InvalidSkeleton(format!("level {}: {what}", self.level));
        let n = self.num_node;
        if n == 0 {
            return Err(invalid("no nodes".into()));
        }
        if !self.nodes.iter().copied().eq(0..n) {
            return Err(invalid(format!("node ids are not 0..{n}")));
        }
        if self.center >= n {
            return Err(invalid(format!("center {} out of range", self.center)));
        }
        if let Some(&(u, v)) = self.edges.iter().find(|&&(u, v)| u >= n || v >= n) {
            return Err(invalid(format!("edge ({u}, {v}) out of range")));
        }
        match (prev, &self.node_mapping) {
            (None, None) => Ok(()),
            (Some(prev), Some(mapping)) => mapping.check(n, prev.num_node).map_err(invalid),
            (None, Some(_)) => Err(invalid("base level carries a node mapping".into())),
            (Some(_), None) => Err(invalid("node mapping missing".into())),
        }
    }
}

/// Record of how a coarse level was folded out of its finer parent.
///
/// Node ids in `absorbed`, `survivors` and `RestoredJoint::fine` refer to
/// the finer level; indices into `absorbed`/`survivors` and
/// `RestoredJoint::sources` are coarse ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMapping {
    /// Fine nodes subsumed by each coarse node (itself included), ascending.
    /// Every fine node appears in exactly one set.
    pub absorbed: Vec<Vec<usize>>,
    /// Fine id each coarse node was relabeled from.
    pub survivors: Vec<usize>,
    /// Fine nodes removed by coarsening, ascending by fine id.
    pub restored: Vec<RestoredJoint>,
}

impl NodeMapping {
    /// Coarse node that absorbed `fine`.
    pub fn owner(&self, fine: usize) -> Option<usize> {
        self.absorbed.iter().position(|set| set.binary_search(&fine).is_ok())
    }

    /// Number of fine-level nodes covered by this mapping.
    pub fn fine_len(&self) -> usize {
        self.absorbed.iter().map(Vec::len).sum()
    }

    /// First inconsistency between this mapping and a `coarse` / `fine`
    /// level pair, if any.
    fn check(&self, coarse: usize, fine: usize) -> std::result::Result<(), String> {
        if self.survivors.len() != coarse || self.absorbed.len() != coarse {
            return Err(format!(
                "{} survivors and {} absorbed sets for {coarse} nodes",
                self.survivors.len(),
                self.absorbed.len()
            ));
        }
        if let Some(&s) = self.survivors.iter().find(|&&s| s >= fine) {
            return Err(format!("survivor {s} out of range for {fine} fine nodes"));
        }

        let mut seen = vec![false; fine];
        for &f in self.absorbed.iter().flatten() {
            match seen.get_mut(f) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(format!("fine node {f} absorbed twice")),
                None => return Err(format!("absorbed node {f} out of range for {fine} fine nodes")),
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(format!("fine node {missing} is not absorbed"));
        }

        for joint in &self.restored {
            if joint.fine >= fine {
                return Err(format!("restored node {} out of range", joint.fine));
            }
            if joint.sources.is_empty() || joint.sources.iter().any(|&s| s >= coarse) {
                return Err(format!("restored node {} has invalid sources {:?}", joint.fine, joint.sources));
            }
        }
        Ok(())
    }
}

/// A removed fine node and the coarse nodes averaged to rebuild it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoredJoint {
    pub fine: usize,
    pub sources: SmallVec<[usize; 4]>,
}
