//! Degree-threshold coarsening of a single level.
//!
//! A level is coarsened by sweeping a degree threshold upward. Each pass is
//! two-phase: removal and clique decisions are made against the graph as it
//! stood at the start of the pass, then applied together. The `stay` set is
//! the only state that evolves during the decision phase.

use std::collections::BTreeSet;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::LevelGraph;
use super::cycle::first_cycle;

/// Highest degree threshold swept per level.
pub const MAX_DEGREE_THRESHOLD: usize = 10;

// ============================================================================
// WorkingGraph
// ============================================================================

/// Mutable adjacency list over a fixed id range plus a liveness bitset.
/// Self-loops are never stored.
#[derive(Debug, Clone)]
pub(crate) struct WorkingGraph {
    adj: Vec<BTreeSet<usize>>,
    alive: Vec<bool>,
}

impl WorkingGraph {
    pub(crate) fn from_links(n: usize, links: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut graph = Self {
            adj: vec![BTreeSet::new(); n],
            alive: vec![true; n],
        };
        for (u, v) in links {
            graph.connect(u, v);
        }
        graph
    }

    pub(crate) fn from_level(level: &LevelGraph) -> Self {
        Self::from_links(level.num_node, level.links())
    }

    /// Size of the id range, dead ids included.
    pub(crate) fn capacity(&self) -> usize {
        self.adj.len()
    }

    /// Live node count.
    pub(crate) fn len(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    pub(crate) fn live_nodes(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        (0..self.adj.len()).filter(|&i| self.alive[i])
    }

    pub(crate) fn neighbors(&self, node: usize) -> &BTreeSet<usize> {
        &self.adj[node]
    }

    pub(crate) fn degree(&self, node: usize) -> usize {
        self.adj[node].len()
    }

    pub(crate) fn connect(&mut self, u: usize, v: usize) {
        if u != v {
            self.adj[u].insert(v);
            self.adj[v].insert(u);
        }
    }

    /// Detach `node` from its neighbors and mark it dead.
    pub(crate) fn remove(&mut self, node: usize) {
        let neighbors = std::mem::take(&mut self.adj[node]);
        for n in neighbors {
            self.adj[n].remove(&node);
        }
        self.alive[node] = false;
    }

    /// Undirected live edges, `u < v`, ascending.
    pub(crate) fn links(&self) -> Vec<(usize, usize)> {
        self.live_nodes()
            .flat_map(|u| self.adj[u].range(u + 1..).map(move |&v| (u, v)))
            .collect()
    }

    pub(crate) fn component_count(&self) -> usize {
        let mut seen = vec![false; self.adj.len()];
        let mut count = 0;
        for root in self.live_nodes() {
            if seen[root] {
                continue;
            }
            count += 1;
            seen[root] = true;
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                for &next in &self.adj[node] {
                    if !seen[next] {
                        seen[next] = true;
                        stack.push(next);
                    }
                }
            }
        }
        count
    }

    /// True when the first fundamental cycle passes through every live node.
    pub(crate) fn has_spanning_cycle(&self) -> bool {
        first_cycle(self).is_some_and(|cycle| cycle.len() == self.len())
    }
}

// ============================================================================
// Pass outcome
// ============================================================================

/// What a single threshold pass did to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassOutcome {
    /// No node matched the threshold and the cycle guard did not fire.
    NoChange,
    /// `removed` nodes were folded into their neighbors.
    Coarsened { removed: usize },
    /// The remaining graph was a single spanning cycle; every node outside
    /// `stay` was dropped on top of the `removed` threshold matches.
    ForcedReduction { removed: usize, forced: usize },
}

impl PassOutcome {
    pub fn total_removed(&self) -> usize {
        match *self {
            PassOutcome::NoChange => 0,
            PassOutcome::Coarsened { removed } => removed,
            PassOutcome::ForcedReduction { removed, forced } => removed + forced,
        }
    }
}

/// A node dropped during coarsening and the neighbors it was folded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Removal {
    pub node: usize,
    pub anchors: SmallVec<[usize; 4]>,
}

// ============================================================================
// Coarsener
// ============================================================================

pub(crate) struct Coarsener {
    graph: WorkingGraph,
    stay: HashSet<usize>,
    removals: Vec<Removal>,
}

impl Coarsener {
    pub(crate) fn new(level: &LevelGraph) -> Self {
        Self {
            graph: WorkingGraph::from_level(level),
            stay: HashSet::new(),
            removals: Vec::new(),
        }
    }

    pub(crate) fn graph(&self) -> &WorkingGraph {
        &self.graph
    }

    /// Run one pass at degree threshold `start`.
    pub(crate) fn pass(&mut self, start: usize) -> PassOutcome {
        // Decision phase
        let mut marked: Vec<Removal> = Vec::new();
        let mut cliques: Vec<(usize, usize)> = Vec::new();
        for node in self.graph.live_nodes() {
            if self.graph.degree(node) != start || self.stay.contains(&node) {
                continue;
            }
            let lost: SmallVec<[usize; 4]> = self.graph.neighbors(node).iter().copied().collect();
            self.stay.extend(lost.iter().copied());
            for (k, &l) in lost.iter().enumerate() {
                for &m in &lost[k + 1..] {
                    cliques.push((l, m));
                }
            }
            marked.push(Removal { node, anchors: lost });
        }

        // Apply phase
        for (l, m) in cliques {
            self.graph.connect(l, m);
        }
        for removal in &marked {
            self.graph.remove(removal.node);
        }
        let removed = marked.len();
        self.removals.extend(marked);

        let forced = self.cycle_guard();
        match (removed, forced) {
            (0, 0) => PassOutcome::NoChange,
            (removed, 0) => PassOutcome::Coarsened { removed },
            (removed, forced) => PassOutcome::ForcedReduction { removed, forced },
        }
    }

    /// Drop every node outside `stay` when the graph is one spanning cycle.
    fn cycle_guard(&mut self) -> usize {
        if !self.graph.has_spanning_cycle() {
            return 0;
        }
        let last: Vec<Removal> = self
            .graph
            .live_nodes()
            .filter(|node| !self.stay.contains(node))
            .map(|node| Removal {
                node,
                anchors: self
                    .graph
                    .neighbors(node)
                    .iter()
                    .copied()
                    .filter(|n| self.stay.contains(n))
                    .collect(),
            })
            .collect();
        for removal in &last {
            self.graph.remove(removal.node);
        }
        let forced = last.len();
        self.removals.extend(last);
        forced
    }

    pub(crate) fn into_parts(self) -> (WorkingGraph, Vec<Removal>) {
        (self.graph, self.removals)
    }
}
