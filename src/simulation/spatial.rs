//! Spatial indexing for the proximity scan.
//!
//! Builds a KD-tree over the living agents of a roster snapshot and uses it to
//! find every ordered pair `(i, j)`, `i < j` in roster order, where agent `i`
//! can reach agent `j`.

use std::sync::Arc;

use kdtree::KdTree;
use kdtree::distance::squared_euclidean;
use rayon::prelude::*;

use super::agent::{Agent, RangePolicy};
use crate::error::SimError;

/// Type alias for 2D spatial KD-tree keyed by snapshot index.
pub type Tree2D = KdTree<f64, usize, [f64; 2]>;

/// Points per leaf before a node splits.
const LEAF_CAPACITY: usize = 16;

/// Spatial index over one roster snapshot.
pub struct SpatialIndex<'a> {
    agents: &'a [Arc<Agent>],
    tree: Tree2D,
}

impl<'a> SpatialIndex<'a> {
    /// Indexes the agents of `agents` that are alive right now.
    ///
    /// # Arguments
    ///
    /// * `agents` - Roster snapshot; indices into it are stored in the tree
    ///
    /// # Returns
    ///
    /// A spatial index or an error if a point is rejected by the tree.
    pub fn build(agents: &'a [Arc<Agent>]) -> Result<Self, SimError> {
        let mut tree = KdTree::with_capacity(2, LEAF_CAPACITY);
        for (i, agent) in agents.iter().enumerate() {
            if !agent.is_alive() {
                continue;
            }
            let pos = agent.position();
            tree.add([f64::from(pos.x), f64::from(pos.y)], i)
                .map_err(|e| SimError::SpatialIndex(format!("{e:?}")))?;
        }
        Ok(Self { agents, tree })
    }

    /// Number of indexed agents.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether no agent was indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot indices of agents within `radius` of the agent at `index`.
    ///
    /// The query is slightly generous; callers confirm with an exact check.
    pub fn neighbors(&self, index: usize, radius: i32) -> Result<Vec<usize>, SimError> {
        let pos = self.agents[index].position();
        let reach = f64::from(radius) + 0.5;
        let found = self
            .tree
            .within(
                &[f64::from(pos.x), f64::from(pos.y)],
                reach * reach,
                &squared_euclidean,
            )
            .map_err(|e| SimError::SpatialIndex(format!("{e:?}")))?;
        Ok(found.into_iter().map(|(_, &j)| j).collect())
    }

    /// Every pair `(i, j)` with `i < j` where agent `i` can reach agent `j`.
    ///
    /// Agents are queried in parallel; the result is ordered by `i`, then `j`.
    pub fn pairs_in_range(&self, policy: RangePolicy) -> Result<Vec<(usize, usize)>, SimError> {
        let per_agent: Vec<Vec<(usize, usize)>> = (0..self.agents.len())
            .into_par_iter()
            .map(|i| -> Result<Vec<(usize, usize)>, SimError> {
                let attacker = &self.agents[i];
                if !attacker.is_alive() {
                    return Ok(Vec::new());
                }
                let mut targets: Vec<usize> = self
                    .neighbors(i, attacker.kill_radius())?
                    .into_iter()
                    .filter(|&j| j > i && attacker.is_within_reach(&self.agents[j], policy))
                    .collect();
                targets.sort_unstable();
                Ok(targets.into_iter().map(|j| (i, j)).collect())
            })
            .collect::<Result<_, SimError>>()?;

        Ok(per_agent.into_iter().flatten().collect())
    }
}
