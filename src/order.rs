//! Majority-rule ordering of rows and columns.
//!
//! Every row (or column) is summarised by its majority label: the label it
//! holds most often. Lanes are then sorted so that those whose majority is
//! globally more frequent come first; among lanes sharing a majority label,
//! the one where that label is more dominant comes first. The sort is
//! stable, so full ties keep their original order.

use std::cmp::Reverse;

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::matrix::{Axis, CommunityMatrix, Label};
use crate::ranking::{FrequencyRanking, tally};

/// How to choose between labels that tie for majority within one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MajorityTieBreak {
    /// The smallest label value wins.
    #[default]
    LowestLabel,
    /// The label ranked highest globally wins.
    BestRanked,
}

/// The majority label of one lane and how often it occurs there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMajority {
    pub label: Label,
    pub count: usize,
}

/// Sort key of a lane: global rank of its majority, then local count
/// descending. Lanes without cells sort last.
pub type AxisOrderKey = (usize, Reverse<usize>);

/// Display order of one axis: position `k` shows original index `self[k]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Permutation((0..n).collect())
    }

    /// Wrap `map`, checking it is a bijection of `0..map.len()`.
    pub fn from_vec(map: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; map.len()];
        for &i in &map {
            if i >= map.len() || std::mem::replace(&mut seen[i], true) {
                return None;
            }
        }
        Some(Permutation(map))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(k, &i)| k == i)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Reorder `items` into display order.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.0.iter().map(|&i| items[i].clone()).collect()
    }

    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (k, &i) in self.0.iter().enumerate() {
            inv[i] = k;
        }
        Permutation(inv)
    }
}

/// Computes majority-rule permutations against one global ranking.
#[derive(Debug, Clone, Copy)]
pub struct MajorityOrderer<'a> {
    ranking: &'a FrequencyRanking,
    tie_break: MajorityTieBreak,
}

impl<'a> MajorityOrderer<'a> {
    pub fn new(ranking: &'a FrequencyRanking) -> Self {
        MajorityOrderer {
            ranking,
            tie_break: MajorityTieBreak::default(),
        }
    }

    pub fn with_tie_break(mut self, tie_break: MajorityTieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Majority label of lane `index`, or `None` if the lane has no cells.
    ///
    /// # Panics
    ///
    /// Panics if `index >= matrix.len_of(axis)`, like [`CommunityMatrix::lane`].
    pub fn majority(
        &self,
        matrix: &CommunityMatrix,
        axis: Axis,
        index: usize,
    ) -> Result<Option<AxisMajority>> {
        let counts = tally(matrix.lane(axis, index));
        let Some(top) = counts.values().copied().max() else {
            return Ok(None);
        };
        // BTreeMap iterates ascending, so the first tied label is the lowest.
        let mut tied = counts
            .into_iter()
            .filter(|&(_, count)| count == top)
            .map(|(label, _)| label);
        let label = match self.tie_break {
            MajorityTieBreak::LowestLabel => tied.next(),
            MajorityTieBreak::BestRanked => {
                let mut best: Option<(usize, Label)> = None;
                for label in tied {
                    let pos = self.ranking.position_of(label)?;
                    if best.is_none_or(|(best_pos, _)| pos < best_pos) {
                        best = Some((pos, label));
                    }
                }
                best.map(|(_, label)| label)
            }
        };
        Ok(label.map(|label| AxisMajority { label, count: top }))
    }

    /// Sort key of lane `index`. Panics under the same condition as
    /// [`majority`](Self::majority).
    pub fn order_key(
        &self,
        matrix: &CommunityMatrix,
        axis: Axis,
        index: usize,
    ) -> Result<AxisOrderKey> {
        Ok(match self.majority(matrix, axis, index)? {
            Some(m) => (self.ranking.position_of(m.label)?, Reverse(m.count)),
            None => (usize::MAX, Reverse(0)),
        })
    }

    /// Permutation of `axis` by the majority rule.
    pub fn order_axis(&self, matrix: &CommunityMatrix, axis: Axis) -> Result<Permutation> {
        let keys = (0..matrix.len_of(axis))
            .into_par_iter()
            .map(|i| self.order_key(matrix, axis, i))
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by_key(|&i| keys[i]);
        debug!(%axis, ?order, "majority order");
        Ok(Permutation(order))
    }
}
