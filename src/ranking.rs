//! Global frequency ranking of community labels.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::matrix::{CommunityMatrix, Label};

/// Labels ordered by how often they occur, most frequent first. Equal
/// counts are ordered by ascending label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyRanking {
    entries: Vec<(Label, usize)>,
    positions: BTreeMap<Label, usize>,
}

impl FrequencyRanking {
    pub fn rank(matrix: &CommunityMatrix) -> Self {
        Self::from_counts(tally(matrix.cells().iter().copied()))
    }

    /// Rank an already computed label -> count mapping.
    pub fn from_counts(counts: BTreeMap<Label, usize>) -> Self {
        let mut entries: Vec<(Label, usize)> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let positions = entries
            .iter()
            .enumerate()
            .map(|(pos, &(label, _))| (label, pos))
            .collect();
        debug!(labels = entries.len(), "ranked community labels");
        FrequencyRanking { entries, positions }
    }

    /// 0-based position of `label` in the ranking.
    pub fn position_of(&self, label: Label) -> Result<usize> {
        self.positions
            .get(&label)
            .copied()
            .ok_or(Error::UnrankedLabel(label))
    }

    pub fn count_of(&self, label: Label) -> Option<usize> {
        self.position_of(label).ok().map(|pos| self.entries[pos].1)
    }

    pub fn entries(&self) -> &[(Label, usize)] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.entries.iter().map(|&(label, _)| label)
    }

    /// Number of cells counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|&(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count occurrences of each label.
pub fn tally<I: IntoIterator<Item = Label>>(labels: I) -> BTreeMap<Label, usize> {
    let mut counts = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}
