//! # Population
//!
//! An ordered, mutable sequence of candidates. Order only matters right after a call
//! to [`Population::sort`], when index 0 holds the best candidate for the objective.

use std::ops::Index;

use crate::candidate::Candidate;
use crate::objective::Objective;

/// The working set of candidates evolved by a solver.
#[derive(Debug, Clone)]
pub struct Population<C> {
    members: Vec<C>,
}

impl<C: Candidate> Population<C> {
    /// Creates an empty population.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// The number of candidates.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates from rank 0 to the last rank.
    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.members.iter()
    }

    /// The candidates in rank order.
    pub fn as_slice(&self) -> &[C] {
        &self.members
    }

    /// Mutable access to the slots, e.g. for in-place parallel updates.
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.members
    }

    /// The candidate at rank 0. Only meaningful after sorting.
    pub fn best(&self) -> Option<&C> {
        self.members.first()
    }

    /// Sorts by fitness so the best candidate for `objective` comes first.
    ///
    /// Comparison is on fitness alone. Unevaluated candidates sort last.
    pub fn sort(&mut self, objective: Objective) {
        self.members
            .sort_by(|a, b| objective.compare(a.fitness(), b.fitness()));
    }

    /// Whether the population is in sorted order for `objective`.
    pub fn is_sorted_by(&self, objective: Objective) -> bool {
        self.members
            .windows(2)
            .all(|pair| objective.compare(pair[0].fitness(), pair[1].fitness()).is_le())
    }

    /// Drops the last `count` candidates, i.e. the weakest ones of a sorted population.
    pub fn truncate_worst(&mut self, count: usize) {
        let keep = self.members.len().saturating_sub(count);
        self.members.truncate(keep);
    }

    /// Appends a candidate at the last rank.
    pub fn push(&mut self, candidate: C) {
        self.members.push(candidate);
    }

    /// Appends `candidates` after the last rank. Call [`Population::sort`] afterwards
    /// to restore the order.
    pub fn extend<I: IntoIterator<Item = C>>(&mut self, candidates: I) {
        self.members.extend(candidates);
    }

    /// Consumes the population, keeping rank order.
    pub fn into_vec(self) -> Vec<C> {
        self.members
    }
}

impl<C: Candidate> Default for Population<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Candidate> From<Vec<C>> for Population<C> {
    fn from(members: Vec<C>) -> Self {
        Self { members }
    }
}

impl<C> Index<usize> for Population<C> {
    type Output = C;

    fn index(&self, index: usize) -> &C {
        &self.members[index]
    }
}

impl<'a, C: Candidate> IntoIterator for &'a Population<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
