//! Gender pools and the shuffle primitive.

use std::collections::VecDeque;

use rand::Rng;

use crate::{Candidate, Entry, Gender};

/// Fisher–Yates shuffle in place.
///
/// Walks from the last index down to 1, swapping each position with a
/// uniformly drawn index in `0..=i`. Every permutation is equally likely
/// given a uniform `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Candidates split by gender, each consumed front to back.
#[derive(Debug, Clone, Default)]
pub struct GenderPools {
    pub male: VecDeque<Candidate>,
    pub female: VecDeque<Candidate>,
}

impl GenderPools {
    /// Partitions the entries by gender, keeping input order.
    pub fn build(entries: &[Entry]) -> Self {
        let mut pools = Self::default();
        for entry in entries {
            pools.pool_mut(entry.gender()).push_back(entry.candidate());
        }
        pools
    }

    /// Shuffles each pool independently.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle(self.male.make_contiguous(), rng);
        shuffle(self.female.make_contiguous(), rng);
    }

    pub fn pool(&self, gender: Gender) -> &VecDeque<Candidate> {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }

    pub fn pool_mut(&mut self, gender: Gender) -> &mut VecDeque<Candidate> {
        match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
        }
    }

    /// Removes up to `count` candidates from the front of one pool.
    pub fn take(&mut self, gender: Gender, count: usize) -> Vec<Candidate> {
        let pool = self.pool_mut(gender);
        let count = count.min(pool.len());
        pool.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        self.male.len() + self.female.len()
    }

    pub fn is_empty(&self) -> bool {
        self.male.is_empty() && self.female.is_empty()
    }

    /// Drains both pools, male first, into one queue.
    pub fn into_remaining(self) -> VecDeque<Candidate> {
        let mut remaining = self.male;
        remaining.extend(self.female);
        remaining
    }
}
