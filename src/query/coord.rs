use std::fmt;

use crate::Score;

/// Rewards documents matching more of the clauses of a boolean combination.
///
/// `coord(overlap, max_overlap)` is a multiplicative factor applied to the
/// summed score, where `overlap` is the number of non-prohibited clauses
/// matching the document and `max_overlap` the number of non-prohibited clauses.
///
/// Implementations must be non-decreasing in `overlap`.
pub trait Coordination: Send + Sync + fmt::Debug + 'static {
    /// Returns the factor for a document matching `overlap` of `max_overlap` clauses.
    fn coord(&self, overlap: u32, max_overlap: u32) -> Score;
}

/// Default coordination: the fraction of clauses matched.
///
/// A combination with a single clause always gets a factor of 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlapCoordination;

impl Coordination for OverlapCoordination {
    fn coord(&self, overlap: u32, max_overlap: u32) -> Score {
        if max_overlap <= 1 {
            1.0
        } else {
            overlap as Score / max_overlap as Score
        }
    }
}

/// Coordination disabled: the factor is always 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCoordination;

impl Coordination for NoCoordination {
    fn coord(&self, _overlap: u32, _max_overlap: u32) -> Score {
        1.0
    }
}

/// Coordination factors for every possible overlap, computed once per scorer.
#[derive(Clone, Debug)]
pub struct CoordTable {
    factors: Box<[Score]>,
}

impl CoordTable {
    /// Tabulates `coordination` for `0..=max_overlap` matching clauses.
    pub fn new(coordination: &dyn Coordination, max_overlap: u32) -> CoordTable {
        let factors = (0..=max_overlap)
            .map(|overlap| coordination.coord(overlap, max_overlap))
            .collect();
        CoordTable { factors }
    }

    /// Table applying no coordination.
    pub fn identity() -> CoordTable {
        CoordTable {
            factors: Box::new([]),
        }
    }

    /// Returns the factor for a document matching `overlap` clauses.
    #[inline]
    pub fn factor(&self, overlap: u32) -> Score {
        match self.factors.get(overlap as usize) {
            Some(&factor) => factor,
            None => self.factors.last().copied().unwrap_or(1.0),
        }
    }

    /// Returns true if every factor is 1.
    pub fn is_identity(&self) -> bool {
        self.factors.iter().all(|&factor| factor == 1.0)
    }
}

impl Default for CoordTable {
    fn default() -> CoordTable {
        CoordTable::identity()
    }
}
