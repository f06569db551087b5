use crate::query::Scorer;
use crate::Score;

/// The `ScoreCombiner` trait defines how to compute
/// an overall score given a list of scorers matching the same document.
///
/// Combiners also count how many scorers were aggregated, which is what
/// coordination is computed from.
pub trait ScoreCombiner: Default + Clone + Send + Copy + 'static {
    /// Aggregates the score combiner with the given scorer.
    ///
    /// The `ScoreCombiner` may decide to call `.scorer.score()`
    /// or not.
    fn update<TScorer: Scorer>(&mut self, scorer: &mut TScorer);

    /// Clears the score combiner state back to its initial state.
    fn clear(&mut self);

    /// Returns the aggregate score.
    fn score(&self) -> Score;

    /// Returns the number of scorers aggregated since the last `clear`.
    fn num_matches(&self) -> u32;
}

/// Just ignores scores. The `DoNothingCombiner` does not
/// even call the scorers `.score()` function.
///
/// It is useful to optimize the case when scoring is disabled.
#[derive(Default, Clone, Copy)]
pub struct DoNothingCombiner {
    num_matches: u32,
}

impl ScoreCombiner for DoNothingCombiner {
    fn update<TScorer: Scorer>(&mut self, _scorer: &mut TScorer) {
        self.num_matches += 1;
    }

    fn clear(&mut self) {
        self.num_matches = 0;
    }

    fn score(&self) -> Score {
        1.0
    }

    fn num_matches(&self) -> u32 {
        self.num_matches
    }
}

/// Sums the score of different scorers.
#[derive(Default, Clone, Copy)]
pub struct SumCombiner {
    score: Score,
    num_matches: u32,
}

impl ScoreCombiner for SumCombiner {
    fn update<TScorer: Scorer>(&mut self, scorer: &mut TScorer) {
        self.score += scorer.score();
        self.num_matches += 1;
    }

    fn clear(&mut self) {
        self.score = 0.0;
        self.num_matches = 0;
    }

    fn score(&self) -> Score {
        self.score
    }

    fn num_matches(&self) -> u32 {
        self.num_matches
    }
}
