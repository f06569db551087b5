use super::Scorer;
use crate::core::{Partition, SearchSettings};
use crate::query::Explanation;
use crate::{DocId, DocSet, Score};

/// Describes how the documents of a scorer will be consumed.
///
/// Weights may pick a cheaper evaluation strategy when the consumer allows it,
/// e.g. a windowed disjunction when documents do not need to be visited one
/// clause position at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectionOptions {
    /// True if the collector does not rely on the scorer tree being
    /// positioned on the collected document.
    pub accepts_out_of_order: bool,
    /// Window size of a bucketed disjunction.
    pub bucket_window_size: u32,
    /// Above this number of optional clauses, the heap disjunction is used.
    pub max_bucket_clauses: usize,
}

impl CollectionOptions {
    /// Options derived from the search settings.
    pub fn from_settings(settings: &SearchSettings, accepts_out_of_order: bool) -> Self {
        CollectionOptions {
            accepts_out_of_order,
            bucket_window_size: settings.bucket_window_size,
            max_bucket_clauses: settings.max_bucket_clauses,
        }
    }
}

impl Default for CollectionOptions {
    fn default() -> Self {
        CollectionOptions::from_settings(&SearchSettings::default(), false)
    }
}

/// A Weight is the specialization of a Query
/// ready to be evaluated on any partition.
///
/// See [`Query`](./trait.Query.html).
pub trait Weight: Send + Sync + 'static {
    /// Returns the scorer for the given partition.
    ///
    /// `boost` is a multiplier to apply to the score.
    ///
    /// The scorer emits documents in increasing order and is always positioned
    /// on the document it emitted.
    ///
    /// See [`Query`](./trait.Query.html).
    fn scorer(&self, partition: &Partition, boost: Score) -> crate::Result<Box<dyn Scorer>>;

    /// Returns the scorer used to feed a collector.
    ///
    /// Unlike [`Weight::scorer`], this scorer may rely on `options` to use an
    /// evaluation strategy that only suits some collectors.
    fn bulk_scorer(
        &self,
        partition: &Partition,
        boost: Score,
        _options: &CollectionOptions,
    ) -> crate::Result<Box<dyn Scorer>> {
        self.scorer(partition, boost)
    }

    /// Returns an `Explanation` for the given document.
    fn explain(&self, partition: &Partition, doc: DocId) -> crate::Result<Explanation>;

    /// Returns the number documents within the given `Partition`.
    fn count(&self, partition: &Partition) -> crate::Result<u32> {
        let mut scorer = self.scorer(partition, 1.0)?;
        Ok(scorer.count())
    }
}
