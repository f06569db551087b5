/*!
Defines how the documents matching a search query should be processed.

A [`Collector`] is created once per search. For each partition it spawns a
[`SegmentCollector`] that receives the matching documents of that partition,
then merges the per-partition fruits into the final result.
*/

use std::ops::ControlFlow;

use crate::core::{Cancellation, Partition, SearchSettings};
use crate::query::{CollectionOptions, Scorer, Weight};
use crate::{DocId, TERMINATED};

mod count_collector;
pub use self::count_collector::{Count, SegmentCountCollector};

mod docset_collector;
pub use self::docset_collector::{DocSetChildCollector, DocSetCollector};

mod first_n_collector;
pub use self::first_n_collector::{FirstNCollector, FirstNSegmentCollector};

mod clause_counts;
pub use self::clause_counts::{ClauseMatchCounts, ClauseMatchCountsSegmentCollector};

mod top_collector;
pub use self::top_collector::{Comparator, NaturalComparator, TopNComputer};

mod sort_key;
pub use self::sort_key::{
    Order, PartitionSortKeys, Sort, SortBy, SortField, SortKeyExtractor, SortValue,
};

mod top_hits;
pub use self::top_hits::{Hit, HitComparator, HitKey, PageBoundary, TopHits};

mod merge;
pub use self::merge::merge_top_hits;

mod top_score_collector;
pub use self::top_score_collector::{CollectorConfig, TopDocs, TopHitsSegmentCollector};


/// How the collection of a partition ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartitionStatus {
    /// Every matching document was handed to the segment collector.
    Exhausted,
    /// The segment collector asked to stop after collecting `last_doc`.
    EarlyTerminated {
        /// Last document handed to the segment collector. `None` if the
        /// collector had no room for any document and none was handed to it.
        last_doc: Option<DocId>,
    },
    /// The search was cancelled before the partition was exhausted.
    Truncated {
        /// Last document handed to the segment collector, if any.
        last_doc: Option<DocId>,
    },
}

/// Per-search state shared by the collection of every partition.
#[derive(Clone, Copy, Debug)]
pub struct CollectionContext<'a> {
    /// Settings of the searcher.
    pub settings: &'a SearchSettings,
    /// Signal polled while collecting.
    pub cancellation: &'a Cancellation,
}

impl<'a> CollectionContext<'a> {
    /// Creates a new context.
    pub fn new(settings: &'a SearchSettings, cancellation: &'a Cancellation) -> Self {
        CollectionContext {
            settings,
            cancellation,
        }
    }
}

/// Collectors are in charge of collecting and retaining relevant
/// information from the document found and scored by the query.
///
/// For instance,
///
/// - keeping track of the top 10 best documents
/// - computing the number of documents matching the query
/// - counting how often each clause matched
///
/// Our search index is in fact a collection of partitions, so
/// a `Collector` trait is actually more of a factory to instance
/// `SegmentCollector`s for each partition.
///
/// The collection logic itself is in the `SegmentCollector`.
///
/// Partitions are not guaranteed to be visited in any specific order, and may
/// be visited in parallel.
pub trait Collector: Sync + Send {
    /// `Fruit` is the type for the result of our collection.
    /// e.g. `usize` for the `Count` collector.
    type Fruit: Send;

    /// Type of the `SegmentCollector` associated with this collector.
    type Child: SegmentCollector;

    /// Validates the collector against the partitions of the searcher,
    /// before any document is collected.
    fn check_partitions(&self, _partitions: &[Partition]) -> crate::Result<()> {
        Ok(())
    }

    /// `for_segment` is the method that creates a `SegmentCollector` for a
    /// given partition. It is called once when collection of the partition starts.
    fn for_segment(&self, partition: &Partition) -> crate::Result<Self::Child>;

    /// Returns true iff the collector requires to compute scores for documents.
    fn requires_scoring(&self) -> bool;

    /// Returns true if the collector does not rely on the scorer tree being
    /// positioned on the collected document.
    ///
    /// Documents are always collected in increasing doc id order. Accepting
    /// out-of-order evaluation only allows the query to buffer its clauses
    /// ahead of the collected document.
    fn accepts_out_of_order(&self) -> bool {
        true
    }

    /// Combines the fruit associated with the collection of each partition
    /// into one fruit.
    ///
    /// `segment_fruits` is indexed by partition ordinal.
    fn merge_fruits(
        &self,
        segment_fruits: Vec<<Self::Child as SegmentCollector>::Fruit>,
    ) -> crate::Result<Self::Fruit>;

    /// Creates a segment collector and runs it over the documents of
    /// `partition` matching `weight`.
    fn collect_segment(
        &self,
        weight: &dyn Weight,
        partition: &Partition,
        context: &CollectionContext,
    ) -> crate::Result<(<Self::Child as SegmentCollector>::Fruit, PartitionStatus)> {
        let mut segment_collector = self.for_segment(partition)?;
        let status = default_collect_segment_impl(
            &mut segment_collector,
            weight,
            partition,
            context,
            self.accepts_out_of_order(),
        )?;
        Ok((segment_collector.harvest(), status))
    }
}

/// Feeds the documents of `partition` matching `weight` to `segment_collector`.
///
/// The cancellation signal is polled before the scorer is built and then
/// every `cancellation_check_interval` collected documents.
pub(crate) fn default_collect_segment_impl<TSegmentCollector: SegmentCollector>(
    segment_collector: &mut TSegmentCollector,
    weight: &dyn Weight,
    partition: &Partition,
    context: &CollectionContext,
    accepts_out_of_order: bool,
) -> crate::Result<PartitionStatus> {
    if context.cancellation.is_cancelled() {
        return Ok(PartitionStatus::Truncated { last_doc: None });
    }
    debug!("collecting {partition:?}");
    let options = CollectionOptions::from_settings(context.settings, accepts_out_of_order);
    let mut scorer = weight.bulk_scorer(partition, 1.0, &options)?;
    segment_collector.set_scorer(scorer.as_ref());
    let check_interval = context.settings.cancellation_check_interval.max(1);
    let mut num_collected = 0usize;
    let mut last_doc = None;
    let mut doc = scorer.doc();
    let status = loop {
        if doc == TERMINATED {
            break PartitionStatus::Exhausted;
        }
        if segment_collector.collect(doc, scorer.as_mut()).is_break() {
            num_collected += 1;
            break PartitionStatus::EarlyTerminated {
                last_doc: Some(doc),
            };
        }
        last_doc = Some(doc);
        num_collected += 1;
        if num_collected % check_interval == 0 && context.cancellation.is_cancelled() {
            break PartitionStatus::Truncated { last_doc };
        }
        doc = scorer.advance();
    };
    debug!(
        "collected {num_collected} docs on partition {}: {status:?}",
        partition.partition_ord()
    );
    Ok(status)
}

/// The `SegmentCollector` is the trait in charge of defining the
/// collect operation at the scale of the partition.
///
/// `.collect(doc, scorer)` is called for each document matching
/// the query, in increasing doc id order.
pub trait SegmentCollector: 'static {
    /// `Fruit` is the type for the result of our collection.
    /// e.g. `usize` for the `Count` collector.
    type Fruit: Send + 'static;

    /// Called once with the root scorer of the partition, before any document
    /// is collected.
    fn set_scorer(&mut self, _scorer: &dyn Scorer) {}

    /// The query pushes the scored document to the collector via this method.
    ///
    /// `scorer` is positioned on `doc`. Returning `ControlFlow::Break` stops
    /// the collection of the partition. A collector that broke may still be
    /// called again when it is combined with other collectors, and must then
    /// keep returning `Break`.
    fn collect(&mut self, doc: DocId, scorer: &mut dyn Scorer) -> ControlFlow<()>;

    /// Extract the fruit of the collection from the `SegmentCollector`.
    fn harvest(self) -> Self::Fruit;
}

impl<Left, Right> Collector for (Left, Right)
where
    Left: Collector,
    Right: Collector,
{
    type Fruit = (Left::Fruit, Right::Fruit);
    type Child = (Left::Child, Right::Child);

    fn check_partitions(&self, partitions: &[Partition]) -> crate::Result<()> {
        self.0.check_partitions(partitions)?;
        self.1.check_partitions(partitions)
    }

    fn for_segment(&self, partition: &Partition) -> crate::Result<Self::Child> {
        let left = self.0.for_segment(partition)?;
        let right = self.1.for_segment(partition)?;
        Ok((left, right))
    }

    fn requires_scoring(&self) -> bool {
        self.0.requires_scoring() || self.1.requires_scoring()
    }

    fn accepts_out_of_order(&self) -> bool {
        self.0.accepts_out_of_order() && self.1.accepts_out_of_order()
    }

    fn merge_fruits(
        &self,
        segment_fruits: Vec<<Self::Child as SegmentCollector>::Fruit>,
    ) -> crate::Result<(Left::Fruit, Right::Fruit)> {
        let (left_fruits, right_fruits): (Vec<_>, Vec<_>) = segment_fruits.into_iter().unzip();
        Ok((
            self.0.merge_fruits(left_fruits)?,
            self.1.merge_fruits(right_fruits)?,
        ))
    }
}

impl<Left, Right> SegmentCollector for (Left, Right)
where
    Left: SegmentCollector,
    Right: SegmentCollector,
{
    type Fruit = (Left::Fruit, Right::Fruit);

    fn set_scorer(&mut self, scorer: &dyn Scorer) {
        self.0.set_scorer(scorer);
        self.1.set_scorer(scorer);
    }

    fn collect(&mut self, doc: DocId, scorer: &mut dyn Scorer) -> ControlFlow<()> {
        let left = self.0.collect(doc, scorer);
        let right = self.1.collect(doc, scorer);
        if left.is_break() && right.is_break() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn harvest(self) -> Self::Fruit {
        (self.0.harvest(), self.1.harvest())
    }
}
