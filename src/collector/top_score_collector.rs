use std::cmp::Ordering;
use std::fmt;
use std::ops::ControlFlow;

use super::merge::merge_top_hits;
use super::sort_key::{PartitionSortKeys, Sort};
use super::top_collector::{Comparator, TopNComputer};
use super::top_hits::{Hit, HitComparator, PageBoundary, TopHits};
use super::{Collector, SegmentCollector};
use crate::core::Partition;
use crate::query::Scorer;
use crate::{DocAddress, DocId, EngineError, PartitionOrdinal, Score};

/// Options of a [`TopDocs`] collector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Computes the score of every hit even when the ordering does not use it.
    pub track_scores: bool,
    /// Reports the highest score among all matching documents.
    pub track_max_score: bool,
    /// Forbids the query from buffering its clauses ahead of the collected
    /// document, see [`Collector::accepts_out_of_order`].
    pub require_in_order: bool,
}

/// The `TopDocs` collector keeps track of the top `K` documents
/// sorted by their score, or by a multi-criteria [`Sort`].
///
/// The implementation is based on a repeatedly truncated binary heap, one per
/// partition, whose results are merged at the end of the search. The
/// theoretical complexity for collecting the top `K` out of `n` documents is
/// `O(n log K)`.
///
/// Ties are broken on the partition ordinal then on the doc id, ascending.
/// This makes the ordering total and stable, so that [`TopDocs::and_offset`]
/// and [`TopDocs::search_after`] can be used for pagination.
///
/// ```rust
/// use std::sync::Arc;
///
/// use boolsearch::collector::TopDocs;
/// use boolsearch::postings::InMemoryPostings;
/// use boolsearch::query::TermQuery;
/// use boolsearch::{DocAddress, Partition, SearchSettings, Searcher};
///
/// # fn main() -> boolsearch::Result<()> {
/// let searcher = Searcher::new(Partition::from_max_docs(&[4, 4]), SearchSettings::default())?;
/// let diary = InMemoryPostings::new("diary")
///     .add_partition(vec![(1, 0.7), (3, 0.6)])
///     .add_partition(vec![(2, 0.9)]);
/// let query = TermQuery::new(Arc::new(diary));
///
/// let top_hits = searcher.search(&query, &TopDocs::with_limit(2))?;
/// assert_eq!(top_hits.total_hits, 3);
/// assert_eq!(
///     top_hits.doc_addresses(),
///     vec![DocAddress::new(1, 2), DocAddress::new(0, 1)]
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TopDocs {
    limit: usize,
    offset: usize,
    sort: Option<Sort>,
    config: CollectorConfig,
    after: Option<PageBoundary>,
}

impl fmt::Debug for TopDocs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TopDocs(limit={}, offset={}, sort={:?})",
            self.limit, self.offset, self.sort
        )
    }
}

impl TopDocs {
    /// Creates a top score collector, with a number of documents equal to "limit".
    ///
    /// A limit of 0 retains no hit, but still reports the total hit count and,
    /// if tracked, the max score.
    pub fn with_limit(limit: usize) -> TopDocs {
        TopDocs {
            limit,
            offset: 0,
            sort: None,
            config: CollectorConfig::default(),
            after: None,
        }
    }

    /// Skip the first "offset" documents when collecting.
    ///
    /// This is equivalent to `OFFSET` in MySQL or PostgreSQL and `start` in
    /// Lucene's TopDocsCollector.
    pub fn and_offset(mut self, offset: usize) -> TopDocs {
        self.offset = offset;
        self
    }

    /// Ranks hits by `sort` instead of by decreasing score.
    pub fn order_by(mut self, sort: Sort) -> TopDocs {
        self.sort = Some(sort);
        self
    }

    /// Sets the collector options.
    pub fn with_config(mut self, config: CollectorConfig) -> TopDocs {
        self.config = config;
        self
    }

    /// Only retains hits ranking strictly after `boundary`.
    ///
    /// The boundary is usually the last hit of the previous page.
    pub fn search_after(mut self, boundary: PageBoundary) -> TopDocs {
        self.after = Some(boundary);
        self
    }

    /// Comparator ranking the hits of this collector.
    pub fn comparator(&self) -> HitComparator {
        match &self.sort {
            Some(sort) => sort.comparator(),
            None => HitComparator::by_score(),
        }
    }

    fn tracks_max_score(&self) -> bool {
        self.config.track_max_score || self.sort.is_none()
    }

    fn check_boundary(&self, boundary: &PageBoundary, partitions: &[Partition]) -> crate::Result<()> {
        let address = boundary.address();
        let invalid = |reason: String| EngineError::InvalidPageBoundary { address, reason };
        let Some(partition) = partitions.get(address.partition_ord as usize) else {
            return Err(invalid(format!(
                "partition #{} does not exist",
                address.partition_ord
            )));
        };
        if address.doc_id >= partition.max_doc() {
            return Err(invalid(format!(
                "doc id {} is beyond the partition max doc {}",
                address.doc_id,
                partition.max_doc()
            )));
        }
        let comparator = self.comparator();
        let hit = boundary.hit();
        if hit.sort_values.len() != comparator.num_values() {
            return Err(EngineError::InvalidArgument(format!(
                "Page boundary holds {} sort values, the sort has {} key fields",
                hit.sort_values.len(),
                comparator.num_values()
            )));
        }
        if comparator.uses_score() && hit.score.is_none() {
            return Err(EngineError::InvalidArgument(
                "Page boundary lacks a score while the sort ranks on scores".to_string(),
            ));
        }
        Ok(())
    }
}

impl Collector for TopDocs {
    type Fruit = TopHits;

    type Child = TopHitsSegmentCollector;

    fn check_partitions(&self, partitions: &[Partition]) -> crate::Result<()> {
        if let Some(boundary) = &self.after {
            self.check_boundary(boundary, partitions)?;
        }
        Ok(())
    }

    fn for_segment(&self, partition: &Partition) -> crate::Result<TopHitsSegmentCollector> {
        let sort_keys = match &self.sort {
            Some(sort) => sort
                .extractors()
                .map(|extractor| extractor.for_partition(partition))
                .collect::<crate::Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        let comparator = self.comparator();
        Ok(TopHitsSegmentCollector {
            partition_ord: partition.partition_ord(),
            top_n: TopNComputer::new_with_comparator(
                self.offset.saturating_add(self.limit),
                comparator,
            ),
            sort_keys,
            after: self.after.as_ref().map(|boundary| boundary.hit().clone()),
            scoring_enabled: self.requires_scoring(),
            track_max_score: self.tracks_max_score(),
            total_hits: 0,
            max_score: None,
        })
    }

    fn requires_scoring(&self) -> bool {
        match &self.sort {
            Some(sort) => {
                sort.needs_scores() || self.config.track_scores || self.config.track_max_score
            }
            None => true,
        }
    }

    fn accepts_out_of_order(&self) -> bool {
        !self.config.require_in_order
    }

    fn merge_fruits(&self, segment_fruits: Vec<TopHits>) -> crate::Result<TopHits> {
        Ok(merge_top_hits(
            segment_fruits,
            &self.comparator(),
            self.offset,
            self.limit,
        ))
    }
}

/// Segment collector of [`TopDocs`].
pub struct TopHitsSegmentCollector {
    partition_ord: PartitionOrdinal,
    top_n: TopNComputer<Hit, HitComparator>,
    sort_keys: Vec<Box<dyn PartitionSortKeys>>,
    after: Option<Hit>,
    scoring_enabled: bool,
    track_max_score: bool,
    total_hits: u64,
    max_score: Option<Score>,
}

impl SegmentCollector for TopHitsSegmentCollector {
    type Fruit = TopHits;

    fn collect(&mut self, doc: DocId, scorer: &mut dyn Scorer) -> ControlFlow<()> {
        self.total_hits += 1;
        let score = if self.scoring_enabled {
            Some(scorer.score())
        } else {
            None
        };
        if self.track_max_score {
            if let Some(score) = score {
                self.max_score = Some(self.max_score.map_or(score, |max| max.max(score)));
            }
        }
        if self.top_n.top_n() == 0 {
            return ControlFlow::Continue(());
        }
        let hit = Hit {
            address: DocAddress::new(self.partition_ord, doc),
            score,
            sort_values: self
                .sort_keys
                .iter_mut()
                .map(|sort_keys| sort_keys.key_at(doc))
                .collect(),
        };
        if let Some(after) = &self.after {
            if self.top_n.comparator().compare(&hit, after) != Ordering::Greater {
                return ControlFlow::Continue(());
            }
        }
        self.top_n.push(hit);
        ControlFlow::Continue(())
    }

    fn harvest(self) -> TopHits {
        TopHits {
            total_hits: self.total_hits,
            max_score: self.max_score,
            hits: self.top_n.into_sorted_vec(),
        }
    }
}
