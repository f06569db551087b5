use std::ops::ControlFlow;

use super::{Collector, SegmentCollector};
use crate::core::Partition;
use crate::query::Scorer;
use crate::DocId;

/// `Count` collector only counts how many
/// documents match the query.
///
/// ```rust
/// use std::sync::Arc;
///
/// use boolsearch::collector::Count;
/// use boolsearch::postings::InMemoryPostings;
/// use boolsearch::query::TermQuery;
/// use boolsearch::{Partition, SearchSettings, Searcher};
///
/// let searcher =
///     Searcher::new(Partition::from_max_docs(&[4, 4]), SearchSettings::default()).unwrap();
/// let diary = InMemoryPostings::with_uniform_score("diary", vec![vec![1], vec![0, 3]], 1.0);
/// let query = TermQuery::new(Arc::new(diary));
/// let count = searcher.search(&query, &Count).unwrap();
///
/// assert_eq!(count, 3);
/// ```
pub struct Count;

impl Collector for Count {
    type Fruit = usize;

    type Child = SegmentCountCollector;

    fn for_segment(&self, _: &Partition) -> crate::Result<SegmentCountCollector> {
        Ok(SegmentCountCollector::default())
    }

    fn requires_scoring(&self) -> bool {
        false
    }

    fn merge_fruits(&self, segment_counts: Vec<usize>) -> crate::Result<usize> {
        Ok(segment_counts.into_iter().sum())
    }
}

/// Segment collector of [`Count`].
#[derive(Default)]
pub struct SegmentCountCollector {
    count: usize,
}

impl SegmentCollector for SegmentCountCollector {
    type Fruit = usize;

    fn collect(&mut self, _: DocId, _: &mut dyn Scorer) -> ControlFlow<()> {
        self.count += 1;
        ControlFlow::Continue(())
    }

    fn harvest(self) -> usize {
        self.count
    }
}
