use std::collections::BTreeMap;
use std::ops::ControlFlow;

use super::{Collector, SegmentCollector};
use crate::core::Partition;
use crate::query::{Occur, Scorer};
use crate::DocId;

/// Counts, for every leaf clause of the query, the number of matching
/// documents the clause took part in.
///
/// After each collected document, the scorer tree is walked in place and every
/// non-prohibited leaf positioned on that document is counted. Prohibited
/// clauses never match a collected document and are never reported.
///
/// The walk relies on every clause being positioned on the collected
/// document, so this collector forbids out-of-order evaluation.
///
/// ```rust
/// use std::sync::Arc;
///
/// use boolsearch::collector::ClauseMatchCounts;
/// use boolsearch::postings::InMemoryPostings;
/// use boolsearch::query::{BooleanQuery, Query, TermQuery};
/// use boolsearch::{Partition, SearchSettings, Searcher};
///
/// # fn main() -> boolsearch::Result<()> {
/// let searcher = Searcher::new(Partition::from_max_docs(&[10]), SearchSettings::default())?;
/// let term = |label: &str, docs: Vec<u32>| -> Box<dyn Query> {
///     let postings = InMemoryPostings::with_uniform_score(label, vec![docs], 1.0);
///     Box::new(TermQuery::new(Arc::new(postings)))
/// };
/// let query = BooleanQuery::union(vec![term("a", vec![1, 2]), term("b", vec![2, 3, 4])]);
/// let counts = searcher.search(&query, &ClauseMatchCounts)?;
/// assert_eq!(counts["a"], 2);
/// assert_eq!(counts["b"], 3);
/// # Ok(())
/// # }
/// ```
pub struct ClauseMatchCounts;

impl Collector for ClauseMatchCounts {
    type Fruit = BTreeMap<String, u64>;
    type Child = ClauseMatchCountsSegmentCollector;

    fn for_segment(&self, _: &Partition) -> crate::Result<Self::Child> {
        Ok(ClauseMatchCountsSegmentCollector::default())
    }

    fn requires_scoring(&self) -> bool {
        true
    }

    fn accepts_out_of_order(&self) -> bool {
        false
    }

    fn merge_fruits(
        &self,
        segment_fruits: Vec<BTreeMap<String, u64>>,
    ) -> crate::Result<BTreeMap<String, u64>> {
        let mut merged = BTreeMap::new();
        for counts in segment_fruits {
            for (label, count) in counts {
                *merged.entry(label).or_insert(0) += count;
            }
        }
        Ok(merged)
    }
}

/// Segment collector of [`ClauseMatchCounts`].
#[derive(Default)]
pub struct ClauseMatchCountsSegmentCollector {
    counts: BTreeMap<String, u64>,
}

impl SegmentCollector for ClauseMatchCountsSegmentCollector {
    type Fruit = BTreeMap<String, u64>;

    fn collect(&mut self, doc: DocId, scorer: &mut dyn Scorer) -> ControlFlow<()> {
        // Scoring lazily positions the optional clauses of required-optional scorers.
        scorer.score();
        let counts = &mut self.counts;
        scorer.for_each_leaf(Occur::Must, &mut |occur, label, leaf_doc| {
            if occur == Occur::MustNot || leaf_doc != doc {
                return;
            }
            match counts.get_mut(label) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(label.to_string(), 1);
                }
            }
        });
        ControlFlow::Continue(())
    }

    fn harvest(self) -> BTreeMap<String, u64> {
        self.counts
    }
}
