use std::collections::HashSet;
use std::ops::ControlFlow;

use super::{Collector, SegmentCollector};
use crate::core::Partition;
use crate::query::Scorer;
use crate::DocId;

/// Collectors that returns the set of corpus-wide ids of the documents
/// matching the query.
///
/// The id of a document is `doc_base + doc_id`, see
/// [`Partition::global_doc_id`].
///
/// This collector is mostly useful for tests.
pub struct DocSetCollector;

impl Collector for DocSetCollector {
    type Fruit = HashSet<u64>;
    type Child = DocSetChildCollector;

    fn for_segment(&self, partition: &Partition) -> crate::Result<Self::Child> {
        Ok(DocSetChildCollector {
            partition: *partition,
            docs: Vec::new(),
        })
    }

    fn requires_scoring(&self) -> bool {
        false
    }

    fn merge_fruits(&self, segment_fruits: Vec<Vec<u64>>) -> crate::Result<Self::Fruit> {
        let len: usize = segment_fruits.iter().map(Vec::len).sum();
        let mut result = HashSet::with_capacity(len);
        for docs in segment_fruits {
            result.extend(docs);
        }
        Ok(result)
    }
}

/// Segment collector of [`DocSetCollector`].
pub struct DocSetChildCollector {
    partition: Partition,
    docs: Vec<u64>,
}

impl SegmentCollector for DocSetChildCollector {
    type Fruit = Vec<u64>;

    fn collect(&mut self, doc: DocId, _scorer: &mut dyn Scorer) -> ControlFlow<()> {
        self.docs.push(self.partition.global_doc_id(doc));
        ControlFlow::Continue(())
    }

    fn harvest(self) -> Vec<u64> {
        self.docs
    }
}
