use std::ops::ControlFlow;

use super::{
    default_collect_segment_impl, CollectionContext, Collector, PartitionStatus, SegmentCollector,
};
use crate::core::Partition;
use crate::query::{Scorer, Weight};
use crate::{DocAddress, DocId, PartitionOrdinal};

/// Collects the first `limit` matching documents, in partition then doc id
/// order, without scoring them.
///
/// Each partition stops as soon as it holds `limit` documents. The partition
/// is then reported as early terminated rather than exhausted.
///
/// With a limit of 0 no document is read: every partition is reported as
/// early terminated, without a last document.
pub struct FirstNCollector {
    limit: usize,
}

impl FirstNCollector {
    /// Creates a collector keeping the first `limit` documents.
    pub fn with_limit(limit: usize) -> FirstNCollector {
        FirstNCollector { limit }
    }
}

impl Collector for FirstNCollector {
    type Fruit = Vec<DocAddress>;
    type Child = FirstNSegmentCollector;

    fn for_segment(&self, partition: &Partition) -> crate::Result<FirstNSegmentCollector> {
        Ok(FirstNSegmentCollector {
            partition_ord: partition.partition_ord(),
            docs: Vec::with_capacity(self.limit.min(1_024)),
            limit: self.limit,
        })
    }

    fn requires_scoring(&self) -> bool {
        false
    }

    fn accepts_out_of_order(&self) -> bool {
        false
    }

    fn collect_segment(
        &self,
        weight: &dyn Weight,
        partition: &Partition,
        context: &CollectionContext,
    ) -> crate::Result<(Vec<DocAddress>, PartitionStatus)> {
        if self.limit == 0 {
            return Ok((Vec::new(), PartitionStatus::EarlyTerminated { last_doc: None }));
        }
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

    fn merge_fruits(&self, segment_fruits: Vec<Vec<DocAddress>>) -> crate::Result<Vec<DocAddress>> {
        Ok(segment_fruits
            .into_iter()
            .flatten()
            .take(self.limit)
            .collect())
    }
}

/// Segment collector of [`FirstNCollector`].
pub struct FirstNSegmentCollector {
    partition_ord: PartitionOrdinal,
    docs: Vec<DocAddress>,
    limit: usize,
}

impl SegmentCollector for FirstNSegmentCollector {
    type Fruit = Vec<DocAddress>;

    fn collect(&mut self, doc: DocId, _: &mut dyn Scorer) -> ControlFlow<()> {
        if self.docs.len() < self.limit {
            self.docs.push(DocAddress::new(self.partition_ord, doc));
        }
        if self.docs.len() >= self.limit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn harvest(self) -> Vec<DocAddress> {
        self.docs
    }
}
