use std::fmt;

use crate::DocId;

/// Ordinal of a partition within the list held by a `Searcher`.
pub type PartitionOrdinal = u32;

/// A partition is an independently searchable slice of the corpus.
///
/// Documents of a partition are identified by a local `DocId` in `[0, max_doc)`.
/// `doc_base` is the sum of the `max_doc` of all preceding partitions, which
/// makes `doc_base + doc_id` a corpus-wide unique id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    partition_ord: PartitionOrdinal,
    max_doc: DocId,
    doc_base: u64,
}

impl fmt::Debug for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Partition({}, max_doc={}, doc_base={})",
            self.partition_ord, self.max_doc, self.doc_base
        )
    }
}

impl Partition {
    /// Creates a new partition.
    pub fn new(partition_ord: PartitionOrdinal, max_doc: DocId, doc_base: u64) -> Partition {
        Partition {
            partition_ord,
            max_doc,
            doc_base,
        }
    }

    /// Lays out consecutive partitions with the given number of documents.
    pub fn from_max_docs(max_docs: &[DocId]) -> Vec<Partition> {
        let mut doc_base = 0u64;
        max_docs
            .iter()
            .enumerate()
            .map(|(ord, &max_doc)| {
                let partition = Partition::new(ord as PartitionOrdinal, max_doc, doc_base);
                doc_base += max_doc as u64;
                partition
            })
            .collect()
    }

    /// Ordinal of the partition.
    pub fn partition_ord(&self) -> PartitionOrdinal {
        self.partition_ord
    }

    /// Returns one more than the highest `DocId` a cursor of this partition may yield.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// Number of documents held by the preceding partitions.
    pub fn doc_base(&self) -> u64 {
        self.doc_base
    }

    /// Returns the corpus-wide id of a partition-local document.
    pub fn global_doc_id(&self, doc: DocId) -> u64 {
        self.doc_base + doc as u64
    }
}
