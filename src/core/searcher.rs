use std::fmt;

use crate::collector::{CollectionContext, Collector, Count, PartitionStatus};
use crate::core::{Cancellation, Executor, Partition, PartitionOrdinal, SearchSettings};
use crate::query::{EnableScoring, Explanation, Query};
use crate::{DocAddress, EngineError};

/// Outcome of a search: the merged fruit of the collector and how each
/// partition ended its collection.
#[derive(Debug)]
pub struct SearchResult<TFruit> {
    /// Merged fruit of the collector.
    pub fruit: TFruit,
    /// Status of each partition, indexed by partition ordinal.
    pub partition_statuses: Vec<PartitionStatus>,
}

impl<TFruit> SearchResult<TFruit> {
    /// Returns true if at least one partition stopped because of cancellation.
    pub fn is_truncated(&self) -> bool {
        self.partition_statuses
            .iter()
            .any(|status| matches!(status, PartitionStatus::Truncated { .. }))
    }

    /// Ordinals of the partitions that stopped because of cancellation.
    pub fn truncated_partitions(&self) -> Vec<PartitionOrdinal> {
        self.partition_statuses
            .iter()
            .enumerate()
            .filter(|(_, status)| matches!(status, PartitionStatus::Truncated { .. }))
            .map(|(ord, _)| ord as PartitionOrdinal)
            .collect()
    }

    /// Drops the partition statuses.
    pub fn into_fruit(self) -> TFruit {
        self.fruit
    }
}

/// Holds a list of `Partition`s and runs queries against them.
///
/// Each partition is collected independently, possibly in parallel depending
/// on `SearchSettings::num_threads`. Per-partition fruits are then merged by
/// the collector.
pub struct Searcher {
    partitions: Vec<Partition>,
    executor: Executor,
    settings: SearchSettings,
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("partitions", &self.partitions)
            .field("settings", &self.settings)
            .finish()
    }
}

impl Searcher {
    /// Creates a searcher over `partitions`.
    ///
    /// Partition `i` of the list must have ordinal `i`.
    pub fn new(partitions: Vec<Partition>, settings: SearchSettings) -> crate::Result<Searcher> {
        settings.validate()?;
        for (ord, partition) in partitions.iter().enumerate() {
            if partition.partition_ord() as usize != ord {
                return Err(EngineError::InvalidArgument(format!(
                    "Partition at position {ord} has ordinal {}",
                    partition.partition_ord()
                )));
            }
        }
        if settings.num_threads > partitions.len().max(1) {
            warn!(
                "num_threads ({}) exceeds the number of partitions ({}), some threads will stay \
                 idle",
                settings.num_threads,
                partitions.len()
            );
        }
        let executor = if settings.num_threads > 1 {
            Executor::multi_thread(settings.num_threads, "search-")?
        } else {
            Executor::single_thread()
        };
        Ok(Searcher {
            partitions,
            executor,
            settings,
        })
    }

    /// Replaces the executor used to collect partitions.
    pub fn with_executor(mut self, executor: Executor) -> Searcher {
        self.executor = executor;
        self
    }

    /// Returns the list of partitions.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Returns the partition with the given ordinal, if any.
    pub fn partition(&self, partition_ord: PartitionOrdinal) -> Option<&Partition> {
        self.partitions.get(partition_ord as usize)
    }

    /// Returns the search settings.
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Returns the overall number of documents across partitions.
    pub fn num_docs(&self) -> u64 {
        self.partitions
            .iter()
            .map(|partition| partition.max_doc() as u64)
            .sum()
    }

    /// Converts a `DocAddress` into a corpus-wide document id.
    ///
    /// Returns `None` if the address does not point to a document of this searcher.
    pub fn global_doc_id(&self, doc_address: DocAddress) -> Option<u64> {
        let partition = self.partition(doc_address.partition_ord)?;
        if doc_address.doc_id >= partition.max_doc() {
            return None;
        }
        Some(partition.global_doc_id(doc_address.doc_id))
    }

    /// Runs a query and returns the merged fruit of the collector.
    pub fn search<C: Collector>(&self, query: &dyn Query, collector: &C) -> crate::Result<C::Fruit> {
        let result = self.search_with_cancellation(query, collector, &Cancellation::default())?;
        Ok(result.into_fruit())
    }

    /// Runs a query, polling `cancellation` while collecting.
    ///
    /// A cancelled search still returns the documents collected before the
    /// signal was observed. The affected partitions are reported as truncated.
    pub fn search_with_cancellation<C: Collector>(
        &self,
        query: &dyn Query,
        collector: &C,
        cancellation: &Cancellation,
    ) -> crate::Result<SearchResult<C::Fruit>> {
        self.check_clause_counts(query)?;
        collector.check_partitions(&self.partitions)?;
        let enable_scoring = EnableScoring::from_requirement(collector.requires_scoring());
        let weight = query.weight(enable_scoring)?;
        let context = CollectionContext::new(&self.settings, cancellation);
        let partition_results = self.executor.map(
            |partition| collector.collect_segment(weight.as_ref(), partition, &context),
            self.partitions.iter(),
        )?;
        let mut partition_fruits = Vec::with_capacity(partition_results.len());
        let mut partition_statuses = Vec::with_capacity(partition_results.len());
        for (partition, (fruit, status)) in self.partitions.iter().zip(partition_results) {
            if let PartitionStatus::Truncated { last_doc } = status {
                info!(
                    "partition {} truncated by cancellation, last collected doc {last_doc:?}",
                    partition.partition_ord()
                );
            }
            partition_fruits.push(fruit);
            partition_statuses.push(status);
        }
        let fruit = collector.merge_fruits(partition_fruits)?;
        Ok(SearchResult {
            fruit,
            partition_statuses,
        })
    }

    /// Returns the overall number of documents matching a query.
    pub fn count(&self, query: &dyn Query) -> crate::Result<usize> {
        self.search(query, &Count)
    }

    /// Explains how the score of a document was computed.
    pub fn explain(&self, query: &dyn Query, doc_address: DocAddress) -> crate::Result<Explanation> {
        self.check_clause_counts(query)?;
        query.explain(self, doc_address)
    }

    /// Rejects queries holding a boolean query with more clauses than
    /// `SearchSettings::max_clause_count`.
    pub fn check_clause_counts(&self, query: &dyn Query) -> crate::Result<()> {
        let max_clause_count = self.settings.max_clause_count;
        let mut largest = 0;
        query.visit_clause_counts(&mut |num_clauses| largest = largest.max(num_clauses));
        if largest > max_clause_count {
            return Err(EngineError::TooManyClauses {
                num_clauses: largest,
                max_clause_count,
            });
        }
        Ok(())
    }
}
