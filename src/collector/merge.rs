use std::cmp::Ordering;

use itertools::Itertools;

use super::top_collector::Comparator;
use super::top_hits::{HitComparator, TopHits};

/// Merges the top hits computed independently on several partitions.
///
/// Every input list must be sorted by `comparator`, as harvested from a
/// partition. The lists are merged with a heap over their heads, the first
/// `offset` hits are skipped and at most `limit` hits are kept. Total hit
/// counts are summed and the overall max score is the max of the partition
/// max scores.
///
/// Provided every partition retained its `offset + limit` best hits, the
/// result is the same as if all partitions had been searched as one.
pub fn merge_top_hits(
    partition_hits: Vec<TopHits>,
    comparator: &HitComparator,
    offset: usize,
    limit: usize,
) -> TopHits {
    let total_hits = partition_hits
        .iter()
        .map(|top_hits| top_hits.total_hits)
        .sum();
    let max_score = partition_hits
        .iter()
        .filter_map(|top_hits| top_hits.max_score)
        .fold(None, |max: Option<f32>, score| {
            Some(max.map_or(score, |max| max.max(score)))
        });
    let hits = partition_hits
        .into_iter()
        .map(|top_hits| top_hits.hits)
        .kmerge_by(|lhs, rhs| comparator.compare(lhs, rhs) == Ordering::Less)
        .skip(offset)
        .take(limit)
        .collect();
    TopHits {
        total_hits,
        max_score,
        hits,
    }
}
