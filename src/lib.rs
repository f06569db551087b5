#![doc(test(attr(allow(unused_variables), deny(warnings))))]
#![warn(missing_docs)]
#![allow(clippy::len_without_is_empty)]
#![cfg_attr(all(feature = "unstable", test), feature(test))]

//! `boolsearch` is the query evaluation core of a full-text search engine.
//!
//! It takes one posting cursor per term and per partition, combines them
//! according to required / optional / prohibited clauses and a minimum number
//! of optional clauses to match, scores every matching document and collects
//! the top results. Results computed independently on every partition are
//! merged into one globally ordered, paginated list.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use boolsearch::collector::TopDocs;
//! use boolsearch::postings::InMemoryPostings;
//! use boolsearch::query::{BooleanQuery, Occur, Query, TermQuery};
//! use boolsearch::{Partition, SearchSettings, Searcher};
//!
//! # fn main() -> boolsearch::Result<()> {
//! let searcher = Searcher::new(Partition::from_max_docs(&[10]), SearchSettings::default())?;
//! let term = |label: &str, docs: Vec<u32>| -> Box<dyn Query> {
//!     let postings = InMemoryPostings::with_uniform_score(label, vec![docs], 1.0);
//!     Box::new(TermQuery::new(Arc::new(postings)))
//! };
//! let query = BooleanQuery::new(vec![
//!     (Occur::Must, term("a", vec![1, 2, 3])),
//!     (Occur::Must, term("b", vec![2, 3, 4])),
//! ]);
//! let top_hits = searcher.search(&query, &TopDocs::with_limit(10))?;
//! assert_eq!(top_hits.hits.len(), 2);
//! # Ok(())
//! # }
//! ```

#[cfg(all(test, feature = "unstable"))]
extern crate test;

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod collector;
mod core;
mod docset;
mod error;
pub mod postings;
pub mod query;

use serde::{Deserialize, Serialize};

pub use crate::core::{
    Cancellation, Executor, Partition, PartitionOrdinal, SearchResult, SearchSettings, Searcher,
};
pub use crate::docset::{DocSet, TERMINATED};
pub use crate::error::EngineError;

/// Expose the current version of the engine as defined in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine's result type.
pub type Result<T> = std::result::Result<T, EngineError>;

/// A `u32` identifying a document within a partition.
/// Documents have their `DocId` assigned incrementally,
/// as they are added in the partition.
///
/// At most, a partition can contain 2^31 documents.
pub type DocId = u32;

/// A f32 that represents the relevance of the document to the query
pub type Score = f32;

/// `DocAddress` contains all the necessary information
/// to identify a document given a `Searcher` object.
///
/// It consists of an id identifying its partition, and
/// a partition-local `DocId`.
///
/// The id used for the partition is actually an ordinal
/// in the list of `Partition`s held by a `Searcher`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocAddress {
    /// The partition ordinal id that identifies the partition
    /// hosting the document in the `Searcher` it is called from.
    pub partition_ord: PartitionOrdinal,
    /// The partition-local `DocId`.
    pub doc_id: DocId,
}

impl DocAddress {
    /// Creates a new `DocAddress` from the partition/docId pair.
    pub fn new(partition_ord: PartitionOrdinal, doc_id: DocId) -> DocAddress {
        DocAddress {
            partition_ord,
            doc_id,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::distributions::{Bernoulli, Uniform};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::DocId;

    /// Samples every doc id in `[0, n)` independently with probability `ratio`.
    pub fn sample_with_seed(n: u32, ratio: f64, seed_val: u8) -> Vec<DocId> {
        StdRng::from_seed([seed_val; 32])
            .sample_iter(&Bernoulli::new(ratio).unwrap())
            .take(n as usize)
            .enumerate()
            .filter_map(|(val, keep)| if keep { Some(val as u32) } else { None })
            .collect()
    }

    pub fn sample(n: u32, ratio: f64) -> Vec<DocId> {
        sample_with_seed(n, ratio, 4)
    }

    /// Generates `n` pseudo random scores within `[0, 10)`.
    pub fn random_scores(n: usize, seed_val: u8) -> Vec<f32> {
        StdRng::from_seed([seed_val; 32])
            .sample_iter(&Uniform::new(0.0f32, 10.0f32))
            .take(n)
            .collect()
    }

    #[test]
    fn test_sample_is_sorted_and_dedup() {
        let docs = sample_with_seed(10_000, 0.1, 3);
        assert!(docs.windows(2).all(|w| w[0] < w[1]));
        assert!(!docs.is_empty());
    }
}
