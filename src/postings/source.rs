use std::fmt;

use crate::core::Partition;
use crate::docset::DocSet;
use crate::{DocId, Score};

/// Computes the score contribution of a single clause for a document.
///
/// The function is only ever called with the document its posting cursor is
/// currently positioned on, so stateful implementations may assume doc ids
/// are requested in increasing order.
pub trait SubScoreFunction: Send {
    /// Returns the score of `doc` for this clause.
    fn score_at(&mut self, doc: DocId) -> Score;
}

impl<F> SubScoreFunction for F
where F: FnMut(DocId) -> Score + Send
{
    fn score_at(&mut self, doc: DocId) -> Score {
        (self)(doc)
    }
}

/// Sub-score function that returns the same score for every document.
#[derive(Clone, Copy, Debug)]
pub struct ConstScore(pub Score);

impl SubScoreFunction for ConstScore {
    fn score_at(&mut self, _doc: DocId) -> Score {
        self.0
    }
}

/// Source of posting cursors for one term.
///
/// The engine does not know how postings are stored. A `PostingsSource`
/// opens, for a given partition, a fresh cursor over the documents containing
/// the term together with the function scoring them.
pub trait PostingsSource: Send + Sync + fmt::Debug + 'static {
    /// Human readable name of the term, used in explanations and scorer trees.
    fn label(&self) -> &str;

    /// Opens a cursor positioned on the first document of the term in `partition`.
    ///
    /// Returns `None` if the term does not appear in the partition.
    fn postings(&self, partition: &Partition) -> crate::Result<Option<Box<dyn DocSet>>>;

    /// Returns the function scoring the documents of `partition` for this term.
    fn score_function(&self, partition: &Partition) -> crate::Result<Box<dyn SubScoreFunction>>;
}
