use std::fmt;

use downcast_rs::impl_downcast;

use super::Weight;
use crate::core::Searcher;
use crate::query::Explanation;
use crate::{DocAddress, EngineError};

/// Argument used in `Query::weight(..)`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnableScoring {
    /// Pass this to enable scoring.
    Enabled,
    /// Pass this to disable scoring.
    /// This can improve performance.
    Disabled,
}

impl EnableScoring {
    /// Enables scoring if `requires_scoring` is true.
    pub fn from_requirement(requires_scoring: bool) -> EnableScoring {
        if requires_scoring {
            EnableScoring::Enabled
        } else {
            EnableScoring::Disabled
        }
    }

    /// Returns true if the scoring is enabled.
    pub fn is_scoring_enabled(&self) -> bool {
        matches!(self, EnableScoring::Enabled)
    }
}

/// The `Query` trait defines a set of documents and a scoring method
/// for those documents.
///
/// The `Query` trait is in charge of defining :
///
/// - a set of documents
/// - a way to score these documents
///
/// When performing a [search](Searcher::search), these documents will then
/// be pushed to a [`Collector`](crate::collector::Collector),
/// which will in turn be in charge of deciding what to do with them.
///
/// Concretely, this scored docset is represented by the
/// [`Scorer`](crate::query::Scorer) trait.
///
/// Because the documents are split into partitions, the
/// query does not actually directly creates [`DocSet`](crate::DocSet) object.
/// Instead, the query creates a [`Weight`] object, which in turn makes it
/// possible to create a scorer for a specific [`Partition`](crate::Partition).
///
/// So to sum it up :
/// - a `Query` is a recipe to define a set of documents as well the way to score them.
/// - a [`Weight`] is this recipe, validated and ready to be applied to any partition.
/// - a [`Scorer`](crate::query::Scorer) is a cursor over the set of matching
///   documents, for a specific partition. It is created by the [`Weight`].
pub trait Query: QueryClone + Send + Sync + downcast_rs::Downcast + fmt::Debug {
    /// Create the weight associated with a query.
    ///
    /// If scoring is not required, passing [`EnableScoring::Disabled`]
    /// can increase performances.
    ///
    /// See [`Weight`].
    fn weight(&self, enable_scoring: EnableScoring) -> crate::Result<Box<dyn Weight>>;

    /// Calls `visitor` with the number of clauses of every boolean query
    /// found in this query tree.
    ///
    /// Queries wrapping other queries must forward the call to them.
    fn visit_clause_counts(&self, _visitor: &mut dyn FnMut(usize)) {}

    /// Returns an `Explanation` for the score of the document.
    fn explain(&self, searcher: &Searcher, doc_address: DocAddress) -> crate::Result<Explanation> {
        let weight = self.weight(EnableScoring::Enabled)?;
        let partition = searcher
            .partition(doc_address.partition_ord)
            .ok_or_else(|| {
                EngineError::InvalidArgument(format!(
                    "Partition #({}) does not exist",
                    doc_address.partition_ord
                ))
            })?;
        weight.explain(partition, doc_address.doc_id)
    }

    /// Returns the number of documents matching the query.
    fn count(&self, searcher: &Searcher) -> crate::Result<usize> {
        let weight = self.weight(EnableScoring::Disabled)?;
        let mut result = 0;
        for partition in searcher.partitions() {
            result += weight.count(partition)? as usize;
        }
        Ok(result)
    }
}

/// Implements `box_clone`.
pub trait QueryClone {
    /// Returns a boxed clone of `self`.
    fn box_clone(&self) -> Box<dyn Query>;
}

impl<T> QueryClone for T
where T: 'static + Query + Clone
{
    fn box_clone(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }
}

impl Query for Box<dyn Query> {
    fn weight(&self, enable_scoring: EnableScoring) -> crate::Result<Box<dyn Weight>> {
        self.as_ref().weight(enable_scoring)
    }

    fn visit_clause_counts(&self, visitor: &mut dyn FnMut(usize)) {
        self.as_ref().visit_clause_counts(visitor);
    }

    fn explain(&self, searcher: &Searcher, doc_address: DocAddress) -> crate::Result<Explanation> {
        self.as_ref().explain(searcher, doc_address)
    }

    fn count(&self, searcher: &Searcher) -> crate::Result<usize> {
        self.as_ref().count(searcher)
    }
}

impl QueryClone for Box<dyn Query> {
    fn box_clone(&self) -> Box<dyn Query> {
        self.as_ref().box_clone()
    }
}

impl_downcast!(Query);
