use std::sync::Arc;

use super::boolean_weight::BooleanWeight;
use crate::postings::PostingsSource;
use crate::query::{
    CoordTable, Coordination, EnableScoring, Occur, OverlapCoordination, Query, TermQuery, Weight,
};
use crate::EngineError;

/// The boolean query returns a set of documents
/// that matches the Boolean combination of constituent subqueries.
///
/// The documents matched by the boolean query are those which:
/// * match all of the sub queries associated with the `Must` occurrence
/// * match none of the sub queries associated with the `MustNot` occurrence.
/// * match at least `minimum_should_match` of the sub queries associated with the `Should`
///   occurrence. Without required clauses this defaults to one. With required clauses it
///   defaults to zero: optional clauses then only contribute to the score.
///
/// The score of a document is the sum of the scores of the clauses it matches,
/// multiplied by a coordination factor rewarding documents matching more of the
/// non-prohibited clauses. See [`Coordination`].
///
/// A query without any `Must` or `Should` clause is rejected when the weight is built.
///
/// ```rust
/// use std::sync::Arc;
///
/// use boolsearch::collector::Count;
/// use boolsearch::postings::InMemoryPostings;
/// use boolsearch::query::{BooleanQuery, Occur, Query, TermQuery};
/// use boolsearch::{Partition, SearchSettings, Searcher};
///
/// # fn main() -> boolsearch::Result<()> {
/// let searcher = Searcher::new(Partition::from_max_docs(&[10]), SearchSettings::default())?;
/// let term = |label: &str, docs: Vec<u32>| -> Box<dyn Query> {
///     let postings = InMemoryPostings::with_uniform_score(label, vec![docs], 1.0);
///     Box::new(TermQuery::new(Arc::new(postings)))
/// };
/// let query = BooleanQuery::new(vec![
///     (Occur::Should, term("a", vec![1, 2, 3])),
///     (Occur::Should, term("b", vec![2, 3, 4])),
///     (Occur::Should, term("c", vec![3, 4, 5])),
///     (Occur::MustNot, term("d", vec![4])),
/// ])
/// .with_minimum_should_match(2);
/// assert_eq!(searcher.search(&query, &Count)?, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BooleanQuery {
    subqueries: Vec<(Occur, Box<dyn Query>)>,
    minimum_should_match: Option<usize>,
    coord_disabled: bool,
    coordination: Arc<dyn Coordination>,
}

impl Clone for BooleanQuery {
    fn clone(&self) -> Self {
        let subqueries = self
            .subqueries
            .iter()
            .map(|(occur, subquery)| (*occur, subquery.box_clone()))
            .collect::<Vec<_>>();
        BooleanQuery {
            subqueries,
            minimum_should_match: self.minimum_should_match,
            coord_disabled: self.coord_disabled,
            coordination: self.coordination.clone(),
        }
    }
}

impl From<Vec<(Occur, Box<dyn Query>)>> for BooleanQuery {
    fn from(subqueries: Vec<(Occur, Box<dyn Query>)>) -> BooleanQuery {
        BooleanQuery::new(subqueries)
    }
}

impl Query for BooleanQuery {
    fn weight(&self, enable_scoring: EnableScoring) -> crate::Result<Box<dyn Weight>> {
        self.validate()?;
        let sub_weights = self
            .subqueries
            .iter()
            .map(|(occur, subquery)| {
                Ok((*occur, format!("{subquery:?}"), subquery.weight(enable_scoring)?))
            })
            .collect::<crate::Result<Vec<_>>>()?;
        let max_coord = self
            .subqueries
            .iter()
            .filter(|(occur, _)| occur.is_positive())
            .count() as u32;
        let coord = if self.coord_disabled || !enable_scoring.is_scoring_enabled() {
            CoordTable::identity()
        } else {
            CoordTable::new(self.coordination.as_ref(), max_coord)
        };
        Ok(Box::new(BooleanWeight::new(
            sub_weights,
            self.minimum_should_match,
            coord,
            max_coord,
            enable_scoring.is_scoring_enabled(),
        )))
    }

    fn visit_clause_counts(&self, visitor: &mut dyn FnMut(usize)) {
        visitor(self.subqueries.len());
        for (_, subquery) in &self.subqueries {
            subquery.visit_clause_counts(visitor);
        }
    }
}

impl BooleanQuery {
    /// Creates a new boolean query.
    pub fn new(subqueries: Vec<(Occur, Box<dyn Query>)>) -> BooleanQuery {
        BooleanQuery {
            subqueries,
            minimum_should_match: None,
            coord_disabled: false,
            coordination: Arc::new(OverlapCoordination),
        }
    }

    /// Returns the intersection of the queries.
    pub fn intersection(queries: Vec<Box<dyn Query>>) -> BooleanQuery {
        let subqueries = queries.into_iter().map(|s| (Occur::Must, s)).collect();
        BooleanQuery::new(subqueries)
    }

    /// Returns the union of the queries.
    pub fn union(queries: Vec<Box<dyn Query>>) -> BooleanQuery {
        let subqueries = queries.into_iter().map(|s| (Occur::Should, s)).collect();
        BooleanQuery::new(subqueries)
    }

    /// Helper method to create a boolean query matching a given list of terms.
    /// The resulting query is a disjunction of the terms.
    pub fn new_multiterms_query(terms: Vec<Arc<dyn PostingsSource>>) -> BooleanQuery {
        let occur_term_queries: Vec<(Occur, Box<dyn Query>)> = terms
            .into_iter()
            .map(|term| {
                let term_query: Box<dyn Query> = Box::new(TermQuery::new(term));
                (Occur::Should, term_query)
            })
            .collect();
        BooleanQuery::new(occur_term_queries)
    }

    /// Requires documents to match at least `minimum_should_match` of the `Should` clauses.
    ///
    /// The value must be within `1..=number of Should clauses`, otherwise building
    /// the weight fails.
    pub fn with_minimum_should_match(mut self, minimum_should_match: usize) -> BooleanQuery {
        self.minimum_should_match = Some(minimum_should_match);
        self
    }

    /// Disables coordination: the score of a document is the plain sum of the
    /// scores of the clauses it matches.
    pub fn with_coord_disabled(mut self) -> BooleanQuery {
        self.coord_disabled = true;
        self
    }

    /// Replaces the default [`OverlapCoordination`].
    pub fn with_coordination(mut self, coordination: Arc<dyn Coordination>) -> BooleanQuery {
        self.coordination = coordination;
        self
    }

    /// Deconstructed view of the clauses making up this query.
    pub fn clauses(&self) -> &[(Occur, Box<dyn Query>)] {
        &self.subqueries[..]
    }

    /// Minimum number of `Should` clauses a document has to match, if set.
    pub fn minimum_should_match(&self) -> Option<usize> {
        self.minimum_should_match
    }

    fn validate(&self) -> crate::Result<()> {
        if self.subqueries.is_empty() {
            return Err(EngineError::NoClauses);
        }
        if !self.subqueries.iter().any(|(occur, _)| occur.is_positive()) {
            return Err(EngineError::NoPositiveClause);
        }
        if let Some(minimum_match) = self.minimum_should_match {
            let optional_clauses = self
                .subqueries
                .iter()
                .filter(|(occur, _)| *occur == Occur::Should)
                .count();
            if minimum_match == 0 || minimum_match > optional_clauses {
                return Err(EngineError::InvalidMinimumMatch {
                    minimum_match,
                    optional_clauses,
                });
            }
        }
        Ok(())
    }
}
