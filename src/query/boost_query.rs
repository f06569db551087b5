use std::fmt;

use crate::core::Partition;
use crate::query::explanation::does_not_match;
use crate::query::{CollectionOptions, EnableScoring, Explanation, Query, Scorer, Weight};
use crate::{DocId, DocSet, Score};

/// `BoostQuery` is a wrapper over a query used to boost its score.
///
/// The document set matched by the `BoostQuery` is strictly the same as the underlying query.
/// The score of each document, is the score of the underlying query multiplied by the `boost`
/// factor.
pub struct BoostQuery {
    query: Box<dyn Query>,
    boost: Score,
}

impl BoostQuery {
    /// Builds a boost query.
    pub fn new(query: Box<dyn Query>, boost: Score) -> BoostQuery {
        BoostQuery { query, boost }
    }
}

impl Clone for BoostQuery {
    fn clone(&self) -> Self {
        BoostQuery {
            query: self.query.box_clone(),
            boost: self.boost,
        }
    }
}

impl fmt::Debug for BoostQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Boost(query={:?}, boost={})", self.query, self.boost)
    }
}

impl Query for BoostQuery {
    fn weight(&self, enable_scoring: EnableScoring) -> crate::Result<Box<dyn Weight>> {
        let weight_without_boost = self.query.weight(enable_scoring)?;
        let boosted_weight = if enable_scoring.is_scoring_enabled() {
            Box::new(BoostWeight::new(weight_without_boost, self.boost))
        } else {
            weight_without_boost
        };
        Ok(boosted_weight)
    }

    fn visit_clause_counts(&self, visitor: &mut dyn FnMut(usize)) {
        self.query.visit_clause_counts(visitor);
    }
}

pub(crate) struct BoostWeight {
    weight: Box<dyn Weight>,
    boost: Score,
}

impl BoostWeight {
    pub fn new(weight: Box<dyn Weight>, boost: Score) -> Self {
        BoostWeight { weight, boost }
    }
}

impl Weight for BoostWeight {
    fn scorer(&self, partition: &Partition, boost: Score) -> crate::Result<Box<dyn Scorer>> {
        self.weight.scorer(partition, boost * self.boost)
    }

    fn bulk_scorer(
        &self,
        partition: &Partition,
        boost: Score,
        options: &CollectionOptions,
    ) -> crate::Result<Box<dyn Scorer>> {
        self.weight
            .bulk_scorer(partition, boost * self.boost, options)
    }

    fn explain(&self, partition: &Partition, doc: DocId) -> crate::Result<Explanation> {
        let mut scorer = self.scorer(partition, 1.0)?;
        if scorer.seek(doc) != doc {
            return Err(does_not_match(doc));
        }
        let mut explanation =
            Explanation::new(format!("Boost x{} of ...", self.boost), scorer.score());
        let underlying_explanation = self.weight.explain(partition, doc)?;
        explanation.add_detail(underlying_explanation);
        Ok(explanation)
    }

    fn count(&self, partition: &Partition) -> crate::Result<u32> {
        self.weight.count(partition)
    }
}
