use std::sync::Arc;

use super::term_scorer::TermScorer;
use crate::core::Partition;
use crate::docset::DocSet;
use crate::postings::{ConstScore, PostingsSource, SubScoreFunction};
use crate::query::explanation::does_not_match;
use crate::query::{EmptyScorer, Explanation, Scorer, Weight};
use crate::{DocId, Score};

/// Weight of a [`TermQuery`](super::TermQuery).
pub struct TermWeight {
    source: Arc<dyn PostingsSource>,
    scoring_enabled: bool,
}

impl TermWeight {
    pub(crate) fn new(source: Arc<dyn PostingsSource>, scoring_enabled: bool) -> TermWeight {
        TermWeight {
            source,
            scoring_enabled,
        }
    }

    /// Returns the term scorer of the partition, or `None` if the term does not
    /// appear in it.
    pub fn specialized_scorer(
        &self,
        partition: &Partition,
        boost: Score,
    ) -> crate::Result<Option<TermScorer>> {
        let Some(postings) = self.source.postings(partition)? else {
            return Ok(None);
        };
        let score_fn: Box<dyn SubScoreFunction> = if self.scoring_enabled {
            self.source.score_function(partition)?
        } else {
            Box::new(ConstScore(1.0))
        };
        Ok(Some(TermScorer::new(
            postings,
            score_fn,
            boost,
            self.source.label(),
        )))
    }
}

impl Weight for TermWeight {
    fn scorer(&self, partition: &Partition, boost: Score) -> crate::Result<Box<dyn Scorer>> {
        match self.specialized_scorer(partition, boost)? {
            Some(term_scorer) => Ok(Box::new(term_scorer)),
            None => Ok(Box::new(EmptyScorer)),
        }
    }

    fn explain(&self, partition: &Partition, doc: DocId) -> crate::Result<Explanation> {
        let Some(mut scorer) = self.specialized_scorer(partition, 1.0)? else {
            return Err(does_not_match(doc));
        };
        if scorer.seek(doc) != doc {
            return Err(does_not_match(doc));
        }
        Ok(Explanation::new(
            format!("weight({})", self.source.label()),
            scorer.score(),
        ))
    }
}
