use crate::docset::DocSet;
use crate::postings::SubScoreFunction;
use crate::query::{Occur, Scorer, ScorerNode};
use crate::{DocId, Score};

/// Scorer of a single term: a posting cursor and the function scoring its documents.
pub struct TermScorer {
    postings: Box<dyn DocSet>,
    score_fn: Box<dyn SubScoreFunction>,
    boost: Score,
    label: String,
}

impl TermScorer {
    /// Creates a term scorer. Scores returned by `score_fn` are multiplied by `boost`.
    pub fn new(
        postings: Box<dyn DocSet>,
        score_fn: Box<dyn SubScoreFunction>,
        boost: Score,
        label: impl Into<String>,
    ) -> TermScorer {
        TermScorer {
            postings,
            score_fn,
            boost,
            label: label.into(),
        }
    }

    /// Name of the term.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl DocSet for TermScorer {
    #[inline]
    fn advance(&mut self) -> DocId {
        self.postings.advance()
    }

    #[inline]
    fn seek(&mut self, target: DocId) -> DocId {
        self.postings.seek(target)
    }

    #[inline]
    fn doc(&self) -> DocId {
        self.postings.doc()
    }

    fn size_hint(&self) -> u32 {
        self.postings.size_hint()
    }

    fn cost(&self) -> u64 {
        self.postings.cost()
    }
}

impl Scorer for TermScorer {
    #[inline]
    fn score(&mut self) -> Score {
        let doc = self.postings.doc();
        self.score_fn.score_at(doc) * self.boost
    }

    fn node(&self) -> ScorerNode {
        ScorerNode::Leaf {
            label: self.label.clone(),
            doc: self.postings.doc(),
        }
    }

    fn for_each_leaf(&self, occur: Occur, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        visitor(occur, &self.label, self.postings.doc());
    }
}

#[cfg(test)]
mod tests {
    use super::TermScorer;
    use crate::docset::{DocSet, TERMINATED};
    use crate::postings::{ConstScore, VecDocSet};
    use crate::query::Scorer;
    use crate::DocId;

    #[test]
    fn test_term_scorer_scores_current_doc() {
        let score_fn = |doc: DocId| doc as f32;
        let mut scorer = TermScorer::new(
            Box::new(VecDocSet::from(vec![1, 4, 9])),
            Box::new(score_fn),
            0.5,
            "a",
        );
        assert_eq!(scorer.score(), 0.5);
        assert_eq!(scorer.seek(5), 9);
        assert_eq!(scorer.score(), 4.5);
        assert_eq!(scorer.advance(), TERMINATED);
    }

    #[test]
    fn test_term_scorer_node() {
        let scorer = TermScorer::new(
            Box::new(VecDocSet::from(vec![3])),
            Box::new(ConstScore(1.0)),
            1.0,
            "body:fox",
        );
        assert_eq!(scorer.node().to_string(), " Leaf(body:fox) @3\n");
        assert_eq!(scorer.label(), "body:fox");
    }
}
