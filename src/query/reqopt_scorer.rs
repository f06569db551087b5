use std::marker::PhantomData;

use crate::docset::{DocSet, TERMINATED};
use crate::query::score_combiner::ScoreCombiner;
use crate::query::{child_occur, ChildNode, CoordTable, Occur, Scorer, ScorerNode};
use crate::{DocId, Score};

/// Role of the optional scorer of a [`RequiredOptionalScorer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionalMatching {
    /// The optional scorer only adds to the score of the required documents.
    ScoreOnly,
    /// Documents must match the optional scorer as well. This is how a
    /// minimum number of optional clauses is enforced next to required clauses.
    Required,
}

/// Given a required scorer and an optional scorer
/// matches all document from the required scorer
/// and complements the score using the optional scorer.
///
/// This is useful for queries like `+somethingrequired somethingoptional`.
///
/// With [`OptionalMatching::ScoreOnly`], `somethingoptional` has no impact on the `DocSet`.
///
/// The optional scorer is only positioned lazily, when the score or the
/// match count of a document is requested.
pub struct RequiredOptionalScorer<TReqScorer, TOptScorer, TScoreCombiner> {
    req_scorer: TReqScorer,
    opt_scorer: TOptScorer,
    matching: OptionalMatching,
    num_required: u32,
    single_optional: bool,
    coord: CoordTable,
    doc: DocId,
    score_cache: Option<(Score, u32)>,
    _phantom: PhantomData<TScoreCombiner>,
}

impl<TReqScorer, TOptScorer, TScoreCombiner>
    RequiredOptionalScorer<TReqScorer, TOptScorer, TScoreCombiner>
where
    TReqScorer: DocSet,
    TOptScorer: DocSet,
{
    /// Creates a new `RequiredOptionalScorer`.
    ///
    /// `num_required` is the number of required clauses behind `req_scorer`.
    /// `num_optional` is the number of optional clauses behind `opt_scorer`.
    /// When there is more than one, `opt_scorer` reports how many of them
    /// matched through its match count.
    pub fn new(
        req_scorer: TReqScorer,
        opt_scorer: TOptScorer,
        matching: OptionalMatching,
        num_required: u32,
        num_optional: usize,
        coord: CoordTable,
    ) -> RequiredOptionalScorer<TReqScorer, TOptScorer, TScoreCombiner> {
        let doc = req_scorer.doc();
        let mut scorer = RequiredOptionalScorer {
            req_scorer,
            opt_scorer,
            matching,
            num_required,
            single_optional: num_optional == 1,
            coord,
            doc,
            score_cache: None,
            _phantom: PhantomData,
        };
        scorer.align(doc);
        scorer
    }

    fn align(&mut self, mut candidate: DocId) -> DocId {
        if self.matching == OptionalMatching::ScoreOnly {
            self.doc = candidate;
            return candidate;
        }
        loop {
            if candidate == TERMINATED {
                break;
            }
            let mut opt_doc = self.opt_scorer.doc();
            if opt_doc < candidate {
                opt_doc = self.opt_scorer.seek(candidate);
            }
            if opt_doc == candidate || opt_doc == TERMINATED {
                candidate = opt_doc;
                break;
            }
            candidate = self.req_scorer.seek(opt_doc);
        }
        self.doc = candidate;
        candidate
    }
}

impl<TReqScorer, TOptScorer, TScoreCombiner> DocSet
    for RequiredOptionalScorer<TReqScorer, TOptScorer, TScoreCombiner>
where
    TReqScorer: DocSet,
    TOptScorer: DocSet,
    TScoreCombiner: Send,
{
    fn advance(&mut self) -> DocId {
        self.score_cache = None;
        if self.doc == TERMINATED {
            return TERMINATED;
        }
        let candidate = self.req_scorer.advance();
        self.align(candidate)
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        self.score_cache = None;
        let candidate = self.req_scorer.seek(target);
        self.align(candidate)
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn size_hint(&self) -> u32 {
        match self.matching {
            OptionalMatching::ScoreOnly => self.req_scorer.size_hint(),
            OptionalMatching::Required => self
                .req_scorer
                .size_hint()
                .min(self.opt_scorer.size_hint()),
        }
    }

    fn cost(&self) -> u64 {
        self.req_scorer.cost()
    }
}

impl<TReqScorer, TOptScorer, TScoreCombiner>
    RequiredOptionalScorer<TReqScorer, TOptScorer, TScoreCombiner>
where
    TReqScorer: Scorer,
    TOptScorer: Scorer,
    TScoreCombiner: ScoreCombiner,
{
    fn score_and_overlap(&mut self) -> (Score, u32) {
        if let Some(cached) = self.score_cache {
            return cached;
        }
        let doc = self.doc;
        let mut score_combiner = TScoreCombiner::default();
        score_combiner.update(&mut self.req_scorer);
        let mut overlap = self.num_required;
        let mut opt_doc = self.opt_scorer.doc();
        if opt_doc < doc {
            opt_doc = self.opt_scorer.seek(doc);
        }
        if opt_doc == doc {
            score_combiner.update(&mut self.opt_scorer);
            overlap += if self.single_optional {
                1
            } else {
                self.opt_scorer.match_count()
            };
        }
        let score = score_combiner.score() * self.coord.factor(overlap);
        self.score_cache = Some((score, overlap));
        (score, overlap)
    }
}

impl<TReqScorer, TOptScorer, TScoreCombiner> Scorer
    for RequiredOptionalScorer<TReqScorer, TOptScorer, TScoreCombiner>
where
    TReqScorer: Scorer,
    TOptScorer: Scorer,
    TScoreCombiner: ScoreCombiner,
{
    fn score(&mut self) -> Score {
        self.score_and_overlap().0
    }

    fn match_count(&mut self) -> u32 {
        self.score_and_overlap().1
    }

    fn node(&self) -> ScorerNode {
        ScorerNode::RequiredOptional {
            doc: self.doc,
            children: vec![
                ChildNode::new(Occur::Must, self.req_scorer.node()),
                ChildNode::new(Occur::Should, self.opt_scorer.node()),
            ],
        }
    }

    fn for_each_leaf(&self, occur: Occur, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        self.req_scorer
            .for_each_leaf(child_occur(occur, Occur::Must), visitor);
        self.opt_scorer
            .for_each_leaf(child_occur(occur, Occur::Should), visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::{OptionalMatching, RequiredOptionalScorer};
    use crate::docset::{DocSet, TERMINATED};
    use crate::postings::tests::test_skip_against_unoptimized;
    use crate::postings::VecDocSet;
    use crate::query::score_combiner::{DoNothingCombiner, SumCombiner};
    use crate::query::{ConstScorer, CoordTable, OverlapCoordination, Scorer};
    use crate::tests::sample_with_seed;
    use crate::DocId;

    fn const_scorer(docs: Vec<DocId>, score: f32) -> ConstScorer<VecDocSet> {
        ConstScorer::new(VecDocSet::from(docs), score)
    }

    #[test]
    fn test_reqopt_scorer_empty() {
        let req = vec![1, 3, 7];
        let mut reqoptscorer: RequiredOptionalScorer<_, _, SumCombiner> =
            RequiredOptionalScorer::new(
                const_scorer(req.clone(), 1.0),
                const_scorer(vec![], 1.0),
                OptionalMatching::ScoreOnly,
                1,
                1,
                CoordTable::identity(),
            );
        let mut docs = vec![];
        while reqoptscorer.doc() != TERMINATED {
            docs.push(reqoptscorer.doc());
            reqoptscorer.advance();
        }
        assert_eq!(docs, req);
    }

    #[test]
    fn test_reqopt_scorer() {
        let mut reqoptscorer: RequiredOptionalScorer<_, _, SumCombiner> =
            RequiredOptionalScorer::new(
                const_scorer(vec![1, 3, 7, 8, 9, 10, 13, 15], 1.0),
                const_scorer(vec![1, 2, 7, 11, 12, 15], 1.0),
                OptionalMatching::ScoreOnly,
                1,
                1,
                CoordTable::identity(),
            );
        {
            assert_eq!(reqoptscorer.doc(), 1);
            assert_eq!(reqoptscorer.score(), 2f32);
        }
        {
            assert_eq!(reqoptscorer.advance(), 3);
            assert_eq!(reqoptscorer.doc(), 3);
            assert_eq!(reqoptscorer.score(), 1f32);
        }
        {
            assert_eq!(reqoptscorer.advance(), 7);
            assert_eq!(reqoptscorer.doc(), 7);
            assert_eq!(reqoptscorer.score(), 2f32);
        }
        {
            assert_eq!(reqoptscorer.advance(), 8);
            assert_eq!(reqoptscorer.doc(), 8);
            assert_eq!(reqoptscorer.score(), 1f32);
        }
        {
            assert_eq!(reqoptscorer.advance(), 9);
            assert_eq!(reqoptscorer.doc(), 9);
            assert_eq!(reqoptscorer.score(), 1f32);
        }
        {
            assert_eq!(reqoptscorer.advance(), 10);
            assert_eq!(reqoptscorer.doc(), 10);
            assert_eq!(reqoptscorer.score(), 1f32);
        }
        {
            assert_eq!(reqoptscorer.advance(), 13);
            assert_eq!(reqoptscorer.doc(), 13);
            assert_eq!(reqoptscorer.score(), 1f32);
        }
        {
            assert_eq!(reqoptscorer.advance(), 15);
            assert_eq!(reqoptscorer.doc(), 15);
            assert_eq!(reqoptscorer.score(), 2f32);
        }
        assert_eq!(reqoptscorer.advance(), TERMINATED);
    }

    #[test]
    fn test_reqopt_scorer_coord() {
        // +a b: matching both clauses gets coord(2/2), matching only a gets coord(1/2).
        let coord = CoordTable::new(&OverlapCoordination, 2);
        let mut reqoptscorer: RequiredOptionalScorer<_, _, SumCombiner> =
            RequiredOptionalScorer::new(
                const_scorer(vec![1, 2], 1.0),
                const_scorer(vec![2], 1.0),
                OptionalMatching::ScoreOnly,
                1,
                1,
                coord,
            );
        assert_eq!(reqoptscorer.score(), 0.5);
        assert_eq!(reqoptscorer.match_count(), 1);
        assert_eq!(reqoptscorer.advance(), 2);
        assert_eq!(reqoptscorer.score(), 2.0);
        assert_eq!(reqoptscorer.match_count(), 2);
    }

    #[test]
    fn test_reqopt_scorer_with_required_optional() {
        let mut reqoptscorer: RequiredOptionalScorer<_, _, SumCombiner> =
            RequiredOptionalScorer::new(
                const_scorer(vec![1, 3, 7, 8, 9, 10, 13, 15], 1.0),
                const_scorer(vec![1, 2, 7, 11, 12, 15], 1.0),
                OptionalMatching::Required,
                1,
                1,
                CoordTable::identity(),
            );
        assert_eq!(reqoptscorer.doc(), 1);
        assert_eq!(reqoptscorer.advance(), 7);
        assert_eq!(reqoptscorer.score(), 2.0);
        assert_eq!(reqoptscorer.seek(8), 15);
        assert_eq!(reqoptscorer.advance(), TERMINATED);
    }

    #[test]
    fn test_reqopt_scorer_skip() {
        let req_docs = sample_with_seed(10_000, 0.02, 1);
        let opt_docs = sample_with_seed(10_000, 0.02, 2);
        let skip_docs = sample_with_seed(10_000, 0.001, 3);
        for matching in [OptionalMatching::ScoreOnly, OptionalMatching::Required] {
            test_skip_against_unoptimized(
                || {
                    Box::new(RequiredOptionalScorer::<_, _, DoNothingCombiner>::new(
                        const_scorer(req_docs.clone(), 1.0),
                        const_scorer(opt_docs.clone(), 1.0),
                        matching,
                        1,
                        1,
                        CoordTable::identity(),
                    ))
                },
                skip_docs.clone(),
            );
        }
    }
}
