use std::cmp::{Ordering, Reverse};
use std::collections::binary_heap::PeekMut;
use std::collections::BinaryHeap;

use crate::query::score_combiner::DoNothingCombiner;
use crate::query::{
    child_occur, ChildNode, CoordTable, Occur, ScoreCombiner, Scorer, ScorerNode,
};
use crate::{DocId, DocSet, EngineError, Score, TERMINATED};

/// Disjunction requiring at least `minimum_matches_required` of its
/// scorers to match a document.
///
/// Scorers are kept in a min-heap keyed on their current document. The
/// scorers positioned on the current document are popped out of the heap and
/// kept aside, so that they can be scored and introspected. They are only
/// advanced when the disjunction itself moves forward.
///
/// Documents are emitted in increasing order.
pub struct DisjunctionScorer<TScorer, TScoreCombiner = DoNothingCombiner> {
    chains: MinHeap<TScorer>,
    current: Vec<TScorer>,
    minimum_matches_required: usize,
    score_combiner: TScoreCombiner,
    coord: CoordTable,
    doc: DocId,
    score_cache: Option<Score>,
}

type MinHeap<T> = BinaryHeap<Reverse<ScorerWrapper<T>>>;

#[repr(transparent)]
struct ScorerWrapper<T>(T);

impl<T: Scorer> PartialEq for ScorerWrapper<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.doc() == other.0.doc()
    }
}

impl<T: Scorer> Eq for ScorerWrapper<T> {}

impl<T: Scorer> PartialOrd for ScorerWrapper<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Scorer> Ord for ScorerWrapper<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.doc().cmp(&other.0.doc())
    }
}

impl<TScorer: Scorer, TScoreCombiner: ScoreCombiner> DisjunctionScorer<TScorer, TScoreCombiner> {
    /// Creates a disjunction positioned on its first matching document.
    ///
    /// Returns an error if there is no scorer, or if `minimum_matches_required`
    /// is not within `1..=docsets.len()`.
    pub fn new<T: IntoIterator<Item = TScorer>>(
        docsets: T,
        score_combiner: TScoreCombiner,
        minimum_matches_required: usize,
        coord: CoordTable,
    ) -> crate::Result<Self> {
        let docsets: Vec<TScorer> = docsets.into_iter().collect();
        if docsets.is_empty() {
            return Err(EngineError::NoClauses);
        }
        if minimum_matches_required == 0 || minimum_matches_required > docsets.len() {
            return Err(EngineError::InvalidMinimumMatch {
                minimum_match: minimum_matches_required,
                optional_clauses: docsets.len(),
            });
        }
        let chains: MinHeap<TScorer> = docsets
            .into_iter()
            .filter(|docset| docset.doc() != TERMINATED)
            .map(|docset| Reverse(ScorerWrapper(docset)))
            .collect();
        let mut disjunction = DisjunctionScorer {
            chains,
            current: Vec::new(),
            minimum_matches_required,
            score_combiner,
            coord,
            doc: 0,
            score_cache: None,
        };
        disjunction.find_next_match();
        Ok(disjunction)
    }

    /// Pops the scorers positioned on the lowest document of the heap into
    /// `current`, until at least `minimum_matches_required` of them agree.
    fn find_next_match(&mut self) -> DocId {
        self.score_cache = None;
        loop {
            if self.chains.len() + self.current.len() < self.minimum_matches_required {
                self.chains.clear();
                self.current.clear();
                self.doc = TERMINATED;
                return TERMINATED;
            }
            let Some(head) = self.chains.peek() else {
                self.doc = TERMINATED;
                return TERMINATED;
            };
            let candidate = head.0 .0.doc();
            while let Some(top) = self.chains.peek_mut() {
                if top.0 .0.doc() != candidate {
                    break;
                }
                let Reverse(ScorerWrapper(scorer)) = PeekMut::pop(top);
                self.current.push(scorer);
            }
            if self.current.len() >= self.minimum_matches_required {
                self.doc = candidate;
                return candidate;
            }
            // Not enough votes: move the losing scorers forward and try again.
            for mut scorer in self.current.drain(..) {
                if scorer.advance() != TERMINATED {
                    self.chains.push(Reverse(ScorerWrapper(scorer)));
                }
            }
        }
    }

    /// Minimum number of scorers that must match a document.
    pub fn minimum_matches_required(&self) -> usize {
        self.minimum_matches_required
    }
}

impl<TScorer: Scorer, TScoreCombiner: ScoreCombiner> DocSet
    for DisjunctionScorer<TScorer, TScoreCombiner>
{
    fn advance(&mut self) -> DocId {
        if self.doc == TERMINATED {
            return TERMINATED;
        }
        for mut scorer in self.current.drain(..) {
            if scorer.advance() != TERMINATED {
                self.chains.push(Reverse(ScorerWrapper(scorer)));
            }
        }
        self.find_next_match()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        for mut scorer in self.current.drain(..) {
            if scorer.seek(target) != TERMINATED {
                self.chains.push(Reverse(ScorerWrapper(scorer)));
            }
        }
        let mut lagging = Vec::new();
        while let Some(top) = self.chains.peek_mut() {
            if top.0 .0.doc() >= target {
                break;
            }
            let Reverse(ScorerWrapper(scorer)) = PeekMut::pop(top);
            lagging.push(scorer);
        }
        for mut scorer in lagging {
            if scorer.seek(target) != TERMINATED {
                self.chains.push(Reverse(ScorerWrapper(scorer)));
            }
        }
        self.find_next_match()
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn size_hint(&self) -> u32 {
        self.chains
            .iter()
            .map(|docset| docset.0 .0.size_hint())
            .chain(self.current.iter().map(DocSet::size_hint))
            .max()
            .unwrap_or(0u32)
    }

    fn cost(&self) -> u64 {
        self.chains
            .iter()
            .map(|docset| docset.0 .0.cost())
            .chain(self.current.iter().map(DocSet::cost))
            .sum()
    }
}

impl<TScorer: Scorer, TScoreCombiner: ScoreCombiner> Scorer
    for DisjunctionScorer<TScorer, TScoreCombiner>
{
    fn score(&mut self) -> Score {
        if let Some(score) = self.score_cache {
            return score;
        }
        self.score_combiner.clear();
        for scorer in self.current.iter_mut() {
            self.score_combiner.update(scorer);
        }
        let votes = self.current.len() as u32;
        let score = self.score_combiner.score() * self.coord.factor(votes);
        self.score_cache = Some(score);
        score
    }

    fn match_count(&mut self) -> u32 {
        self.current.len() as u32
    }

    fn node(&self) -> ScorerNode {
        let children = self
            .current
            .iter()
            .map(|scorer| ChildNode::new(Occur::Should, scorer.node()))
            .chain(
                self.chains
                    .iter()
                    .map(|scorer| ChildNode::new(Occur::Should, scorer.0 .0.node())),
            )
            .collect();
        ScorerNode::Disjunction {
            doc: self.doc,
            minimum_match: self.minimum_matches_required,
            children,
        }
    }

    fn for_each_leaf(&self, occur: Occur, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        let occur = child_occur(occur, Occur::Should);
        for scorer in &self.current {
            scorer.for_each_leaf(occur, visitor);
        }
        for scorer in self.chains.iter() {
            scorer.0 .0.for_each_leaf(occur, visitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::DisjunctionScorer;
    use crate::postings::tests::test_skip_against_unoptimized;
    use crate::postings::VecDocSet;
    use crate::query::score_combiner::DoNothingCombiner;
    use crate::query::{
        ConstScorer, CoordTable, OverlapCoordination, Scorer, ScorerNode, SumCombiner,
    };
    use crate::{DocId, DocSet, EngineError, Score, TERMINATED};

    fn conjunct<T: Ord + Copy>(arrays: &[Vec<T>], pass_line: usize) -> Vec<T> {
        let mut counts = BTreeMap::new();
        for array in arrays {
            for &element in array {
                *counts.entry(element).or_insert(0) += 1;
            }
        }
        counts
            .iter()
            .filter_map(|(&element, &count)| {
                if count >= pass_line {
                    Some(element)
                } else {
                    None
                }
            })
            .collect()
    }

    fn make_disjunction(
        vals: &[Vec<u32>],
        min_match: usize,
    ) -> crate::Result<DisjunctionScorer<ConstScorer<VecDocSet>, DoNothingCombiner>> {
        DisjunctionScorer::new(
            vals.iter()
                .cloned()
                .map(VecDocSet::from)
                .map(|d| ConstScorer::new(d, 1.0)),
            DoNothingCombiner::default(),
            min_match,
            CoordTable::identity(),
        )
    }

    fn aux_test_conjunction(vals: Vec<Vec<u32>>, min_match: usize) {
        let mut union_expected = VecDocSet::from(conjunct(&vals, min_match));
        let mut scorer = make_disjunction(&vals, min_match).unwrap();
        let mut count = 0;
        while scorer.doc() != TERMINATED {
            assert_eq!(union_expected.doc(), scorer.doc());
            assert_eq!(scorer.match_count() as usize >= min_match, true);
            assert_eq!(union_expected.advance(), scorer.advance());
            count += 1;
        }
        assert_eq!(union_expected.advance(), TERMINATED);
        assert_eq!(
            count,
            make_disjunction(&vals, min_match)
                .unwrap()
                .count()
        );
    }

    #[test]
    fn test_arg_check() {
        assert!(matches!(
            make_disjunction(&[], 1).err(),
            Some(EngineError::NoClauses)
        ));
        assert!(matches!(
            make_disjunction(&[vec![1]], 0).err(),
            Some(EngineError::InvalidMinimumMatch { .. })
        ));
        assert!(matches!(
            make_disjunction(&[vec![1], vec![2]], 3).err(),
            Some(EngineError::InvalidMinimumMatch {
                minimum_match: 3,
                optional_clauses: 2
            })
        ));
    }

    #[test]
    fn test_corner_case() {
        aux_test_conjunction(vec![vec![]; 1000], 2);
        aux_test_conjunction(vec![vec![]; 100], 100);
        aux_test_conjunction(vec![vec![0xC0FFEE]; 10000], 10000);
        aux_test_conjunction((1..10000u32).map(|i| vec![i]).collect::<Vec<_>>(), 2);
        aux_test_conjunction((1..100u32).map(|i| vec![i]).collect::<Vec<_>>(), 1);
    }

    #[test]
    fn test_conjunction() {
        aux_test_conjunction(
            vec![
                vec![1, 3333, 100000000u32],
                vec![1, 2, 100000000u32],
                vec![1, 2, 100000000u32],
            ],
            2,
        );
        aux_test_conjunction(
            vec![vec![8], vec![3, 4, 0xC0FFEEu32], vec![1, 2, 100000000u32]],
            2,
        );
        aux_test_conjunction(
            vec![
                vec![1, 3333, 100000000u32],
                vec![1, 2, 100000000u32],
                vec![1, 2, 100000000u32],
            ],
            3,
        )
    }

    #[test]
    fn test_two_of_three() {
        let mut scorer = DisjunctionScorer::new(
            vec![
                ConstScorer::new(VecDocSet::from(vec![1, 2, 3]), 1.0),
                ConstScorer::new(VecDocSet::from(vec![2, 3, 4]), 1.0),
                ConstScorer::new(VecDocSet::from(vec![3, 4, 5]), 1.0),
            ],
            SumCombiner::default(),
            2,
            CoordTable::identity(),
        )
        .unwrap();
        let mut scored = Vec::new();
        while scorer.doc() != TERMINATED {
            scored.push((scorer.doc(), scorer.score(), scorer.match_count()));
            scorer.advance();
        }
        assert_eq!(scored, vec![(2, 2.0, 2), (3, 3.0, 3), (4, 2.0, 2)]);
    }

    #[test]
    fn test_all_optional_required_is_an_intersection() {
        aux_test_conjunction(vec![vec![1, 2, 3], vec![2, 3, 4], vec![2, 3, 5]], 3);
    }

    #[test]
    fn test_disjunction_skip() {
        let vals = vec![
            crate::tests::sample_with_seed(5_000, 0.1, 1),
            crate::tests::sample_with_seed(5_000, 0.2, 2),
            crate::tests::sample_with_seed(5_000, 0.05, 3),
        ];
        let targets = crate::tests::sample_with_seed(5_000, 0.01, 4);
        for min_match in 1..=3 {
            test_skip_against_unoptimized(
                || Box::new(make_disjunction(&vals, min_match).unwrap()),
                targets.clone(),
            );
        }
    }

    // This dummy scorer does nothing but yield doc id increasingly.
    // with constant score 1.0
    #[derive(Clone)]
    struct DummyScorer {
        cursor: usize,
        foo: Vec<(DocId, f32)>,
    }

    impl DummyScorer {
        fn new(doc_score: Vec<(DocId, f32)>) -> Self {
            Self {
                cursor: 0,
                foo: doc_score,
            }
        }
    }

    impl DocSet for DummyScorer {
        fn advance(&mut self) -> DocId {
            self.cursor += 1;
            self.doc()
        }

        fn doc(&self) -> DocId {
            self.foo.get(self.cursor).map(|x| x.0).unwrap_or(TERMINATED)
        }

        fn size_hint(&self) -> u32 {
            self.foo.len() as u32
        }
    }

    impl Scorer for DummyScorer {
        fn score(&mut self) -> Score {
            self.foo.get(self.cursor).map(|x| x.1).unwrap_or(0.0)
        }

        fn node(&self) -> ScorerNode {
            ScorerNode::Leaf {
                label: "dummy".to_string(),
                doc: self.doc(),
            }
        }
    }

    #[test]
    fn test_score_calculate() {
        let mut scorer = DisjunctionScorer::new(
            vec![
                DummyScorer::new(vec![(1, 1f32), (2, 1f32)]),
                DummyScorer::new(vec![(1, 1f32), (3, 1f32)]),
                DummyScorer::new(vec![(1, 1f32), (4, 1f32)]),
                DummyScorer::new(vec![(1, 1f32), (2, 1f32)]),
                DummyScorer::new(vec![(1, 1f32), (2, 1f32)]),
            ],
            SumCombiner::default(),
            3,
            CoordTable::identity(),
        )
        .unwrap();
        assert_eq!(scorer.score(), 5.0);
        assert_eq!(scorer.advance(), 2);
        assert_eq!(scorer.score(), 3.0);
        assert_eq!(scorer.advance(), TERMINATED);
    }

    #[test]
    fn test_score_with_coord() {
        let mut scorer = DisjunctionScorer::new(
            vec![
                DummyScorer::new(vec![(1, 1f32), (2, 1f32)]),
                DummyScorer::new(vec![(2, 1f32)]),
                DummyScorer::new(vec![(2, 1f32)]),
                DummyScorer::new(vec![(3, 1f32)]),
            ],
            SumCombiner::default(),
            1,
            CoordTable::new(&OverlapCoordination, 4),
        )
        .unwrap();
        assert_eq!(scorer.score(), 0.25);
        assert_eq!(scorer.advance(), 2);
        assert_eq!(scorer.score(), 3.0 * 0.75);
    }

    #[test]
    fn test_leaves_on_current_doc() {
        let scorer = DisjunctionScorer::new(
            vec![
                DummyScorer::new(vec![(1, 1f32), (2, 1f32)]),
                DummyScorer::new(vec![(2, 1f32)]),
            ],
            SumCombiner::default(),
            1,
            CoordTable::identity(),
        )
        .unwrap();
        let mut matching_leaves = 0;
        scorer.node().visit_leaves(&mut |_, _, doc| {
            if doc == 1 {
                matching_leaves += 1;
            }
        });
        assert_eq!(matching_leaves, 1);
    }

    proptest! {
        #[test]
        fn test_disjunction_matches_brute_force(
            lists in proptest::collection::vec(
                proptest::collection::btree_set(0u32..300, 0..60),
                1..8,
            ),
            min_match_seed in 0usize..8,
        ) {
            let vals: Vec<Vec<u32>> = lists.into_iter().map(|set| set.into_iter().collect()).collect();
            let min_match = 1 + min_match_seed % vals.len();
            let mut scorer = make_disjunction(&vals, min_match).unwrap();
            let mut docs = Vec::new();
            while scorer.doc() != TERMINATED {
                docs.push(scorer.doc());
                scorer.advance();
            }
            prop_assert_eq!(docs, conjunct(&vals, min_match));
        }
    }
}
