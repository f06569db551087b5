use crate::docset::{DocSet, TERMINATED};
use crate::query::{child_occur, ChildNode, Occur, Scorer, ScorerNode};
use crate::{DocId, Score};

/// An exclusion set is a set of documents
/// that should be excluded from a given DocSet.
///
/// It can be a single Scorer, or a Vec of Scorers.
pub trait ExclusionSet: Send {
    /// Returns `true` if the given `doc` is within the exclusion set.
    ///
    /// Successive calls must be made with non-decreasing `doc`: exclusion
    /// cursors only ever move forward, and only when they lag behind `doc`.
    fn is_within(&mut self, doc: DocId) -> bool;

    /// Scorer trees of the excluded clauses.
    fn excluded_nodes(&self) -> Vec<ScorerNode>;

    /// Calls `visitor` on every leaf of the excluded clauses.
    fn for_each_excluded_leaf(&self, visitor: &mut dyn FnMut(Occur, &str, DocId));
}

impl<TScorer: Scorer> ExclusionSet for TScorer {
    #[inline]
    fn is_within(&mut self, doc: DocId) -> bool {
        let mut current = self.doc();
        if current < doc {
            current = self.seek(doc);
        }
        current == doc
    }

    fn excluded_nodes(&self) -> Vec<ScorerNode> {
        vec![self.node()]
    }

    fn for_each_excluded_leaf(&self, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        self.for_each_leaf(Occur::MustNot, visitor);
    }
}

impl<TScorer: Scorer> ExclusionSet for Vec<TScorer> {
    #[inline]
    fn is_within(&mut self, doc: DocId) -> bool {
        // Every cursor is moved up to `doc`, even after a hit, so that they
        // all keep lagging behind the next candidate.
        let mut is_within = false;
        for scorer in self.iter_mut() {
            is_within |= scorer.is_within(doc);
        }
        is_within
    }

    fn excluded_nodes(&self) -> Vec<ScorerNode> {
        self.iter().map(Scorer::node).collect()
    }

    fn for_each_excluded_leaf(&self, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        for scorer in self {
            scorer.for_each_leaf(Occur::MustNot, visitor);
        }
    }
}

/// Filters a given `DocSet` by removing the docs from an exclusion set.
///
/// The excluding docsets have no impact on scoring.
pub struct Exclude<TDocSet, TExclusionSet> {
    underlying_docset: TDocSet,
    exclusion_set: TExclusionSet,
}

impl<TDocSet, TExclusionSet> Exclude<TDocSet, TExclusionSet>
where
    TDocSet: DocSet,
    TExclusionSet: ExclusionSet,
{
    /// Creates a new `Exclude`, positioned on the first document of the
    /// underlying docset that is not excluded.
    pub fn new(
        mut underlying_docset: TDocSet,
        mut exclusion_set: TExclusionSet,
    ) -> Exclude<TDocSet, TExclusionSet> {
        while underlying_docset.doc() != TERMINATED {
            let target = underlying_docset.doc();
            if !exclusion_set.is_within(target) {
                break;
            }
            underlying_docset.advance();
        }
        Exclude {
            underlying_docset,
            exclusion_set,
        }
    }
}

impl<TDocSet, TExclusionSet> DocSet for Exclude<TDocSet, TExclusionSet>
where
    TDocSet: DocSet,
    TExclusionSet: ExclusionSet,
{
    fn advance(&mut self) -> DocId {
        loop {
            let candidate = self.underlying_docset.advance();
            if candidate == TERMINATED {
                return TERMINATED;
            }
            if !self.exclusion_set.is_within(candidate) {
                return candidate;
            }
        }
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.underlying_docset.doc() >= target {
            return self.underlying_docset.doc();
        }
        let candidate = self.underlying_docset.seek(target);
        if candidate == TERMINATED {
            return TERMINATED;
        }
        if !self.exclusion_set.is_within(candidate) {
            return candidate;
        }
        self.advance()
    }

    fn doc(&self) -> DocId {
        self.underlying_docset.doc()
    }

    /// `.size_hint()` directly returns the size
    /// of the underlying docset without taking in account
    /// the fact that docs might be excluded.
    fn size_hint(&self) -> u32 {
        self.underlying_docset.size_hint()
    }

    fn cost(&self) -> u64 {
        self.underlying_docset.cost()
    }
}

impl<TScorer, TExclusionSet> Scorer for Exclude<TScorer, TExclusionSet>
where
    TScorer: Scorer,
    TExclusionSet: ExclusionSet + 'static,
{
    #[inline]
    fn score(&mut self) -> Score {
        self.underlying_docset.score()
    }

    #[inline]
    fn match_count(&mut self) -> u32 {
        self.underlying_docset.match_count()
    }

    fn node(&self) -> ScorerNode {
        let mut children = vec![ChildNode::new(Occur::Must, self.underlying_docset.node())];
        children.extend(
            self.exclusion_set
                .excluded_nodes()
                .into_iter()
                .map(|node| ChildNode::new(Occur::MustNot, node)),
        );
        ScorerNode::Exclusion {
            doc: self.underlying_docset.doc(),
            children,
        }
    }

    fn for_each_leaf(&self, occur: Occur, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        self.underlying_docset
            .for_each_leaf(child_occur(occur, Occur::Must), visitor);
        self.exclusion_set.for_each_excluded_leaf(visitor);
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::postings::tests::test_skip_against_unoptimized;
    use crate::postings::VecDocSet;
    use crate::query::ConstScorer;
    use crate::tests::sample_with_seed;

    fn const_scorer(docs: Vec<DocId>) -> ConstScorer<VecDocSet> {
        ConstScorer::new(VecDocSet::from(docs), 1.0)
    }

    #[test]
    fn test_exclude() {
        let mut exclude_scorer = Exclude::new(
            const_scorer(vec![1, 2, 5, 8, 10, 15, 24]),
            const_scorer(vec![1, 2, 3, 10, 16, 24]),
        );
        let mut els = vec![];
        while exclude_scorer.doc() != TERMINATED {
            els.push(exclude_scorer.doc());
            exclude_scorer.advance();
        }
        assert_eq!(els, vec![5, 8, 15]);
    }

    #[test]
    fn test_exclude_with_several_exclusion_sets() {
        let mut exclude_scorer = Exclude::new(
            const_scorer(vec![1, 2, 5, 8, 10, 15, 24]),
            vec![const_scorer(vec![2, 15]), const_scorer(vec![1, 8, 30])],
        );
        assert_eq!(exclude_scorer.count(), 3);
    }

    #[test]
    fn test_exclude_node() {
        let exclude_scorer = Exclude::new(
            const_scorer(vec![1, 2, 5]).with_label("a"),
            const_scorer(vec![1, 3]).with_label("b"),
        );
        let node = exclude_scorer.node();
        assert_eq!(node.doc(), Some(2));
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[1].occur, Occur::MustNot);
    }

    #[test]
    fn test_exclude_skip() {
        test_skip_against_unoptimized(
            || {
                Box::new(Exclude::new(
                    const_scorer(vec![1, 2, 5, 8, 10, 15, 24]),
                    vec![const_scorer(vec![1, 2, 3, 10, 16, 24])],
                ))
            },
            vec![5, 8, 10, 15, 24],
        );
    }

    #[test]
    fn test_exclude_skip_random() {
        let sample_include = sample_with_seed(10_000, 0.1, 1);
        let sample_exclude = sample_with_seed(10_000, 0.05, 2);
        let sample_skip = sample_with_seed(10_000, 0.005, 3);
        test_skip_against_unoptimized(
            || {
                Box::new(Exclude::new(
                    const_scorer(sample_include.clone()),
                    vec![const_scorer(sample_exclude.clone())],
                ))
            },
            sample_skip,
        );
    }
}
