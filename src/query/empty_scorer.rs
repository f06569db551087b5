use crate::docset::{DocSet, TERMINATED};
use crate::query::{Occur, Scorer, ScorerNode};
use crate::{DocId, Score};

/// `EmptyScorer` is a dummy `Scorer` in which no document matches.
///
/// It is useful for instance in case a required clause does not
/// appear in a partition.
pub struct EmptyScorer;

impl DocSet for EmptyScorer {
    fn advance(&mut self) -> DocId {
        TERMINATED
    }

    fn doc(&self) -> DocId {
        TERMINATED
    }

    fn size_hint(&self) -> u32 {
        0
    }
}

impl Scorer for EmptyScorer {
    fn score(&mut self) -> Score {
        0.0
    }

    fn match_count(&mut self) -> u32 {
        0
    }

    fn node(&self) -> ScorerNode {
        ScorerNode::Empty
    }

    fn for_each_leaf(&self, _occur: Occur, _visitor: &mut dyn FnMut(Occur, &str, DocId)) {}
}

#[cfg(test)]
mod tests {
    use crate::docset::{DocSet, TERMINATED};
    use crate::query::EmptyScorer;

    #[test]
    fn test_empty_scorer() {
        let mut empty_scorer = EmptyScorer;
        assert_eq!(empty_scorer.doc(), TERMINATED);
        assert_eq!(empty_scorer.advance(), TERMINATED);
        assert_eq!(empty_scorer.seek(TERMINATED), TERMINATED);
        assert_eq!(empty_scorer.count(), 0);
    }
}
