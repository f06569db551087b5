use crate::query::{Occur, Scorer, ScorerNode};
use crate::{DocId, DocSet, Score};

/// Wraps a `DocSet` and simply returns a constant `Scorer`.
/// The `ConstScorer` is useful if you have a `DocSet` where
/// you needed a scorer.
///
/// In scorer trees, a `ConstScorer` shows up as a leaf.
pub struct ConstScorer<TDocSet: DocSet> {
    docset: TDocSet,
    score: Score,
    label: String,
}

impl<TDocSet: DocSet> ConstScorer<TDocSet> {
    /// Creates a new `ConstScorer`.
    pub fn new(docset: TDocSet, score: Score) -> ConstScorer<TDocSet> {
        ConstScorer {
            docset,
            score,
            label: String::new(),
        }
    }

    /// Sets the label the scorer reports in scorer trees.
    pub fn with_label(mut self, label: impl Into<String>) -> ConstScorer<TDocSet> {
        self.label = label.into();
        self
    }
}

impl<TDocSet: DocSet> From<TDocSet> for ConstScorer<TDocSet> {
    fn from(docset: TDocSet) -> Self {
        ConstScorer::new(docset, 1.0)
    }
}

impl<TDocSet: DocSet> DocSet for ConstScorer<TDocSet> {
    fn advance(&mut self) -> DocId {
        self.docset.advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        self.docset.seek(target)
    }

    fn doc(&self) -> DocId {
        self.docset.doc()
    }

    fn size_hint(&self) -> u32 {
        self.docset.size_hint()
    }

    fn cost(&self) -> u64 {
        self.docset.cost()
    }
}

impl<TDocSet: DocSet + 'static> Scorer for ConstScorer<TDocSet> {
    fn score(&mut self) -> Score {
        self.score
    }

    fn node(&self) -> ScorerNode {
        ScorerNode::Leaf {
            label: self.label.clone(),
            doc: self.docset.doc(),
        }
    }

    fn for_each_leaf(&self, occur: Occur, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        visitor(occur, &self.label, self.docset.doc());
    }
}
