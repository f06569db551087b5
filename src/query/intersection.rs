use crate::docset::{DocSet, TERMINATED};
use crate::query::term_query::TermScorer;
use crate::query::{child_occur, ChildNode, CoordTable, Occur, Scorer, ScorerNode};
use crate::{DocId, EngineError, Score};

/// Returns the intersection scorer.
///
/// The score associated to the documents is the sum of the
/// score of the `Scorer`s given in argument, multiplied by the coordination
/// factor of all of them matching.
///
/// For better performance, the function uses a
/// specialized implementation if all of the scorers are `TermScorer`s.
pub fn intersect_scorers(
    mut scorers: Vec<Box<dyn Scorer>>,
    coord: &CoordTable,
) -> crate::Result<Box<dyn Scorer>> {
    if scorers.is_empty() {
        return Err(EngineError::NoClauses);
    }
    if scorers.len() == 1 && coord.factor(1) == 1.0 {
        if let Some(scorer) = scorers.pop() {
            return Ok(scorer);
        }
    }
    let all_term_scorers = scorers.iter().all(|scorer| scorer.is::<TermScorer>());
    if all_term_scorers {
        let term_scorers: Vec<TermScorer> = scorers
            .into_iter()
            .filter_map(|scorer| scorer.downcast::<TermScorer>().ok().map(|scorer| *scorer))
            .collect();
        return Ok(Box::new(Intersection::new(term_scorers)?.with_coord(coord)));
    }
    Ok(Box::new(Intersection::new(scorers)?.with_coord(coord)))
}

/// Creates a `DocSet` that iterates through the intersection of one or more `DocSet`s.
///
/// Docsets are sorted by increasing cost. The cheapest one leads: every
/// candidate it emits is checked against the others, each of which seeks
/// forward. A docset overshooting the candidate proposes a new candidate.
pub struct Intersection<TDocSet: DocSet> {
    docsets: Vec<TDocSet>,
    doc: DocId,
    coord_factor: Score,
}

impl<TDocSet: DocSet> Intersection<TDocSet> {
    /// Creates an intersection positioned on its first document.
    ///
    /// Returns an error if `docsets` is empty.
    pub fn new(mut docsets: Vec<TDocSet>) -> crate::Result<Intersection<TDocSet>> {
        if docsets.is_empty() {
            return Err(EngineError::NoClauses);
        }
        docsets.sort_by_key(|docset| docset.cost());
        let candidate = docsets
            .iter()
            .map(DocSet::doc)
            .max()
            .unwrap_or(TERMINATED);
        let mut intersection = Intersection {
            docsets,
            doc: candidate,
            coord_factor: 1.0,
        };
        intersection.go_to_first_doc(candidate);
        Ok(intersection)
    }

    /// Applies the coordination factor of all docsets matching.
    pub fn with_coord(mut self, coord: &CoordTable) -> Intersection<TDocSet> {
        self.coord_factor = coord.factor(self.docsets.len() as u32);
        self
    }

    fn go_to_first_doc(&mut self, mut candidate: DocId) -> DocId {
        'outer: loop {
            if candidate == TERMINATED {
                self.doc = TERMINATED;
                return TERMINATED;
            }
            for docset in self.docsets.iter_mut() {
                let mut doc = docset.doc();
                if doc < candidate {
                    doc = docset.seek(candidate);
                }
                if doc > candidate {
                    candidate = doc;
                    continue 'outer;
                }
            }
            self.doc = candidate;
            return candidate;
        }
    }
}

impl<TDocSet: DocSet> DocSet for Intersection<TDocSet> {
    fn advance(&mut self) -> DocId {
        if self.doc == TERMINATED {
            return TERMINATED;
        }
        let candidate = self.docsets[0].advance();
        self.go_to_first_doc(candidate)
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        let candidate = self.docsets[0].seek(target);
        self.go_to_first_doc(candidate)
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn size_hint(&self) -> u32 {
        self.docsets[0].size_hint()
    }

    fn cost(&self) -> u64 {
        self.docsets[0].cost()
    }
}

impl<TScorer: Scorer> Scorer for Intersection<TScorer> {
    fn score(&mut self) -> Score {
        let sum = self.docsets.iter_mut().map(Scorer::score).sum::<Score>();
        sum * self.coord_factor
    }

    fn match_count(&mut self) -> u32 {
        self.docsets.len() as u32
    }

    fn node(&self) -> ScorerNode {
        ScorerNode::Conjunction {
            doc: self.doc,
            children: self
                .docsets
                .iter()
                .map(|docset| ChildNode::new(Occur::Must, docset.node()))
                .collect(),
        }
    }

    fn for_each_leaf(&self, occur: Occur, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        for docset in &self.docsets {
            docset.for_each_leaf(child_occur(occur, Occur::Must), visitor);
        }
    }
}
