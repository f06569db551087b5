use crate::core::validate_window_size;
use crate::docset::{DocSet, TERMINATED};
use crate::query::score_combiner::{DoNothingCombiner, ScoreCombiner};
use crate::query::{child_occur, ChildNode, CoordTable, Occur, Scorer, ScorerNode};
use crate::{DocId, EngineError, Score};

// `drain_filter` is not stable yet.
// This function is similar except that it does is not unstable, and
// it does not keep the original vector ordering.
//
// Elements are dropped and not yielded.
fn unordered_drain_filter<T, P>(v: &mut Vec<T>, mut predicate: P)
where P: FnMut(&mut T) -> bool {
    let mut i = 0;
    while i < v.len() {
        if predicate(&mut v[i]) {
            v.swap_remove(i);
        } else {
            i += 1;
        }
    }
}

#[inline]
fn pop_lowest(bits: &mut u64) -> Option<u32> {
    if *bits == 0 {
        return None;
    }
    let lowest = bits.trailing_zeros();
    *bits &= *bits - 1;
    Some(lowest)
}

/// Disjunction of one or more scorers, evaluated a window of documents at a time.
///
/// Every scorer is drained up to the end of the current window of
/// `window_size` documents. Matches are accumulated in one score combiner per
/// slot, and a bitset records which slots are occupied. The slots are then
/// emitted in increasing order, and the next window starts at the lowest
/// document any scorer is positioned on.
///
/// A document matched by `k` scorers is scored as the sum of their scores
/// times `coord(k)`.
pub struct BufferedUnionScorer<TScorer, TScoreCombiner = DoNothingCombiner> {
    docsets: Vec<TScorer>,
    bitsets: Box<[u64]>,
    scores: Box<[TScoreCombiner]>,
    window_size: u32,
    cursor: usize,
    offset: DocId,
    doc: DocId,
    score: Score,
    num_matches: u32,
    coord: CoordTable,
    num_docs: u32,
}

fn refill<TScorer: Scorer, TScoreCombiner: ScoreCombiner>(
    scorers: &mut Vec<TScorer>,
    bitsets: &mut [u64],
    score_combiner: &mut [TScoreCombiner],
    min_doc: DocId,
    window_size: u32,
) {
    let horizon = min_doc.saturating_add(window_size);
    unordered_drain_filter(scorers, |scorer| {
        loop {
            let doc = scorer.doc();
            if doc >= horizon {
                return false;
            }
            // add this document
            let delta = doc - min_doc;
            bitsets[(delta / 64) as usize] |= 1u64 << (delta % 64);
            score_combiner[delta as usize].update(scorer);
            if scorer.advance() == TERMINATED {
                // remove the docset, it has been entirely consumed.
                return true;
            }
        }
    });
}

impl<TScorer: Scorer, TScoreCombiner: ScoreCombiner> BufferedUnionScorer<TScorer, TScoreCombiner> {
    /// Builds a union positioned on its first document.
    ///
    /// `window_size` must be a positive multiple of 64. `num_docs` is the
    /// number of documents of the partition, used for size estimation.
    pub fn build(
        docsets: Vec<TScorer>,
        score_combiner_fn: impl FnOnce() -> TScoreCombiner,
        window_size: u32,
        coord: CoordTable,
        num_docs: u32,
    ) -> crate::Result<BufferedUnionScorer<TScorer, TScoreCombiner>> {
        if docsets.is_empty() {
            return Err(EngineError::NoClauses);
        }
        validate_window_size(window_size)?;
        let non_empty_docsets: Vec<TScorer> = docsets
            .into_iter()
            .filter(|docset| docset.doc() != TERMINATED)
            .collect();
        let num_buckets = (window_size / 64) as usize;
        let mut union = BufferedUnionScorer {
            docsets: non_empty_docsets,
            bitsets: vec![0u64; num_buckets].into_boxed_slice(),
            scores: vec![score_combiner_fn(); window_size as usize].into_boxed_slice(),
            window_size,
            cursor: num_buckets,
            offset: 0,
            doc: 0,
            score: 0.0,
            num_matches: 0,
            coord,
            num_docs,
        };
        if union.refill() {
            union.advance();
        } else {
            union.doc = TERMINATED;
        }
        Ok(union)
    }

    /// Size of the window of documents buffered at once.
    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    fn num_buckets(&self) -> usize {
        self.bitsets.len()
    }

    fn refill(&mut self) -> bool {
        if let Some(min_doc) = self.docsets.iter().map(DocSet::doc).min() {
            self.offset = min_doc;
            self.cursor = 0;
            self.doc = min_doc;
            refill(
                &mut self.docsets,
                &mut self.bitsets,
                &mut self.scores,
                min_doc,
                self.window_size,
            );
            true
        } else {
            false
        }
    }

    fn advance_buffered(&mut self) -> bool {
        while self.cursor < self.num_buckets() {
            if let Some(val) = pop_lowest(&mut self.bitsets[self.cursor]) {
                let delta = val + (self.cursor as u32) * 64;
                self.doc = self.offset + delta;
                let score_combiner = &mut self.scores[delta as usize];
                self.num_matches = score_combiner.num_matches();
                self.score = score_combiner.score() * self.coord.factor(self.num_matches);
                score_combiner.clear();
                return true;
            } else {
                self.cursor += 1;
            }
        }
        false
    }

    fn is_in_horizon(&self, target: DocId) -> bool {
        let gap = target - self.offset;
        gap < self.window_size
    }
}

impl<TScorer, TScoreCombiner> DocSet for BufferedUnionScorer<TScorer, TScoreCombiner>
where
    TScorer: Scorer,
    TScoreCombiner: ScoreCombiner,
{
    fn advance(&mut self) -> DocId {
        if self.advance_buffered() {
            return self.doc;
        }
        if !self.refill() {
            self.doc = TERMINATED;
            return TERMINATED;
        }
        if !self.advance_buffered() {
            return TERMINATED;
        }
        self.doc
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        if self.is_in_horizon(target) {
            // Our value is within the buffered horizon.

            // Skipping to corresponding bucket.
            let gap = target - self.offset;
            let new_cursor = gap as usize / 64;
            for obsolete_bucket in &mut self.bitsets[self.cursor..new_cursor] {
                *obsolete_bucket = 0;
            }
            for score_combiner in &mut self.scores[self.cursor * 64..new_cursor * 64] {
                score_combiner.clear();
            }
            self.cursor = new_cursor;

            // Advancing until we reach the end of the bucket
            // or we reach a doc greater or equal to the target.
            let mut doc = self.doc();
            while doc < target {
                doc = self.advance();
            }
            doc
        } else {
            // clear the buffered info.
            for obsolete_bucket in self.bitsets.iter_mut() {
                *obsolete_bucket = 0;
            }
            for score_combiner in self.scores.iter_mut() {
                score_combiner.clear();
            }

            // The target is outside of the buffered horizon.
            // advance all docsets to a doc >= to the target.
            unordered_drain_filter(&mut self.docsets, |docset| {
                if docset.doc() < target {
                    docset.seek(target);
                }
                docset.doc() == TERMINATED
            });

            // at this point all of the docsets
            // are positioned on a doc >= to the target.
            if !self.refill() {
                self.doc = TERMINATED;
                return TERMINATED;
            }
            self.advance()
        }
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn size_hint(&self) -> u32 {
        let sum: u64 = self
            .docsets
            .iter()
            .map(|docset| docset.size_hint() as u64)
            .sum();
        sum.min(self.num_docs as u64) as u32
    }

    fn cost(&self) -> u64 {
        self.docsets.iter().map(DocSet::cost).sum()
    }

    fn count(&mut self) -> u32 {
        if self.doc == TERMINATED {
            return 0;
        }
        let mut count = self.bitsets[self.cursor..]
            .iter()
            .map(|bucket| bucket.count_ones())
            .sum::<u32>()
            + 1;
        for bucket in self.bitsets.iter_mut() {
            *bucket = 0;
        }
        while self.refill() {
            count += self
                .bitsets
                .iter()
                .map(|bucket| bucket.count_ones())
                .sum::<u32>();
            for bucket in self.bitsets.iter_mut() {
                *bucket = 0;
            }
        }
        for score_combiner in self.scores.iter_mut() {
            score_combiner.clear();
        }
        self.cursor = self.num_buckets();
        self.doc = TERMINATED;
        count
    }
}

impl<TScorer, TScoreCombiner> Scorer for BufferedUnionScorer<TScorer, TScoreCombiner>
where
    TScoreCombiner: ScoreCombiner,
    TScorer: Scorer,
{
    fn score(&mut self) -> Score {
        self.score
    }

    fn match_count(&mut self) -> u32 {
        self.num_matches
    }

    fn node(&self) -> ScorerNode {
        ScorerNode::BucketDisjunction {
            doc: self.doc,
            children: self
                .docsets
                .iter()
                .map(|docset| ChildNode::new(Occur::Should, docset.node()))
                .collect(),
        }
    }

    fn for_each_leaf(&self, occur: Occur, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        for docset in &self.docsets {
            docset.for_each_leaf(child_occur(occur, Occur::Should), visitor);
        }
    }
}
