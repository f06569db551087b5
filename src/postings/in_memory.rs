use std::sync::Arc;

use crate::core::Partition;
use crate::docset::DocSet;
use crate::postings::{PostingsSource, SubScoreFunction, VecDocSet};
use crate::{DocId, EngineError, Score};

/// Postings of one term held in memory, one sorted list of
/// `(doc, score)` per partition.
///
/// Partitions beyond the last registered list do not contain the term.
#[derive(Clone, Debug)]
pub struct InMemoryPostings {
    label: String,
    partitions: Vec<Arc<PartitionPostings>>,
}

#[derive(Debug, Default)]
struct PartitionPostings {
    doc_ids: Vec<DocId>,
    scores: Vec<Score>,
}

impl InMemoryPostings {
    /// Creates postings for a term that does not appear in any partition yet.
    pub fn new(label: impl Into<String>) -> InMemoryPostings {
        InMemoryPostings {
            label: label.into(),
            partitions: Vec::new(),
        }
    }

    /// Creates postings where every document scores `score`.
    ///
    /// `docs_per_partition[i]` lists the documents of partition `i`.
    pub fn with_uniform_score(
        label: impl Into<String>,
        docs_per_partition: Vec<Vec<DocId>>,
        score: Score,
    ) -> InMemoryPostings {
        let mut postings = InMemoryPostings::new(label);
        for docs in docs_per_partition {
            let scored: Vec<(DocId, Score)> = docs.into_iter().map(|doc| (doc, score)).collect();
            postings = postings.add_partition(scored);
        }
        postings
    }

    /// Appends the postings of the next partition.
    ///
    /// Entries are sorted by doc id. If a doc id appears more than once, the
    /// first entry wins.
    pub fn add_partition(mut self, mut scored_docs: Vec<(DocId, Score)>) -> InMemoryPostings {
        scored_docs.sort_by_key(|(doc, _)| *doc);
        scored_docs.dedup_by_key(|(doc, _)| *doc);
        let (doc_ids, scores) = scored_docs.into_iter().unzip();
        self.partitions
            .push(Arc::new(PartitionPostings { doc_ids, scores }));
        self
    }

    /// Number of documents containing the term in the given partition.
    pub fn doc_freq(&self, partition: &Partition) -> usize {
        self.partitions
            .get(partition.partition_ord() as usize)
            .map(|postings| postings.doc_ids.len())
            .unwrap_or(0)
    }

    fn partition_postings(&self, partition: &Partition) -> crate::Result<Option<&Arc<PartitionPostings>>> {
        let Some(postings) = self.partitions.get(partition.partition_ord() as usize) else {
            return Ok(None);
        };
        if let Some(&last_doc) = postings.doc_ids.last() {
            if last_doc >= partition.max_doc() {
                return Err(EngineError::InvalidArgument(format!(
                    "Term '{}' references doc {last_doc} beyond {partition:?}",
                    self.label
                )));
            }
        }
        Ok(Some(postings))
    }
}

impl PostingsSource for InMemoryPostings {
    fn label(&self) -> &str {
        &self.label
    }

    fn postings(&self, partition: &Partition) -> crate::Result<Option<Box<dyn DocSet>>> {
        let postings = self.partition_postings(partition)?;
        Ok(postings
            .filter(|postings| !postings.doc_ids.is_empty())
            .map(|postings| Box::new(VecDocSet::from(postings.doc_ids.clone())) as Box<dyn DocSet>))
    }

    fn score_function(&self, partition: &Partition) -> crate::Result<Box<dyn SubScoreFunction>> {
        let postings = self
            .partition_postings(partition)?
            .cloned()
            .unwrap_or_default();
        Ok(Box::new(InMemoryScores {
            postings,
            cursor: 0,
        }))
    }
}

/// Looks scores up by walking forward through the posting list, as documents
/// are scored in increasing order.
struct InMemoryScores {
    postings: Arc<PartitionPostings>,
    cursor: usize,
}

impl SubScoreFunction for InMemoryScores {
    fn score_at(&mut self, doc: DocId) -> Score {
        let doc_ids = &self.postings.doc_ids;
        if doc_ids.get(self.cursor).map_or(true, |&current| current > doc) {
            self.cursor = 0;
        }
        self.cursor += doc_ids[self.cursor..].partition_point(|&current| current < doc);
        match doc_ids.get(self.cursor) {
            Some(&current) if current == doc => self.postings.scores[self.cursor],
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryPostings;
    use crate::core::Partition;
    use crate::docset::{DocSet, TERMINATED};
    use crate::postings::PostingsSource;
    use crate::EngineError;

    #[test]
    fn test_in_memory_postings() {
        let postings = InMemoryPostings::new("title:rust")
            .add_partition(vec![(7, 0.7), (2, 0.2), (5, 0.5)])
            .add_partition(vec![]);
        let partitions = Partition::from_max_docs(&[10, 10, 10]);
        let mut docset = postings.postings(&partitions[0]).unwrap().unwrap();
        let mut scores = postings.score_function(&partitions[0]).unwrap();
        assert_eq!(docset.doc(), 2);
        assert_eq!(scores.score_at(2), 0.2);
        assert_eq!(docset.advance(), 5);
        assert_eq!(scores.score_at(5), 0.5);
        assert_eq!(docset.advance(), 7);
        assert_eq!(scores.score_at(7), 0.7);
        assert_eq!(docset.advance(), TERMINATED);
        assert!(postings.postings(&partitions[1]).unwrap().is_none());
        assert!(postings.postings(&partitions[2]).unwrap().is_none());
        assert_eq!(postings.doc_freq(&partitions[0]), 3);
        assert_eq!(postings.label(), "title:rust");
    }

    #[test]
    fn test_scores_requested_out_of_order() {
        let postings = InMemoryPostings::new("a").add_partition(vec![(1, 1.0), (3, 3.0)]);
        let partition = Partition::new(0, 4, 0);
        let mut scores = postings.score_function(&partition).unwrap();
        assert_eq!(scores.score_at(3), 3.0);
        assert_eq!(scores.score_at(1), 1.0);
        assert_eq!(scores.score_at(2), 0.0);
    }

    #[test]
    fn test_postings_beyond_max_doc() {
        let postings = InMemoryPostings::with_uniform_score("a", vec![vec![1, 12]], 1.0);
        let partition = Partition::new(0, 10, 0);
        assert!(matches!(
            postings.postings(&partition),
            Err(EngineError::InvalidArgument(_))
        ));
    }
}
