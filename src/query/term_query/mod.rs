mod term_query;
mod term_scorer;
mod term_weight;

pub use self::term_query::TermQuery;
pub use self::term_scorer::TermScorer;
pub use self::term_weight::TermWeight;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::collector::{Count, TopDocs};
    use crate::postings::InMemoryPostings;
    use crate::query::{EnableScoring, Query, Scorer, TermQuery, TermScorer};
    use crate::{DocAddress, DocSet, EngineError, Partition, SearchSettings, Searcher, TERMINATED};

    fn searcher(max_docs: &[u32]) -> Searcher {
        Searcher::new(Partition::from_max_docs(max_docs), SearchSettings::default()).unwrap()
    }

    #[test]
    fn test_term_query_scores_come_from_postings() -> crate::Result<()> {
        let searcher = searcher(&[10]);
        let postings = InMemoryPostings::new("a").add_partition(vec![(1, 0.5), (3, 2.0), (7, 1.0)]);
        let query = TermQuery::new(Arc::new(postings));
        let top_hits = searcher.search(&query, &TopDocs::with_limit(2))?;
        let hits: Vec<(DocAddress, Option<f32>)> = top_hits
            .hits
            .iter()
            .map(|hit| (hit.address, hit.score))
            .collect();
        assert_eq!(
            hits,
            vec![
                (DocAddress::new(0, 3), Some(2.0)),
                (DocAddress::new(0, 7), Some(1.0))
            ]
        );
        assert_eq!(top_hits.total_hits, 3);
        Ok(())
    }

    #[test]
    fn test_term_weight_missing_partition_is_empty() -> crate::Result<()> {
        let searcher = searcher(&[10, 10]);
        let postings = InMemoryPostings::with_uniform_score("a", vec![vec![1, 2]], 1.0);
        let query = TermQuery::new(Arc::new(postings));
        let weight = query.weight(EnableScoring::Enabled)?;
        let mut scorer = weight.scorer(&searcher.partitions()[1], 1.0)?;
        assert_eq!(scorer.doc(), TERMINATED);
        assert_eq!(searcher.search(&query, &Count)?, 2);
        Ok(())
    }

    #[test]
    fn test_term_weight_specialized_scorer() -> crate::Result<()> {
        let searcher = searcher(&[10]);
        let postings = InMemoryPostings::new("a").add_partition(vec![(4, 3.0)]);
        let query = TermQuery::new(Arc::new(postings));
        let weight = query.weight(EnableScoring::Enabled)?;
        let scorer = weight.scorer(&searcher.partitions()[0], 2.0)?;
        let mut term_scorer = scorer
            .downcast::<TermScorer>()
            .map_err(|_| EngineError::InvalidArgument("not a term scorer".to_string()))?;
        assert_eq!(term_scorer.doc(), 4);
        assert_eq!(term_scorer.score(), 6.0);
        Ok(())
    }

    #[test]
    fn test_term_query_scoring_disabled() -> crate::Result<()> {
        let searcher = searcher(&[10]);
        let postings = InMemoryPostings::new("a").add_partition(vec![(4, 3.0)]);
        let query = TermQuery::new(Arc::new(postings));
        let weight = query.weight(EnableScoring::Disabled)?;
        let mut scorer = weight.scorer(&searcher.partitions()[0], 1.0)?;
        assert_eq!(scorer.score(), 1.0);
        Ok(())
    }

    #[test]
    fn test_term_query_explain() -> crate::Result<()> {
        let searcher = searcher(&[10]);
        let postings = InMemoryPostings::new("title:rust").add_partition(vec![(4, 3.0)]);
        let query = TermQuery::new(Arc::new(postings));
        let explanation = searcher.explain(&query, DocAddress::new(0, 4))?;
        assert_eq!(explanation.value(), 3.0);
        assert_eq!(explanation.description(), "weight(title:rust)");
        let err = searcher.explain(&query, DocAddress::new(0, 5)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        Ok(())
    }
}
