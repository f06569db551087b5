#![allow(dead_code)]

use std::sync::Arc;

use boolsearch::postings::InMemoryPostings;
use boolsearch::query::{Query, TermQuery};
use boolsearch::{DocId, Partition, Score, SearchSettings, Searcher};

/// Term matching `docs` in a single partition, every doc scoring 1.
pub fn uniform_term(label: &str, docs: &[DocId]) -> Box<dyn Query> {
    let postings = InMemoryPostings::with_uniform_score(label, vec![docs.to_vec()], 1.0);
    Box::new(TermQuery::new(Arc::new(postings)))
}

/// Term spread over several partitions, with an explicit score per doc.
pub fn scored_term(label: &str, scored_docs_per_partition: &[Vec<(DocId, Score)>]) -> Box<dyn Query> {
    let postings = scored_docs_per_partition
        .iter()
        .fold(InMemoryPostings::new(label), |postings, scored_docs| {
            postings.add_partition(scored_docs.clone())
        });
    Box::new(TermQuery::new(Arc::new(postings)))
}

pub fn searcher(max_docs: &[u32]) -> Searcher {
    searcher_with_settings(max_docs, SearchSettings::default())
}

pub fn searcher_with_settings(max_docs: &[u32], settings: SearchSettings) -> Searcher {
    Searcher::new(Partition::from_max_docs(max_docs), settings).unwrap()
}
