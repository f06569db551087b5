mod common;

use std::collections::HashSet;
use std::time::Duration;

use boolsearch::collector::{
    CollectorConfig, Count, DocSetCollector, FirstNCollector, Hit, PageBoundary, PartitionStatus,
    TopDocs,
};
use boolsearch::query::{BooleanQuery, BoostQuery, Occur, Query};
use boolsearch::{assert_nearly_equals, Cancellation, DocAddress, EngineError, SearchSettings};
use common::{scored_term, searcher, searcher_with_settings, uniform_term};

fn three_overlapping_clauses() -> BooleanQuery {
    BooleanQuery::new(vec![
        (Occur::Should, uniform_term("a", &[1, 2, 3])),
        (Occur::Should, uniform_term("b", &[2, 3, 4])),
        (Occur::Should, uniform_term("c", &[3, 4, 5])),
    ])
    .with_minimum_should_match(2)
}

fn scored_docs(query: &dyn Query, max_docs: &[u32]) -> Vec<(DocAddress, f32)> {
    let top_hits = searcher(max_docs)
        .search(query, &TopDocs::with_limit(100))
        .unwrap();
    top_hits
        .hits
        .iter()
        .map(|hit| (hit.address, hit.score.unwrap()))
        .collect()
}

#[test]
fn test_two_of_three_optional_clauses() {
    let query = three_overlapping_clauses().with_coord_disabled();
    let hits = scored_docs(&query, &[10]);
    assert_eq!(
        hits,
        vec![
            (DocAddress::new(0, 3), 3.0),
            (DocAddress::new(0, 2), 2.0),
            (DocAddress::new(0, 4), 2.0),
        ]
    );
}

#[test]
fn test_two_of_three_optional_clauses_with_coord() {
    let hits = scored_docs(&three_overlapping_clauses(), &[10]);
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].0, DocAddress::new(0, 3));
    assert_nearly_equals!(hits[0].1, 3.0);
    assert_eq!(hits[1].0, DocAddress::new(0, 2));
    assert_nearly_equals!(hits[1].1, 2.0 * 2.0 / 3.0);
    assert_eq!(hits[2].0, DocAddress::new(0, 4));
    assert_nearly_equals!(hits[2].1, 2.0 * 2.0 / 3.0);
}

#[test]
fn test_conjunction() {
    let query = BooleanQuery::intersection(vec![
        uniform_term("a", &[1, 2, 3]),
        uniform_term("b", &[2, 3, 4]),
    ]);
    let hits = scored_docs(&query, &[10]);
    assert_eq!(
        hits,
        vec![(DocAddress::new(0, 2), 2.0), (DocAddress::new(0, 3), 2.0)]
    );
}

#[test]
fn test_required_optional_and_prohibited() {
    let query = BooleanQuery::new(vec![
        (Occur::Must, uniform_term("a", &[1, 2, 3, 4])),
        (Occur::Should, uniform_term("b", &[3, 8])),
        (Occur::MustNot, uniform_term("c", &[2])),
    ])
    .with_coord_disabled();
    let hits = scored_docs(&query, &[10]);
    assert_eq!(
        hits,
        vec![
            (DocAddress::new(0, 3), 2.0),
            (DocAddress::new(0, 1), 1.0),
            (DocAddress::new(0, 4), 1.0),
        ]
    );
}

#[test]
fn test_boost_multiplies_scores() {
    let query = BoostQuery::new(Box::new(three_overlapping_clauses().with_coord_disabled()), 2.0);
    let hits = scored_docs(&query, &[10]);
    assert_eq!(hits[0], (DocAddress::new(0, 3), 6.0));
}

#[test]
fn test_singletons_through_small_bucket_window() {
    let settings = SearchSettings {
        bucket_window_size: 64,
        max_bucket_clauses: 64,
        ..SearchSettings::default()
    };
    let searcher = searcher_with_settings(&[400], settings);
    let doc_ids: Vec<u32> = (0..40).map(|i| i * 10).collect();
    let clauses: Vec<Box<dyn Query>> = doc_ids
        .iter()
        .map(|&doc| uniform_term(&format!("t{doc}"), &[doc]))
        .collect();
    let query = BooleanQuery::union(clauses);

    // In-order collection falls back to the heap disjunction.
    let in_order = searcher
        .search(&query, &FirstNCollector::with_limit(100))
        .unwrap();
    let expected: Vec<DocAddress> = doc_ids
        .iter()
        .map(|&doc| DocAddress::new(0, doc))
        .collect();
    assert_eq!(in_order, expected);

    let bucketed = searcher.search(&query, &DocSetCollector).unwrap();
    let expected_set: HashSet<u64> = doc_ids.iter().map(|&doc| doc as u64).collect();
    assert_eq!(bucketed, expected_set);
    assert_eq!(searcher.search(&query, &Count).unwrap(), 40);

    let heap_hits = searcher
        .search(
            &query,
            &TopDocs::with_limit(40).with_config(CollectorConfig {
                require_in_order: true,
                ..CollectorConfig::default()
            }),
        )
        .unwrap();
    let bucket_hits = searcher.search(&query, &TopDocs::with_limit(40)).unwrap();
    assert_eq!(heap_hits, bucket_hits);
    assert_eq!(heap_hits.doc_addresses(), expected);
}

#[test]
fn test_invalid_minimum_match() {
    let query = three_overlapping_clauses().with_minimum_should_match(4);
    let err = searcher(&[10]).search(&query, &Count).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidMinimumMatch {
            minimum_match: 4,
            optional_clauses: 3
        }
    ));
}

#[test]
fn test_empty_and_prohibited_only_combinations() {
    let searcher = searcher(&[10]);
    let empty = BooleanQuery::new(Vec::new());
    assert!(matches!(
        searcher.search(&empty, &Count),
        Err(EngineError::NoClauses)
    ));
    let prohibited_only = BooleanQuery::new(vec![(Occur::MustNot, uniform_term("a", &[1]))]);
    assert!(matches!(
        searcher.search(&prohibited_only, &Count),
        Err(EngineError::NoPositiveClause)
    ));
}

#[test]
fn test_explain_matches_collected_score() {
    let searcher = searcher(&[10]);
    let query = three_overlapping_clauses();
    let explanation = searcher.explain(&query, DocAddress::new(0, 2)).unwrap();
    assert_nearly_equals!(explanation.value(), 2.0 * 2.0 / 3.0);
    assert_eq!(explanation.description(), "product of:");
    assert_eq!(explanation.details().len(), 2);
    assert_nearly_equals!(explanation.details()[0].value(), 2.0);

    let explanation = searcher.explain(&query, DocAddress::new(0, 3)).unwrap();
    assert_nearly_equals!(explanation.value(), 3.0);

    assert!(searcher.explain(&query, DocAddress::new(0, 1)).is_err());
    assert!(searcher.explain(&query, DocAddress::new(0, 7)).is_err());
}

#[test]
fn test_multi_threaded_search_matches_single_threaded() {
    let max_docs = [50, 50, 50, 50];
    let query = BooleanQuery::new(vec![
        (
            Occur::Should,
            scored_term(
                "a",
                &[
                    vec![(1, 0.5), (7, 1.5)],
                    vec![(3, 2.0)],
                    vec![],
                    vec![(49, 0.25), (12, 3.0)],
                ],
            ),
        ),
        (
            Occur::Should,
            scored_term(
                "b",
                &[
                    vec![(7, 1.0)],
                    vec![(3, 0.5), (4, 0.75)],
                    vec![(0, 1.25)],
                    vec![(12, 0.1)],
                ],
            ),
        ),
    ]);
    let collector = TopDocs::with_limit(5);
    let single = searcher(&max_docs).search(&query, &collector).unwrap();
    let settings = SearchSettings {
        num_threads: 4,
        ..SearchSettings::default()
    };
    let multi = searcher_with_settings(&max_docs, settings)
        .search(&query, &collector)
        .unwrap();
    assert_eq!(single, multi);
    assert_eq!(single.total_hits, 7);
    assert_eq!(single.hits[0].address, DocAddress::new(3, 12));
}

#[test]
fn test_expired_deadline_truncates_every_partition() {
    let searcher = searcher(&[10, 10]);
    let query = BooleanQuery::union(vec![uniform_term("a", &[1, 2]), uniform_term("b", &[3])]);
    let cancellation = Cancellation::with_timeout(Duration::ZERO);
    let result = searcher
        .search_with_cancellation(&query, &TopDocs::with_limit(10), &cancellation)
        .unwrap();
    assert!(result.is_truncated());
    assert_eq!(result.truncated_partitions(), vec![0, 1]);
    assert!(result
        .partition_statuses
        .iter()
        .all(|status| *status == PartitionStatus::Truncated { last_doc: None }));
    assert!(result.fruit.hits.is_empty());
}

#[test]
fn test_page_boundary_past_the_last_partition() {
    let searcher = searcher(&[10, 10]);
    let query = uniform_term("a", &[1, 2]);
    let boundary = PageBoundary::after(Hit::scored(DocAddress::new(2, 0), 1.0));
    let err = searcher
        .search(query.as_ref(), &TopDocs::with_limit(10).search_after(boundary))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPageBoundary { .. }));

    // A valid boundary after the last hit yields an empty page, not an error.
    let boundary = PageBoundary::after(Hit::scored(DocAddress::new(0, 2), 1.0));
    let top_hits = searcher
        .search(query.as_ref(), &TopDocs::with_limit(10).search_after(boundary))
        .unwrap();
    assert!(top_hits.hits.is_empty());
    assert_eq!(top_hits.total_hits, 2);
}

#[test]
fn test_settings_from_json() {
    let settings = SearchSettings::from_json(r#"{"num_threads": 2, "bucket_window_size": 128}"#)
        .unwrap();
    assert_eq!(settings.num_threads, 2);
    assert_eq!(settings.bucket_window_size, 128);
    assert_eq!(settings.max_bucket_clauses, 32);
    assert!(matches!(
        SearchSettings::from_json(r#"{"bucket_window_size": 100}"#),
        Err(EngineError::InvalidWindowSize(100))
    ));
}
