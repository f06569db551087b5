use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::sort_key::{Order, SortValue};
use super::top_collector::Comparator;
use crate::{DocAddress, Score};

/// A document retained by a top-hits collector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Address of the document.
    pub address: DocAddress,
    /// Score of the document, if scores were computed.
    pub score: Option<Score>,
    /// Values of the key fields of the sort, in field order.
    ///
    /// Empty when ranking by score.
    pub sort_values: Vec<SortValue>,
}

impl Hit {
    /// Creates a hit ranked by score.
    pub fn scored(address: DocAddress, score: Score) -> Hit {
        Hit {
            address,
            score: Some(score),
            sort_values: Vec::new(),
        }
    }
}

/// Best hits of a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopHits {
    /// Number of documents matching the query, including those not retained.
    pub total_hits: u64,
    /// Highest score among the matching documents, if tracked.
    pub max_score: Option<Score>,
    /// Retained hits, best first.
    pub hits: Vec<Hit>,
}

impl TopHits {
    /// Addresses of the retained hits, best first.
    pub fn doc_addresses(&self) -> Vec<DocAddress> {
        self.hits.iter().map(|hit| hit.address).collect()
    }

    /// Returns a boundary resuming after the last retained hit, if any.
    pub fn next_page(&self) -> Option<PageBoundary> {
        self.hits.last().cloned().map(PageBoundary::after)
    }
}

/// One ranking criterion of a [`HitComparator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKey {
    /// Rank on [`Hit::score`].
    Score(Order),
    /// Rank on `Hit::sort_values[index]`.
    Value {
        /// Position within [`Hit::sort_values`].
        index: usize,
        /// Direction.
        order: Order,
    },
}

/// Total order over hits: every key in turn, then partition ordinal and doc
/// id, ascending.
///
/// Missing scores and null values rank after present ones, whatever the
/// direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitComparator {
    keys: Vec<HitKey>,
}

impl HitComparator {
    /// Creates a comparator ranking on `keys`.
    pub fn new(keys: Vec<HitKey>) -> HitComparator {
        HitComparator { keys }
    }

    /// Ranks by decreasing score.
    pub fn by_score() -> HitComparator {
        HitComparator::new(vec![HitKey::Score(Order::Desc)])
    }

    /// Ranking criteria, in priority order.
    pub fn keys(&self) -> &[HitKey] {
        &self.keys
    }

    /// Number of sort values a hit must carry.
    pub fn num_values(&self) -> usize {
        self.keys
            .iter()
            .filter(|key| matches!(key, HitKey::Value { .. }))
            .count()
    }

    /// Returns true if the score is one of the criteria.
    pub fn uses_score(&self) -> bool {
        self.keys
            .iter()
            .any(|key| matches!(key, HitKey::Score(_)))
    }
}

static NULL_VALUE: SortValue = SortValue::Null;

fn compare_scores(lhs: Option<Score>, rhs: Option<Score>, order: Order) -> Ordering {
    match (lhs, rhs) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(lhs), Some(rhs)) => order.apply(lhs.total_cmp(&rhs)),
    }
}

impl Comparator<Hit> for HitComparator {
    fn compare(&self, lhs: &Hit, rhs: &Hit) -> Ordering {
        for key in &self.keys {
            let ordering = match *key {
                HitKey::Score(order) => compare_scores(lhs.score, rhs.score, order),
                HitKey::Value { index, order } => {
                    let lhs_value = lhs.sort_values.get(index).unwrap_or(&NULL_VALUE);
                    let rhs_value = rhs.sort_values.get(index).unwrap_or(&NULL_VALUE);
                    lhs_value.rank_cmp(rhs_value, order)
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        lhs.address.cmp(&rhs.address)
    }
}

/// Position from which a paginated search resumes.
///
/// The next page holds the hits ranking strictly after the boundary hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageBoundary {
    hit: Hit,
}

impl PageBoundary {
    /// Creates a boundary resuming after `hit`.
    pub fn after(hit: Hit) -> PageBoundary {
        PageBoundary { hit }
    }

    /// The hit the next page starts after.
    pub fn hit(&self) -> &Hit {
        &self.hit
    }

    /// Address of the boundary hit.
    pub fn address(&self) -> DocAddress {
        self.hit.address
    }
}

impl From<Hit> for PageBoundary {
    fn from(hit: Hit) -> PageBoundary {
        PageBoundary::after(hit)
    }
}
