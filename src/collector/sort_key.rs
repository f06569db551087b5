use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::top_hits::{HitComparator, HitKey};
use crate::core::Partition;
use crate::DocId;

/// Sort order of a [`SortField`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Ascending Order
    Asc,
    /// Descending Order
    #[default]
    Desc,
}

impl Order {
    /// Orients a natural ordering.
    #[inline]
    pub fn apply(self, natural: Ordering) -> Ordering {
        match self {
            Order::Asc => natural,
            Order::Desc => natural.reverse(),
        }
    }
}

/// Value of a sort key for one document.
///
/// Values of the same variant compare naturally. `F64` values follow
/// `f64::total_cmp`. Values of different variants are ordered by variant,
/// in declaration order.
///
/// Values serialize tagged with their variant, so that a value read back
/// keeps ranking the same way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SortValue {
    /// The document has no value. Missing values always rank last.
    Null,
    /// Unsigned integer value.
    U64(u64),
    /// Signed integer value.
    I64(i64),
    /// Floating point value.
    F64(f64),
    /// String value, compared lexicographically on bytes.
    Str(String),
}

impl SortValue {
    /// Returns true for [`SortValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, SortValue::Null)
    }

    fn variant_rank(&self) -> u8 {
        match self {
            SortValue::Null => 0,
            SortValue::U64(_) => 1,
            SortValue::I64(_) => 2,
            SortValue::F64(_) => 3,
            SortValue::Str(_) => 4,
        }
    }

    fn natural_cmp(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::U64(lhs), SortValue::U64(rhs)) => lhs.cmp(rhs),
            (SortValue::I64(lhs), SortValue::I64(rhs)) => lhs.cmp(rhs),
            (SortValue::F64(lhs), SortValue::F64(rhs)) => lhs.total_cmp(rhs),
            (SortValue::Str(lhs), SortValue::Str(rhs)) => lhs.cmp(rhs),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }

    /// Ranks two values for the given order.
    ///
    /// `Ordering::Less` means `self` ranks first. Null values rank after any
    /// other value regardless of `order`.
    pub fn rank_cmp(&self, other: &SortValue, order: Order) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => order.apply(self.natural_cmp(other)),
        }
    }
}

impl From<u64> for SortValue {
    fn from(val: u64) -> SortValue {
        SortValue::U64(val)
    }
}

impl From<i64> for SortValue {
    fn from(val: i64) -> SortValue {
        SortValue::I64(val)
    }
}

impl From<f64> for SortValue {
    fn from(val: f64) -> SortValue {
        SortValue::F64(val)
    }
}

impl From<String> for SortValue {
    fn from(val: String) -> SortValue {
        SortValue::Str(val)
    }
}

impl From<&str> for SortValue {
    fn from(val: &str) -> SortValue {
        SortValue::Str(val.to_string())
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(val: Option<T>) -> SortValue {
        val.map(Into::into).unwrap_or(SortValue::Null)
    }
}

/// Looks up the sort key of the documents of one partition.
///
/// Documents are looked up in increasing doc id order.
pub trait PartitionSortKeys: 'static {
    /// Returns the sort key of `doc`.
    fn key_at(&mut self, doc: DocId) -> SortValue;
}

impl<F> PartitionSortKeys for F
where F: FnMut(DocId) -> SortValue + 'static
{
    fn key_at(&mut self, doc: DocId) -> SortValue {
        (self)(doc)
    }
}

/// Source of a document-level sort key, e.g. a column of the index.
///
/// The key of a document is opened once per partition.
pub trait SortKeyExtractor: Send + Sync + 'static {
    /// Opens the sort keys of `partition`.
    fn for_partition(&self, partition: &Partition) -> crate::Result<Box<dyn PartitionSortKeys>>;
}

impl<F> SortKeyExtractor for F
where F: Fn(&Partition) -> crate::Result<Box<dyn PartitionSortKeys>> + Send + Sync + 'static
{
    fn for_partition(&self, partition: &Partition) -> crate::Result<Box<dyn PartitionSortKeys>> {
        (self)(partition)
    }
}

/// What a [`SortField`] sorts on.
#[derive(Clone)]
pub enum SortBy {
    /// The relevance score of the document.
    Score,
    /// A key looked up for every collected document.
    Key(Arc<dyn SortKeyExtractor>),
}

impl fmt::Debug for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SortBy::Score => write!(f, "Score"),
            SortBy::Key(_) => write!(f, "Key"),
        }
    }
}

/// One criterion of a [`Sort`].
#[derive(Clone, Debug)]
pub struct SortField {
    /// What is sorted on.
    pub by: SortBy,
    /// In which direction.
    pub order: Order,
}

impl SortField {
    /// Sorts on the relevance score.
    pub fn score(order: Order) -> SortField {
        SortField {
            by: SortBy::Score,
            order,
        }
    }

    /// Sorts on a key looked up by `extractor`.
    pub fn key(extractor: impl SortKeyExtractor, order: Order) -> SortField {
        SortField {
            by: SortBy::Key(Arc::new(extractor)),
            order,
        }
    }
}

/// Multi-criteria ordering of hits.
///
/// Hits are ranked on the first field, ties broken on the following fields,
/// then on partition ordinal and doc id, ascending.
#[derive(Clone, Debug)]
pub struct Sort {
    fields: Vec<SortField>,
}

impl Sort {
    /// Creates a sort on the given fields.
    pub fn new(fields: Vec<SortField>) -> Sort {
        Sort { fields }
    }

    /// Sort by decreasing relevance score.
    pub fn by_score() -> Sort {
        Sort::new(vec![SortField::score(Order::Desc)])
    }

    /// Returns the fields of the sort.
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    /// Returns true if one of the fields sorts on the score.
    pub fn needs_scores(&self) -> bool {
        self.fields
            .iter()
            .any(|field| matches!(field.by, SortBy::Score))
    }

    /// Key extractors, in field order.
    pub(crate) fn extractors(&self) -> impl Iterator<Item = &Arc<dyn SortKeyExtractor>> {
        self.fields.iter().filter_map(|field| match &field.by {
            SortBy::Score => None,
            SortBy::Key(extractor) => Some(extractor),
        })
    }

    /// The comparator ranking hits the way this sort does.
    ///
    /// Key fields map to the positions of [`Hit::sort_values`](super::Hit),
    /// in field order.
    pub fn comparator(&self) -> HitComparator {
        let mut value_index = 0;
        let keys = self
            .fields
            .iter()
            .map(|field| match field.by {
                SortBy::Score => HitKey::Score(field.order),
                SortBy::Key(_) => {
                    let key = HitKey::Value {
                        index: value_index,
                        order: field.order,
                    };
                    value_index += 1;
                    key
                }
            })
            .collect();
        HitComparator::new(keys)
    }
}
