use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// Comparator trait defining the order in which items should be ranked.
///
/// `Ordering::Less` means `lhs` ranks before `rhs`.
pub trait Comparator<T>: Send + Sync {
    /// Return the order between two values.
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;
}

/// Ranks items in increasing order, following their `Ord` implementation.
#[derive(Debug, Copy, Clone, Default)]
pub struct NaturalComparator;

impl<T: Ord> Comparator<T> for NaturalComparator {
    #[inline(always)]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Heap entry ordered by the computer's comparator.
///
/// `BinaryHeap` is a max-heap, so the worst ranked entry sits at its top.
struct ComparableItem<T, C> {
    item: T,
    comparator: Arc<C>,
}

impl<T, C: Comparator<T>> Ord for ComparableItem<T, C> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparator.compare(&self.item, &other.item)
    }
}

impl<T, C: Comparator<T>> PartialOrd for ComparableItem<T, C> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, C: Comparator<T>> PartialEq for ComparableItem<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, C: Comparator<T>> Eq for ComparableItem<T, C> {}

/// Keeps track of the `top_n` best items pushed into it.
///
/// Items are kept in a `BinaryHeap` with the worst retained item at its
/// root, so that the entry threshold is available in `O(1)`. Collecting the
/// top `K` out of `n` items is `O(n log K)`.
///
/// The comparator must be a total order over the pushed items. Collectors
/// guarantee it by breaking ties on the document address.
pub struct TopNComputer<T, C> {
    heap: BinaryHeap<ComparableItem<T, C>>,
    top_n: usize,
    comparator: Arc<C>,
}

impl<T, C: Comparator<T>> TopNComputer<T, C> {
    /// Creates a computer retaining at most `top_n` items.
    pub fn new_with_comparator(top_n: usize, comparator: C) -> Self {
        TopNComputer {
            heap: BinaryHeap::with_capacity(top_n.min(4_096)),
            top_n,
            comparator: Arc::new(comparator),
        }
    }

    /// Maximum number of retained items.
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Comparator ranking the items.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Number of retained items.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if no item is retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the worst retained item once `top_n` items are retained.
    ///
    /// Any item that does not rank strictly before the threshold would be
    /// rejected by [`TopNComputer::push`].
    #[inline]
    pub fn threshold(&self) -> Option<&T> {
        if self.heap.len() >= self.top_n {
            self.heap.peek().map(|entry| &entry.item)
        } else {
            None
        }
    }

    /// Returns true if `item` would be retained by [`TopNComputer::push`].
    #[inline]
    pub fn accepts(&self, item: &T) -> bool {
        if self.top_n == 0 {
            return false;
        }
        match self.threshold() {
            Some(threshold) => self.comparator.compare(item, threshold) == Ordering::Less,
            None => true,
        }
    }

    /// Pushes an item, evicting the worst retained item if the computer is full.
    ///
    /// Returns true if the item was retained.
    pub fn push(&mut self, item: T) -> bool {
        if !self.accepts(&item) {
            return false;
        }
        let entry = ComparableItem {
            item,
            comparator: self.comparator.clone(),
        };
        if self.heap.len() < self.top_n {
            self.heap.push(entry);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            *worst = entry;
        }
        true
    }

    /// Returns the retained items, best first.
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|entry| entry.item)
            .collect()
    }
}
