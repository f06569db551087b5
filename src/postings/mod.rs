//! Posting cursors and the sources opening them.
//!
//! The engine consumes postings through the [`DocSet`](crate::DocSet) trait
//! and scores them through [`SubScoreFunction`]. How postings are stored is up
//! to the [`PostingsSource`] implementation; [`InMemoryPostings`] keeps them
//! in memory.

mod in_memory;
mod source;
mod vec_postings;

pub use self::in_memory::InMemoryPostings;
pub use self::source::{ConstScore, PostingsSource, SubScoreFunction};
pub use self::vec_postings::VecDocSet;

#[cfg(test)]
pub(crate) mod tests {
    use crate::docset::{DocSet, TERMINATED};
    use crate::DocId;

    /// Wraps a docset, hiding its own `seek` implementation behind the default
    /// one, which calls `advance` until reaching the target.
    pub struct UnoptimizedDocSet<TDocSet: DocSet>(TDocSet);

    impl<TDocSet: DocSet> UnoptimizedDocSet<TDocSet> {
        pub fn wrap(docset: TDocSet) -> UnoptimizedDocSet<TDocSet> {
            UnoptimizedDocSet(docset)
        }
    }

    impl<TDocSet: DocSet> DocSet for UnoptimizedDocSet<TDocSet> {
        fn advance(&mut self) -> DocId {
            self.0.advance()
        }

        fn doc(&self) -> DocId {
            self.0.doc()
        }

        fn size_hint(&self) -> u32 {
            self.0.size_hint()
        }
    }

    /// Checks that seeking to each target yields the same sequence as
    /// advancing one document at a time.
    pub fn test_skip_against_unoptimized<F: Fn() -> Box<dyn DocSet>>(
        postings_factory: F,
        targets: Vec<u32>,
    ) {
        for target in targets {
            let mut postings_opt = postings_factory();
            if target < postings_opt.doc() {
                continue;
            }
            let mut postings_unopt = UnoptimizedDocSet::wrap(postings_factory());
            let skip_result_opt = postings_opt.seek(target);
            let skip_result_unopt = postings_unopt.seek(target);
            assert_eq!(
                skip_result_unopt, skip_result_opt,
                "Failed while skipping to {target}"
            );
            assert!(skip_result_opt >= target);
            assert_eq!(postings_opt.doc(), skip_result_opt);
            if skip_result_opt == TERMINATED {
                continue;
            }
            while postings_opt.advance() != TERMINATED {
                assert_eq!(postings_opt.doc(), postings_unopt.advance());
            }
            assert_eq!(postings_unopt.advance(), TERMINATED);
        }
    }
}
