mod cancel;
pub mod executor;
mod partition;
mod searcher;
mod settings;

pub use self::cancel::Cancellation;
pub use self::executor::Executor;
pub use self::partition::{Partition, PartitionOrdinal};
pub use self::searcher::{SearchResult, Searcher};
pub(crate) use self::settings::validate_window_size;
pub use self::settings::{
    SearchSettings, DEFAULT_BUCKET_WINDOW_SIZE, DEFAULT_CANCELLATION_CHECK_INTERVAL,
    DEFAULT_MAX_BUCKET_CLAUSES, DEFAULT_MAX_CLAUSE_COUNT, MAX_BUCKET_WINDOW_SIZE,
};
