use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Default number of consecutive window slots filled by a bucketed disjunction.
pub const DEFAULT_BUCKET_WINDOW_SIZE: u32 = 4_096;
/// Default maximum number of optional clauses evaluated through the bucketed disjunction.
pub const DEFAULT_MAX_BUCKET_CLAUSES: usize = 32;
/// Default number of collected documents between two polls of the cancellation signal.
pub const DEFAULT_CANCELLATION_CHECK_INTERVAL: usize = 1_024;
/// Default maximum number of clauses of a single boolean query.
pub const DEFAULT_MAX_CLAUSE_COUNT: usize = 1_024;
/// Largest accepted bucket window. The window holds one score slot per document.
pub const MAX_BUCKET_WINDOW_SIZE: u32 = 65_536;

/// Search settings.
///
/// Settings can be deserialized from JSON. Missing keys take their default value.
///
/// ```json
/// {
///     "num_threads": 4,
///     "cancellation_check_interval": 1024,
///     "bucket_window_size": 4096,
///     "max_bucket_clauses": 32,
///     "max_clause_count": 1024
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchSettings {
    /// Number of threads used to collect partitions. `1` collects every
    /// partition in the calling thread.
    pub num_threads: usize,
    /// Number of collected documents between two checks of the cancellation signal.
    pub cancellation_check_interval: usize,
    /// Size of the window of a bucketed disjunction. Must be a positive multiple of 64,
    /// no larger than [`MAX_BUCKET_WINDOW_SIZE`].
    pub bucket_window_size: u32,
    /// Above this number of optional clauses, the heap-based disjunction is used even
    /// when the collector accepts out-of-order documents.
    pub max_bucket_clauses: usize,
    /// Searches fail with [`EngineError::TooManyClauses`] when a boolean query
    /// of the query tree has more clauses than this.
    pub max_clause_count: usize,
}

impl Default for SearchSettings {
    fn default() -> SearchSettings {
        SearchSettings {
            num_threads: 1,
            cancellation_check_interval: DEFAULT_CANCELLATION_CHECK_INTERVAL,
            bucket_window_size: DEFAULT_BUCKET_WINDOW_SIZE,
            max_bucket_clauses: DEFAULT_MAX_BUCKET_CLAUSES,
            max_clause_count: DEFAULT_MAX_CLAUSE_COUNT,
        }
    }
}

impl SearchSettings {
    /// Parses and validates settings expressed in JSON.
    pub fn from_json(json: &str) -> crate::Result<SearchSettings> {
        let settings: SearchSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the settings are consistent.
    pub fn validate(&self) -> crate::Result<()> {
        if self.num_threads == 0 {
            return Err(EngineError::InvalidArgument(
                "num_threads must be at least 1".to_string(),
            ));
        }
        if self.cancellation_check_interval == 0 {
            return Err(EngineError::InvalidArgument(
                "cancellation_check_interval must be at least 1".to_string(),
            ));
        }
        if self.max_clause_count == 0 {
            return Err(EngineError::InvalidArgument(
                "max_clause_count must be at least 1".to_string(),
            ));
        }
        validate_window_size(self.bucket_window_size)?;
        Ok(())
    }
}

/// Bucketed disjunctions fill their window 64 documents at a time.
pub(crate) fn validate_window_size(window_size: u32) -> crate::Result<()> {
    if window_size == 0 || window_size % 64 != 0 || window_size > MAX_BUCKET_WINDOW_SIZE {
        return Err(EngineError::InvalidWindowSize(window_size));
    }
    Ok(())
}
