//! Definition of the engine's error and result.

use thiserror::Error;

use crate::DocAddress;

/// The library's failure based error enum
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid argument was passed by the user.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),
    /// A disjunction was asked to match more optional clauses than it has.
    #[error(
        "Minimum number of optional clauses to match ({minimum_match}) is invalid for {optional_clauses} optional clause(s)"
    )]
    InvalidMinimumMatch {
        /// Requested minimum number of matching optional clauses.
        minimum_match: usize,
        /// Number of optional clauses available.
        optional_clauses: usize,
    },
    /// A combinator was built without any clause.
    #[error("A boolean combination requires at least one clause")]
    NoClauses,
    /// A boolean combination only holds excluded clauses and can never match.
    #[error("A boolean combination requires at least one required or optional clause")]
    NoPositiveClause,
    /// A boolean query holds more clauses than the searcher accepts.
    #[error("Boolean query has {num_clauses} clauses, more than the maximum of {max_clause_count}")]
    TooManyClauses {
        /// Number of clauses of the offending boolean query.
        num_clauses: usize,
        /// Limit configured in the search settings.
        max_clause_count: usize,
    },
    /// The boundary given to resume a paginated search cannot be produced by any partition.
    #[error("Invalid page boundary {address:?}: {reason}")]
    InvalidPageBoundary {
        /// Address held by the boundary.
        address: DocAddress,
        /// Why the boundary was rejected.
        reason: String,
    },
    /// The window size of a bucketed disjunction is not usable.
    #[error("Invalid bucket window size {0}: must be a positive multiple of 64, at most 65536")]
    InvalidWindowSize(u32),
    /// The search settings could not be parsed.
    #[error("Invalid search settings: '{0}'")]
    InvalidSettings(#[from] serde_json::Error),
    /// An Error happened in one of the thread.
    #[error("An error occurred in a thread: '{0}'")]
    ErrorInThread(String),
    /// System error. (e.g.: We failed spawning a new thread)
    #[error("System error.'{0}'")]
    SystemError(String),
}

impl From<rayon::ThreadPoolBuildError> for EngineError {
    fn from(error: rayon::ThreadPoolBuildError) -> EngineError {
        EngineError::SystemError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::EngineError;
    use crate::DocAddress;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidMinimumMatch {
            minimum_match: 4,
            optional_clauses: 3,
        };
        assert_eq!(
            err.to_string(),
            "Minimum number of optional clauses to match (4) is invalid for 3 optional clause(s)"
        );
        let err = EngineError::InvalidPageBoundary {
            address: DocAddress::new(2, 7),
            reason: "no such partition".to_string(),
        };
        assert!(err.to_string().contains("no such partition"));
    }

    #[test]
    fn test_settings_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: EngineError = json_err.into();
        assert!(matches!(err, EngineError::InvalidSettings(_)));
    }
}
