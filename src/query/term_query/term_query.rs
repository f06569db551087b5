use std::fmt;
use std::sync::Arc;

use super::term_weight::TermWeight;
use crate::postings::PostingsSource;
use crate::query::{EnableScoring, Query, Weight};

/// A Term query matches all of the documents
/// containing a specific term.
///
/// Where the postings come from and how each document is scored is
/// left to the [`PostingsSource`].
#[derive(Clone)]
pub struct TermQuery {
    source: Arc<dyn PostingsSource>,
}

impl fmt::Debug for TermQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TermQuery({})", self.source.label())
    }
}

impl TermQuery {
    /// Creates a new term query.
    pub fn new(source: Arc<dyn PostingsSource>) -> TermQuery {
        TermQuery { source }
    }

    /// Name of the term.
    pub fn label(&self) -> &str {
        self.source.label()
    }

    /// Returns a weight object.
    ///
    /// While `.weight(...)` returns a boxed trait object,
    /// this method return a specific implementation.
    /// This is useful for optimization purpose.
    pub fn specialized_weight(&self, enable_scoring: EnableScoring) -> TermWeight {
        TermWeight::new(self.source.clone(), enable_scoring.is_scoring_enabled())
    }
}

impl Query for TermQuery {
    fn weight(&self, enable_scoring: EnableScoring) -> crate::Result<Box<dyn Weight>> {
        Ok(Box::new(self.specialized_weight(enable_scoring)))
    }
}
