use std::fmt;

use serde::{Deserialize, Serialize};

/// Defines whether a clause of a boolean combination must match,
/// should match or must not match.
#[derive(Debug, Clone, Hash, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Occur {
    /// For a given document to be considered for scoring,
    /// at least one of the clauses with the Should or the Must
    /// Occur constraint must match the document.
    ///
    /// Optional clauses add to the score of the documents they match.
    Should,
    /// Documents not matching the clause are excluded from the search.
    Must,
    /// Documents matching the clause are excluded from the search.
    ///
    /// Prohibited clauses never contribute to the score.
    MustNot,
}

impl Occur {
    /// Returns a char representation of the `Occur`,
    /// as used in the debug representation of scorer trees.
    pub fn to_char(self) -> char {
        match self {
            Occur::Should => ' ',
            Occur::Must => '+',
            Occur::MustNot => '-',
        }
    }

    /// Returns true for the clauses that may make a document match.
    pub fn is_positive(self) -> bool {
        self != Occur::MustNot
    }
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Occur::Should => "should",
            Occur::Must => "must",
            Occur::MustNot => "must_not",
        })
    }
}
