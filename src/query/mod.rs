//! Query module
//!
//! The query module regroups the boolean query machinery: queries and weights,
//! the scorers combining posting cursors, and coordination.

mod boolean_query;
mod boost_query;
mod const_scorer;
mod coord;
mod disjunction;
mod empty_scorer;
mod exclude;
mod explanation;
mod intersection;
mod occur;
mod query;
mod reqopt_scorer;
mod score_combiner;
mod scorer;
mod term_query;
mod union;
mod weight;

pub use self::boolean_query::{BooleanQuery, BooleanWeight};
pub use self::boost_query::BoostQuery;
pub use self::const_scorer::ConstScorer;
pub use self::coord::{CoordTable, Coordination, NoCoordination, OverlapCoordination};
pub use self::disjunction::DisjunctionScorer;
pub use self::empty_scorer::EmptyScorer;
pub use self::exclude::{Exclude, ExclusionSet};
pub use self::explanation::Explanation;
pub use self::intersection::{intersect_scorers, Intersection};
pub use self::occur::Occur;
pub use self::query::{EnableScoring, Query, QueryClone};
pub use self::reqopt_scorer::{OptionalMatching, RequiredOptionalScorer};
pub use self::score_combiner::{DoNothingCombiner, ScoreCombiner, SumCombiner};
pub(crate) use self::scorer::child_occur;
pub use self::scorer::{ChildNode, Scorer, ScorerNode};
pub use self::term_query::{TermQuery, TermScorer, TermWeight};
pub use self::union::BufferedUnionScorer;
pub use self::weight::{CollectionOptions, Weight};
