mod buffered_union;

pub use buffered_union::BufferedUnionScorer;
