use crate::core::Partition;
use crate::docset::{DocSet, TERMINATED};
use crate::query::explanation::{does_not_match, does_not_match_because};
use crate::query::score_combiner::{DoNothingCombiner, ScoreCombiner, SumCombiner};
use crate::query::term_query::TermScorer;
use crate::query::union::BufferedUnionScorer;
use crate::query::{
    intersect_scorers, CollectionOptions, CoordTable, DisjunctionScorer, EmptyScorer, Exclude,
    Explanation, Occur, OptionalMatching, RequiredOptionalScorer, Scorer, Weight,
};
use crate::{DocId, Score};

struct WeightedClause {
    occur: Occur,
    description: String,
    weight: Box<dyn Weight>,
}

/// Scorers of the clauses of a boolean query for one partition, grouped by occur.
///
/// Optional and prohibited clauses that do not appear in the partition are dropped.
struct PerOccurScorers {
    must: Vec<Box<dyn Scorer>>,
    should: Vec<Box<dyn Scorer>>,
    must_not: Vec<Box<dyn Scorer>>,
}

/// Weight of a [`BooleanQuery`](super::BooleanQuery).
pub struct BooleanWeight {
    clauses: Vec<WeightedClause>,
    minimum_should_match: Option<usize>,
    coord: CoordTable,
    max_coord: u32,
    scoring_enabled: bool,
}

impl BooleanWeight {
    /// Creates a boolean weight.
    ///
    /// `coord` is tabulated for `max_coord`, the number of non-prohibited clauses.
    pub(crate) fn new(
        weights: Vec<(Occur, String, Box<dyn Weight>)>,
        minimum_should_match: Option<usize>,
        coord: CoordTable,
        max_coord: u32,
        scoring_enabled: bool,
    ) -> BooleanWeight {
        let clauses = weights
            .into_iter()
            .map(|(occur, description, weight)| WeightedClause {
                occur,
                description,
                weight,
            })
            .collect();
        BooleanWeight {
            clauses,
            minimum_should_match,
            coord,
            max_coord,
            scoring_enabled,
        }
    }

    /// Returns `None` if a required clause does not appear in the partition.
    fn per_occur_scorers(
        &self,
        partition: &Partition,
        boost: Score,
    ) -> crate::Result<Option<PerOccurScorers>> {
        let mut scorers = PerOccurScorers {
            must: Vec::new(),
            should: Vec::new(),
            must_not: Vec::new(),
        };
        for clause in &self.clauses {
            let sub_scorer = clause.weight.scorer(partition, boost)?;
            let is_empty = sub_scorer.doc() == TERMINATED;
            match clause.occur {
                Occur::Must if is_empty => return Ok(None),
                Occur::Must => scorers.must.push(sub_scorer),
                Occur::Should if !is_empty => scorers.should.push(sub_scorer),
                Occur::MustNot if !is_empty => scorers.must_not.push(sub_scorer),
                Occur::Should | Occur::MustNot => {}
            }
        }
        Ok(Some(scorers))
    }

    /// Scorer of the optional clauses when there is no required clause.
    fn optional_scorer<TScoreCombiner: ScoreCombiner>(
        &self,
        mut should: Vec<Box<dyn Scorer>>,
        partition: &Partition,
        options: Option<&CollectionOptions>,
    ) -> crate::Result<Box<dyn Scorer>> {
        let minimum_match = self.minimum_should_match.unwrap_or(1);
        if should.len() < minimum_match {
            return Ok(Box::new(EmptyScorer));
        }
        if should.len() == 1 && self.coord.is_identity() {
            if let Some(scorer) = should.pop() {
                return Ok(scorer);
            }
        }
        if let Some(options) = options.filter(|options| options.accepts_out_of_order) {
            if minimum_match == 1 && should.len() <= options.max_bucket_clauses {
                debug!(
                    "bucketed disjunction of {} clauses on {partition:?}",
                    should.len()
                );
                return bucket_union::<TScoreCombiner>(
                    should,
                    options.bucket_window_size,
                    self.coord.clone(),
                    partition.max_doc(),
                );
            }
            debug!(
                "falling back to heap disjunction on {partition:?}: {} clauses, minimum match {}",
                should.len(),
                minimum_match
            );
        }
        Ok(Box::new(DisjunctionScorer::new(
            should,
            TScoreCombiner::default(),
            minimum_match,
            self.coord.clone(),
        )?))
    }

    fn complex_scorer<TScoreCombiner: ScoreCombiner>(
        &self,
        partition: &Partition,
        boost: Score,
        options: Option<&CollectionOptions>,
    ) -> crate::Result<Box<dyn Scorer>> {
        let Some(PerOccurScorers {
            must,
            mut should,
            must_not,
        }) = self.per_occur_scorers(partition, boost)?
        else {
            return Ok(Box::new(EmptyScorer));
        };
        let positive_scorer: Box<dyn Scorer> = match (must.is_empty(), should.is_empty()) {
            (true, true) => return Ok(Box::new(EmptyScorer)),
            (true, false) => self.optional_scorer::<TScoreCombiner>(should, partition, options)?,
            (false, true) => {
                if self.minimum_should_match.is_some() {
                    // Every optional clause is missing from the partition.
                    return Ok(Box::new(EmptyScorer));
                }
                intersect_scorers(must, &self.coord)?
            }
            (false, false) => {
                let num_required = must.len() as u32;
                let num_optional = should.len();
                let req_scorer = intersect_scorers(must, &CoordTable::identity())?;
                match self.minimum_should_match {
                    Some(minimum_match) => {
                        if num_optional < minimum_match {
                            return Ok(Box::new(EmptyScorer));
                        }
                        let opt_scorer = DisjunctionScorer::new(
                            should,
                            TScoreCombiner::default(),
                            minimum_match,
                            CoordTable::identity(),
                        )?;
                        Box::new(RequiredOptionalScorer::<_, _, TScoreCombiner>::new(
                            req_scorer,
                            opt_scorer,
                            OptionalMatching::Required,
                            num_required,
                            num_optional,
                            self.coord.clone(),
                        ))
                    }
                    None => {
                        let opt_scorer: Box<dyn Scorer> = if num_optional == 1 {
                            should.remove(0)
                        } else {
                            Box::new(DisjunctionScorer::new(
                                should,
                                TScoreCombiner::default(),
                                1,
                                CoordTable::identity(),
                            )?)
                        };
                        Box::new(RequiredOptionalScorer::<_, _, TScoreCombiner>::new(
                            req_scorer,
                            opt_scorer,
                            OptionalMatching::ScoreOnly,
                            num_required,
                            num_optional,
                            self.coord.clone(),
                        ))
                    }
                }
            }
        };
        if must_not.is_empty() {
            Ok(positive_scorer)
        } else {
            Ok(Box::new(Exclude::new(positive_scorer, must_not)))
        }
    }

    fn scorer_with_options(
        &self,
        partition: &Partition,
        boost: Score,
        options: Option<&CollectionOptions>,
    ) -> crate::Result<Box<dyn Scorer>> {
        if self.scoring_enabled {
            self.complex_scorer::<SumCombiner>(partition, boost, options)
        } else {
            self.complex_scorer::<DoNothingCombiner>(partition, boost, options)
        }
    }
}

fn bucket_union<TScoreCombiner: ScoreCombiner>(
    scorers: Vec<Box<dyn Scorer>>,
    window_size: u32,
    coord: CoordTable,
    num_docs: u32,
) -> crate::Result<Box<dyn Scorer>> {
    let score_combiner_fn = TScoreCombiner::default;
    let is_all_term_scorers = scorers.iter().all(|scorer| scorer.is::<TermScorer>());
    if is_all_term_scorers {
        let term_scorers: Vec<TermScorer> = scorers
            .into_iter()
            .filter_map(|scorer| scorer.downcast::<TermScorer>().ok().map(|scorer| *scorer))
            .collect();
        return Ok(Box::new(BufferedUnionScorer::build(
            term_scorers,
            score_combiner_fn,
            window_size,
            coord,
            num_docs,
        )?));
    }
    Ok(Box::new(BufferedUnionScorer::build(
        scorers,
        score_combiner_fn,
        window_size,
        coord,
        num_docs,
    )?))
}

fn clause_matches(weight: &dyn Weight, partition: &Partition, doc: DocId) -> crate::Result<bool> {
    let mut scorer = weight.scorer(partition, 1.0)?;
    Ok(scorer.doc() <= doc && scorer.seek(doc) == doc)
}

impl Weight for BooleanWeight {
    fn scorer(&self, partition: &Partition, boost: Score) -> crate::Result<Box<dyn Scorer>> {
        self.scorer_with_options(partition, boost, None)
    }

    fn bulk_scorer(
        &self,
        partition: &Partition,
        boost: Score,
        options: &CollectionOptions,
    ) -> crate::Result<Box<dyn Scorer>> {
        self.scorer_with_options(partition, boost, Some(options))
    }

    fn explain(&self, partition: &Partition, doc: DocId) -> crate::Result<Explanation> {
        let mut details = Vec::new();
        let mut sum: Score = 0.0;
        let mut overlap = 0u32;
        let mut should_matches = 0usize;
        let mut failures = Vec::new();
        for clause in &self.clauses {
            let matches = clause_matches(clause.weight.as_ref(), partition, doc)?;
            match (clause.occur, matches) {
                (Occur::MustNot, true) => {
                    failures.push(format!("match on prohibited clause ({})", clause.description));
                }
                (Occur::Must, false) => {
                    failures.push(format!("no match on required clause ({})", clause.description));
                }
                (Occur::MustNot, false) | (Occur::Should, false) => {}
                (occur, true) => {
                    let explanation = clause.weight.explain(partition, doc)?;
                    sum += explanation.value();
                    overlap += 1;
                    if occur == Occur::Should {
                        should_matches += 1;
                    }
                    details.push(explanation);
                }
            }
        }
        if !failures.is_empty() {
            return Err(does_not_match_because(
                doc,
                &format!(
                    "Failure to meet condition(s) of required/prohibited clause(s): {}",
                    failures.join(", ")
                ),
            ));
        }
        if let Some(minimum_should_match) = self.minimum_should_match {
            if should_matches < minimum_should_match {
                return Err(does_not_match_because(
                    doc,
                    &format!(
                        "Failure to match minimum number of optional clauses: \
                         {minimum_should_match}"
                    ),
                ));
            }
        }
        if overlap == 0 {
            return Err(does_not_match(doc));
        }
        let mut sum_explanation = Explanation::new("sum of:", sum);
        for detail in details {
            sum_explanation.add_detail(detail);
        }
        let coord_factor = self.coord.factor(overlap);
        if coord_factor == 1.0 {
            return Ok(sum_explanation);
        }
        let mut explanation = Explanation::new("product of:", sum * coord_factor);
        explanation.add_detail(sum_explanation);
        explanation.add_const(format!("coord({overlap}/{})", self.max_coord), coord_factor);
        Ok(explanation)
    }

    fn count(&self, partition: &Partition) -> crate::Result<u32> {
        let options = CollectionOptions {
            accepts_out_of_order: true,
            ..CollectionOptions::default()
        };
        let mut scorer = self.bulk_scorer(partition, 1.0, &options)?;
        Ok(scorer.count())
    }
}
