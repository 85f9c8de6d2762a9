//! Per-dimension score aggregation.
//!
//! Both the per-submission scoring and the fleet-wide report use the same
//! fold-then-average rule: accumulate a sum and a count per dimension, then
//! replace each sum with `sum / count`. Dimensions with no data points never
//! appear in the result.

pub mod report;

use std::ops::Deref;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::StatementCatalog;
use crate::types::Answer;

pub use report::{aggregate_submissions, AdminStats};

/// Averaged score for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    /// Unrounded mean of the folded values.
    pub score: f64,
    /// Number of values folded in. Always at least 1.
    pub count: u32,
}

/// Dimension name to averaged score, in first-folded order.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionScores(IndexMap<String, DimensionScore>);

impl DimensionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dimension: &str) -> Option<&DimensionScore> {
        self.0.get(dimension)
    }

    /// Dimension names in iteration order.
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Deref for DimensionScores {
    type Target = IndexMap<String, DimensionScore>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<(String, DimensionScore)> for DimensionScores {
    fn from_iter<T: IntoIterator<Item = (String, DimensionScore)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Running sum and count per dimension.
#[derive(Debug, Default)]
pub struct ScoreAccumulator {
    totals: IndexMap<String, (f64, u32)>,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one data point into `dimension`.
    pub fn add(&mut self, dimension: &str, value: f64) {
        let entry = self
            .totals
            .entry(dimension.to_string())
            .or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    /// Replace every sum with its mean.
    pub fn finish(self) -> DimensionScores {
        self.totals
            .into_iter()
            .map(|(dimension, (sum, count))| {
                (
                    dimension,
                    DimensionScore {
                        score: sum / f64::from(count),
                        count,
                    },
                )
            })
            .collect()
    }
}

/// Average a session's answers per dimension.
///
/// Answers that reference an unknown statement id are skipped.
pub fn calculate_dimension_scores(answers: &[Answer], catalog: &StatementCatalog) -> DimensionScores {
    let mut acc = ScoreAccumulator::new();
    for answer in answers {
        match catalog.get(answer.statement_id) {
            Some(statement) => acc.add(&statement.dimension, f64::from(answer.value)),
            None => {
                log::debug!(
                    "Skipping answer for unknown statement id {}",
                    answer.statement_id
                );
            }
        }
    }
    acc.finish()
}
