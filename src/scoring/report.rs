//! Fleet-wide reporting over stored submissions.

use serde::{Deserialize, Serialize};

use super::{DimensionScores, ScoreAccumulator};
use crate::types::Submission;

/// Administrative overview of all stored submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_submissions: usize,
    pub average_category_scores: DimensionScores,
}

impl AdminStats {
    pub fn from_submissions(submissions: &[Submission]) -> Self {
        Self {
            total_submissions: submissions.len(),
            average_category_scores: aggregate_submissions(submissions),
        }
    }
}

/// Average each dimension's per-submission score across all submissions.
///
/// One data point per submission per dimension; a dimension missing from a
/// submission is not counted for it.
pub fn aggregate_submissions(submissions: &[Submission]) -> DimensionScores {
    let mut acc = ScoreAccumulator::new();
    for submission in submissions {
        for (dimension, data) in submission.category_scores.iter() {
            acc.add(dimension, data.score);
        }
    }
    acc.finish()
}
