//! Accuracy and point calculation
//!
//! Distance between a trainee's rubric scores and the reference grading is
//! the mean absolute difference over the matched criteria. Accuracy expresses
//! that distance as a percentage of the worst distance the trainee could have
//! produced against the same reference.

use common::models::{ReferenceAnswerKey, Rubric, RubricScoreSet};
use common::{Error, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of scoring one submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReviewScore {
    pub accuracy: i32,
    pub points: i64,
    pub distance: f64,
}

/// Scores trainee submissions against the reference answer key
pub struct ScoringEngine {
    rubric: Rubric,
    answer_key: ReferenceAnswerKey,
    base_points: i64,
}

impl ScoringEngine {
    pub fn new(rubric: Rubric, answer_key: ReferenceAnswerKey, base_points: i64) -> Self {
        Self {
            rubric,
            answer_key,
            base_points,
        }
    }

    pub fn reference(&self, sample_id: &str) -> Option<&RubricScoreSet> {
        self.answer_key.get(sample_id)
    }

    /// Points a trainee would hold after a perfect review of every sample
    pub fn max_possible_points(&self, sample_count: usize) -> i64 {
        (self.base_points + 100) * sample_count as i64
    }

    /// Mean absolute difference between reference and trainee scores
    pub fn compute_distance(&self, reference: &RubricScoreSet, trainee: &RubricScoreSet) -> f64 {
        let diffs: Vec<f64> = matched_scores(reference, trainee)
            .map(|(_, r, t)| (r - t).abs())
            .collect();

        if diffs.is_empty() {
            return self.rubric.score_span();
        }
        diffs.iter().sum::<f64>() / diffs.len() as f64
    }

    /// Accuracy in [0, 100]; 100 means the trainee matched the reference exactly
    pub fn compute_accuracy(&self, reference: &RubricScoreSet, trainee: &RubricScoreSet) -> i32 {
        let matched: Vec<(&str, f64, f64)> = matched_scores(reference, trainee).collect();
        if matched.is_empty() {
            return 0;
        }

        let n = matched.len() as f64;
        let distance = matched.iter().map(|(_, r, t)| (r - t).abs()).sum::<f64>() / n;
        let max_distance = matched
            .iter()
            .map(|(name, r, _)| (r - self.worst_score(name, *r)).abs())
            .sum::<f64>()
            / n;

        if max_distance == 0.0 {
            return if distance == 0.0 { 100 } else { 0 };
        }

        let accuracy = ((max_distance - distance) / max_distance * 100.0).clamp(0.0, 100.0);
        accuracy.round() as i32
    }

    /// The legal score farthest from `reference`; ties go to the minimum
    fn worst_score(&self, criterion: &str, reference: f64) -> f64 {
        let min = self.rubric.min_score;
        let max = self
            .rubric
            .criterion(criterion)
            .map(|c| c.max_score)
            .unwrap_or(min);

        if (max - reference) > (reference - min) {
            max
        } else {
            min
        }
    }

    /// Reject a submission before it reaches scoring
    pub fn validate_submission(&self, trainee: &RubricScoreSet) -> Result<()> {
        let min = self.rubric.min_score;
        for (name, score) in trainee.iter() {
            let criterion = self
                .rubric
                .criterion(name)
                .ok_or_else(|| Error::UnknownCriterion(name.to_string()))?;

            if !score.is_finite() || score < min || score > criterion.max_score {
                return Err(Error::InvalidScoreRange {
                    criterion: name.to_string(),
                    score,
                    min,
                    max: criterion.max_score,
                });
            }
        }

        self.check_complete(trainee)
    }

    fn check_complete(&self, trainee: &RubricScoreSet) -> Result<()> {
        match self
            .rubric
            .criteria
            .iter()
            .find(|c| trainee.get(&c.name).is_none())
        {
            Some(missing) => Err(Error::IncompleteSubmission {
                missing: missing.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Accuracy and points for a trainee's review of `sample_id`
    pub fn compute_review_points(
        &self,
        sample_id: &str,
        trainee: &RubricScoreSet,
    ) -> Result<ReviewScore> {
        let reference = self
            .reference(sample_id)
            .ok_or_else(|| Error::UnknownSample(sample_id.to_string()))?;
        self.check_complete(trainee)?;

        let distance = self.compute_distance(reference, trainee);
        let accuracy = self.compute_accuracy(reference, trainee);
        let points = self.base_points + accuracy as i64;

        debug!(
            "Scored {}: distance {:.3}, accuracy {}, points {}",
            sample_id, distance, accuracy, points
        );

        Ok(ReviewScore {
            accuracy,
            points,
            distance,
        })
    }
}

/// (criterion, reference, trainee) for every reference criterion the trainee scored.
/// Criteria the trainee skipped are logged and left out.
fn matched_scores<'a>(
    reference: &'a RubricScoreSet,
    trainee: &'a RubricScoreSet,
) -> impl Iterator<Item = (&'a str, f64, f64)> + 'a {
    reference
        .iter()
        .filter_map(move |(name, r)| match trainee.require(name) {
            Ok(t) => Some((name, r, t)),
            Err(e) => {
                warn!("Data integrity: {}", e);
                None
            }
        })
}
