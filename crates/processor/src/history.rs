//! Accuracy history and profile summary

use common::models::{AccuracyRecord, Evaluation, ProfileSummary, UserProgress};
use tracing::warn;

use crate::scoring::ScoringEngine;

/// Recompute accuracy for stored evaluations against the current answer key.
///
/// Evaluations for samples that have since left the key are skipped. Legacy
/// records with missing criteria are scored over the criteria they do have.
pub fn accuracy_history(engine: &ScoringEngine, evaluations: &[Evaluation]) -> Vec<AccuracyRecord> {
    evaluations
        .iter()
        .filter_map(|eval| {
            let Some(reference) = engine.reference(&eval.sample_id) else {
                warn!(
                    "Skipping evaluation {}: no reference for sample {}",
                    eval.id, eval.sample_id
                );
                return None;
            };

            Some(AccuracyRecord {
                evaluation_id: eval.id,
                sample_id: eval.sample_id.clone(),
                submitted_at: eval.submitted_at,
                accuracy: engine.compute_accuracy(reference, &eval.scores),
                total_score: eval.total_score,
            })
        })
        .collect()
}

/// Aggregate stats for a trainee's profile page
pub fn summarize(engine: &ScoringEngine, progress: &UserProgress, sample_count: usize) -> ProfileSummary {
    let history = accuracy_history(engine, &progress.evaluation_history);
    let total_reviews = progress.evaluation_history.len();

    let average_accuracy = if history.is_empty() {
        0.0
    } else {
        history.iter().map(|r| r.accuracy as f64).sum::<f64>() / history.len() as f64
    };
    let best_accuracy = history.iter().map(|r| r.accuracy).max().unwrap_or(0);

    let average_total_score = if total_reviews == 0 {
        0.0
    } else {
        progress
            .evaluation_history
            .iter()
            .map(|e| e.total_score)
            .sum::<f64>()
            / total_reviews as f64
    };

    let max_points = engine.max_possible_points(sample_count);
    let progress_percent = if max_points > 0 {
        (progress.cumulative_points as f64 / max_points as f64 * 100.0).min(100.0)
    } else {
        0.0
    };

    ProfileSummary {
        total_reviews,
        average_accuracy,
        best_accuracy,
        average_total_score,
        progress_percent,
    }
}
