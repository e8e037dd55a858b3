//! Submission pipeline
//!
//! Ties the pure scoring, badge and ranking logic to a progression store:
//! validate, score, rank, award badges, then persist it all in one write.

use chrono::Utc;
use common::models::{
    AccuracyRecord, Badge, Evaluation, LeaderboardRow, ProfileSummary, RubricScoreSet,
    UserProgress,
};
use common::{Catalog, Config, Error, Result};
use db::ProgressionStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use uuid::Uuid;

use crate::badges::{BadgeEvaluator, BadgeSignals};
use crate::history;
use crate::leaderboard::LeaderboardRanker;
use crate::scoring::ScoringEngine;

/// A trainee's review of one sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub user_id: String,
    pub sample_id: String,
    pub scores: RubricScoreSet,
    #[serde(default)]
    pub feedback: Vec<String>,
}

/// Everything the caller needs to show after a submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub evaluation: Evaluation,
    pub accuracy: i32,
    pub points_awarded: i64,
    pub cumulative_points: i64,
    pub new_badges: Vec<Badge>,
    pub rank: Option<i32>,
    /// Criterion -> the reference grader's comment
    pub reference_feedback: BTreeMap<String, String>,
}

/// A trainee's profile view
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub progress: UserProgress,
    pub summary: ProfileSummary,
    pub badges: Vec<Badge>,
    pub rank: Option<i32>,
}

/// Full profile backup, handed out when a trainee leaves
#[derive(Debug, Clone, Serialize)]
pub struct ProfileExport {
    pub profile: Profile,
    pub accuracy_history: Vec<AccuracyRecord>,
    pub exported_at: chrono::DateTime<Utc>,
}

/// Handles trainee submissions against a progression store
pub struct SubmissionHandler<S> {
    store: S,
    catalog: Catalog,
    engine: ScoringEngine,
    evaluator: BadgeEvaluator,
    ranker: LeaderboardRanker,
}

impl<S: ProgressionStore> SubmissionHandler<S> {
    pub fn new(store: S, catalog: Catalog, config: &Config) -> Self {
        let engine = ScoringEngine::new(
            catalog.rubric.clone(),
            catalog.answer_key(),
            config.base_points,
        );
        let evaluator = BadgeEvaluator::new(catalog.badges.clone())
            .with_min_ranking_population(config.ranking_min_population);

        Self {
            store,
            catalog,
            engine,
            evaluator,
            ranker: LeaderboardRanker::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Load a trainee's progress, creating it on first login
    pub async fn login(&self, user_id: &str) -> Result<UserProgress> {
        let user_id = normalize_user_id(user_id)?;
        if let Some(progress) = self.store.load(user_id).await? {
            return Ok(progress);
        }

        info!("New trainee: {}", user_id);
        self.store.create(user_id).await
    }

    /// Score a review, persist it, and award any badges it unlocks
    pub async fn submit(&self, submission: Submission) -> Result<SubmissionOutcome> {
        let user_id = normalize_user_id(&submission.user_id)?;
        let progress = self
            .store
            .load(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;

        if progress.has_reviewed(&submission.sample_id) {
            return Err(Error::DuplicateSubmission {
                user_id: user_id.to_string(),
                sample_id: submission.sample_id,
            });
        }

        self.engine.validate_submission(&submission.scores)?;
        let score = self
            .engine
            .compute_review_points(&submission.sample_id, &submission.scores)?;

        let evaluation = Evaluation {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            sample_id: submission.sample_id.clone(),
            submitted_at: Utc::now(),
            total_score: submission.scores.total(),
            scores: submission.scores,
            feedback: submission.feedback,
            accuracy: score.accuracy,
            points_awarded: score.points,
        };
        let feedback_text = evaluation.combined_feedback();

        // Badges are judged on the progress this submission produces
        let mut projected = progress;
        projected.cumulative_points += score.points;
        projected.evaluation_history.push(evaluation.clone());

        let mut snapshot = self.store.points_snapshot().await?;
        if let Some(entry) = snapshot.iter_mut().find(|(id, _)| id == user_id) {
            entry.1 = projected.cumulative_points;
        }
        let rank = self.ranker.rank_of(user_id, &snapshot);

        let signals = BadgeSignals {
            latest_accuracy: Some(score.accuracy),
            leaderboard_rank: rank,
            leaderboard_size: snapshot.len(),
            feedback_text: Some(&feedback_text),
        };
        let earned = self.evaluator.evaluate(&projected, &signals);

        let progress = self
            .store
            .append_evaluation(user_id, evaluation.clone(), &earned)
            .await?;

        info!(
            "📝 {} reviewed {}: accuracy {}%, +{} points ({} total)",
            user_id,
            evaluation.sample_id,
            score.accuracy,
            score.points,
            progress.cumulative_points
        );

        let new_badges = self.resolve_badges(&earned);
        for badge in &new_badges {
            info!("🏆 Badge unlocked: {} for {}", badge.name, user_id);
        }

        let reference_feedback = self
            .catalog
            .sample(&evaluation.sample_id)
            .map(|s| {
                s.reference
                    .iter()
                    .map(|(name, grade)| (name.clone(), grade.feedback.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(SubmissionOutcome {
            accuracy: score.accuracy,
            points_awarded: score.points,
            cumulative_points: progress.cumulative_points,
            evaluation,
            new_badges,
            rank,
            reference_feedback,
        })
    }

    /// Top `limit` users with their review counts and badges
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardRow>> {
        let snapshot = self.store.points_snapshot().await?;
        debug!("Ranking {} users", snapshot.len());

        let entries = self.ranker.top(&snapshot, limit);
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(progress) = self.store.load(&entry.user_id).await? else {
                continue;
            };
            rows.push(LeaderboardRow {
                total_reviews: progress.evaluation_history.len(),
                badges: self.resolve_badges(&progress.earned_badge_ids),
                entry,
            });
        }
        Ok(rows)
    }

    pub async fn profile(&self, user_id: &str) -> Result<Profile> {
        let user_id = normalize_user_id(user_id)?;
        let progress = self
            .store
            .load(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;

        let snapshot = self.store.points_snapshot().await?;
        let rank = self.ranker.rank_of(user_id, &snapshot);
        let summary = history::summarize(&self.engine, &progress, self.catalog.samples.len());
        let badges = self.resolve_badges(&progress.earned_badge_ids);

        Ok(Profile {
            progress,
            summary,
            badges,
            rank,
        })
    }

    fn resolve_badges(&self, ids: &BTreeSet<String>) -> Vec<Badge> {
        ids.iter()
            .filter_map(|id| self.evaluator.badge(id).cloned())
            .collect()
    }

    pub async fn accuracy_history(&self, user_id: &str) -> Result<Vec<AccuracyRecord>> {
        let profile = self.profile(user_id).await?;
        Ok(history::accuracy_history(
            &self.engine,
            &profile.progress.evaluation_history,
        ))
    }

    pub async fn export(&self, user_id: &str) -> Result<ProfileExport> {
        let profile = self.profile(user_id).await?;
        let accuracy_history =
            history::accuracy_history(&self.engine, &profile.progress.evaluation_history);

        Ok(ProfileExport {
            profile,
            accuracy_history,
            exported_at: Utc::now(),
        })
    }
}

fn normalize_user_id(user_id: &str) -> Result<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("user id must not be empty".to_string()));
    }
    Ok(trimmed)
}
