//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A single rubric criterion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Criterion {
    pub name: String,
    pub max_score: f64,
    #[serde(default)]
    pub description: String,
}

/// The ordered set of criteria a code sample is scored against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rubric {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    pub criteria: Vec<Criterion>,
}

fn default_min_score() -> f64 {
    1.0
}

impl Rubric {
    pub fn criterion(&self, name: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.name == name)
    }

    /// Widest legal score span across all criteria
    pub fn score_span(&self) -> f64 {
        self.criteria
            .iter()
            .map(|c| c.max_score - self.min_score)
            .fold(0.0, f64::max)
    }
}

/// Criterion name -> sub-score, as authored by a trainee or a reference grader
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RubricScoreSet(BTreeMap<String, f64>);

impl RubricScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, criterion: &str) -> Option<f64> {
        self.0.get(criterion).copied()
    }

    /// Score for `criterion`, or `MissingCriterion` when the set has no entry
    pub fn require(&self, criterion: &str) -> Result<f64> {
        self.get(criterion)
            .ok_or_else(|| Error::MissingCriterion(criterion.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for RubricScoreSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Sample id -> reference scores
pub type ReferenceAnswerKey = BTreeMap<String, RubricScoreSet>;

/// Reference grading for one criterion of a sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceGrade {
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
}

/// A reviewable code sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSample {
    pub id: String,
    pub prompt: String,
    pub code: String,
    pub reference: BTreeMap<String, ReferenceGrade>,
}

impl CodeSample {
    pub fn reference_scores(&self) -> RubricScoreSet {
        self.reference
            .iter()
            .map(|(name, grade)| (name.clone(), grade.score))
            .collect()
    }
}

/// One submitted review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub id: Uuid,
    pub user_id: String,
    pub sample_id: String,
    pub submitted_at: DateTime<Utc>,
    pub scores: RubricScoreSet,
    /// One entry per criterion, may be empty strings
    pub feedback: Vec<String>,
    pub total_score: f64,
    pub accuracy: i32,
    pub points_awarded: i64,
}

impl Evaluation {
    /// All feedback joined into one text, the way word-count badges read it
    pub fn combined_feedback(&self) -> String {
        self.feedback.join(" ")
    }
}

/// A trainee's accumulated progress
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProgress {
    pub user_id: String,
    pub cumulative_points: i64,
    pub earned_badge_ids: BTreeSet<String>,
    pub evaluation_history: Vec<Evaluation>,
    pub created_at: DateTime<Utc>,
}

impl UserProgress {
    /// Fresh progress at first login
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            cumulative_points: 0,
            earned_badge_ids: BTreeSet::new(),
            evaluation_history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_reviewed(&self, sample_id: &str) -> bool {
        self.evaluation_history
            .iter()
            .any(|e| e.sample_id == sample_id)
    }
}

/// A badge definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: BadgeCategory,
    pub requirement: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum BadgeCategory {
    ReviewCount,
    Points,
    Accuracy,
    Ranking,
    WordCount,
}

impl BadgeCategory {
    pub const ALL: [BadgeCategory; 5] = [
        Self::ReviewCount,
        Self::Points,
        Self::Accuracy,
        Self::Ranking,
        Self::WordCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReviewCount => "reviewCount",
            Self::Points => "points",
            Self::Accuracy => "accuracy",
            Self::Ranking => "ranking",
            Self::WordCount => "wordCount",
        }
    }
}

/// Leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: i32,
    pub user_id: String,
    pub points: i64,
}

/// A leaderboard entry with the stats shown next to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardRow {
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    pub total_reviews: usize,
    pub badges: Vec<Badge>,
}

/// Accuracy of one stored evaluation, recomputed against the current answer key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracyRecord {
    pub evaluation_id: Uuid,
    pub sample_id: String,
    pub submitted_at: DateTime<Utc>,
    pub accuracy: i32,
    pub total_score: f64,
}

/// Aggregate stats shown on a trainee's profile
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileSummary {
    pub total_reviews: usize,
    pub average_accuracy: f64,
    pub best_accuracy: i32,
    pub average_total_score: f64,
    pub progress_percent: f64,
}
