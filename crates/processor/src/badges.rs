//! Badge unlock rules

use common::models::{Badge, BadgeCategory, UserProgress};
use std::collections::BTreeSet;

/// Leaderboard size below which ranking badges stay locked
pub const DEFAULT_MIN_RANKING_POPULATION: usize = 10;

/// Stats from the latest submission that some badge categories depend on
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeSignals<'a> {
    pub latest_accuracy: Option<i32>,
    pub leaderboard_rank: Option<i32>,
    pub leaderboard_size: usize,
    pub feedback_text: Option<&'a str>,
}

/// Whitespace-delimited token count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Decides which catalog badges a trainee has newly earned
pub struct BadgeEvaluator {
    catalog: Vec<Badge>,
    min_ranking_population: usize,
}

impl BadgeEvaluator {
    pub fn new(catalog: Vec<Badge>) -> Self {
        Self {
            catalog,
            min_ranking_population: DEFAULT_MIN_RANKING_POPULATION,
        }
    }

    pub fn with_min_ranking_population(mut self, population: usize) -> Self {
        self.min_ranking_population = population;
        self
    }

    pub fn badge(&self, id: &str) -> Option<&Badge> {
        self.catalog.iter().find(|b| b.id == id)
    }

    /// Ids of badges whose requirement is met and that `progress` does not hold yet.
    ///
    /// Already-earned badges are never re-reported, so evaluating again after
    /// merging the result yields an empty set.
    pub fn evaluate(&self, progress: &UserProgress, signals: &BadgeSignals<'_>) -> BTreeSet<String> {
        let words = signals.feedback_text.map(word_count);
        let rank = signals
            .leaderboard_rank
            .filter(|_| signals.leaderboard_size >= self.min_ranking_population);

        self.catalog
            .iter()
            .filter(|b| !progress.earned_badge_ids.contains(&b.id))
            .filter(|b| match b.category {
                BadgeCategory::Points => progress.cumulative_points as f64 >= b.requirement,
                BadgeCategory::ReviewCount => {
                    progress.evaluation_history.len() as f64 >= b.requirement
                }
                BadgeCategory::Accuracy => signals
                    .latest_accuracy
                    .is_some_and(|a| a as f64 >= b.requirement),
                // Lower rank is better
                BadgeCategory::Ranking => rank.is_some_and(|r| r as f64 <= b.requirement),
                BadgeCategory::WordCount => words.is_some_and(|w| w as f64 >= b.requirement),
            })
            .map(|b| b.id.clone())
            .collect()
    }
}
