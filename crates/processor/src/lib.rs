//! Review scoring and progression engine

pub mod badges;
pub mod handler;
pub mod history;
pub mod leaderboard;
pub mod scoring;

#[cfg(test)]
mod handler_test;

pub use badges::{BadgeEvaluator, BadgeSignals};
pub use handler::{Submission, SubmissionHandler, SubmissionOutcome};
pub use leaderboard::LeaderboardRanker;
pub use scoring::{ReviewScore, ScoringEngine};
