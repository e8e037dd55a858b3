//! The persistence boundary the submission pipeline talks to

use common::models::{Evaluation, UserProgress};
use common::Result;
use std::collections::BTreeSet;
use std::future::Future;

use crate::memory::MemoryStore;
use crate::pg::PgStore;

/// Owns every trainee's points, badges and evaluation history.
///
/// Implementations must make `append_evaluation` atomic per user and reject a
/// second evaluation for the same (user, sample) pair with
/// `Error::DuplicateSubmission`, leaving points and badges untouched.
pub trait ProgressionStore: Send + Sync {
    /// Create empty progress at first login. Existing progress is returned unchanged.
    fn create(&self, user_id: &str) -> impl Future<Output = Result<UserProgress>> + Send;

    fn load(&self, user_id: &str) -> impl Future<Output = Result<Option<UserProgress>>> + Send;

    /// Append an evaluation, add its points and record the badges it unlocked,
    /// all in one step. Nothing is written if any part fails.
    fn append_evaluation(
        &self,
        user_id: &str,
        evaluation: Evaluation,
        badge_ids: &BTreeSet<String>,
    ) -> impl Future<Output = Result<UserProgress>> + Send;

    /// Grant badges outside a submission
    fn add_badges(
        &self,
        user_id: &str,
        badge_ids: &BTreeSet<String>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Every user's points, in first-login order
    fn points_snapshot(&self) -> impl Future<Output = Result<Vec<(String, i64)>>> + Send;
}

/// Store selected at startup from configuration
pub enum Store {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl Store {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl ProgressionStore for Store {
    async fn create(&self, user_id: &str) -> Result<UserProgress> {
        match self {
            Self::Postgres(s) => s.create(user_id).await,
            Self::Memory(s) => s.create(user_id).await,
        }
    }

    async fn load(&self, user_id: &str) -> Result<Option<UserProgress>> {
        match self {
            Self::Postgres(s) => s.load(user_id).await,
            Self::Memory(s) => s.load(user_id).await,
        }
    }

    async fn append_evaluation(
        &self,
        user_id: &str,
        evaluation: Evaluation,
        badge_ids: &BTreeSet<String>,
    ) -> Result<UserProgress> {
        match self {
            Self::Postgres(s) => s.append_evaluation(user_id, evaluation, badge_ids).await,
            Self::Memory(s) => s.append_evaluation(user_id, evaluation, badge_ids).await,
        }
    }

    async fn add_badges(&self, user_id: &str, badge_ids: &BTreeSet<String>) -> Result<()> {
        match self {
            Self::Postgres(s) => s.add_badges(user_id, badge_ids).await,
            Self::Memory(s) => s.add_badges(user_id, badge_ids).await,
        }
    }

    async fn points_snapshot(&self) -> Result<Vec<(String, i64)>> {
        match self {
            Self::Postgres(s) => s.points_snapshot().await,
            Self::Memory(s) => s.points_snapshot().await,
        }
    }
}
