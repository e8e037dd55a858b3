//! In-process progression store, used when no database is configured and in tests

use common::models::{Evaluation, UserProgress};
use common::{Error, Result};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::ProgressionStore;

#[derive(Default)]
struct Inner {
    /// Insertion order doubles as first-login order
    users: Vec<UserProgress>,
    index: HashMap<String, usize>,
}

impl Inner {
    fn get_mut(&mut self, user_id: &str) -> Result<&mut UserProgress> {
        let idx = *self
            .index
            .get(user_id)
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;
        Ok(&mut self.users[idx])
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressionStore for MemoryStore {
    async fn create(&self, user_id: &str) -> Result<UserProgress> {
        let mut inner = self.inner.write().await;
        if let Some(&idx) = inner.index.get(user_id) {
            return Ok(inner.users[idx].clone());
        }

        let progress = UserProgress::new(user_id);
        let idx = inner.users.len();
        inner.users.push(progress.clone());
        inner.index.insert(user_id.to_string(), idx);
        debug!("Created progress for {}", user_id);
        Ok(progress)
    }

    async fn load(&self, user_id: &str) -> Result<Option<UserProgress>> {
        let inner = self.inner.read().await;
        Ok(inner.index.get(user_id).map(|&idx| inner.users[idx].clone()))
    }

    async fn append_evaluation(
        &self,
        user_id: &str,
        evaluation: Evaluation,
        badge_ids: &BTreeSet<String>,
    ) -> Result<UserProgress> {
        let mut inner = self.inner.write().await;
        let progress = inner.get_mut(user_id)?;

        if progress.has_reviewed(&evaluation.sample_id) {
            return Err(Error::DuplicateSubmission {
                user_id: user_id.to_string(),
                sample_id: evaluation.sample_id,
            });
        }

        progress.cumulative_points += evaluation.points_awarded;
        progress.evaluation_history.push(evaluation);
        progress.earned_badge_ids.extend(badge_ids.iter().cloned());
        Ok(progress.clone())
    }

    async fn add_badges(&self, user_id: &str, badge_ids: &BTreeSet<String>) -> Result<()> {
        let mut inner = self.inner.write().await;
        let progress = inner.get_mut(user_id)?;
        progress.earned_badge_ids.extend(badge_ids.iter().cloned());
        Ok(())
    }

    async fn points_snapshot(&self) -> Result<Vec<(String, i64)>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .iter()
            .map(|p| (p.user_id.clone(), p.cumulative_points))
            .collect())
    }
}
