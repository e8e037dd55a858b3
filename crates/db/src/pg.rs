//! Postgres-backed progression store

use common::models::{Evaluation, UserProgress};
use common::{Error, Result};
use sqlx::PgPool;
use std::collections::BTreeSet;
use tracing::debug;

use crate::store::ProgressionStore;
use crate::{badges, evaluations, users};

fn db_err(e: sqlx::Error) -> Error {
    Error::Database(e.to_string())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProgressionStore for PgStore {
    async fn create(&self, user_id: &str) -> Result<UserProgress> {
        users::create(&self.pool, user_id).await.map_err(db_err)?;
        self.load(user_id)
            .await?
            .ok_or_else(|| Error::Internal(format!("progress for {} vanished after create", user_id)))
    }

    async fn load(&self, user_id: &str) -> Result<Option<UserProgress>> {
        // One snapshot, so the points always match the history they came from
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let Some(row) = users::get(&mut *tx, user_id).await.map_err(db_err)? else {
            return Ok(None);
        };

        let evaluation_history = evaluations::list_for_user(&mut *tx, user_id)
            .await
            .map_err(db_err)?;
        let earned_badge_ids = badges::list_for_user(&mut *tx, user_id)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;

        Ok(Some(UserProgress {
            user_id: row.user_id,
            cumulative_points: row.cumulative_points,
            earned_badge_ids,
            evaluation_history,
            created_at: row.created_at,
        }))
    }

    async fn append_evaluation(
        &self,
        user_id: &str,
        evaluation: Evaluation,
        badge_ids: &BTreeSet<String>,
    ) -> Result<UserProgress> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        if !users::add_points(&mut *tx, user_id, evaluation.points_awarded)
            .await
            .map_err(db_err)?
        {
            return Err(Error::NotFound(format!("User {}", user_id)));
        }

        // Dropping the transaction on a conflict rolls the points back
        if !evaluations::insert(&mut *tx, &evaluation).await.map_err(db_err)? {
            return Err(Error::DuplicateSubmission {
                user_id: user_id.to_string(),
                sample_id: evaluation.sample_id,
            });
        }

        badges::unlock_many(&mut *tx, user_id, badge_ids)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        debug!(
            "Stored evaluation {} for {} ({} points, {} badges)",
            evaluation.id,
            user_id,
            evaluation.points_awarded,
            badge_ids.len()
        );

        self.load(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }

    async fn add_badges(&self, user_id: &str, badge_ids: &BTreeSet<String>) -> Result<()> {
        badges::unlock_many(&self.pool, user_id, badge_ids)
            .await
            .map_err(db_err)
    }

    async fn points_snapshot(&self) -> Result<Vec<(String, i64)>> {
        users::points_snapshot(&self.pool).await.map_err(db_err)
    }
}
