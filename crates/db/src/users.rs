//! User progress queries

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool, Row};

/// Progress row without history or badges
#[derive(Debug, Clone)]
pub struct ProgressRow {
    pub user_id: String,
    pub cumulative_points: i64,
    pub created_at: DateTime<Utc>,
}

/// Insert a user at first login; no-op when the user exists
pub async fn create(pool: &PgPool, user_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO user_progress (user_id, cumulative_points, created_at)
        VALUES ($1, 0, NOW())
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a user's progress row
pub async fn get<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
) -> Result<Option<ProgressRow>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT user_id, cumulative_points, created_at
        FROM user_progress
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|r| ProgressRow {
        user_id: r.get("user_id"),
        cumulative_points: r.get("cumulative_points"),
        created_at: r.get("created_at"),
    }))
}

/// Add points to a user, returns false if the user does not exist
pub async fn add_points<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
    points: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE user_progress
        SET cumulative_points = cumulative_points + $2
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(points)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// All users' points in first-login order
pub async fn points_snapshot(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, cumulative_points
        FROM user_progress
        ORDER BY seq ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| (r.get("user_id"), r.get("cumulative_points")))
        .collect())
}
