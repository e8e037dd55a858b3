//! Earned badge queries

use sqlx::{PgExecutor, Row};
use std::collections::BTreeSet;

/// Unlock badges for a user; already-earned ids keep their original unlock time
pub async fn unlock_many<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
    badge_ids: &BTreeSet<String>,
) -> Result<(), sqlx::Error> {
    if badge_ids.is_empty() {
        return Ok(());
    }

    let ids: Vec<String> = badge_ids.iter().cloned().collect();
    sqlx::query(
        r#"
        INSERT INTO user_badges (user_id, badge_id, unlocked_at)
        SELECT $1, badge_id, NOW() FROM UNNEST($2::text[]) AS t(badge_id)
        ON CONFLICT (user_id, badge_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(ids)
    .execute(executor)
    .await?;

    Ok(())
}

/// Get all badge ids a user has earned
pub async fn list_for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
) -> Result<BTreeSet<String>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT badge_id
        FROM user_badges
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|r| r.get("badge_id")).collect())
}
