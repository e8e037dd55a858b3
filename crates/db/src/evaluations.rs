//! Evaluation queries

use common::models::{Evaluation, RubricScoreSet};
use sqlx::types::Json;
use sqlx::{PgExecutor, Row};

/// Insert an evaluation. Returns false when the user already reviewed the sample.
pub async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    evaluation: &Evaluation,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO evaluations (
            id, user_id, sample_id, submitted_at, scores, feedback,
            total_score, accuracy, points_awarded
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (user_id, sample_id) DO NOTHING
        "#,
    )
    .bind(evaluation.id)
    .bind(&evaluation.user_id)
    .bind(&evaluation.sample_id)
    .bind(evaluation.submitted_at)
    .bind(Json(&evaluation.scores))
    .bind(Json(&evaluation.feedback))
    .bind(evaluation.total_score)
    .bind(evaluation.accuracy)
    .bind(evaluation.points_awarded)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// A user's evaluation history, oldest first
pub async fn list_for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: &str,
) -> Result<Vec<Evaluation>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, sample_id, submitted_at, scores, feedback,
               total_score, accuracy, points_awarded
        FROM evaluations
        WHERE user_id = $1
        ORDER BY submitted_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            let scores: Json<RubricScoreSet> = r.get("scores");
            let feedback: Json<Vec<String>> = r.get("feedback");
            Evaluation {
                id: r.get("id"),
                user_id: r.get("user_id"),
                sample_id: r.get("sample_id"),
                submitted_at: r.get("submitted_at"),
                scores: scores.0,
                feedback: feedback.0,
                total_score: r.get("total_score"),
                accuracy: r.get("accuracy"),
                points_awarded: r.get("points_awarded"),
            }
        })
        .collect())
}
