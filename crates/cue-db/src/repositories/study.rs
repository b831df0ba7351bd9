use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::StudyCard;

/// Cards of a deck that are due now: never reviewed first, then by due date.
pub async fn get_due_cards<'e, E>(
    executor: E,
    deck_id: Uuid,
    limit: i64,
) -> Result<Vec<StudyCard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, front, back
            FROM cards
            WHERE deck_id = $1
                AND (next_review_date IS NULL OR next_review_date <= NOW())
            ORDER BY next_review_date NULLS FIRST, created_at
            LIMIT $2
        "#,
    )
    .bind(deck_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Every card of a deck regardless of due date, newest first.
pub async fn get_all_cards<'e, E>(
    executor: E,
    deck_id: Uuid,
    limit: i64,
) -> Result<Vec<StudyCard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, front, back
            FROM cards
            WHERE deck_id = $1
            ORDER BY created_at DESC
            LIMIT $2
        "#,
    )
    .bind(deck_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}
