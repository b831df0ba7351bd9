use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Deck, DeckOverview};

pub async fn create_deck<'e, E>(
    executor: E,
    user_id: Uuid,
    title: &str,
    description: Option<&str>,
    summary: Option<&str>,
    mind_map: Option<&serde_json::Value>,
) -> Result<Deck, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO decks (user_id, title, description, summary, mind_map)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, summary, mind_map, created_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(summary)
    .bind(mind_map)
    .fetch_one(executor)
    .await
}

/// List a user's decks, newest first, with due and total card counts.
pub async fn list_decks<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<DeckOverview>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                d.id,
                d.title,
                d.description,
                d.summary,
                d.created_at,
                COUNT(c.id) FILTER (
                    WHERE c.next_review_date IS NULL OR c.next_review_date <= NOW()
                ) AS due_cards,
                COUNT(c.id) AS total_cards
            FROM decks d
            LEFT JOIN cards c ON c.deck_id = d.id
            WHERE d.user_id = $1
            GROUP BY d.id
            ORDER BY d.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Fetch a deck only if it belongs to `user_id`.
pub async fn find_owned_deck<'e, E>(
    executor: E,
    deck_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Deck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, title, description, summary, mind_map, created_at
            FROM decks
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Delete a deck (and its cards) if it belongs to `user_id`. Returns whether a row was removed.
pub async fn delete_owned_deck<'e, E>(
    executor: E,
    deck_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM decks
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(deck_id)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
