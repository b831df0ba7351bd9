use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Card, CardSchedule};

pub async fn create_card<'e, E>(
    executor: E,
    deck_id: Uuid,
    front: &str,
    back: &str,
    tag: Option<&str>,
) -> Result<Card, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO cards (deck_id, front, back, tag)
            VALUES ($1, $2, $3, $4)
            RETURNING id, deck_id, front, back, tag, next_review_date, interval_days, ease_factor, created_at
        "#,
    )
    .bind(deck_id)
    .bind(front)
    .bind(back)
    .bind(tag)
    .fetch_one(executor)
    .await
}

/// Cards of a deck, newest first.
pub async fn list_cards<'e, E>(executor: E, deck_id: Uuid) -> Result<Vec<Card>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, deck_id, front, back, tag, next_review_date, interval_days, ease_factor, created_at
            FROM cards
            WHERE deck_id = $1
            ORDER BY created_at DESC
        "#,
    )
    .bind(deck_id)
    .fetch_all(executor)
    .await
}

/// Fetch a card only if its deck belongs to `user_id`.
pub async fn find_owned_card<'e, E>(
    executor: E,
    card_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Card>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT c.id, c.deck_id, c.front, c.back, c.tag, c.next_review_date,
                   c.interval_days, c.ease_factor, c.created_at
            FROM cards c
            JOIN decks d ON d.id = c.deck_id
            WHERE c.id = $1 AND d.user_id = $2
        "#,
    )
    .bind(card_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Replace the text of a card owned by `user_id`. Returns `None` if no such card.
pub async fn update_owned_card<'e, E>(
    executor: E,
    card_id: Uuid,
    user_id: Uuid,
    front: &str,
    back: &str,
) -> Result<Option<Card>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE cards c
            SET front = $3, back = $4
            FROM decks d
            WHERE c.id = $1 AND d.id = c.deck_id AND d.user_id = $2
            RETURNING c.id, c.deck_id, c.front, c.back, c.tag, c.next_review_date,
                      c.interval_days, c.ease_factor, c.created_at
        "#,
    )
    .bind(card_id)
    .bind(user_id)
    .bind(front)
    .bind(back)
    .fetch_optional(executor)
    .await
}

pub async fn delete_owned_card<'e, E>(
    executor: E,
    card_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM cards c
            USING decks d
            WHERE c.id = $1 AND d.id = c.deck_id AND d.user_id = $2
        "#,
    )
    .bind(card_id)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_schedule<'e, E>(
    executor: E,
    card_id: Uuid,
) -> Result<Option<CardSchedule>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT interval_days, ease_factor, next_review_date
            FROM cards
            WHERE id = $1
        "#,
    )
    .bind(card_id)
    .fetch_optional(executor)
    .await
}

/// Write the scheduling fields of a card. Plain overwrite, so retries are harmless.
pub async fn update_schedule<'e, E>(
    executor: E,
    card_id: Uuid,
    interval_days: i32,
    ease_factor: i32,
    next_review_date: DateTime<Utc>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE cards
            SET interval_days = $2,
                ease_factor = $3,
                next_review_date = $4
            WHERE id = $1
        "#,
    )
    .bind(card_id)
    .bind(interval_days)
    .bind(ease_factor)
    .bind(next_review_date)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
