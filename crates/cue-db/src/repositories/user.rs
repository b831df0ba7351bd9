use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::UserStats;

/// Insert the user row if it does not exist yet.
pub async fn ensure_user<'e, E>(
    executor: E,
    user_id: Uuid,
    email: &str,
    name: Option<&str>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(name)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_stats<'e, E>(executor: E, user_id: Uuid) -> Result<Option<UserStats>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT xp, streak, last_study_date
            FROM users
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Same as [`find_stats`] but locks the row until the surrounding transaction ends,
/// so concurrent reviews cannot both read the same streak.
pub async fn find_stats_for_update<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<UserStats>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT xp, streak, last_study_date
            FROM users
            WHERE id = $1
            FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn update_progress<'e, E>(
    executor: E,
    user_id: Uuid,
    xp: i32,
    streak: i32,
    last_study_date: DateTime<Utc>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE users
            SET xp = $2,
                streak = $3,
                last_study_date = $4
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(xp)
    .bind(streak)
    .bind(last_study_date)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
