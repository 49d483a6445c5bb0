use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{DailyCount, DashboardTotals, DayTotals, TopUser, UserActivity, UserSummary};
use crate::chats::{repo::CHAT_COLUMNS, repo_types::Chat};

pub async fn dashboard_totals(db: &PgPool) -> anyhow::Result<DashboardTotals> {
    let totals = sqlx::query_as::<_, DashboardTotals>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM chats) AS total_chats,
            (SELECT COUNT(*) FROM users WHERE created_at >= now() - interval '7 days') AS recent_users,
            (SELECT COUNT(DISTINCT user_email) FROM chats) AS active_users,
            (SELECT COUNT(*) FROM chats WHERE "timestamp" >= date_trunc('day', now())) AS today_chats
        "#,
    )
    .fetch_one(db)
    .await
    .context("dashboard totals")?;
    Ok(totals)
}

/// `(character, count)` across all users.
pub async fn chats_per_character(db: &PgPool) -> anyhow::Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"SELECT "character", COUNT(*) FROM chats GROUP BY "character""#,
    )
    .fetch_all(db)
    .await
    .context("chats per character")?;
    Ok(rows)
}

pub async fn active_user_count(db: &PgPool) -> anyhow::Result<i64> {
    let (n,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(DISTINCT user_email) FROM chats")
        .fetch_one(db)
        .await
        .context("active users")?;
    Ok(n)
}

/// `pattern` is an already escaped `ILIKE` pattern.
pub async fn count_users(db: &PgPool, pattern: Option<&str>) -> anyhow::Result<i64> {
    let (n,) = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR email ILIKE $1)",
    )
    .bind(pattern)
    .fetch_one(db)
    .await
    .context("count users")?;
    Ok(n)
}

/// Newest accounts first.
pub async fn list_users(
    db: &PgPool,
    pattern: Option<&str>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<UserActivity>> {
    let rows = sqlx::query_as::<_, UserActivity>(
        r#"
        SELECT u.id, u.email, u.display_name, u.created_at,
               COUNT(c.id) AS chat_count,
               MAX(c."timestamp") AS last_activity
        FROM users u
        LEFT JOIN chats c ON c.user_email = u.email
        WHERE ($1::text IS NULL OR u.email ILIKE $1)
        GROUP BY u.id
        ORDER BY u.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list users")?;
    Ok(rows)
}

pub async fn user_summaries(db: &PgPool) -> anyhow::Result<Vec<UserSummary>> {
    let rows = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.email,
               to_char(u.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
               COUNT(c.id) AS chat_count
        FROM users u
        LEFT JOIN chats c ON c.user_email = u.email
        GROUP BY u.id
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("user summaries")?;
    Ok(rows)
}

/// Changes the email (and the password when given). Chats follow the
/// email so they stay attached to the account. Returns false when no
/// user has `id`.
pub async fn update_user(
    db: &PgPool,
    id: Uuid,
    email: &str,
    password_hash: Option<&str>,
) -> anyhow::Result<bool> {
    let mut tx = db.begin().await.context("begin tx")?;
    let old: Option<(String,)> = sqlx::query_as("SELECT email FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("lock user")?;
    let Some((old_email,)) = old else {
        return Ok(false);
    };
    sqlx::query(
        r#"
        UPDATE users
        SET email = $2,
            password_hash = COALESCE($3, password_hash),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .execute(&mut *tx)
    .await
    .context("update user")?;
    if old_email != email {
        sqlx::query("UPDATE chats SET user_email = $2 WHERE user_email = $1")
            .bind(&old_email)
            .bind(email)
            .execute(&mut *tx)
            .await
            .context("move chats")?;
    }
    tx.commit().await.context("commit tx")?;
    Ok(true)
}

pub async fn count_chats(
    db: &PgPool,
    character: Option<&str>,
    pattern: Option<&str>,
) -> anyhow::Result<i64> {
    let (n,) = sqlx::query_as::<_, (i64,)>(
        r#"
        SELECT COUNT(*) FROM chats
        WHERE ($1::text IS NULL OR "character" = $1)
          AND ($2::text IS NULL OR user_message ILIKE $2 OR bot_reply ILIKE $2 OR user_email ILIKE $2)
        "#,
    )
    .bind(character)
    .bind(pattern)
    .fetch_one(db)
    .await
    .context("count chats")?;
    Ok(n)
}

/// Newest first. `pattern` is matched against both sides of the exchange
/// and the user's email.
pub async fn list_chats(
    db: &PgPool,
    character: Option<&str>,
    pattern: Option<&str>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Chat>> {
    let rows = sqlx::query_as::<_, Chat>(&format!(
        r#"
        SELECT {CHAT_COLUMNS} FROM chats
        WHERE ($1::text IS NULL OR "character" = $1)
          AND ($2::text IS NULL OR user_message ILIKE $2 OR bot_reply ILIKE $2 OR user_email ILIKE $2)
        ORDER BY "timestamp" DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(character)
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list chats")?;
    Ok(rows)
}

pub async fn distinct_characters(db: &PgPool) -> anyhow::Result<Vec<String>> {
    let rows = sqlx::query_as::<_, (String,)>(
        r#"SELECT DISTINCT "character" FROM chats ORDER BY 1"#,
    )
    .fetch_all(db)
    .await
    .context("distinct characters")?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}

pub async fn delete_chat(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM chats WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete chat")?;
    Ok(res.rows_affected() > 0)
}

pub async fn daily_signups(db: &PgPool, days: i32) -> anyhow::Result<Vec<DailyCount>> {
    let rows = sqlx::query_as::<_, DailyCount>(
        r#"
        SELECT to_char(date_trunc('day', created_at), 'YYYY-MM-DD') AS date, COUNT(*) AS count
        FROM users
        WHERE created_at >= now() - make_interval(days => $1)
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(days)
    .fetch_all(db)
    .await
    .context("daily signups")?;
    Ok(rows)
}

pub async fn daily_chats(db: &PgPool, days: i32) -> anyhow::Result<Vec<DailyCount>> {
    let rows = sqlx::query_as::<_, DailyCount>(
        r#"
        SELECT to_char(date_trunc('day', "timestamp"), 'YYYY-MM-DD') AS date, COUNT(*) AS count
        FROM chats
        WHERE "timestamp" >= now() - make_interval(days => $1)
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(days)
    .fetch_all(db)
    .await
    .context("daily chats")?;
    Ok(rows)
}

pub async fn top_users(db: &PgPool, limit: i64) -> anyhow::Result<Vec<TopUser>> {
    let rows = sqlx::query_as::<_, TopUser>(
        r#"
        SELECT user_email, COUNT(*) AS chat_count, MAX("timestamp") AS last_activity
        FROM chats
        GROUP BY user_email
        ORDER BY chat_count DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
    .context("top users")?;
    Ok(rows)
}

/// One row per calendar day for the last `days` days, today included,
/// with zero counts for quiet days.
pub async fn recent_day_totals(db: &PgPool, days: i32) -> anyhow::Result<Vec<DayTotals>> {
    let rows = sqlx::query_as::<_, DayTotals>(
        r#"
        SELECT to_char(d, 'YYYY-MM-DD') AS date,
               (SELECT COUNT(*) FROM users
                 WHERE created_at >= d AND created_at < d + interval '1 day') AS users,
               (SELECT COUNT(*) FROM chats
                 WHERE "timestamp" >= d AND "timestamp" < d + interval '1 day') AS chats
        FROM generate_series(
            date_trunc('day', now()) - make_interval(days => $1 - 1),
            date_trunc('day', now()),
            interval '1 day'
        ) AS d
        ORDER BY d
        "#,
    )
    .bind(days)
    .fetch_all(db)
    .await
    .context("recent day totals")?;
    Ok(rows)
}

pub async fn count_user_chats(db: &PgPool, email: &str) -> anyhow::Result<i64> {
    let (n,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM chats WHERE user_email = $1")
        .bind(email)
        .fetch_one(db)
        .await
        .context("count user chats")?;
    Ok(n)
}

pub async fn list_user_chats(
    db: &PgPool,
    email: &str,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Chat>> {
    let rows = sqlx::query_as::<_, Chat>(&format!(
        r#"
        SELECT {CHAT_COLUMNS} FROM chats
        WHERE user_email = $1
        ORDER BY "timestamp" DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(email)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list user chats")?;
    Ok(rows)
}
