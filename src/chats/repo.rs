use sqlx::PgPool;

use super::repo_types::{Chat, NewChat};

pub(crate) const CHAT_COLUMNS: &str =
    r#"id, user_email, "character", user_message, bot_reply, "timestamp", session_id"#;

impl Chat {
    pub async fn insert(db: &PgPool, new: &NewChat<'_>) -> anyhow::Result<Chat> {
        let chat = sqlx::query_as::<_, Chat>(&format!(
            r#"
            INSERT INTO chats (user_email, "character", user_message, bot_reply, session_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CHAT_COLUMNS}
            "#
        ))
        .bind(new.user_email)
        .bind(new.character)
        .bind(new.user_message)
        .bind(new.bot_reply)
        .bind(new.session_id)
        .fetch_one(db)
        .await?;
        Ok(chat)
    }

    /// Oldest first, for replaying a conversation.
    pub async fn history(db: &PgPool, email: &str, character: &str) -> anyhow::Result<Vec<Chat>> {
        let rows = sqlx::query_as::<_, Chat>(&format!(
            r#"
            SELECT {CHAT_COLUMNS} FROM chats
            WHERE user_email = $1 AND "character" = $2
            ORDER BY "timestamp" ASC
            "#
        ))
        .bind(email)
        .bind(character)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn latest(db: &PgPool, email: &str, character: &str) -> anyhow::Result<Option<Chat>> {
        let row = sqlx::query_as::<_, Chat>(&format!(
            r#"
            SELECT {CHAT_COLUMNS} FROM chats
            WHERE user_email = $1 AND "character" = $2
            ORDER BY "timestamp" DESC
            LIMIT 1
            "#
        ))
        .bind(email)
        .bind(character)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn all_for_user(db: &PgPool, email: &str) -> anyhow::Result<Vec<Chat>> {
        let rows = sqlx::query_as::<_, Chat>(&format!(
            r#"SELECT {CHAT_COLUMNS} FROM chats WHERE user_email = $1 ORDER BY "timestamp" ASC"#
        ))
        .bind(email)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn delete_for_user(db: &PgPool, email: &str) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM chats WHERE user_email = $1")
            .bind(email)
            .execute(db)
            .await?;
        Ok(res.rows_affected())
    }

    /// `(character, count)` for every persona the user has talked to.
    pub async fn count_by_character(db: &PgPool, email: &str) -> anyhow::Result<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT "character", COUNT(*) FROM chats
            WHERE user_email = $1
            GROUP BY "character"
            "#,
        )
        .bind(email)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
