use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;

const USER_COLUMNS: &str = "id, email, password_hash, display_name, phone_number, \
                            spam_preferences, created_at, updated_at";

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(db: &PgPool, email: &str, password_hash: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Only the provided fields change; `None` keeps the stored value.
    pub async fn update_profile(
        db: &PgPool,
        email: &str,
        display_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                phone_number = COALESCE($3, phone_number),
                updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(phone_number)
        .execute(db)
        .await?;
        Ok(res.rows_affected())
    }

    pub async fn set_spam_preferences(
        db: &PgPool,
        email: &str,
        prefs: &serde_json::Value,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query(
            "UPDATE users SET spam_preferences = $2, updated_at = now() WHERE email = $1",
        )
        .bind(email)
        .bind(prefs)
        .execute(db)
        .await?;
        Ok(res.rows_affected())
    }

    pub async fn set_password_hash(db: &PgPool, email: &str, hash: &str) -> anyhow::Result<u64> {
        let res = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE email = $1",
        )
        .bind(email)
        .bind(hash)
        .execute(db)
        .await?;
        Ok(res.rows_affected())
    }

    /// Deletes the user's chats and then the user row in one transaction.
    /// Returns `(users_deleted, chats_deleted)`.
    pub async fn delete_with_chats(db: &PgPool, email: &str) -> anyhow::Result<(u64, u64)> {
        let mut tx = db.begin().await.context("begin tx")?;
        let chats = sqlx::query("DELETE FROM chats WHERE user_email = $1")
            .bind(email)
            .execute(&mut *tx)
            .await
            .context("delete chats")?
            .rows_affected();
        let users = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&mut *tx)
            .await
            .context("delete user")?
            .rows_affected();
        tx.commit().await.context("commit tx")?;
        Ok((users, chats))
    }
}
