use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One stored exchange. Rows are append-only.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Chat {
    pub id: Uuid,
    pub user_email: String,
    pub character: String,
    pub user_message: String,
    pub bot_reply: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub session_id: Uuid,
}

/// Fields of a chat about to be stored.
#[derive(Debug, Clone)]
pub struct NewChat<'a> {
    pub user_email: &'a str,
    pub character: &'a str,
    pub user_message: &'a str,
    pub bot_reply: &'a str,
    pub session_id: Uuid,
}
