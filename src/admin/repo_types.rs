use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct DashboardTotals {
    pub total_users: i64,
    pub total_chats: i64,
    pub recent_users: i64,
    pub active_users: i64,
    pub today_chats: i64,
}

/// A user as listed in the panel, with activity joined in.
#[derive(Debug, Serialize, FromRow)]
pub struct UserActivity {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub chat_count: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_activity: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
    pub chat_count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct TopUser {
    pub user_email: String,
    pub chat_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_activity: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct DayTotals {
    pub date: String,
    pub users: i64,
    pub chats: i64,
}
