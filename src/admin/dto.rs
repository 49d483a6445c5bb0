use serde::{Deserialize, Serialize};

use super::{
    repo_types::{DailyCount, TopUser, UserActivity, UserSummary},
    services::PersonaCounts,
};
use crate::{auth::dto::PublicUser, chats::repo_types::Chat};

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub access_token: String,
}

/// Outcome of a panel action. Failures carry the same shape.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
    pub character: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub total_users: i64,
    pub total_chats: i64,
    pub recent_users: i64,
    pub active_users: i64,
    pub today_chats: i64,
    pub chat_stats: PersonaCounts,
}

#[derive(Debug, Serialize)]
pub struct UsersPage {
    pub success: bool,
    pub users: Vec<UserActivity>,
    pub page: i64,
    pub total_pages: i64,
    pub total_users: i64,
    pub active_users: i64,
    pub search: String,
}

#[derive(Debug, Serialize)]
pub struct UsersData {
    pub success: bool,
    pub total: usize,
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserChatsPage {
    pub success: bool,
    pub user: PublicUser,
    pub chats: Vec<Chat>,
    pub page: i64,
    pub total_pages: i64,
    pub total_chats: i64,
}

#[derive(Debug, Serialize)]
pub struct ChatsPage {
    pub success: bool,
    pub chats: Vec<Chat>,
    pub page: i64,
    pub total_pages: i64,
    pub total_chats: i64,
    pub characters: Vec<String>,
    pub character_filter: String,
    pub search: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub user_stats: Vec<DailyCount>,
    pub chat_stats: Vec<DailyCount>,
    pub character_stats: PersonaCounts,
    pub top_users: Vec<TopUser>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSeries {
    pub success: bool,
    pub dates: Vec<String>,
    pub user_counts: Vec<i64>,
    pub chat_counts: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCredentialsRequest {
    #[serde(default)]
    pub current_email: String,
    #[serde(default)]
    pub current_password: String,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateCredentialsResponse {
    pub success: bool,
    pub message: &'static str,
    /// Hash of `new_password`, ready for `ADMIN_PASSWORD_HASH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}
