use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::chats::dto::HistoryItem;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpamPreferencesRequest {
    #[serde(default)]
    pub enable_spam_emails: bool,
    #[serde(default)]
    pub block_all_spam: bool,
    #[serde(default)]
    pub custom_filters: String,
}

/// Stored as JSONB on the user row.
#[derive(Debug, Serialize, Deserialize)]
pub struct SpamPreferences {
    pub enable_spam_emails: bool,
    pub block_all_spam: bool,
    pub custom_filters: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Serialize)]
pub struct ExportedUser {
    pub email: String,
    pub display_name: String,
    pub phone_number: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct ExportData {
    pub user_info: ExportedUser,
    pub preferences: serde_json::Value,
    pub chat_history: Vec<HistoryItem>,
    #[serde(with = "time::serde::rfc3339")]
    pub exported_at: OffsetDateTime,
    pub total_chats: usize,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub data: ExportData,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct UserStats {
    pub total_chats: i64,
    pub english_chats: i64,
    pub doctor_chats: i64,
    pub lawyer_chats: i64,
    pub storage_used: String,
    pub account_created: String,
}

#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub success: bool,
    pub stats: UserStats,
}
