use serde::Serialize;
use time::OffsetDateTime;

use super::repo_types::Chat;

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub user_message: String,
    pub bot_reply: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub character: String,
}

impl From<Chat> for HistoryItem {
    fn from(c: Chat) -> Self {
        Self {
            user_message: c.user_message,
            bot_reply: c.bot_reply,
            timestamp: c.timestamp,
            character: c.character,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub chats: Vec<HistoryItem>,
    pub count: usize,
}

/// Dashboard card: the latest exchange with one persona, or a demo greeting.
#[derive(Debug, Serialize)]
pub struct RecentChat {
    pub character: &'static str,
    pub character_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_reply: Option<String>,
    pub display_message: String,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<OffsetDateTime>,
    pub time_ago: String,
    pub is_real: bool,
}

#[derive(Debug, Serialize)]
pub struct RecentChatsResponse {
    pub success: bool,
    pub chats: Vec<RecentChat>,
}
