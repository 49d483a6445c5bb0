use time::OffsetDateTime;

use super::dto::UserStats;
use crate::personas::Persona;

/// Rough on-disk cost of one stored exchange.
pub const BYTES_PER_CHAT: i64 = 8000;

pub const DELETE_CONFIRMATION: &str = "DELETE MY ACCOUNT";

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;

/// Human readable size with one decimal above a kilobyte.
pub fn format_storage(bytes: i64) -> String {
    let b = bytes as f64;
    if b >= GB {
        format!("{:.1}GB", b / GB)
    } else if b >= MB {
        format!("{:.1}MB", b / MB)
    } else if b >= KB {
        format!("{:.1}KB", b / KB)
    } else {
        format!("{bytes}B")
    }
}

pub fn format_date(at: OffsetDateTime) -> String {
    format!("{:04}-{:02}-{:02}", at.year(), u8::from(at.month()), at.day())
}

/// Folds `(character, count)` rows into per-persona stats. Characters that
/// are not a known persona are ignored.
pub fn build_stats(counts: &[(String, i64)], created_at: Option<OffsetDateTime>) -> UserStats {
    let mut stats = UserStats::default();
    for (character, n) in counts {
        match Persona::from_character(character) {
            Some(Persona::English) => stats.english_chats += n,
            Some(Persona::Doctor) => stats.doctor_chats += n,
            Some(Persona::Lawyer) => stats.lawyer_chats += n,
            None => continue,
        }
    }
    stats.total_chats = stats.english_chats + stats.doctor_chats + stats.lawyer_chats;
    stats.storage_used = format_storage(stats.total_chats * BYTES_PER_CHAT);
    stats.account_created = created_at
        .map(format_date)
        .unwrap_or_else(|| "Unknown".to_string());
    stats
}
