use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use super::{
    dto::{RecentChat, RecentChatsResponse},
    repo_types::Chat,
};
use crate::{
    auth::AuthUser,
    error::{internal, ApiError},
    personas::Persona,
    state::AppState,
};

const DISPLAY_CHARS: usize = 60;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/recent-chats", get(recent_chats))
}

/// Relative age like `3d ago`, `2h ago`, `5m ago` or `Just now`.
pub fn time_ago(now: OffsetDateTime, then: OffsetDateTime) -> String {
    let diff = now - then;
    if diff.whole_days() > 0 {
        format!("{}d ago", diff.whole_days())
    } else if diff.whole_hours() > 0 {
        format!("{}h ago", diff.whole_hours())
    } else if diff.whole_minutes() > 0 {
        format!("{}m ago", diff.whole_minutes())
    } else {
        "Just now".to_string()
    }
}

/// First 60 characters of the reply, with an ellipsis when cut.
pub fn display_message(reply: &str) -> String {
    if reply.chars().count() > DISPLAY_CHARS {
        let head: String = reply.chars().take(DISPLAY_CHARS).collect();
        format!("{head}...")
    } else {
        reply.to_string()
    }
}

fn recent_card(persona: Persona, latest: Option<Chat>, now: OffsetDateTime) -> RecentChat {
    match latest {
        Some(chat) => RecentChat {
            character: persona.character(),
            character_name: persona.display_name(),
            display_message: display_message(&chat.bot_reply),
            time_ago: time_ago(now, chat.timestamp),
            timestamp: Some(chat.timestamp),
            user_message: Some(chat.user_message),
            bot_reply: Some(chat.bot_reply),
            is_real: true,
        },
        None => RecentChat {
            character: persona.character(),
            character_name: persona.display_name(),
            user_message: None,
            bot_reply: None,
            display_message: persona.demo_greeting().to_string(),
            timestamp: None,
            time_ago: "Just now".to_string(),
            is_real: false,
        },
    }
}

/// Real cards newest first, then demo cards in persona order.
fn order_cards(mut cards: Vec<RecentChat>) -> Vec<RecentChat> {
    cards.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    cards
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn recent_chats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<RecentChatsResponse>, ApiError> {
    let now = OffsetDateTime::now_utc();
    let mut cards = Vec::with_capacity(Persona::ALL.len());
    for persona in Persona::ALL {
        let latest = Chat::latest(&state.db, &user.email, persona.character())
            .await
            .map_err(internal)?;
        cards.push(recent_card(persona, latest, now));
    }
    let chats = order_cards(cards);
    debug!(real = chats.iter().filter(|c| c.is_real).count(), "recent chats loaded");
    Ok(Json(RecentChatsResponse {
        success: true,
        chats,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use uuid::Uuid;

    fn chat(character: &str, reply: &str, at: OffsetDateTime) -> Chat {
        Chat {
            id: Uuid::new_v4(),
            user_email: "su@example.com".into(),
            character: character.into(),
            user_message: "hi".into(),
            bot_reply: reply.into(),
            timestamp: at,
            session_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn time_ago_buckets() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(time_ago(now, now - Duration::days(3)), "3d ago");
        assert_eq!(time_ago(now, now - Duration::hours(5)), "5h ago");
        assert_eq!(time_ago(now, now - Duration::minutes(59)), "59m ago");
        assert_eq!(time_ago(now, now - Duration::seconds(30)), "Just now");
    }

    #[test]
    fn long_replies_are_cut_at_sixty_chars() {
        let reply = "မ".repeat(70);
        let shown = display_message(&reply);
        assert_eq!(shown.chars().count(), 63);
        assert!(shown.ends_with("..."));
        assert_eq!(display_message("short"), "short");
    }

    #[test]
    fn real_cards_first_newest_first() {
        let now = OffsetDateTime::now_utc();
        let cards = vec![
            recent_card(Persona::English, None, now),
            recent_card(
                Persona::Doctor,
                Some(chat("doctor", "old", now - Duration::hours(2))),
                now,
            ),
            recent_card(
                Persona::Lawyer,
                Some(chat("lawyer", "new", now - Duration::minutes(1))),
                now,
            ),
        ];
        let ordered = order_cards(cards);
        let order: Vec<_> = ordered.iter().map(|c| c.character).collect();
        assert_eq!(order, ["lawyer", "doctor", "english_teacher"]);
        assert!(!ordered[2].is_real);
        assert_eq!(ordered[2].time_ago, "Just now");
        assert_eq!(ordered[1].time_ago, "2h ago");
    }

    #[tokio::test]
    async fn recent_chats_requires_session() {
        let app = routes().with_state(AppState::fake());
        let (status, body) =
            crate::testing::call(app, "GET", "/api/recent-chats", None, None).await;
        assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }
}
