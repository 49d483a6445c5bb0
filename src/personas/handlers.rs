use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{debug, error, info, instrument, warn};

use super::{
    dto::{CallRequest, CallResponse, ChatReply, ChatRequest, CleanAudioResponse},
    services::{ask, enforce_english, NEED_MORE_TIME},
    CallProfile, Persona,
};
use crate::{
    auth::AuthUser,
    chats::{
        dto::{HistoryItem, HistoryResponse},
        repo_types::{Chat, NewChat},
    },
    error::{fail, ApiError},
    speech::{
        services::{generate_speech, SpeechJob},
        SpeechRate,
    },
    state::AppState,
};

/// POST /<persona>/chat
#[instrument(skip_all, fields(persona = persona.slug(), email = %user.email))]
pub async fn chat(
    State(state): State<AppState>,
    Extension(persona): Extension<Persona>,
    user: AuthUser,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ChatReply>)> {
    let Ok(Json(payload)) = payload else {
        warn!("unreadable chat body");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ChatReply::new("Invalid JSON data.")),
        ));
    };

    let message = payload.message.trim();
    if message.is_empty() {
        return Ok(Json(ChatReply::new("Please send a message.")));
    }

    let reply = match ask(state.llm.as_ref(), persona.chat_prompt(), message).await {
        Ok(r) if !r.is_empty() => r,
        Ok(_) => {
            warn!("model returned blank reply");
            persona.fallback_reply(message).to_string()
        }
        Err(e) => {
            warn!(error = %e, "model call failed; using fallback");
            persona.fallback_reply(message).to_string()
        }
    };

    let new = NewChat {
        user_email: &user.email,
        character: persona.character(),
        user_message: message,
        bot_reply: &reply,
        session_id: user.session_id,
    };
    match Chat::insert(&state.db, &new).await {
        Ok(saved) => debug!(chat_id = %saved.id, "chat saved"),
        Err(e) => error!(error = %e, "chat save failed"),
    }

    Ok(Json(ChatReply::new(reply)))
}

/// GET /<persona>/chat-history-api
#[instrument(skip_all, fields(persona = persona.slug(), email = %user.email))]
pub async fn history(
    State(state): State<AppState>,
    Extension(persona): Extension<Persona>,
    user: AuthUser,
) -> Result<Json<HistoryResponse>, ApiError> {
    let rows = Chat::history(&state.db, &user.email, persona.character())
        .await
        .map_err(|e| {
            error!(error = %e, "history query failed");
            fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    let chats: Vec<HistoryItem> = rows.into_iter().map(HistoryItem::from).collect();
    Ok(Json(HistoryResponse {
        success: true,
        count: chats.len(),
        chats,
    }))
}

/// POST /<persona>/call and /lawyer-call/call
#[instrument(skip_all, fields(profile = profile.folder(), email = %user.email))]
pub async fn call(
    State(state): State<AppState>,
    Extension(profile): Extension<CallProfile>,
    user: AuthUser,
    payload: Result<Json<CallRequest>, JsonRejection>,
) -> (StatusCode, Json<CallResponse>) {
    let Ok(Json(payload)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(CallResponse::text_only("No data received")),
        );
    };

    let message = payload.message.trim();
    if message.is_empty() {
        return (
            StatusCode::OK,
            Json(CallResponse::text_only(profile.empty_message_reply())),
        );
    }

    let deadline = Duration::from_secs(state.config.llm.call_timeout_secs);
    let answer = tokio::time::timeout(deadline, ask(state.llm.as_ref(), profile.prompt(), message)).await;
    let text = match answer {
        Err(_) => {
            warn!(timeout_secs = deadline.as_secs(), "model too slow for call");
            return (StatusCode::OK, Json(CallResponse::text_only(NEED_MORE_TIME)));
        }
        Ok(Ok(r)) if !r.is_empty() => r,
        Ok(Ok(_)) => profile.error_reply().to_string(),
        Ok(Err(e)) => {
            warn!(error = %e, "model call failed");
            profile.error_reply().to_string()
        }
    };
    let text = match profile {
        CallProfile::LawyerEnglish => enforce_english(&text),
        _ => text,
    };

    let (voice_key, voice_id) = profile.voice(payload.voice.as_deref());
    let rate = SpeechRate::from_key(payload.speed.as_deref().unwrap_or("normal"));
    let audio = generate_speech(
        state.tts.as_ref(),
        &state.audio,
        SpeechJob {
            text: &text,
            voice: voice_id,
            rate,
            folder: profile.folder(),
            retention: profile.retention(),
            timeout: profile.tts_timeout(),
        },
    )
    .await;

    info!(has_audio = audio.is_some(), voice = voice_key, "call answered");
    (
        StatusCode::OK,
        Json(CallResponse {
            text,
            audio,
            voice_used: Some(voice_key.to_string()),
            speed_used: Some(speed_key(rate).to_string()),
        }),
    )
}

fn speed_key(rate: SpeechRate) -> &'static str {
    match rate {
        SpeechRate::Slow => "slow",
        SpeechRate::Normal => "normal",
        SpeechRate::Fast => "fast",
    }
}

/// POST /<persona>/clean-audio
#[instrument(skip_all, fields(profile = profile.folder()))]
pub async fn clean_audio(
    State(state): State<AppState>,
    Extension(profile): Extension<CallProfile>,
    _user: AuthUser,
) -> (StatusCode, Json<CleanAudioResponse>) {
    match state.audio.clean_all(profile.folder()).await {
        Ok(deleted) => (
            StatusCode::OK,
            Json(CleanAudioResponse {
                status: "success",
                message: format!("Deleted {deleted} files"),
                deleted,
            }),
        ),
        Err(e) => {
            error!(error = %e, "audio cleanup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CleanAudioResponse {
                    status: "error",
                    message: e.to_string(),
                    deleted: 0,
                }),
            )
        }
    }
}
