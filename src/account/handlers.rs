use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::{
    dto::{
        ChangePasswordRequest, ClearHistoryResponse, DeleteAccountRequest, ExportData,
        ExportResponse, ExportedUser, SpamPreferences, SpamPreferencesRequest,
        UpdateProfileRequest, UserStatsResponse,
    },
    services::{build_stats, DELETE_CONFIRMATION},
};
use crate::{
    auth::{
        dto::MessageResponse,
        password::{hash_password, validate_strength, verify_password},
        repo_types::User,
        AuthUser,
    },
    chats::{dto::HistoryItem, repo_types::Chat},
    error::{fail, internal, ApiError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/update-profile", post(update_profile))
        .route("/api/update-spam-preferences", post(update_spam_preferences))
        .route("/api/export-data", post(export_data))
        .route("/api/clear-chat-history", post(clear_chat_history))
        .route("/api/change-password", post(change_password))
        .route("/api/delete-account", post(delete_account))
        .route("/api/get-user-stats", get(get_user_stats))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(v)| v).map_err(|e| {
        warn!(error = %e, "unreadable settings body");
        fail(StatusCode::BAD_REQUEST, "Invalid JSON data.")
    })
}

async fn load_user(state: &AppState, email: &str) -> Result<User, ApiError> {
    User::find_by_email(&state.db, email)
        .await
        .map_err(internal)?
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))
}

#[instrument(skip_all, fields(email = %user.email))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = body(payload)?;
    if req.display_name.is_some() || req.phone_number.is_some() {
        User::update_profile(
            &state.db,
            &user.email,
            req.display_name.as_deref(),
            req.phone_number.as_deref(),
        )
        .await
        .map_err(internal)?;
        info!("profile updated");
    }
    Ok(Json(MessageResponse::ok("Profile updated successfully")))
}

#[instrument(skip_all, fields(email = %user.email))]
pub async fn update_spam_preferences(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<SpamPreferencesRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = body(payload)?;
    let prefs = SpamPreferences {
        enable_spam_emails: req.enable_spam_emails,
        block_all_spam: req.block_all_spam,
        custom_filters: req.custom_filters,
        updated_at: OffsetDateTime::now_utc(),
    };
    let value = serde_json::to_value(&prefs).map_err(internal)?;
    User::set_spam_preferences(&state.db, &user.email, &value)
        .await
        .map_err(internal)?;
    info!("spam preferences updated");
    Ok(Json(MessageResponse::ok("Spam preferences updated successfully")))
}

#[instrument(skip_all, fields(email = %user.email))]
pub async fn export_data(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ExportResponse>, ApiError> {
    let record = load_user(&state, &user.email).await?;
    let chats = Chat::all_for_user(&state.db, &user.email)
        .await
        .map_err(internal)?;
    let chat_history: Vec<HistoryItem> = chats.into_iter().map(HistoryItem::from).collect();

    info!(total_chats = chat_history.len(), "data exported");
    Ok(Json(ExportResponse {
        success: true,
        data: ExportData {
            user_info: ExportedUser {
                email: record.email,
                display_name: record.display_name.unwrap_or_default(),
                phone_number: record.phone_number.unwrap_or_default(),
                created_at: record.created_at,
            },
            preferences: record.spam_preferences.unwrap_or_else(|| json!({})),
            total_chats: chat_history.len(),
            chat_history,
            exported_at: OffsetDateTime::now_utc(),
        },
        message: "Data exported successfully",
    }))
}

#[instrument(skip_all, fields(email = %user.email))]
pub async fn clear_chat_history(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
    let deleted = Chat::delete_for_user(&state.db, &user.email)
        .await
        .map_err(internal)?;
    info!(deleted, "chat history cleared");
    Ok(Json(ClearHistoryResponse {
        success: true,
        message: format!("Cleared {deleted} chat messages"),
        deleted_count: deleted,
    }))
}

#[instrument(skip_all, fields(email = %user.email))]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = body(payload)?;
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "Both current and new password are required",
        ));
    }
    validate_strength(&req.new_password).map_err(|msg| fail(StatusCode::BAD_REQUEST, msg))?;

    let record = match User::find_by_email(&state.db, &user.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return Err(fail(StatusCode::BAD_REQUEST, "Current password is incorrect"));
        }
        Err(e) => return Err(internal(e)),
    };
    if !verify_password(&req.current_password, &record.password_hash).map_err(internal)? {
        warn!("wrong current password");
        return Err(fail(StatusCode::BAD_REQUEST, "Current password is incorrect"));
    }

    let hash = hash_password(&req.new_password).map_err(internal)?;
    User::set_password_hash(&state.db, &user.email, &hash)
        .await
        .map_err(internal)?;
    info!("password changed");
    Ok(Json(MessageResponse::ok("Password changed successfully")))
}

#[instrument(skip_all, fields(email = %user.email))]
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<DeleteAccountRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = body(payload)?;
    if req.confirmation != DELETE_CONFIRMATION {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "Confirmation text does not match",
        ));
    }
    let (users, chats) = User::delete_with_chats(&state.db, &user.email)
        .await
        .map_err(internal)?;
    info!(users, chats, "account deleted");
    Ok(Json(MessageResponse::ok("Account deleted successfully")))
}

#[instrument(skip_all, fields(email = %user.email))]
pub async fn get_user_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserStatsResponse>, ApiError> {
    let counts = Chat::count_by_character(&state.db, &user.email)
        .await
        .map_err(internal)?;
    let created_at = User::find_by_email(&state.db, &user.email)
        .await
        .map_err(internal)?
        .map(|u| u.created_at);
    Ok(Json(UserStatsResponse {
        success: true,
        stats: build_stats(&counts, created_at),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::state::AppState;
    use crate::testing::{call, user_token};

    fn app(state: AppState) -> axum::Router {
        super::routes().with_state(state)
    }

    #[tokio::test]
    async fn settings_require_session() {
        for (method, uri) in [
            ("POST", "/api/update-profile"),
            ("POST", "/api/export-data"),
            ("POST", "/api/clear-chat-history"),
            ("GET", "/api/get-user-stats"),
        ] {
            let (status, body) = call(app(AppState::fake()), method, uri, None, Some("{}")).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["success"], false);
        }
    }

    #[tokio::test]
    async fn change_password_validates_before_touching_storage() {
        let state = AppState::fake();
        let token = user_token(&state);

        let (status, body) = call(
            app(state.clone()),
            "POST",
            "/api/change-password",
            Some(&token),
            Some(r#"{"current_password":"","new_password":"Abcdef1!"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Both current and new password are required");

        let (status, body) = call(
            app(state),
            "POST",
            "/api/change-password",
            Some(&token),
            Some(r#"{"current_password":"old","new_password":"abcdefgh"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Password must contain at least one uppercase letter"
        );
    }

    #[tokio::test]
    async fn delete_account_needs_exact_confirmation() {
        let state = AppState::fake();
        let token = user_token(&state);
        let (status, body) = call(
            app(state),
            "POST",
            "/api/delete-account",
            Some(&token),
            Some(r#"{"confirmation":"delete my account"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Confirmation text does not match");
    }

    #[tokio::test]
    async fn storage_outage_is_500() {
        let state = AppState::fake();
        let token = user_token(&state);
        let (status, body) = call(
            app(state),
            "POST",
            "/api/clear-chat-history",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }
}
