use axum::{
    extract::{rejection::JsonRejection, FromRef, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        ActionResponse, AddUserRequest, AdminLoginRequest, AdminLoginResponse, AnalyticsResponse,
        AnalyticsSeries, ChatsPage, DashboardResponse, ListQuery, UpdateCredentialsRequest,
        UpdateCredentialsResponse, UpdateUserRequest, UserChatsPage, UsersData, UsersPage,
    },
    repo,
    services::{check_credentials, contains_pattern, page_offset, total_pages, PersonaCounts, PER_PAGE},
};
use crate::{
    auth::{
        claims::Subject,
        jwt::JwtKeys,
        password::{hash_password, is_valid_email},
        repo_types::User,
        AdminUser,
    },
    chats::repo_types::Chat,
    error::{fail, internal, ApiError},
    state::AppState,
};

type ActionError = (StatusCode, Json<ActionResponse>);

fn ok(message: impl Into<String>) -> Json<ActionResponse> {
    Json(ActionResponse {
        success: true,
        message: message.into(),
    })
}

fn refuse(status: StatusCode, message: impl Into<String>) -> ActionError {
    (
        status,
        Json(ActionResponse {
            success: false,
            message: message.into(),
        }),
    )
}

fn action_failed<E: std::fmt::Display>(e: E) -> ActionError {
    tracing::error!(error = %e, "admin action failed");
    refuse(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn action_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ActionError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| refuse(StatusCode::BAD_REQUEST, e.body_text()))
}

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Everything here sits behind `require_admin`.
pub fn panel_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", get(users))
        .route("/users/data", get(users_data))
        .route("/users/add", post(add_user))
        .route("/users/update/:id", post(update_user))
        .route("/users/delete/:id", post(delete_user))
        .route("/users/:id/chats", get(user_chats))
        .route("/chats", get(chats))
        .route("/chats/delete/:id", post(delete_chat))
        .route("/chats/delete-all-user-chats/:email", post(delete_all_user_chats))
        .route("/analytics", get(analytics))
        .route("/api/analytics/data", get(analytics_data))
        .route("/settings/update-credentials", post(update_credentials))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let Ok(Json(req)) = payload else {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid JSON data."));
    };
    match check_credentials(&state.config.admin, &req.email, &req.password) {
        None => {
            warn!("admin login attempted while panel is disabled");
            Err(fail(StatusCode::SERVICE_UNAVAILABLE, "Admin panel is disabled"))
        }
        Some(false) => {
            warn!("admin login rejected");
            Err(fail(StatusCode::UNAUTHORIZED, "Invalid credentials!"))
        }
        Some(true) => {
            let email = req.email.trim().to_lowercase();
            let access_token = JwtKeys::from_ref(&state)
                .sign_access(&Subject::admin(&email))
                .map_err(internal)?;
            info!(%email, "admin logged in");
            Ok(Json(AdminLoginResponse {
                success: true,
                access_token,
            }))
        }
    }
}

#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn dashboard(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let totals = repo::dashboard_totals(&state.db).await.map_err(internal)?;
    let per_character = repo::chats_per_character(&state.db)
        .await
        .map_err(internal)?;
    Ok(Json(DashboardResponse {
        success: true,
        total_users: totals.total_users,
        total_chats: totals.total_chats,
        recent_users: totals.recent_users,
        active_users: totals.active_users,
        today_chats: totals.today_chats,
        chat_stats: PersonaCounts::from_rows(&per_character),
    }))
}

#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn users(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<UsersPage>, ApiError> {
    let (page, offset) = page_offset(q.page);
    let pattern = contains_pattern(q.search.as_deref());

    let total_users = repo::count_users(&state.db, pattern.as_deref())
        .await
        .map_err(internal)?;
    let users = repo::list_users(&state.db, pattern.as_deref(), PER_PAGE, offset)
        .await
        .map_err(internal)?;
    let active_users = repo::active_user_count(&state.db).await.map_err(internal)?;

    Ok(Json(UsersPage {
        success: true,
        users,
        page,
        total_pages: total_pages(total_users),
        total_users,
        active_users,
        search: q.search.unwrap_or_default(),
    }))
}

#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn users_data(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<UsersData>, ApiError> {
    let users = repo::user_summaries(&state.db).await.map_err(internal)?;
    Ok(Json(UsersData {
        success: true,
        total: users.len(),
        users,
    }))
}

#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn add_user(
    State(state): State<AppState>,
    admin: AdminUser,
    payload: Result<Json<AddUserRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ActionError> {
    let req = action_body(payload)?;
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(refuse(
            StatusCode::BAD_REQUEST,
            "Email and password are required!",
        ));
    }
    if !is_valid_email(&email) {
        return Err(refuse(StatusCode::BAD_REQUEST, "Invalid email"));
    }
    if User::find_by_email(&state.db, &email)
        .await
        .map_err(action_failed)?
        .is_some()
    {
        return Err(refuse(StatusCode::CONFLICT, "User already exists!"));
    }

    let hash = hash_password(&req.password).map_err(action_failed)?;
    let user = User::create(&state.db, &email, &hash)
        .await
        .map_err(action_failed)?;
    info!(user_id = %user.id, %email, "user added by admin");
    Ok(ok("User added successfully!"))
}

#[instrument(skip_all, fields(admin = %admin.email, %id))]
pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ActionError> {
    let req = action_body(payload)?;
    let email = req.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(refuse(StatusCode::BAD_REQUEST, "Email is required!"));
    }
    if !is_valid_email(&email) {
        return Err(refuse(StatusCode::BAD_REQUEST, "Invalid email"));
    }
    if let Some(other) = User::find_by_email(&state.db, &email)
        .await
        .map_err(action_failed)?
    {
        if other.id != id {
            return Err(refuse(StatusCode::CONFLICT, "User already exists!"));
        }
    }

    let hash = match req.password.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => Some(hash_password(p).map_err(action_failed)?),
        None => None,
    };
    let updated = repo::update_user(&state.db, id, &email, hash.as_deref())
        .await
        .map_err(action_failed)?;
    if !updated {
        return Err(refuse(
            StatusCode::NOT_FOUND,
            "No changes made or user not found!",
        ));
    }
    info!(%email, password_changed = hash.is_some(), "user updated by admin");
    Ok(ok("User updated successfully!"))
}

#[instrument(skip_all, fields(admin = %admin.email, %id))]
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, ActionError> {
    let Some(user) = User::find_by_id(&state.db, id)
        .await
        .map_err(action_failed)?
    else {
        return Err(refuse(StatusCode::NOT_FOUND, "User not found!"));
    };
    let (_, chats) = User::delete_with_chats(&state.db, &user.email)
        .await
        .map_err(action_failed)?;
    info!(email = %user.email, chats, "user deleted by admin");
    Ok(ok("User and their chats deleted successfully!"))
}

#[instrument(skip_all, fields(admin = %admin.email, %id))]
pub async fn user_chats(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Query(q): Query<ListQuery>,
) -> Result<Json<UserChatsPage>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found!"))?;
    let (page, offset) = page_offset(q.page);
    let total_chats = repo::count_user_chats(&state.db, &user.email)
        .await
        .map_err(internal)?;
    let chats = repo::list_user_chats(&state.db, &user.email, PER_PAGE, offset)
        .await
        .map_err(internal)?;
    Ok(Json(UserChatsPage {
        success: true,
        user: user.into(),
        chats,
        page,
        total_pages: total_pages(total_chats),
        total_chats,
    }))
}

#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn chats(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<ChatsPage>, ApiError> {
    let (page, offset) = page_offset(q.page);
    let character = q.character.as_deref().filter(|c| !c.is_empty());
    let pattern = contains_pattern(q.search.as_deref());

    let total_chats = repo::count_chats(&state.db, character, pattern.as_deref())
        .await
        .map_err(internal)?;
    let chats = repo::list_chats(&state.db, character, pattern.as_deref(), PER_PAGE, offset)
        .await
        .map_err(internal)?;
    let characters = repo::distinct_characters(&state.db)
        .await
        .map_err(internal)?;

    Ok(Json(ChatsPage {
        success: true,
        chats,
        page,
        total_pages: total_pages(total_chats),
        total_chats,
        characters,
        character_filter: character.unwrap_or_default().to_string(),
        search: q.search.unwrap_or_default(),
    }))
}

#[instrument(skip_all, fields(admin = %admin.email, %id))]
pub async fn delete_chat(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, ActionError> {
    if !repo::delete_chat(&state.db, id).await.map_err(action_failed)? {
        return Err(refuse(StatusCode::NOT_FOUND, "Chat not found!"));
    }
    info!("chat deleted by admin");
    Ok(ok("Chat deleted successfully!"))
}

#[instrument(skip_all, fields(admin = %admin.email, %email))]
pub async fn delete_all_user_chats(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(email): Path<String>,
) -> Result<Json<ActionResponse>, ActionError> {
    let deleted = Chat::delete_for_user(&state.db, &email)
        .await
        .map_err(action_failed)?;
    info!(deleted, "user chats deleted by admin");
    Ok(ok(format!("Deleted {deleted} chats for user {email}!")))
}

#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn analytics(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let user_stats = repo::daily_signups(&state.db, 30).await.map_err(internal)?;
    let chat_stats = repo::daily_chats(&state.db, 30).await.map_err(internal)?;
    let per_character = repo::chats_per_character(&state.db)
        .await
        .map_err(internal)?;
    let top_users = repo::top_users(&state.db, 10).await.map_err(internal)?;
    Ok(Json(AnalyticsResponse {
        success: true,
        user_stats,
        chat_stats,
        character_stats: PersonaCounts::from_rows(&per_character),
        top_users,
    }))
}

#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn analytics_data(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<AnalyticsSeries>, ApiError> {
    let days = repo::recent_day_totals(&state.db, 7)
        .await
        .map_err(internal)?;
    let mut series = AnalyticsSeries {
        success: true,
        dates: Vec::with_capacity(days.len()),
        user_counts: Vec::with_capacity(days.len()),
        chat_counts: Vec::with_capacity(days.len()),
    };
    for day in days {
        series.dates.push(day.date);
        series.user_counts.push(day.users);
        series.chat_counts.push(day.chats);
    }
    Ok(Json(series))
}

/// The credential lives in configuration, so this only verifies the
/// current one and hashes a replacement for the operator.
#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn update_credentials(
    State(state): State<AppState>,
    admin: AdminUser,
    payload: Result<Json<UpdateCredentialsRequest>, JsonRejection>,
) -> Result<Json<UpdateCredentialsResponse>, ActionError> {
    let req = action_body(payload)?;
    if check_credentials(&state.config.admin, &req.current_email, &req.current_password)
        != Some(true)
    {
        return Err(refuse(
            StatusCode::BAD_REQUEST,
            "Current credentials are incorrect!",
        ));
    }
    let password_hash = match req.new_password.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => Some(hash_password(p).map_err(action_failed)?),
        None => None,
    };
    Ok(Json(UpdateCredentialsResponse {
        success: true,
        message: "Admin credentials are read from ADMIN_EMAIL and ADMIN_PASSWORD_HASH; update them and restart to apply.",
        password_hash,
    }))
}
