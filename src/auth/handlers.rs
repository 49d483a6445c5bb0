use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        claims::Subject,
        dto::{AuthResponse, Credentials, MessageResponse, PublicUser, RefreshRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, is_valid_email, verify_password, MIN_PASSWORD_LEN},
        repo_types::User,
    },
    error::{fail, internal, ApiError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn issue_pair(keys: &JwtKeys, subject: &Subject) -> Result<(String, String), ApiError> {
    let access = keys.sign_access(subject).map_err(internal)?;
    let refresh = keys.sign_refresh(subject).map_err(internal)?;
    Ok((access, refresh))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<Credentials>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid email"));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(fail(StatusCode::BAD_REQUEST, "Password too short"));
    }

    match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Err(fail(
                StatusCode::CONFLICT,
                "Email already exists! Please use a different email.",
            ));
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(internal(e));
        }
    }

    let hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err(internal(e));
        }
    };

    let user = match User::create(&state.db, &payload.email, &hash).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(internal(e));
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let (access_token, refresh_token) = issue_pair(&keys, &Subject::user(user.id, &user.email))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            access_token,
            refresh_token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<Credentials>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid email"));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(fail(StatusCode::UNAUTHORIZED, "Invalid email or password!"));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(internal(e));
        }
    };

    let ok = match verify_password(&payload.password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return Err(internal(e));
        }
    };

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(fail(StatusCode::UNAUTHORIZED, "Invalid email or password!"));
    }

    let subject = Subject::user(user.id, &user.email);
    let keys = JwtKeys::from_ref(&state);
    let (access_token, refresh_token) = issue_pair(&keys, &subject)?;

    info!(user_id = %user.id, session_id = %subject.sid, "user logged in");
    Ok(Json(AuthResponse {
        success: true,
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| fail(StatusCode::UNAUTHORIZED, e.to_string()))?;

    let user = match User::find_by_id(&state.db, claims.sub).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err(fail(StatusCode::UNAUTHORIZED, "User not found")),
        Err(e) => return Err(internal(e)),
    };

    // same session id, fresh pair, email as currently stored
    let (access_token, refresh_token) = issue_pair(&keys, &claims.renewed_for(&user.email))?;
    Ok(Json(AuthResponse {
        success: true,
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

/// Tokens are stateless; the client drops them.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(user: AuthUser) -> Json<MessageResponse> {
    info!(session_id = %user.session_id, "user logged out");
    Json(MessageResponse::ok("Logged out successfully!"))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    match User::find_by_id(&state.db, user.id).await {
        Ok(Some(u)) => Ok(Json(u.into())),
        Ok(None) => {
            warn!(user_id = %user.id, "user not found");
            Err(fail(StatusCode::UNAUTHORIZED, "User not found"))
        }
        Err(e) => Err(internal(e)),
    }
}
