use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use super::claims::{Claims, Role, TokenKind};
use super::jwt::JwtKeys;

/// Rejection of the session extractors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingToken,
    #[error("invalid auth scheme")]
    BadScheme,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("access token required")]
    WrongKind,
    #[error("admin access required")]
    NotAdmin,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::NotAdmin => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        };
        let body = json!({
            "success": false,
            "error": self.to_string(),
            "reply": "Please login first.",
        });
        (status, Json(body)).into_response()
    }
}

fn access_claims(parts: &Parts, keys: &JwtKeys) -> Result<Claims, AuthError> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth
        .strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .ok_or(AuthError::BadScheme)?;

    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AuthError::InvalidToken
    })?;

    if claims.kind != TokenKind::Access {
        return Err(AuthError::WrongKind);
    }
    Ok(claims)
}

/// Logged-in end user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub session_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = access_claims(parts, &JwtKeys::from_ref(state))?;
        if claims.role != Role::User {
            return Err(AuthError::InvalidToken);
        }
        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            session_id: claims.sid,
        })
    }
}

/// Holder of an admin token.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = access_claims(parts, &JwtKeys::from_ref(state))?;
        if claims.role != Role::Admin {
            warn!(email = %claims.email, "non-admin token on admin route");
            return Err(AuthError::NotAdmin);
        }
        Ok(AdminUser {
            email: claims.email,
        })
    }
}

/// Route layer for the admin sub-tree.
pub async fn require_admin(_admin: AdminUser, req: Request, next: Next) -> Response {
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Subject;
    use crate::state::AppState;
    use axum::http::Request as HttpRequest;

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(v) = auth {
            builder = builder.header("authorization", v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn user_token_yields_auth_user() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let subject = Subject::user(Uuid::new_v4(), "me@example.com");
        let token = keys.sign_access(&subject).unwrap();

        let mut parts = parts_with(Some(&format!("Bearer {token}")));
        let user = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.id, subject.id);
        assert_eq!(user.email, "me@example.com");
        assert_eq!(user.session_id, subject.sid);
    }

    #[tokio::test]
    async fn missing_or_refresh_tokens_are_rejected() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);

        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));

        let refresh = keys
            .sign_refresh(&Subject::user(Uuid::new_v4(), "me@example.com"))
            .unwrap();
        let mut parts = parts_with(Some(&format!("Bearer {refresh}")));
        let err = AuthUser::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert!(matches!(err, AuthError::WrongKind));

        let mut parts = parts_with(Some("Token abc"));
        let err = AuthUser::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert!(matches!(err, AuthError::BadScheme));
    }

    #[tokio::test]
    async fn roles_do_not_cross() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user_token = keys
            .sign_access(&Subject::user(Uuid::new_v4(), "me@example.com"))
            .unwrap();
        let admin_token = keys.sign_access(&Subject::admin("root@example.com")).unwrap();

        let mut parts = parts_with(Some(&format!("Bearer {user_token}")));
        let err = AdminUser::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert!(matches!(err, AuthError::NotAdmin));

        let mut parts = parts_with(Some(&format!("Bearer {admin_token}")));
        assert!(AuthUser::from_request_parts(&mut parts, &state).await.is_err());

        let mut parts = parts_with(Some(&format!("Bearer {admin_token}")));
        let admin = AdminUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(admin.email, "root@example.com");
    }
}
