//! Router test helpers.

use axum::{
    body::Body,
    extract::FromRef,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::{claims::Subject, jwt::JwtKeys};
use crate::state::AppState;

pub fn user_token(state: &AppState) -> String {
    JwtKeys::from_ref(state)
        .sign_access(&Subject::user(Uuid::new_v4(), "student@example.com"))
        .unwrap()
}

pub fn admin_token(state: &AppState) -> String {
    JwtKeys::from_ref(state)
        .sign_access(&Subject::admin("admin@example.com"))
        .unwrap()
}

/// Sends one request; `body` is sent raw with a JSON content type.
pub async fn call(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let body = match body {
        Some(b) => {
            req = req.header("content-type", "application/json");
            Body::from(b.to_string())
        }
        None => Body::empty(),
    };
    let res = app.oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
