use axum::{routing::get, Router};

use crate::state::AppState;

pub mod translate;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(translate::routes())
        .route("/health", get(|| async { "ok" }))
}
