//! Operator panel: user and chat management plus usage analytics.

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use axum::{middleware, Router};

use crate::{auth::extractors::require_admin, state::AppState};

pub fn router(state: AppState) -> Router<AppState> {
    let panel = handlers::panel_routes()
        .route_layer(middleware::from_fn_with_state(state, require_admin));
    Router::new().nest("/admin", handlers::login_routes().merge(panel))
}
