//! English to Burmese dictionary lookups backed by the language model.

pub mod dto;
pub mod handlers;
pub mod normalizer;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
