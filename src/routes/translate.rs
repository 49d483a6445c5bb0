use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{llm::prompts, personas::services::ask, state::AppState};

const FALLBACK: &str = "Translation is not available right now. Please try again.";

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translation: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/translate", post(translate))
}

/// English <-> Burmese; the model detects the input language.
#[instrument(skip(state, payload))]
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> (StatusCode, Json<TranslateResponse>) {
    let text = match payload {
        Ok(Json(req)) => req.text,
        Err(e) => {
            warn!(error = %e, "unreadable translate body");
            return (
                StatusCode::BAD_REQUEST,
                Json(TranslateResponse {
                    translation: String::new(),
                }),
            );
        }
    };
    let text = text.trim();
    if text.is_empty() {
        return (
            StatusCode::OK,
            Json(TranslateResponse {
                translation: String::new(),
            }),
        );
    }

    let translation = match ask(state.llm.as_ref(), prompts::TRANSLATOR, text).await {
        Ok(t) if !t.is_empty() => t,
        Ok(_) => FALLBACK.to_string(),
        Err(e) => {
            warn!(error = %e, "translation failed");
            FALLBACK.to_string()
        }
    };
    (StatusCode::OK, Json(TranslateResponse { translation }))
}
