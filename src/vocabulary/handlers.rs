use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::{
    dto::{SearchRequest, SearchResponse, VocabularyEntry},
    normalizer::normalize,
};
use crate::{
    llm::{prompts, LlmError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/vocabulary/search", post(search_word))
}

async fn lookup(state: &AppState, word: &str) -> Result<VocabularyEntry, LlmError> {
    let prompt = prompts::render_word(prompts::VOCABULARY, word)?;
    let raw = state.llm.generate(&prompt).await?;
    Ok(normalize(&raw, word))
}

/// POST /vocabulary/search. Always answers 200 with a fully shaped entry,
/// or `{error}` when no word was given.
#[instrument(skip(state, payload))]
pub async fn search_word(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let word = match payload {
        Ok(Json(req)) => req.word.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "unreadable vocabulary body");
            String::new()
        }
    };
    if word.is_empty() {
        return Json(json!({ "error": "Please enter a word" })).into_response();
    }

    let response = match lookup(&state, &word).await {
        Ok(entry) => {
            info!(%word, part_of_speech = %entry.part_of_speech, "vocabulary entry built");
            SearchResponse { entry, error: None }
        }
        Err(e) => {
            warn!(error = %e, %word, "vocabulary lookup failed");
            SearchResponse {
                entry: VocabularyEntry::service_error(&word),
                error: Some(format!("Server error: {e}")),
            }
        }
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::fakes::{FailingModel, ScriptedModel};
    use crate::testing::call;

    const HELLO: &str = r#"Here you go:
{"word":"hello","part_of_speech":"interjection","burmese":"မင်္ဂလာပါ","definition":{"english":"a greeting","burmese":"နှုတ်ဆက်စကား"},"examples":[{"english":"Hello!","burmese_translation":"မင်္ဂလာပါ!"}]}"#;

    #[tokio::test]
    async fn empty_word_asks_for_input() {
        let app = routes().with_state(AppState::fake());
        let (status, body) =
            call(app, "POST", "/vocabulary/search", None, Some(r#"{"word":"  "}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Please enter a word");
    }

    #[tokio::test]
    async fn model_output_is_normalized() {
        let app = routes().with_state(AppState::fake_with(Arc::new(ScriptedModel::new(HELLO))));
        let (status, body) =
            call(app, "POST", "/vocabulary/search", None, Some(r#"{"word":"hello"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["part_of_speech"], "interjection");
        assert_eq!(body["examples"].as_array().unwrap().len(), 3);
        assert_eq!(body["examples"][0]["english"], "Hello!");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn model_failure_returns_canned_entry() {
        let app = routes().with_state(AppState::fake_with(Arc::new(FailingModel)));
        let (status, body) =
            call(app, "POST", "/vocabulary/search", None, Some(r#"{"word":"tree"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word"], "tree");
        assert_eq!(body["part_of_speech"], "error");
        assert!(body["error"].as_str().unwrap().starts_with("Server error:"));
    }
}
