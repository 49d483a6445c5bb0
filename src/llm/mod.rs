//! Hosted language-model seam.
//!
//! Handlers only see [`LanguageModel`]; the production implementation is
//! [`GeminiClient`], tests plug in a scripted model through `AppState::fake`.

use async_trait::async_trait;

mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("model quota exhausted: {0}")]
    Quota(String),
    #[error("model returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model returned no text")]
    Empty,
    #[error("prompt rendering failed: {0}")]
    Prompt(#[from] minijinja::Error),
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Single-shot completion: prompt in, text out.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
