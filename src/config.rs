use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Admin credential. The panel is disabled when either part is unset.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub call_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    pub api_key: String,
    pub endpoint: String,
    pub audio_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub llm: LlmConfig,
    pub tts: TtsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "persona-chat".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "persona-chat-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60 * 24),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let admin = AdminConfig {
            email: non_empty_var("ADMIN_EMAIL").map(|e| e.trim().to_lowercase()),
            password_hash: non_empty_var("ADMIN_PASSWORD_HASH"),
        };
        let llm = LlmConfig {
            api_key: std::env::var("GOOGLE_API_KEY").context("GOOGLE_API_KEY")?,
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-2.5-flash-lite".into()),
            base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            temperature: env_parse("LLM_TEMPERATURE", 0.2),
            call_timeout_secs: env_parse("LLM_CALL_TIMEOUT_SECS", 5),
        };
        let region = std::env::var("TTS_REGION").unwrap_or_else(|_| "eastus".into());
        let tts = TtsConfig {
            api_key: std::env::var("TTS_API_KEY").unwrap_or_default(),
            endpoint: non_empty_var("TTS_ENDPOINT").unwrap_or_else(|| {
                format!("https://{region}.tts.speech.microsoft.com/cognitiveservices/v1")
            }),
            audio_dir: std::env::var("AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static/audio")),
        };
        Ok(Self {
            database_url,
            jwt,
            admin,
            llm,
            tts,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
