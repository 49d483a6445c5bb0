use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallRequest {
    #[serde(default)]
    pub message: String,
    pub voice: Option<String>,
    pub speed: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallResponse {
    pub text: String,
    pub audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_used: Option<String>,
}

impl CallResponse {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            audio: None,
            voice_used: None,
            speed_used: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CleanAudioResponse {
    pub status: &'static str,
    pub message: String,
    pub deleted: usize,
}
