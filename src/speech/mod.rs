//! Text-to-speech for the voice-call endpoints.

use async_trait::async_trait;
use bytes::Bytes;

pub mod audio_store;
mod azure;
pub mod services;

pub use audio_store::AudioStore;
pub use azure::AzureSpeech;

/// Speaking rate accepted by the call endpoints. Unknown keys fall back to `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechRate {
    Slow,
    Normal,
    Fast,
}

impl SpeechRate {
    pub fn from_key(key: &str) -> Self {
        match key {
            "slow" => Self::Slow,
            "fast" => Self::Fast,
            _ => Self::Normal,
        }
    }

    /// Relative rate in the form expected by SSML `<prosody rate>`.
    pub fn as_prosody(self) -> &'static str {
        match self {
            Self::Slow => "-30%",
            Self::Normal => "+0%",
            Self::Fast => "+30%",
        }
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Renders `text` with the given neural voice id and returns MP3 bytes.
    async fn synthesize(&self, text: &str, voice: &str, rate: SpeechRate) -> anyhow::Result<Bytes>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_keys_map_to_prosody() {
        assert_eq!(SpeechRate::from_key("slow").as_prosody(), "-30%");
        assert_eq!(SpeechRate::from_key("normal").as_prosody(), "+0%");
        assert_eq!(SpeechRate::from_key("fast").as_prosody(), "+30%");
        assert_eq!(SpeechRate::from_key("warp"), SpeechRate::Normal);
    }
}
