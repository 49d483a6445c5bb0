use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::{SpeechRate, SpeechSynthesizer};
use crate::config::TtsConfig;

const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";
const USER_AGENT: &str = "persona-chat";

/// Neural TTS over the Azure Speech REST endpoint.
pub struct AzureSpeech {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AzureSpeech {
    pub fn new(cfg: &TtsConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
        })
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Voice ids look like `en-US-JennyNeural`; the first two segments are the locale.
fn voice_locale(voice: &str) -> &str {
    match voice.match_indices('-').nth(1) {
        Some((idx, _)) => &voice[..idx],
        None => "en-US",
    }
}

fn ssml(text: &str, voice: &str, rate: SpeechRate) -> String {
    format!(
        "<speak version='1.0' xml:lang='{lang}'><voice name='{voice}'>\
         <prosody rate='{rate}'>{text}</prosody></voice></speak>",
        lang = escape_xml(voice_locale(voice)),
        voice = escape_xml(voice),
        rate = rate.as_prosody(),
        text = escape_xml(text),
    )
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeech {
    async fn synthesize(&self, text: &str, voice: &str, rate: SpeechRate) -> anyhow::Result<Bytes> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .body(ssml(text, voice, rate))
            .send()
            .await
            .context("tts request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("tts returned {}: {}", status, body);
        }
        let audio = resp.bytes().await.context("tts body")?;
        debug!(voice, bytes = audio.len(), "speech synthesized");
        Ok(audio)
    }
}
