use std::time::Duration;

use tracing::{info, warn};

use super::{AudioStore, SpeechRate, SpeechSynthesizer};

/// One synthesis job for a call profile.
pub struct SpeechJob<'a> {
    pub text: &'a str,
    pub voice: &'a str,
    pub rate: SpeechRate,
    /// Audio sub-folder and file prefix.
    pub folder: &'a str,
    /// Files older than this are swept first; `None` sweeps the whole folder.
    pub retention: Option<Duration>,
    pub timeout: Duration,
}

/// Sweeps old audio, synthesizes, stores the MP3 and returns its URL.
/// Every failure is logged and yields `None`; the caller answers without audio.
pub async fn generate_speech(
    tts: &dyn SpeechSynthesizer,
    store: &AudioStore,
    job: SpeechJob<'_>,
) -> Option<String> {
    if job.text.trim().is_empty() {
        warn!("empty text for speech");
        return None;
    }

    if let Err(e) = store.sweep(job.folder, job.retention).await {
        warn!(error = %e, folder = job.folder, "audio sweep failed");
    }

    let audio = match tokio::time::timeout(job.timeout, tts.synthesize(job.text, job.voice, job.rate)).await {
        Ok(Ok(a)) => a,
        Ok(Err(e)) => {
            warn!(error = %e, voice = job.voice, "speech synthesis failed");
            return None;
        }
        Err(_) => {
            warn!(timeout_secs = job.timeout.as_secs(), "speech synthesis timed out");
            return None;
        }
    };

    match store.save(job.folder, job.folder, audio).await {
        Ok(url) => {
            info!(%url, voice = job.voice, rate = job.rate.as_prosody(), "speech ready");
            Some(url)
        }
        Err(e) => {
            warn!(error = %e, "audio save failed");
            None
        }
    }
}
