use std::{
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::Context;
use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

/// URL prefix under which `root` is served.
pub const PUBLIC_PREFIX: &str = "/static/audio";

/// Generated MP3 files, one sub-folder per call profile.
#[derive(Debug, Clone)]
pub struct AudioStore {
    root: PathBuf,
}

impl AudioStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn folder(&self, folder: &str) -> PathBuf {
        self.root.join(folder)
    }

    /// Writes `audio` as `<folder>/<prefix>_<uuid>.mp3` and returns its public URL.
    pub async fn save(&self, folder: &str, prefix: &str, audio: Bytes) -> anyhow::Result<String> {
        anyhow::ensure!(!audio.is_empty(), "empty audio");
        let dir = self.folder(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create {}", dir.display()))?;

        let filename = format!("{}_{}.mp3", prefix, Uuid::new_v4().simple());
        let path = dir.join(&filename);
        tokio::fs::write(&path, &audio)
            .await
            .with_context(|| format!("write {}", path.display()))?;

        debug!(path = %path.display(), bytes = audio.len(), "audio saved");
        Ok(format!("{}/{}/{}", PUBLIC_PREFIX, folder, filename))
    }

    /// Deletes MP3 files in `folder` last modified more than `max_age` ago; `None` deletes all.
    /// A missing folder counts as empty. Per-file failures are logged and skipped.
    pub async fn sweep(&self, folder: &str, max_age: Option<Duration>) -> anyhow::Result<usize> {
        let dir = self.folder(folder);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e).with_context(|| format!("read {}", dir.display())),
        };

        let now = SystemTime::now();
        let mut deleted = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mp3") {
                continue;
            }
            if let Some(max_age) = max_age {
                let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                    Ok(t) => t,
                    Err(e) => {
                        warn!(error = %e, path = %path.display(), "audio mtime unreadable");
                        continue;
                    }
                };
                if now.duration_since(modified).unwrap_or_default() <= max_age {
                    continue;
                }
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => deleted += 1,
                Err(e) => warn!(error = %e, path = %path.display(), "audio delete failed"),
            }
        }

        if deleted > 0 {
            debug!(folder, deleted, "audio swept");
        }
        Ok(deleted)
    }

    pub async fn clean_all(&self, folder: &str) -> anyhow::Result<usize> {
        self.sweep(folder, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_writes_file_and_returns_public_url() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AudioStore::new(tmp.path());

        let url = store
            .save("doctor", "doctor", Bytes::from_static(b"ID3"))
            .await
            .unwrap();
        assert!(url.starts_with("/static/audio/doctor/doctor_"));
        assert!(url.ends_with(".mp3"));

        let filename = url.rsplit('/').next().unwrap();
        let on_disk = std::fs::read(tmp.path().join("doctor").join(filename)).unwrap();
        assert_eq!(on_disk, b"ID3");
    }

    #[tokio::test]
    async fn save_rejects_empty_audio() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AudioStore::new(tmp.path());
        assert!(store.save("english", "english", Bytes::new()).await.is_err());
    }

    #[tokio::test]
    async fn sweep_keeps_fresh_files_and_ignores_other_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AudioStore::new(tmp.path());
        store
            .save("lawyer", "lawyer", Bytes::from_static(b"a"))
            .await
            .unwrap();
        std::fs::write(tmp.path().join("lawyer").join("notes.txt"), b"keep").unwrap();

        let deleted = store
            .sweep("lawyer", Some(Duration::from_secs(12 * 3600)))
            .await
            .unwrap();
        assert_eq!(deleted, 0);

        let deleted = store.clean_all("lawyer").await.unwrap();
        assert_eq!(deleted, 1);
        assert!(tmp.path().join("lawyer").join("notes.txt").exists());
    }

    #[tokio::test]
    async fn sweep_of_missing_folder_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AudioStore::new(tmp.path());
        assert_eq!(store.clean_all("nobody").await.unwrap(), 0);
    }
}
