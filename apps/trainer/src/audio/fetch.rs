//! Resolve an audio reference to a playable local file.
//!
//! Remote clips are downloaded once into the cache directory, keyed by the
//! SHA-256 of their URL. Anything else is treated as a local path.

use super::AudioError;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode, Url};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DEFAULT_EXTENSION: &str = "mp3";
const PARTIAL_SUFFIX: &str = ".part";

pub struct ClipFetcher {
    client: Client,
    cache_dir: PathBuf,
    user_agent: String,
}

impl ClipFetcher {
    /// Downloads interrupted by an earlier run are removed from `cache_dir`.
    pub fn new(cache_dir: PathBuf, user_agent: String) -> Self {
        remove_partial_downloads(&cache_dir);
        Self {
            client: Client::new(),
            cache_dir,
            user_agent,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub async fn resolve(&self, audio_ref: &str) -> Result<PathBuf, AudioError> {
        if is_remote(audio_ref) {
            return self.download(audio_ref).await;
        }

        let path = PathBuf::from(audio_ref);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            Ok(path)
        } else {
            Err(AudioError::Missing(audio_ref.to_string()))
        }
    }

    /// Where the clip for `url` is cached.
    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", url_digest(url), clip_extension(url)))
    }

    async fn download(&self, url: &str) -> Result<PathBuf, AudioError> {
        let target = self.cache_path(url);
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            tracing::debug!("Cache hit for {}", url);
            return Ok(target);
        }

        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| AudioError::Network(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            return Err(AudioError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AudioError::Network(e.to_string()))?;

        let temp = self
            .cache_dir
            .join(format!(".{}{}", Uuid::new_v4(), PARTIAL_SUFFIX));
        tokio::fs::write(&temp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&temp, &target).await {
            tokio::fs::remove_file(&temp).await.ok();
            return Err(e.into());
        }

        tracing::debug!("Cached {} ({} bytes)", url, bytes.len());
        Ok(target)
    }
}

fn remove_partial_downloads(cache_dir: &Path) {
    let entries = match std::fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !(name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => tracing::debug!("Removed partial download {}", name),
            Err(e) => tracing::warn!("Cannot remove partial download {}: {}", name, e),
        }
    }
}

fn is_remote(audio_ref: &str) -> bool {
    audio_ref.starts_with("http://") || audio_ref.starts_with("https://")
}

fn url_digest(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extension of the last path segment, when it looks like one.
fn clip_extension(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .and_then(|name| {
            Path::new(&name)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase)
        })
        .filter(|ext| !ext.is_empty() && ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
