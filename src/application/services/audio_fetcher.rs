//! 音频下载

use std::sync::Arc;
use thiserror::Error;

use crate::application::ports::{AudioSourcePort, AudioStoreError, AudioStorePort};
use crate::domain::{AudioExtension, SoundReference};

/// 下载失败
///
/// `Download` 只影响当前候选词；`Storage` 使整个词失败，且不重试
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<AudioStoreError> for FetchError {
    fn from(err: AudioStoreError) -> Self {
        match err {
            AudioStoreError::SourceInterrupted(msg) => Self::Download(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}

/// 音频下载器
///
/// 下载前再次探测缓存，命中则不发起请求
pub struct AudioFetcher {
    source: Arc<dyn AudioSourcePort>,
    store: Arc<dyn AudioStorePort>,
}

impl AudioFetcher {
    pub fn new(source: Arc<dyn AudioSourcePort>, store: Arc<dyn AudioStorePort>) -> Self {
        Self { source, store }
    }

    /// 下载 `audio_url` 到 `<audio_dir>/<stem>.<ext>`
    pub async fn fetch(
        &self,
        audio_url: &str,
        stem: &str,
        lang: &str,
    ) -> Result<SoundReference, FetchError> {
        if let Some(existing) = self.store.probe_stem(stem, lang).await {
            tracing::debug!(file = %existing.filename(), "Audio already cached, skipping download");
            return Ok(existing);
        }

        let download = self
            .source
            .open(audio_url)
            .await
            .map_err(|e| FetchError::Download(e.to_string()))?;

        let ext = AudioExtension::infer(download.content_type.as_deref(), audio_url);

        tracing::info!(
            url = %audio_url,
            content_type = ?download.content_type,
            file = %format!("{}.{}", stem, ext),
            "Downloading audio"
        );

        let sound = self.store.save(stem, ext, lang, download.body).await?;
        Ok(sound)
    }
}
