//! Fake Audio Source - 始终返回固定音频字节的下载源

use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{AudioDownload, AudioSourceError, AudioSourcePort};

/// Fake Audio Source
pub struct FakeAudioSource {
    /// 固定返回的音频数据，None 表示下载失败
    audio_data: Option<Vec<u8>>,
    content_type: Option<String>,
    opens: AtomicUsize,
}

impl FakeAudioSource {
    pub fn new(audio_data: Vec<u8>, content_type: Option<&str>) -> Self {
        Self {
            audio_data: Some(audio_data),
            content_type: content_type.map(str::to_string),
            opens: AtomicUsize::new(0),
        }
    }

    /// 每次下载都返回服务端错误
    pub fn failing() -> Self {
        Self {
            audio_data: None,
            content_type: None,
            opens: AtomicUsize::new(0),
        }
    }

    /// 已发起的下载次数
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioSourcePort for FakeAudioSource {
    async fn open(&self, url: &str) -> Result<AudioDownload, AudioSourceError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(url = %url, "FakeAudioSource: returning fixed audio");

        match &self.audio_data {
            Some(data) => Ok(AudioDownload {
                content_type: self.content_type.clone(),
                body: Box::pin(Cursor::new(data.clone())),
            }),
            None => Err(AudioSourceError::ServiceError("HTTP 503".to_string())),
        }
    }
}
