//! Audio Source Port - 远程音频下载

use async_trait::async_trait;
use thiserror::Error;

use super::audio_store::AudioBody;

/// 下载错误
#[derive(Debug, Error)]
pub enum AudioSourceError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),
}

/// 已建立的下载
pub struct AudioDownload {
    /// 响应声明的媒体类型
    pub content_type: Option<String>,
    /// 响应体字节流
    pub body: AudioBody,
}

impl std::fmt::Debug for AudioDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDownload")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Audio Source Port
#[async_trait]
pub trait AudioSourcePort: Send + Sync {
    /// 发起下载，成功时返回尚未读取的响应体
    async fn open(&self, url: &str) -> Result<AudioDownload, AudioSourceError>;
}
