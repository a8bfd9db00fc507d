//! HTTP Audio Source - 流式下载发音音频
//!
//! 实现 AudioSourcePort trait，响应体以 AsyncRead 形式交给存储层逐块写入

use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tokio_util::io::StreamReader;

use crate::application::ports::{AudioDownload, AudioSourceError, AudioSourcePort};

/// HTTP 下载配置
#[derive(Debug, Clone)]
pub struct HttpAudioSourceConfig {
    /// 请求超时时间（秒），包含读取响应体
    pub timeout_secs: u64,
}

impl Default for HttpAudioSourceConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

/// HTTP 音频下载源
pub struct HttpAudioSource {
    client: Client,
}

impl HttpAudioSource {
    pub fn new(config: HttpAudioSourceConfig) -> Result<Self, AudioSourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AudioSourceError::NetworkError(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn with_default_config() -> Result<Self, AudioSourceError> {
        Self::new(HttpAudioSourceConfig::default())
    }
}

#[async_trait]
impl AudioSourcePort for HttpAudioSource {
    async fn open(&self, url: &str) -> Result<AudioDownload, AudioSourceError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AudioSourceError::Timeout
            } else {
                AudioSourceError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AudioSourceError::ServiceError(format!("HTTP {}", status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let stream = response.bytes_stream().map_err(std::io::Error::other);

        Ok(AudioDownload {
            content_type,
            body: Box::pin(StreamReader::new(stream)),
        })
    }
}
