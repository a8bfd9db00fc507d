//! Audio Store Port - 发音音频缓存目录
//!
//! 文件系统本身即缓存：`<audio_dir>/<candidate>_<lang>.<ext>` 存在即命中，不维护额外索引

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::domain::{file_stem, AudioExtension, SoundReference};

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStoreError {
    /// 写入磁盘失败
    #[error("IO error: {0}")]
    IoError(String),

    /// 缓存目录不存在
    #[error("Audio directory does not exist: {0}")]
    DirectoryMissing(String),

    /// 读取下载流时中断
    #[error("Download interrupted: {0}")]
    SourceInterrupted(String),
}

/// 待写入的音频字节流
pub type AudioBody = Pin<Box<dyn AsyncRead + Send>>;

/// Audio Store Port
#[async_trait]
pub trait AudioStorePort: Send + Sync {
    /// 按文件名主干探测缓存，依次检查 ogg、mp3
    ///
    /// 只读操作；无法访问的文件视为不存在
    async fn probe_stem(&self, stem: &str, lang: &str) -> Option<SoundReference>;

    /// 按候选词探测缓存
    async fn probe(&self, candidate: &str, lang: &str) -> Option<SoundReference> {
        self.probe_stem(&file_stem(candidate, lang), lang).await
    }

    /// 将字节流完整写入 `<stem>.<ext>`
    ///
    /// 返回时文件已完整落盘
    async fn save(
        &self,
        stem: &str,
        ext: AudioExtension,
        lang: &str,
        body: AudioBody,
    ) -> Result<SoundReference, AudioStoreError>;
}
