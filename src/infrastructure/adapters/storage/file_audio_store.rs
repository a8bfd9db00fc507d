//! File Audio Store - 文件系统音频缓存实现
//!
//! 实现 AudioStorePort trait。Anki 媒体目录即缓存目录，由调用方保证已存在

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::application::ports::{AudioBody, AudioStoreError, AudioStorePort};
use crate::domain::{AudioExtension, SoundReference};

/// 写入缓冲区大小
const CHUNK_SIZE: usize = 64 * 1024;

/// 文件系统音频缓存
pub struct FileAudioStore {
    /// 缓存目录
    audio_dir: PathBuf,
}

impl FileAudioStore {
    /// 创建音频缓存
    ///
    /// 目录不存在时直接失败，不会自动创建
    pub fn new(audio_dir: impl AsRef<Path>) -> Result<Self, AudioStoreError> {
        let audio_dir = audio_dir.as_ref().to_path_buf();
        if !audio_dir.is_dir() {
            return Err(AudioStoreError::DirectoryMissing(
                audio_dir.display().to_string(),
            ));
        }
        Ok(Self { audio_dir })
    }

    /// 缓存文件路径
    pub fn audio_path(&self, filename: &str) -> PathBuf {
        self.audio_dir.join(filename)
    }

    /// 下载中的临时文件路径
    fn partial_path(&self, filename: &str) -> PathBuf {
        self.audio_dir.join(format!(".{}.part", filename))
    }

    async fn write_body(&self, path: &Path, mut body: AudioBody) -> Result<u64, AudioStoreError> {
        let mut file = fs::File::create(path)
            .await
            .map_err(|e| AudioStoreError::IoError(e.to_string()))?;

        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut written = 0u64;
        loop {
            let n = body
                .read(&mut buf)
                .await
                .map_err(|e| AudioStoreError::SourceInterrupted(e.to_string()))?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])
                .await
                .map_err(|e| AudioStoreError::IoError(e.to_string()))?;
            written += n as u64;
        }

        file.flush()
            .await
            .map_err(|e| AudioStoreError::IoError(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| AudioStoreError::IoError(e.to_string()))?;

        Ok(written)
    }
}

#[async_trait]
impl AudioStorePort for FileAudioStore {
    async fn probe_stem(&self, stem: &str, lang: &str) -> Option<SoundReference> {
        for ext in AudioExtension::PROBE_ORDER {
            let path = self.audio_path(&format!("{}.{}", stem, ext));
            if fs::try_exists(&path).await.unwrap_or(false) {
                return Some(SoundReference::from_stem(stem, ext, lang));
            }
        }
        None
    }

    async fn save(
        &self,
        stem: &str,
        ext: AudioExtension,
        lang: &str,
        body: AudioBody,
    ) -> Result<SoundReference, AudioStoreError> {
        let sound = SoundReference::from_stem(stem, ext, lang);
        let final_path = self.audio_path(sound.filename());
        let partial_path = self.partial_path(sound.filename());

        let written = match self.write_body(&partial_path, body).await {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&partial_path).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&partial_path, &final_path).await {
            let _ = fs::remove_file(&partial_path).await;
            return Err(AudioStoreError::IoError(e.to_string()));
        }

        tracing::debug!(
            path = %final_path.display(),
            size = written,
            "Saved audio"
        );

        Ok(sound)
    }
}
