//! 发音解析编排
//!
//! 状态流转: Start -> TryCandidate(i) -> {Found, NextCandidate, Exhausted}
//!
//! 1. 展开候选词
//! 2. 依次探测所有候选词的缓存，命中即返回（不发起任何网络请求）
//! 3. 依次查询候选词（带重试），第一个可用的录音被下载后返回
//! 4. 配额耗尽时终止整个批次
//! 5. 全部候选词失败则返回 NotFound

use std::sync::Arc;
use thiserror::Error;

use super::audio_fetcher::{AudioFetcher, FetchError};
use super::retry::{with_retry, RetryPolicy};
use crate::application::ports::{
    AudioSourcePort, AudioStorePort, PronunciationProviderPort, ProviderError,
};
use crate::domain::{expand, file_stem, Language, SoundReference};

/// 单个词的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 找到（或已缓存）的音频
    Found(SoundReference),
    /// 所有候选词都没有可用录音
    NotFound,
    /// 写入磁盘失败，当前词放弃
    Failed(String),
}

impl Resolution {
    pub fn sound(&self) -> Option<&SoundReference> {
        match self {
            Self::Found(sound) => Some(sound),
            _ => None,
        }
    }
}

/// 终止整个批次的错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Daily pronunciation quota exhausted")]
    QuotaExhausted,
}

/// 发音解析器
pub struct PronunciationResolver {
    provider: Arc<dyn PronunciationProviderPort>,
    store: Arc<dyn AudioStorePort>,
    fetcher: AudioFetcher,
    retry: RetryPolicy,
}

impl PronunciationResolver {
    pub fn new(
        provider: Arc<dyn PronunciationProviderPort>,
        store: Arc<dyn AudioStorePort>,
        source: Arc<dyn AudioSourcePort>,
        retry: RetryPolicy,
    ) -> Self {
        let fetcher = AudioFetcher::new(source, store.clone());
        Self {
            provider,
            store,
            fetcher,
            retry,
        }
    }

    /// 解析一个词的发音
    pub async fn resolve(
        &self,
        word: &str,
        lang: &Language,
        articles: &[String],
    ) -> Result<Resolution, ResolveError> {
        let lang = lang.as_str();
        let candidates = expand(word, articles);

        tracing::info!(word = %word, candidates = ?candidates, "Resolving pronunciation");

        for candidate in &candidates {
            if let Some(sound) = self.store.probe(candidate, lang).await {
                tracing::info!(
                    candidate = %candidate,
                    file = %sound.filename(),
                    "Using existing audio file"
                );
                return Ok(Resolution::Found(sound));
            }
        }

        for candidate in &candidates {
            let lookup = with_retry(&self.retry, candidate, move |state| {
                tracing::debug!(
                    candidate = %candidate,
                    attempt = state.attempt,
                    "Looking for pronunciations"
                );
                self.provider.query(candidate, lang)
            })
            .await;

            let result = match lookup {
                Ok(result) => result,
                Err(ProviderError::NotFound(_)) => {
                    tracing::info!(candidate = %candidate, "No pronunciation for candidate");
                    continue;
                }
                Err(ProviderError::QuotaExhausted) => {
                    tracing::error!(candidate = %candidate, "Daily request limit reached");
                    return Err(ResolveError::QuotaExhausted);
                }
                Err(ProviderError::Transient(error)) => {
                    tracing::warn!(
                        candidate = %candidate,
                        error = %error,
                        "Lookup failed after retries, trying next candidate"
                    );
                    continue;
                }
            };

            let Some(best) = result.best() else {
                continue;
            };

            tracing::info!(
                candidate = %candidate,
                url = %best.audio_url,
                rating = best.rating,
                contributor = %best.contributor,
                "Found audio URL"
            );

            let stem = file_stem(candidate, lang);
            match self.fetcher.fetch(&best.audio_url, &stem, lang).await {
                Ok(sound) => return Ok(Resolution::Found(sound)),
                Err(FetchError::Download(error)) => {
                    tracing::warn!(
                        candidate = %candidate,
                        error = %error,
                        "Audio download failed, trying next candidate"
                    );
                }
                Err(FetchError::Storage(error)) => {
                    tracing::error!(word = %word, error = %error, "Cannot write audio file");
                    return Ok(Resolution::Failed(error));
                }
            }
        }

        tracing::info!(word = %word, "Can't find pronunciation");
        Ok(Resolution::NotFound)
    }
}
