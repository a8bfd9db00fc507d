//! Fake Pronunciation Provider - 按预设应答的发音服务

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::application::ports::{
    Pronunciation, PronunciationProviderPort, ProviderError, ProviderResult,
};

/// 预设应答
#[derive(Debug, Clone)]
pub enum FakeReply {
    Found(Vec<Pronunciation>),
    NotFound,
    QuotaExhausted,
    /// 每次调用都返回 Transient
    Transient,
}

impl FakeReply {
    /// 只有一条录音的结果
    pub fn found(audio_url: impl Into<String>) -> Self {
        Self::Found(vec![Pronunciation {
            audio_url: audio_url.into(),
            rating: 0,
            contributor: "fake".to_string(),
            country: None,
            votes: 0,
        }])
    }
}

/// Fake Pronunciation Provider
///
/// 未设置应答的词返回 NotFound；记录所有查询过的词
#[derive(Default)]
pub struct FakePronunciationProvider {
    replies: HashMap<String, FakeReply>,
    calls: Mutex<Vec<String>>,
}

impl FakePronunciationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, word: impl Into<String>, reply: FakeReply) -> Self {
        self.replies.insert(word.into(), reply);
        self
    }

    /// 按顺序返回所有查询过的词
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    pub fn calls_for(&self, word: &str) -> usize {
        self.calls().iter().filter(|w| *w == word).count()
    }
}

#[async_trait]
impl PronunciationProviderPort for FakePronunciationProvider {
    async fn query(&self, word: &str, lang: &str) -> Result<ProviderResult, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(word.to_string());

        tracing::debug!(word = %word, lang = %lang, "FakePronunciationProvider: returning preset reply");

        match self.replies.get(word) {
            Some(FakeReply::Found(items)) if !items.is_empty() => {
                Ok(ProviderResult::new(items.clone()))
            }
            Some(FakeReply::QuotaExhausted) => Err(ProviderError::QuotaExhausted),
            Some(FakeReply::Transient) => {
                Err(ProviderError::Transient("HTTP 503 Service Unavailable".to_string()))
            }
            _ => Err(ProviderError::NotFound(word.to_string())),
        }
    }
}
