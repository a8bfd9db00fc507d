//! Pronunciation Provider Port - 发音查询服务抽象
//!
//! 定义远程发音服务的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 发音查询错误
///
/// - `NotFound`: 确定不存在，不重试
/// - `QuotaExhausted`: 当日配额耗尽，终止整个批次
/// - `Transient`: 网络/服务端错误，可重试
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("No pronunciation found for '{0}'")]
    NotFound(String),

    #[error("Daily request limit of the pronunciation provider reached")]
    QuotaExhausted,

    #[error("Transient provider error: {0}")]
    Transient(String),
}

impl ProviderError {
    /// 是否值得重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// 单条发音录音
#[derive(Debug, Clone, PartialEq)]
pub struct Pronunciation {
    /// 音频直链
    pub audio_url: String,
    /// 评分，越高越好
    pub rating: i64,
    /// 贡献者用户名
    pub contributor: String,
    /// 贡献者所在国家
    pub country: Option<String>,
    /// 投票数
    pub votes: u32,
}

/// 一次查询 (candidate + language) 的结果
#[derive(Debug, Clone, Default)]
pub struct ProviderResult {
    /// 按服务方返回顺序排列
    pub items: Vec<Pronunciation>,
}

impl ProviderResult {
    pub fn new(items: Vec<Pronunciation>) -> Self {
        Self { items }
    }

    /// 评分最高的录音，同分时保留服务方顺序中靠前的一条
    pub fn best(&self) -> Option<&Pronunciation> {
        self.items.iter().fold(None, |best, item| match best {
            Some(b) if b.rating >= item.rating => Some(b),
            _ => Some(item),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pronunciation Provider Port
///
/// 每次调用对应一次 HTTPS 请求，重试由调用方负责
#[async_trait]
pub trait PronunciationProviderPort: Send + Sync {
    /// 查询某个候选词在指定语言下的录音
    ///
    /// 空结果集必须以 `ProviderError::NotFound` 返回
    async fn query(&self, word: &str, lang: &str) -> Result<ProviderResult, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str, rating: i64) -> Pronunciation {
        Pronunciation {
            audio_url: url.to_string(),
            rating,
            contributor: "someone".to_string(),
            country: None,
            votes: 0,
        }
    }

    #[test]
    fn test_best_picks_highest_rating() {
        let result = ProviderResult::new(vec![item("a", 1), item("b", 5), item("c", 3)]);
        assert_eq!(result.best().unwrap().audio_url, "b");
    }

    #[test]
    fn test_best_keeps_provider_order_on_ties() {
        let result = ProviderResult::new(vec![item("a", 0), item("b", 2), item("c", 2)]);
        assert_eq!(result.best().unwrap().audio_url, "b");
    }

    #[test]
    fn test_best_of_empty_result() {
        assert!(ProviderResult::default().best().is_none());
    }

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(ProviderError::Transient("503".into()).is_retryable());
        assert!(!ProviderError::NotFound("x".into()).is_retryable());
        assert!(!ProviderError::QuotaExhausted.is_retryable());
    }
}
