//! 应用层错误定义
//!
//! 只有会终止整个批次的错误才会出现在这里；单个词的失败在编排层被转换为未命中记录

use thiserror::Error;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 发音服务当日配额耗尽
    #[error("Daily pronunciation quota exhausted. Please try again tomorrow or use a different API key")]
    QuotaExhausted,

    /// 导出文件读写错误
    #[error("Deck error: {0}")]
    DeckError(String),

    /// 配置错误（启动阶段）
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ApplicationError {
    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError(message.into())
    }
}

impl From<crate::application::ports::DeckError> for ApplicationError {
    fn from(err: crate::application::ports::DeckError) -> Self {
        Self::DeckError(err.to_string())
    }
}
