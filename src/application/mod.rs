//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（PronunciationProvider、AudioStore、AudioSource、RecordSink）
//! - services: 重试、下载、解析编排、批量处理
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;

pub use ports::{
    // Audio source
    AudioDownload,
    AudioSourceError,
    AudioSourcePort,
    // Audio store
    AudioBody,
    AudioStoreError,
    AudioStorePort,
    // Deck
    DeckError,
    RecordSink,
    // Pronunciation provider
    Pronunciation,
    PronunciationProviderPort,
    ProviderError,
    ProviderResult,
};

pub use services::{
    with_retry, AudioFetcher, EnrichmentService, EnrichmentSummary, FetchError,
    PronunciationResolver, Resolution, ResolveError, RetryPolicy, RetryState,
};
