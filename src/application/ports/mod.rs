//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_source;
mod audio_store;
mod deck;
mod pronunciation_provider;

pub use audio_source::{AudioDownload, AudioSourceError, AudioSourcePort};
pub use audio_store::{AudioBody, AudioStoreError, AudioStorePort};
pub use deck::{DeckError, RecordSink};
pub use pronunciation_provider::{
    Pronunciation, PronunciationProviderPort, ProviderError, ProviderResult,
};
