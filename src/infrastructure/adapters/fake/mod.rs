//! Fake Adapters - 测试用的发音服务与下载源
//!
//! 不发起任何网络请求，并记录调用情况

mod fake_audio_source;
mod fake_provider;

pub use fake_audio_source::FakeAudioSource;
pub use fake_provider::{FakePronunciationProvider, FakeReply};
