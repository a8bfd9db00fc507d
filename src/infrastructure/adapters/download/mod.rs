//! Download Adapter - HTTP 音频下载实现

mod http_audio_source;

pub use http_audio_source::{HttpAudioSource, HttpAudioSourceConfig};
