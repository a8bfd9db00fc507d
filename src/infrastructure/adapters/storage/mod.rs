//! Storage Adapter - 文件系统音频缓存实现

mod file_audio_store;

pub use file_audio_store::FileAudioStore;
