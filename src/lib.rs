//! forvo-enrich - 为 Anki 卡片批量添加 Forvo 发音
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 语言代码、卡片记录、发音引用、词形展开
//!
//! 应用层 (application/):
//! - Ports: 端口定义（PronunciationProvider, AudioStore, AudioSource, RecordSink）
//! - Services: 重试、下载、发音解析、批量处理
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Forvo Client, HTTP 下载, 文件缓存, Fake 实现
//! - Deck: 导出文件读写
//! - Media: Anki 媒体目录定位

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
