//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::RetryPolicy;
use crate::domain::Language;
use crate::infrastructure::adapters::ForvoClientConfig;
use crate::infrastructure::media::DEFAULT_PROFILE;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 发音服务配置
    #[serde(default)]
    pub provider: ProviderConfig,

    /// 重试配置
    #[serde(default)]
    pub retry: RetryConfig,

    /// 媒体目录配置
    #[serde(default)]
    pub media: MediaConfig,

    /// 按语言配置的冠词表，键为 ISO 639-1 代码
    #[serde(default)]
    pub articles: HashMap<String, Vec<String>>,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 指定语言的冠词表，未配置时为空
    pub fn articles_for(&self, lang: &Language) -> Vec<String> {
        self.articles.get(lang.as_str()).cloned().unwrap_or_default()
    }
}

/// 发音服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key，启动时必须提供
    #[serde(default)]
    pub api_key: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,

    /// 优先选择 ogg 录音
    #[serde(default)]
    pub prefer_ogg: bool,
}

fn default_base_url() -> String {
    "https://apifree.forvo.com".to_string()
}

fn default_provider_timeout() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_provider_timeout(),
            prefer_ogg: false,
        }
    }
}

impl ProviderConfig {
    /// 转换为客户端配置
    pub fn client_config(&self, api_key: &str) -> ForvoClientConfig {
        ForvoClientConfig {
            prefer_ogg: self.prefer_ogg,
            ..ForvoClientConfig::new(api_key)
                .with_base_url(&self.base_url)
                .with_timeout(self.timeout_secs)
        }
    }
}

/// 重试配置
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// 每个候选词的最大尝试次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// 基础等待时间（毫秒），第 n 次失败后等待 n 倍
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    6
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

/// 媒体目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Anki 用户配置名
    #[serde(default = "default_profile")]
    pub profile: String,

    /// 显式指定的音频目录，设置后忽略 profile
    #[serde(default)]
    pub audio_dir: Option<PathBuf>,
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            audio_dir: None,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
