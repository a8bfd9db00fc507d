//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 命令行参数（由 main 覆盖）
//! 2. 环境变量
//! 3. 配置文件（forvo-enrich.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["forvo-enrich", "forvo-enrich.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `FORVO_ENRICH_`，层级分隔符 `__`）
/// 2. 配置文件（`config_path`，为 None 时搜索 forvo-enrich.toml 与 forvo-enrich.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `FORVO_ENRICH_PROVIDER__API_KEY=xxxx`
/// - `FORVO_ENRICH_PROVIDER__PREFER_OGG=true`
/// - `FORVO_ENRICH_RETRY__MAX_ATTEMPTS=3`
/// - `FORVO_ENRICH_MEDIA__PROFILE=Study`
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("provider.base_url", "https://apifree.forvo.com")?
        .set_default("provider.timeout_secs", 30)?
        .set_default("provider.prefer_ogg", false)?
        .set_default("retry.max_attempts", 6)?
        .set_default("retry.base_delay_ms", 1000)?
        .set_default("media.profile", "User 1")?
        .set_default("log.level", "info")?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: FORVO_ENRICH_PROVIDER__API_KEY=xxxx
    builder = builder.add_source(
        Environment::with_prefix("FORVO_ENRICH")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.provider.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Provider base URL cannot be empty".to_string(),
        ));
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Provider timeout cannot be 0".to_string(),
        ));
    }

    if config.retry.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "Retry max_attempts cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 隐藏 API key，只保留末尾 4 位
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Forvo Enrich Configuration ===");
    tracing::info!("Provider URL: {}", config.provider.base_url);
    tracing::info!(
        "API Key: {}",
        config
            .provider
            .api_key
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(|| "<not set>".to_string())
    );
    tracing::info!("Provider Timeout: {}s", config.provider.timeout_secs);
    tracing::info!("Prefer OGG: {}", config.provider.prefer_ogg);
    tracing::info!(
        "Retry: {} attempts, {}ms base delay",
        config.retry.max_attempts,
        config.retry.base_delay_ms
    );
    match &config.media.audio_dir {
        Some(dir) => tracing::info!("Audio Directory: {:?}", dir),
        None => tracing::info!("Anki Profile: {}", config.media.profile),
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("==================================");
}
