//! forvo-enrich - 为 Anki 导出文件批量添加 Forvo 发音
//!
//! 读取 `(id, front, back)` 记录，下载发音到 Anki 媒体目录，
//! 并写出带 `[sound:...]` 标记的 `<stem>_pronunciations.<ext>`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use forvo_enrich::application::{ApplicationError, EnrichmentService, PronunciationResolver};
use forvo_enrich::config::{load_config_from_path, print_config, AppConfig};
use forvo_enrich::domain::Language;
use forvo_enrich::infrastructure::adapters::{ForvoClient, HttpAudioSource, FileAudioStore};
use forvo_enrich::infrastructure::{anki_media_dir, open_deck, output_path, DeckWriter};

#[derive(Parser)]
#[command(
    name = "forvo-enrich",
    version,
    about = "Add Forvo pronunciations to an Anki export"
)]
struct Cli {
    /// Anki export with id, front and back columns (tab-separated, or comma for .csv)
    file: PathBuf,
    /// ISO 639-1 language code of the front field
    lang: String,
    /// Comma-separated articles to strip, replacing the configured list for this language
    #[arg(long, value_delimiter = ',')]
    articles: Option<Vec<String>>,
    /// Anki profile whose collection.media receives the audio
    #[arg(long)]
    profile: Option<String>,
    /// Forvo API key
    #[arg(long)]
    api_key: Option<String>,
    /// Audio directory, overrides the profile's collection.media
    #[arg(long)]
    audio_dir: Option<PathBuf>,
    /// Config file (defaults to forvo-enrich.toml in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Prefer ogg recordings over mp3
    #[arg(long)]
    prefer_ogg: bool,
}

impl Cli {
    /// 命令行参数覆盖配置
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(api_key) = &self.api_key {
            config.provider.api_key = Some(api_key.clone());
        }
        if let Some(profile) = &self.profile {
            config.media.profile = profile.clone();
        }
        if let Some(audio_dir) = &self.audio_dir {
            config.media.audio_dir = Some(audio_dir.clone());
        }
        if self.prefer_ogg {
            config.provider.prefer_ogg = true;
        }
    }

    fn articles_override(&self) -> Option<Vec<String>> {
        self.articles.as_ref().map(|articles| {
            articles
                .iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect()
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：命令行 > 环境变量 > 配置文件 > 默认值）
    let mut config = load_config_from_path(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    cli.apply_overrides(&mut config);

    // 初始化日志
    let log_filter = format!("warn,forvo_enrich={}", config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    print_config(&config);

    let language =
        Language::new(&cli.lang).map_err(|e| ApplicationError::configuration(e.to_string()))?;

    let api_key = config
        .provider
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ApplicationError::configuration(
                "Forvo API key is missing. Use --api-key or FORVO_ENRICH_PROVIDER__API_KEY",
            )
        })?;

    let audio_dir = match &config.media.audio_dir {
        Some(dir) => dir.clone(),
        None => anki_media_dir(&config.media.profile).ok_or_else(|| {
            ApplicationError::configuration("Cannot determine the application data directory")
        })?,
    };
    let store = FileAudioStore::new(&audio_dir).map_err(|e| {
        ApplicationError::configuration(format!("{}. Is the Anki profile name correct?", e))
    })?;

    let articles = cli
        .articles_override()
        .unwrap_or_else(|| config.articles_for(&language));

    // 组装适配器
    let provider = Arc::new(ForvoClient::new(config.provider.client_config(&api_key))?);
    let source = Arc::new(HttpAudioSource::with_default_config()?);
    let resolver =
        PronunciationResolver::new(provider, Arc::new(store), source, config.retry.policy());
    let service = EnrichmentService::new(resolver, language, articles);

    let reader = open_deck(&cli.file)?;
    let output = output_path(&cli.file);
    let mut writer = DeckWriter::create(&output)?;

    tracing::info!(
        input = %cli.file.display(),
        output = %output.display(),
        audio_dir = %audio_dir.display(),
        "Enriching deck"
    );

    service.run(reader, &mut writer).await?;

    tracing::info!(output = %output.display(), "Done");
    Ok(())
}
