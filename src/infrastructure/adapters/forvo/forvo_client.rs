//! Forvo Client - 调用 Forvo 发音 API
//!
//! 实现 PronunciationProviderPort trait
//!
//! Forvo API:
//! GET https://apifree.forvo.com/key/{key}/format/json/action/word-pronunciations/word/{word}/language/{lang}
//! Response: {"attributes": {...}, "items": [{"pathmp3": "...", "pathogg": "...", "rate": 0, ...}]}
//! 配额耗尽: HTTP 400, body `["Limit\/day reached."]`

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{
    Pronunciation, PronunciationProviderPort, ProviderError, ProviderResult,
};

/// Forvo 配额耗尽时返回的消息
const QUOTA_MESSAGE: &str = "Limit/day reached.";

/// 错误响应体在日志中保留的最大长度
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct ForvoResponse {
    #[serde(default)]
    items: Vec<ForvoItem>,
}

#[derive(Debug, Deserialize)]
struct ForvoItem {
    #[serde(default)]
    username: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    pathmp3: Option<String>,
    #[serde(default)]
    pathogg: Option<String>,
    #[serde(default)]
    rate: i64,
    #[serde(default)]
    num_votes: u32,
}

impl ForvoItem {
    fn audio_url(&self, prefer_ogg: bool) -> Option<String> {
        let non_empty = |s: &Option<String>| s.as_ref().filter(|s| !s.is_empty()).cloned();
        if prefer_ogg {
            non_empty(&self.pathogg).or_else(|| non_empty(&self.pathmp3))
        } else {
            non_empty(&self.pathmp3).or_else(|| non_empty(&self.pathogg))
        }
    }
}

/// Forvo 客户端配置
#[derive(Debug, Clone)]
pub struct ForvoClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 优先选择 ogg 录音
    pub prefer_ogg: bool,
}

impl Default for ForvoClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://apifree.forvo.com".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            prefer_ogg: false,
        }
    }
}

impl ForvoClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Forvo 客户端
pub struct ForvoClient {
    client: Client,
    config: ForvoClientConfig,
}

impl ForvoClient {
    /// 创建新的 Forvo 客户端
    pub fn new(config: ForvoClientConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transient(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 查询 URL，单词和语言作为路径段编码
    fn lookup_url(&self, word: &str, lang: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ProviderError::Transient(format!("Invalid provider URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Transient("Provider URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([
                "key",
                self.config.api_key.as_str(),
                "format",
                "json",
                "action",
                "word-pronunciations",
                "word",
                word,
                "language",
                lang,
            ]);
        Ok(url)
    }
}

/// 是否为配额耗尽消息：只包含一条 `Limit/day reached.` 的 JSON 数组
fn is_quota_message(body: &str) -> bool {
    serde_json::from_str::<Vec<String>>(body)
        .map(|messages| messages.len() == 1 && messages[0].trim() == QUOTA_MESSAGE)
        .unwrap_or(false)
}

/// 将非 2xx 响应归类
fn classify_failure(status: StatusCode, body: &str, word: &str) -> ProviderError {
    if status == StatusCode::NOT_FOUND {
        return ProviderError::NotFound(word.to_string());
    }
    if status.is_client_error() && is_quota_message(body) {
        return ProviderError::QuotaExhausted;
    }
    let body: String = body.chars().take(MAX_ERROR_BODY).collect();
    ProviderError::Transient(format!("HTTP {}: {}", status, body))
}

/// 解析 2xx 响应体
fn parse_success(body: &str, word: &str, prefer_ogg: bool) -> Result<ProviderResult, ProviderError> {
    if is_quota_message(body) {
        return Err(ProviderError::QuotaExhausted);
    }

    let response: ForvoResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Transient(format!("Malformed response: {}", e)))?;

    let items: Vec<Pronunciation> = response
        .items
        .into_iter()
        .filter_map(|item| {
            let audio_url = item.audio_url(prefer_ogg)?;
            Some(Pronunciation {
                audio_url,
                rating: item.rate,
                contributor: item.username,
                country: item.country,
                votes: item.num_votes,
            })
        })
        .collect();

    if items.is_empty() {
        return Err(ProviderError::NotFound(word.to_string()));
    }

    Ok(ProviderResult::new(items))
}

#[async_trait]
impl PronunciationProviderPort for ForvoClient {
    async fn query(&self, word: &str, lang: &str) -> Result<ProviderResult, ProviderError> {
        let url = self.lookup_url(word, lang)?;

        // URL 中包含 API key，不写入日志
        tracing::debug!(word = %word, lang = %lang, "Sending Forvo lookup");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Transient("Request timeout".to_string())
            } else if e.is_connect() {
                ProviderError::Transient(format!("Cannot connect to Forvo: {}", e.without_url()))
            } else {
                ProviderError::Transient(e.without_url().to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transient(format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body, word));
        }

        let result = parse_success(&body, word, self.config.prefer_ogg)?;

        tracing::debug!(
            word = %word,
            lang = %lang,
            count = result.items.len(),
            "Forvo lookup completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::Router;

    const ROUTE: &str = "/key/:key/format/json/action/word-pronunciations/word/:word/language/:lang";

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn stub_lookup(
        Path((key, word, lang)): Path<(String, String, String)>,
    ) -> (AxumStatus, String) {
        if key != "secret" {
            return (AxumStatus::BAD_REQUEST, r#"["Invalid key."]"#.to_string());
        }
        match (word.as_str(), lang.as_str()) {
            ("el gato", "es") => (
                AxumStatus::OK,
                r#"{"attributes":{"total":2},"items":[
                    {"username":"ana","country":"Spain","pathmp3":"https://audio.example/low.mp3","pathogg":"https://audio.example/low.ogg","rate":1,"num_votes":1},
                    {"username":"luis","country":"Mexico","pathmp3":"https://audio.example/high.mp3","pathogg":"https://audio.example/high.ogg","rate":4,"num_votes":6}
                ]}"#
                .to_string(),
            ),
            ("vacío", "es") => (AxumStatus::OK, r#"{"attributes":{"total":0},"items":[]}"#.to_string()),
            ("límite", "es") => (AxumStatus::BAD_REQUEST, r#"["Limit\/day reached."]"#.to_string()),
            ("roto", "es") => (AxumStatus::BAD_GATEWAY, "upstream down".to_string()),
            _ => (AxumStatus::NOT_FOUND, String::new()),
        }
    }

    async fn client(prefer_ogg: bool) -> ForvoClient {
        let base_url = spawn_stub(Router::new().route(ROUTE, get(stub_lookup))).await;
        let mut config = ForvoClientConfig::new("secret").with_base_url(base_url);
        config.prefer_ogg = prefer_ogg;
        ForvoClient::new(config).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = ForvoClientConfig::default();
        assert_eq!(config.base_url, "https://apifree.forvo.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.prefer_ogg);
    }

    #[test]
    fn test_lookup_url_encodes_word() {
        let client = ForvoClient::new(ForvoClientConfig::new("k")).unwrap();
        let url = client.lookup_url("el gato/perro", "es").unwrap();
        assert_eq!(
            url.as_str(),
            "https://apifree.forvo.com/key/k/format/json/action/word-pronunciations/word/el%20gato%2Fperro/language/es"
        );
    }

    #[test]
    fn test_quota_message_detection() {
        assert!(is_quota_message(r#"["Limit\/day reached."]"#));
        assert!(is_quota_message(r#"["Limit/day reached."]"#));
        assert!(!is_quota_message(r#"["Limit/day reached.", "other"]"#));
        assert!(!is_quota_message(r#"{"items":[]}"#));
    }

    #[test]
    fn test_classify_failure() {
        assert_eq!(
            classify_failure(StatusCode::NOT_FOUND, "", "xyzzy"),
            ProviderError::NotFound("xyzzy".into())
        );
        assert_eq!(
            classify_failure(StatusCode::BAD_REQUEST, r#"["Limit\/day reached."]"#, "w"),
            ProviderError::QuotaExhausted
        );
        assert!(classify_failure(StatusCode::BAD_REQUEST, r#"["Invalid key."]"#, "w").is_retryable());
        assert!(classify_failure(StatusCode::TOO_MANY_REQUESTS, "", "w").is_retryable());
        assert!(classify_failure(StatusCode::SERVICE_UNAVAILABLE, "", "w").is_retryable());
    }

    #[test]
    fn test_parse_success_skips_items_without_audio() {
        let body = r#"{"items":[{"username":"a","rate":9},{"username":"b","pathmp3":"https://x/b.mp3","rate":1}]}"#;
        let result = parse_success(body, "w", false).unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.best().unwrap().contributor, "b");
    }

    #[test]
    fn test_parse_success_quota_body_is_quota_exhausted() {
        assert_eq!(
            parse_success(r#"["Limit/day reached."]"#, "w", false).unwrap_err(),
            ProviderError::QuotaExhausted
        );
        assert_eq!(
            parse_success(r#"["Limit\/day reached."]"#, "w", false).unwrap_err(),
            ProviderError::QuotaExhausted
        );
    }

    #[test]
    fn test_parse_success_malformed_is_transient() {
        assert!(parse_success("<html>", "w", false).unwrap_err().is_retryable());
    }

    #[tokio::test]
    async fn test_query_returns_ranked_items() {
        let client = client(false).await;

        let result = client.query("el gato", "es").await.unwrap();

        assert_eq!(result.items.len(), 2);
        let best = result.best().unwrap();
        assert_eq!(best.audio_url, "https://audio.example/high.mp3");
        assert_eq!(best.contributor, "luis");
        assert_eq!(best.votes, 6);
    }

    #[tokio::test]
    async fn test_query_prefers_ogg_when_configured() {
        let client = client(true).await;

        let result = client.query("el gato", "es").await.unwrap();

        assert_eq!(result.best().unwrap().audio_url, "https://audio.example/high.ogg");
    }

    #[tokio::test]
    async fn test_query_failure_taxonomy() {
        let client = client(false).await;

        assert_eq!(
            client.query("nada", "es").await.unwrap_err(),
            ProviderError::NotFound("nada".into())
        );
        assert_eq!(
            client.query("vacío", "es").await.unwrap_err(),
            ProviderError::NotFound("vacío".into())
        );
        assert_eq!(
            client.query("límite", "es").await.unwrap_err(),
            ProviderError::QuotaExhausted
        );
        assert!(client.query("roto", "es").await.unwrap_err().is_retryable());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transient() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = ForvoClientConfig::new("secret")
            .with_base_url(format!("http://{}", addr))
            .with_timeout(2);
        let client = ForvoClient::new(config).unwrap();

        assert!(client.query("gato", "es").await.unwrap_err().is_retryable());
    }
}
