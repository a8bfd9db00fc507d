//! 批量处理导出记录
//!
//! 严格顺序处理：一次只解析一个词；配额耗尽时停止后续所有记录，已写出的记录会被刷新

use crate::application::error::ApplicationError;
use crate::application::ports::{DeckError, RecordSink};
use crate::domain::{strip_html, Language, Record};

use super::resolver::{PronunciationResolver, Resolution, ResolveError};

/// 批次统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    /// 已处理记录数（含跳过的）
    pub processed: usize,
    /// 成功添加发音的记录数
    pub enriched: usize,
    /// 已带有发音而跳过的记录数
    pub skipped: usize,
    /// 未找到发音的词
    pub missed: Vec<String>,
    /// 是否因配额耗尽而中止
    pub aborted: bool,
}

impl EnrichmentSummary {
    /// 输出最终统计
    pub fn log(&self) {
        tracing::info!(
            processed = self.processed,
            enriched = self.enriched,
            skipped = self.skipped,
            missed = self.missed.len(),
            "Processed {} words.",
            self.processed
        );
        if !self.missed.is_empty() {
            tracing::info!(
                "{} words could not be found in Forvo:\n{}",
                self.missed.len(),
                self.missed.join("\n")
            );
        }
    }
}

/// 批量处理服务
pub struct EnrichmentService {
    resolver: PronunciationResolver,
    language: Language,
    articles: Vec<String>,
}

impl EnrichmentService {
    pub fn new(resolver: PronunciationResolver, language: Language, articles: Vec<String>) -> Self {
        Self {
            resolver,
            language,
            articles,
        }
    }

    /// 处理所有记录并写入 `sink`
    ///
    /// 无论正常结束、配额耗尽还是读写出错，都会刷新 `sink` 并输出统计
    pub async fn run<I, S>(
        &self,
        records: I,
        sink: &mut S,
    ) -> Result<EnrichmentSummary, ApplicationError>
    where
        I: IntoIterator<Item = Result<Record, DeckError>>,
        S: RecordSink + ?Sized,
    {
        let mut summary = EnrichmentSummary::default();
        let outcome = self.process(records, sink, &mut summary).await;

        match outcome {
            Ok(()) => {
                sink.finish()?;
                summary.log();
                Ok(summary)
            }
            Err(error) => {
                if let Err(flush_error) = sink.finish() {
                    tracing::error!(error = %flush_error, "Failed to flush output");
                }
                summary.log();
                match &error {
                    ApplicationError::QuotaExhausted => tracing::error!(
                        "Daily Forvo API limit reached. Remaining records were not processed"
                    ),
                    other => tracing::error!(error = %other, "Run stopped early"),
                }
                Err(error)
            }
        }
    }

    async fn process<I, S>(
        &self,
        records: I,
        sink: &mut S,
        summary: &mut EnrichmentSummary,
    ) -> Result<(), ApplicationError>
    where
        I: IntoIterator<Item = Result<Record, DeckError>>,
        S: RecordSink + ?Sized,
    {
        for record in records {
            let record = record?;

            if record.has_sound() {
                tracing::debug!(id = %record.id, "Card already has audio, skipping");
                summary.processed += 1;
                summary.skipped += 1;
                sink.write_record(&record)?;
                continue;
            }

            let word = strip_html(&record.front);
            if word.is_empty() {
                tracing::debug!(id = %record.id, "Front has no text, skipping");
                summary.processed += 1;
                summary.skipped += 1;
                sink.write_record(&record)?;
                continue;
            }

            tracing::info!("---{}---", word);

            match self.resolver.resolve(&word, &self.language, &self.articles).await {
                Ok(Resolution::Found(sound)) => {
                    summary.enriched += 1;
                    sink.write_record(&record.with_sound(&sound))?;
                }
                Ok(Resolution::NotFound) | Ok(Resolution::Failed(_)) => {
                    summary.missed.push(record.front.clone());
                    sink.write_record(&record)?;
                }
                Err(ResolveError::QuotaExhausted) => {
                    // 当前记录未完成，不写出也不计入
                    summary.aborted = true;
                    return Err(ApplicationError::QuotaExhausted);
                }
            }
            summary.processed += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::retry::RetryPolicy;
    use crate::infrastructure::adapters::{
        FakeAudioSource, FakePronunciationProvider, FakeReply, FileAudioStore,
    };
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    #[derive(Default)]
    struct VecSink {
        records: Vec<Record>,
        finished: bool,
    }

    impl RecordSink for VecSink {
        fn write_record(&mut self, record: &Record) -> Result<(), DeckError> {
            self.records.push(record.clone());
            Ok(())
        }

        fn finish(&mut self) -> Result<(), DeckError> {
            self.finished = true;
            Ok(())
        }
    }

    fn service(
        provider: Arc<FakePronunciationProvider>,
        articles: &[&str],
    ) -> (TempDir, EnrichmentService) {
        let dir = tempdir().unwrap();
        let store = Arc::new(FileAudioStore::new(dir.path()).unwrap());
        let source = Arc::new(FakeAudioSource::new(b"ID3".to_vec(), Some("audio/mpeg")));
        let resolver = PronunciationResolver::new(provider, store, source, RetryPolicy::default());
        let service = EnrichmentService::new(
            resolver,
            Language::new("en").unwrap(),
            articles.iter().map(|a| a.to_string()).collect(),
        );
        (dir, service)
    }

    fn rows(fronts: &[&str]) -> Vec<Result<Record, DeckError>> {
        fronts
            .iter()
            .enumerate()
            .map(|(i, f)| Ok(Record::new(format!("g{}", i + 1), *f, "back")))
            .collect()
    }

    #[tokio::test]
    async fn test_end_to_end_article_stripped() {
        let provider = Arc::new(
            FakePronunciationProvider::new()
                .with_reply("cat", FakeReply::found("https://audio.example/cat.mp3")),
        );
        let (dir, service) = service(provider, &["the"]);
        let mut sink = VecSink::default();

        let summary = service
            .run(vec![Ok(Record::new("g1", "the cat", "el gato"))], &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.records[0].front, "the cat[sound:cat_en.mp3]");
        assert_eq!(sink.records[0].back, "el gato");
        assert!(dir.path().join("cat_en.mp3").exists());
        assert_eq!(summary.enriched, 1);
        assert!(sink.finished);
    }

    #[tokio::test]
    async fn test_end_to_end_cached_word() {
        let provider = Arc::new(FakePronunciationProvider::new());
        let (dir, service) = service(provider.clone(), &[]);
        std::fs::write(dir.path().join("hello_en.ogg"), b"cached").unwrap();
        let mut sink = VecSink::default();

        service.run(rows(&["hello!"]), &mut sink).await.unwrap();

        assert_eq!(sink.records[0].front, "hello![sound:hello_en.ogg]");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missed_word_left_unchanged() {
        let provider = Arc::new(FakePronunciationProvider::new());
        let (_dir, service) = service(provider, &[]);
        let mut sink = VecSink::default();

        let summary = service.run(rows(&["xyzzy"]), &mut sink).await.unwrap();

        assert_eq!(sink.records[0].front, "xyzzy");
        assert_eq!(summary.missed, vec!["xyzzy".to_string()]);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.enriched, 0);
    }

    #[tokio::test]
    async fn test_quota_stops_remaining_words() {
        let provider = Arc::new(
            FakePronunciationProvider::new()
                .with_reply("one", FakeReply::found("https://audio.example/one.mp3"))
                .with_reply("two", FakeReply::QuotaExhausted)
                .with_reply("three", FakeReply::found("https://audio.example/three.mp3"))
                .with_reply("four", FakeReply::found("https://audio.example/four.mp3"))
                .with_reply("five", FakeReply::found("https://audio.example/five.mp3")),
        );
        let (_dir, service) = service(provider.clone(), &[]);
        let mut sink = VecSink::default();

        let err = service
            .run(rows(&["one", "two", "three", "four", "five"]), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::QuotaExhausted));
        assert_eq!(provider.calls(), vec!["one", "two"]);
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].front, "one[sound:one_en.mp3]");
        assert!(sink.finished);
    }

    #[tokio::test]
    async fn test_cards_with_sound_are_skipped() {
        let provider = Arc::new(FakePronunciationProvider::new());
        let (_dir, service) = service(provider.clone(), &[]);
        let mut sink = VecSink::default();

        let summary = service
            .run(rows(&["perro[sound:perro_es.mp3]"]), &mut sink)
            .await
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert!(summary.missed.is_empty());
        assert_eq!(provider.call_count(), 0);
        assert_eq!(sink.records[0].front, "perro[sound:perro_es.mp3]");
    }

    #[tokio::test]
    async fn test_html_is_stripped_before_lookup() {
        let provider = Arc::new(
            FakePronunciationProvider::new()
                .with_reply("dog", FakeReply::found("https://audio.example/dog.mp3")),
        );
        let (_dir, service) = service(provider.clone(), &[]);
        let mut sink = VecSink::default();

        service.run(rows(&["<b>dog</b>"]), &mut sink).await.unwrap();

        assert_eq!(provider.calls(), vec!["dog"]);
        assert_eq!(sink.records[0].front, "<b>dog</b>[sound:dog_en.mp3]");
    }

    #[tokio::test]
    async fn test_front_without_text_is_not_looked_up() {
        let provider = Arc::new(FakePronunciationProvider::new());
        let (_dir, service) = service(provider.clone(), &[]);
        let mut sink = VecSink::default();

        let summary = service
            .run(rows(&["<img src=\"x.png\">", "&nbsp;<br>"]), &mut sink)
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 0);
        assert_eq!(summary.skipped, 2);
        assert!(summary.missed.is_empty());
        assert_eq!(sink.records[0].front, "<img src=\"x.png\">");
        assert_eq!(sink.records.len(), 2);
    }

    #[tokio::test]
    async fn test_deck_error_flushes_processed_rows() {
        let provider = Arc::new(FakePronunciationProvider::new());
        let (_dir, service) = service(provider, &[]);
        let mut sink = VecSink::default();
        let records = vec![
            Ok(Record::new("g1", "xyzzy", "back")),
            Err(DeckError::Malformed {
                line: 3,
                message: "invalid UTF-8".into(),
            }),
            Ok(Record::new("g3", "never", "back")),
        ];

        let err = service.run(records, &mut sink).await.unwrap_err();

        assert!(matches!(err, ApplicationError::DeckError(_)));
        assert_eq!(sink.records.len(), 1);
        assert!(sink.finished);
    }
}
