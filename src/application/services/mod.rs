//! Application Services - 用例编排

pub mod audio_fetcher;
pub mod enrichment;
pub mod resolver;
pub mod retry;

pub use audio_fetcher::{AudioFetcher, FetchError};
pub use enrichment::{EnrichmentService, EnrichmentSummary};
pub use resolver::{PronunciationResolver, Resolution, ResolveError};
pub use retry::{with_retry, RetryPolicy, RetryState};
