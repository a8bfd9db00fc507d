//! 重试控制
//!
//! 线性退避：第 n 次失败后等待 `base_delay * n`，默认 1s, 2s, 3s, 4s, 5s，共 6 次尝试

use std::future::Future;
use std::time::Duration;

use crate::application::ports::ProviderError;

/// 默认最大尝试次数（1 次初始 + 5 次重试）
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// 默认退避基数
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// 重试策略
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大尝试次数（含首次）
    pub max_attempts: u32,
    /// 退避基数
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// 第 `attempt` 次尝试失败后的等待时间
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// 单次调用的重试状态，调用结束即丢弃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// 已发起的尝试次数
    pub attempt: u32,
    pub max_attempts: u32,
}

impl RetryState {
    fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    fn exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

/// 带退避地执行一次发音查询
///
/// 只有 `ProviderError::Transient` 会被重试；`NotFound` 和 `QuotaExhausted` 立即返回。
/// 尝试次数用尽后返回最后一次的 Transient 错误。
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut(RetryState) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut state = RetryState::new(policy.max_attempts);

    loop {
        state.attempt += 1;

        match operation(state).await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && !state.exhausted() => {
                let delay = policy.delay_for(state.attempt);
                tracing::warn!(
                    word = %label,
                    attempt = state.attempt,
                    max_attempts = state.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Lookup failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                if error.is_retryable() {
                    tracing::error!(
                        word = %label,
                        attempts = state.attempt,
                        error = %error,
                        "Lookup failed, giving up"
                    );
                }
                return Err(error);
            }
        }
    }
}
