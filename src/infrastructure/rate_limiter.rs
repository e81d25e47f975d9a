use std::time::Duration;
use tracing::debug;

/// 固定间隔限流器
///
/// 题库有未公开的频率限制，每次请求之后无条件等待固定时长
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 挂起调用方 `delay` 时长
    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        debug!("限流等待 {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}
