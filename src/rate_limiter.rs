use std::time::Duration;
use tracing::debug;

/// The kinds of upstream calls that get their own pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallClass {
    /// Before resubmitting a continuation token; the upstream may not have activated it yet.
    SearchPage,
    /// After each per-item details lookup.
    Details,
    /// Before each per-item photo lookup.
    Photo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub page_token_delay: Duration,
    pub details_delay: Duration,
    pub photo_delay: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            page_token_delay: Duration::from_secs(3),
            details_delay: Duration::from_millis(500),
            photo_delay: Duration::ZERO,
        }
    }
}

impl Limits {
    /// No pacing at all.
    pub fn none() -> Self {
        Self {
            page_token_delay: Duration::ZERO,
            details_delay: Duration::ZERO,
            photo_delay: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, class: CallClass) -> Duration {
        match class {
            CallClass::SearchPage => self.page_token_delay,
            CallClass::Details => self.details_delay,
            CallClass::Photo => self.photo_delay,
        }
    }
}

/// Sequential pacing policy consulted by the source clients before or after each call class.
#[derive(Clone, Debug, Default)]
pub struct RateLimiter {
    limits: Limits,
}

impl RateLimiter {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Wait out the configured delay for `class`. Zero delays return immediately.
    pub async fn acquire(&self, class: CallClass) {
        let delay = self.limits.delay_for(class);
        if delay.is_zero() {
            return;
        }
        debug!("Pacing {:?} call for {:?}", class, delay);
        tokio::time::sleep(delay).await;
    }
}
