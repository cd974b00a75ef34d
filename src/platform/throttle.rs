// ABOUTME: Request throttling strategies for the delivery client.
// ABOUTME: A fixed blocking delay satisfies the platform rate ceiling under sequential execution.

use async_trait::async_trait;
use std::time::Duration;

/// Pause inserted before every outbound request.
///
/// The platform allows roughly 4 requests per second; a fixed pre-request
/// delay respects that as long as requests stay sequential, which the
/// orchestrator guarantees. Injectable so tests run with zero delay.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn pause(&self);
}

/// Fixed delay before each request. The production default.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No delay at all, for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Throttle for NoDelay {
    async fn pause(&self) {}
}
