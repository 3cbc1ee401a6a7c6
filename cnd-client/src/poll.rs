use crate::{swap::SwapResource, Client, Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Source of swap resources for [`poll_until`].
#[async_trait]
pub trait FetchSwap: Send + Sync {
    async fn fetch_swap(&self, url: &Url) -> Result<SwapResource>;
}

#[async_trait]
impl FetchSwap for Client {
    async fn fetch_swap(&self, url: &Url) -> Result<SwapResource> {
        self.swap(url).await
    }
}

/// Fetch the swap at `url` until its state is exactly `expected`.
///
/// The returned resource is the one that matched, so its actions belong to
/// that state. A swap that moves through `expected` and beyond between two
/// fetches is never observed in it and the poll times out; cnd does not
/// expose an ordering of states to detect this.
///
/// Fetch errors end the poll immediately. Overall the poll takes at most
/// `timeout` plus the time spent in fetches.
pub async fn poll_until<S>(
    source: &S,
    url: &Url,
    expected: &str,
    config: PollConfig,
) -> Result<SwapResource>
where
    S: FetchSwap + ?Sized,
{
    let deadline = Instant::now() + config.timeout;
    let mut last_seen: Option<String> = None;

    loop {
        let swap = source.fetch_swap(url).await?;

        if last_seen.as_deref() != Some(swap.state.as_str()) {
            tracing::info!("swap {} is in state {}", url, swap.state);
            last_seen = Some(swap.state.clone());
        }

        if swap.state == expected {
            return Ok(swap);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::PollTimeout {
                url: url.to_string(),
                expected: expected.to_owned(),
                last_seen: swap.state,
                timeout_ms: config.timeout.as_millis(),
            });
        }

        tokio::time::sleep(config.interval.min(deadline - now)).await;
    }
}
