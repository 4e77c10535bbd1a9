//! RedisQ polling.
//!
//! zKillboard's RedisQ hands out one killmail package per request, answering
//! `{"package": null}` once nothing is waiting. A fetch run polls up to a configured
//! number of times and queues every response for the engine without interpreting it.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use dioxus_logger::tracing;

use crate::{
    config::FetcherConfig,
    error::Error,
    model::raw::RawPacket,
    service::retry::RetryContext,
    store::{acquire_lock, release_lock, KeyValueStore, PacketQueue, StoreKeys},
};

/// What one RedisQ response turned out to be.
#[derive(Debug, Clone, PartialEq)]
enum PollResponse {
    /// A killmail package.
    Package(serde_json::Value),
    /// JSON without a package, the feed is drained for now.
    Empty,
    /// Anything that is not JSON.
    Malformed(String),
}

impl PollResponse {
    fn classify(body: String) -> Self {
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => match value.get("package") {
                Some(package) if !package.is_null() => Self::Package(value),
                _ => Self::Empty,
            },
            Err(_) => Self::Malformed(body),
        }
    }
}

/// Polls RedisQ and queues the responses.
pub struct Fetcher<S> {
    store: Arc<S>,
    http_client: reqwest::Client,
    config: FetcherConfig,
    keys: StoreKeys,
    retry: RetryContext,
}

impl<S> Fetcher<S>
where
    S: KeyValueStore + PacketQueue,
{
    /// Creates a fetcher.
    pub fn new(
        store: Arc<S>,
        http_client: reqwest::Client,
        config: FetcherConfig,
        keys: StoreKeys,
    ) -> Self {
        Self {
            store,
            http_client,
            config,
            keys,
            retry: RetryContext::new(),
        }
    }

    /// Replaces the retry policy for RedisQ requests.
    pub fn with_retry(mut self, retry: RetryContext) -> Self {
        self.retry = retry;
        self
    }

    /// Executes one fetch run.
    ///
    /// # Returns
    /// - `Ok(true)` - The run polled RedisQ at least once
    /// - `Ok(false)` - The fetcher is inactive or another run holds the fetch lock
    /// - `Err(Error)` - RedisQ kept failing or the store is unavailable; the lock is left
    ///   to expire
    pub async fn run(&self) -> Result<bool, Error> {
        if !self.config.active {
            tracing::debug!("Fetcher is inactive, skipping run");
            return Ok(false);
        }

        if !acquire_lock(&*self.store, &self.keys.fetch_lock, self.config.lock_ttl_secs).await? {
            tracing::debug!("Fetch lock is held, skipping run");
            return Ok(false);
        }

        let queued = self.poll().await?;
        release_lock(&*self.store, &self.keys.fetch_lock).await?;

        if queued > 0 {
            tracing::info!("Queued {} RedisQ packets", queued);
        }

        Ok(true)
    }

    /// Polls up to `fetch_max` times, returning the number of packets queued.
    async fn poll(&self) -> Result<usize, Error> {
        let mut queued = 0;

        for attempt in 0..self.config.fetch_max {
            if attempt > 0 {
                tokio::time::sleep(self.config.poll_delay).await;
            }

            match PollResponse::classify(self.request().await?) {
                PollResponse::Package(body) => {
                    self.store
                        .push(&self.keys.raw, &RawPacket::package(body))
                        .await?;
                    queued += 1;
                }
                PollResponse::Empty => {
                    tracing::debug!("RedisQ has no package waiting");
                    break;
                }
                PollResponse::Malformed(body) => {
                    tracing::warn!("RedisQ answered with a non-JSON body, stopping this run");
                    self.store
                        .push(&self.keys.raw, &RawPacket::failed(body))
                        .await?;
                    queued += 1;
                    break;
                }
            }
        }

        Ok(queued)
    }

    async fn request(&self) -> Result<String, Error> {
        let http_client = &self.http_client;
        let url = self.config.redisq_url.as_str();

        self.retry
            .execute_with_retry("RedisQ poll", move || async move {
                let response = http_client.get(url).send().await?.error_for_status()?;
                Ok(response.text().await?)
            })
            .await
    }
}
