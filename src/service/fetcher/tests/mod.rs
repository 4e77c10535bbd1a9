
use std::{sync::Arc, time::Duration};

use valkyrie_test_utils::TestSetup;

use crate::{
    config::FetcherConfig,
    service::{fetcher::Fetcher, retry::RetryContext},
    store::{MemoryStore, StoreKeys},
};

fn keys() -> StoreKeys {
    StoreKeys::new("test")
}

/// Fetcher polling the mock server up to `fetch_max` times without delays.
fn fetcher(test: &TestSetup, store: &Arc<MemoryStore>, fetch_max: usize) -> Fetcher<MemoryStore> {
    let config = FetcherConfig {
        redisq_url: test.redisq_url(),
        fetch_max,
        poll_delay: Duration::ZERO,
        ..FetcherConfig::default()
    };

    Fetcher::new(store.clone(), reqwest::Client::new(), config, keys())
        .with_retry(RetryContext::with_backoff(2, Duration::ZERO))
}
