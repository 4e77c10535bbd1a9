
use std::time::Duration;

use valkyrie_test_utils::prelude::*;

use crate::service::{reference::EsiResolver, retry::RetryContext};

/// Resolver pointed at the mock server, retrying twice without backoff.
fn resolver(test: &TestSetup) -> EsiResolver {
    EsiResolver::new(
        test.esi_client.clone(),
        reqwest::Client::new(),
        &test.esi_url(),
    )
    .with_retry(RetryContext::with_backoff(2, Duration::ZERO))
}
