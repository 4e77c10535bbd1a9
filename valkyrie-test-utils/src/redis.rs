use crate::{
    constant::{TEST_KEY_SUFFIXES, TEST_VALKEY_URL},
    TestError,
};
use fred::prelude::*;

/// Valkey test setup with automatic cleanup
///
/// Holds a connection pool and a unique key prefix so tests running in parallel never
/// touch each other's keys. The store keys under the prefix are deleted when the struct
/// is dropped.
pub struct RedisTest {
    pub redis_pool: Pool,
    prefix: String,
}

impl RedisTest {
    /// Connect to the local Valkey instance and generate a unique prefix
    pub async fn new() -> Result<Self, TestError> {
        let redis_config = Config::from_url(TEST_VALKEY_URL)?;
        let redis_pool = Pool::new(redis_config, None, None, None, 5)?;
        redis_pool.init().await?;

        Ok(RedisTest {
            redis_pool,
            prefix: Self::generate_unique_prefix(),
        })
    }

    /// Unique key prefix for this test instance
    pub fn prefix(&self) -> String {
        self.prefix.clone()
    }

    /// Generate a unique prefix using timestamp and thread ID
    fn generate_unique_prefix() -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        use std::time::{SystemTime, UNIX_EPOCH};

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let mut hasher = DefaultHasher::new();
        timestamp.hash(&mut hasher);
        std::thread::current().id().hash(&mut hasher);

        format!("test:{}:{:x}", timestamp, hasher.finish())
    }
}

impl Drop for RedisTest {
    fn drop(&mut self) {
        // Spawn instead of blocking to avoid nesting runtimes
        let pool = self.redis_pool.clone();
        let keys: Vec<String> = TEST_KEY_SUFFIXES
            .iter()
            .map(|suffix| format!("{}:{}", self.prefix, suffix))
            .collect();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _: Result<(), fred::error::Error> = pool.del(keys).await;
            });
        }
    }
}
