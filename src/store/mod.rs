//! Shared key-value store and raw packet queue.
//!
//! The engine and the fetcher only talk to storage through the [`KeyValueStore`] and
//! [`PacketQueue`] traits. [`valkey::ValkeyStore`] is the production backend shared by
//! every process; [`memory::MemoryStore`] backs tests and single-process runs.
//!
//! All keys live under a configurable prefix, see [`StoreKeys`].

mod lua;
pub mod memory;
pub mod valkey;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::{error::Error, model::raw::RawPacket};

pub use memory::MemoryStore;
pub use valkey::ValkeyStore;

/// Keyed string storage with optional expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Writes a value, expiring after `ttl_secs` when given.
    async fn set(&self, key: &str, value: &str, ttl_secs: Option<i64>) -> Result<(), Error>;

    /// Writes a value only if the key is absent, returning whether it was written.
    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: i64) -> Result<bool, Error>;

    /// Removes a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), Error>;
}

/// FIFO queue of raw packets.
#[async_trait]
pub trait PacketQueue: Send + Sync {
    /// Appends a packet to the queue.
    async fn push(&self, queue: &str, packet: &RawPacket) -> Result<(), Error>;

    /// Removes and returns every queued packet in push order.
    async fn drain(&self, queue: &str) -> Result<Vec<RawPacket>, Error>;
}

/// Store key names under one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    /// Persisted battle collection.
    pub battles: String,
    /// Last rendered report.
    pub report: String,
    /// Raw packet queue.
    pub raw: String,
    /// Engine run lock.
    pub process_lock: String,
    /// Fetcher run lock.
    pub fetch_lock: String,
}

impl StoreKeys {
    /// Builds the key names for `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self {
            battles: format!("{}:battles", prefix),
            report: format!("{}:report", prefix),
            raw: format!("{}:raw", prefix),
            process_lock: format!("{}:lock:process", prefix),
            fetch_lock: format!("{}:lock:fetch", prefix),
        }
    }
}

/// Reads and deserializes a JSON value.
pub async fn get_json<S, T>(store: &S, key: &str) -> Result<Option<T>, Error>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serializes and writes a JSON value.
pub async fn set_json<S, T>(store: &S, key: &str, value: &T, ttl_secs: Option<i64>) -> Result<(), Error>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw, ttl_secs).await
}

/// Takes the advisory lock at `key` for `ttl_secs`.
///
/// The expiry only guards against a crashed holder; holders release the lock with
/// [`release_lock`] when they finish.
pub async fn acquire_lock<S>(store: &S, key: &str, ttl_secs: i64) -> Result<bool, Error>
where
    S: KeyValueStore + ?Sized,
{
    let token = crate::util::time::unix_now().to_string();
    store.set_if_absent(key, &token, ttl_secs).await
}

/// Releases the advisory lock at `key`.
pub async fn release_lock<S>(store: &S, key: &str) -> Result<(), Error>
where
    S: KeyValueStore + ?Sized,
{
    store.delete(key).await
}
