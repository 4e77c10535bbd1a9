//! In-process store for tests and single-process deployments.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

use async_trait::async_trait;

use crate::{
    error::Error,
    model::raw::RawPacket,
    store::{KeyValueStore, PacketQueue},
};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Mutex-protected maps with lazy expiry.
///
/// Packets are kept serialized, like in Valkey, so both backends behave the same on
/// malformed data.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Entry>>,
    queues: Mutex<HashMap<String, VecDeque<String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, Error> {
        self.values
            .lock()
            .map_err(|_| Error::InternalError("Memory store value map poisoned".to_string()))
    }

    fn queues(&self) -> Result<MutexGuard<'_, HashMap<String, VecDeque<String>>>, Error> {
        self.queues
            .lock()
            .map_err(|_| Error::InternalError("Memory store queue map poisoned".to_string()))
    }
}

fn expiry(ttl_secs: Option<i64>) -> Option<Instant> {
    ttl_secs
        .filter(|ttl| *ttl > 0)
        .map(|ttl| Instant::now() + Duration::from_secs(ttl as u64))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut values = self.values()?;
        let now = Instant::now();

        match values.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                values.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<i64>) -> Result<(), Error> {
        self.values()?.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: expiry(ttl_secs),
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: i64) -> Result<bool, Error> {
        let mut values = self.values()?;
        let now = Instant::now();

        if values.get(key).is_some_and(|entry| entry.is_live(now)) {
            return Ok(false);
        }

        values.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: expiry(Some(ttl_secs)),
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.values()?.remove(key);
        Ok(())
    }
}

#[async_trait]
impl PacketQueue for MemoryStore {
    async fn push(&self, queue: &str, packet: &RawPacket) -> Result<(), Error> {
        let raw = serde_json::to_string(packet)?;
        self.queues()?
            .entry(queue.to_string())
            .or_default()
            .push_back(raw);
        Ok(())
    }

    async fn drain(&self, queue: &str) -> Result<Vec<RawPacket>, Error> {
        let items = self.queues()?.remove(queue).unwrap_or_default();

        let packets = items
            .iter()
            .map(|raw| serde_json::from_str(raw))
            .collect::<Result<Vec<RawPacket>, _>>()?;
        Ok(packets)
    }
}
