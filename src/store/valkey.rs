//! Valkey-backed store shared between processes.

use async_trait::async_trait;
use fred::{
    prelude::*,
    types::{Expiration, SetOptions},
};

use crate::{
    error::Error,
    model::raw::RawPacket,
    store::{lua::DRAIN_QUEUE_SCRIPT, KeyValueStore, PacketQueue},
};

/// Store backed by a fred connection pool.
#[derive(Clone)]
pub struct ValkeyStore {
    pool: Pool,
}

impl ValkeyStore {
    /// Wraps an initialized pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for ValkeyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let value: Option<String> = self.pool.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<i64>) -> Result<(), Error> {
        let expiration = ttl_secs.filter(|ttl| *ttl > 0).map(Expiration::EX);
        let _: () = self.pool.set(key, value, expiration, None, false).await?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: i64) -> Result<bool, Error> {
        // SET NX replies nil when the key already exists
        let reply: Option<String> = self
            .pool
            .set(
                key,
                value,
                Some(Expiration::EX(ttl_secs)),
                Some(SetOptions::NX),
                false,
            )
            .await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let _: i64 = self.pool.del(key).await?;
        Ok(())
    }
}

#[async_trait]
impl PacketQueue for ValkeyStore {
    async fn push(&self, queue: &str, packet: &RawPacket) -> Result<(), Error> {
        let raw = serde_json::to_string(packet)?;
        let _: i64 = self.pool.rpush(queue, raw).await?;
        Ok(())
    }

    async fn drain(&self, queue: &str) -> Result<Vec<RawPacket>, Error> {
        let items: Vec<String> = self
            .pool
            .eval(DRAIN_QUEUE_SCRIPT, vec![queue], Vec::<String>::new())
            .await?;

        let packets = items
            .iter()
            .map(|raw| serde_json::from_str(raw))
            .collect::<Result<Vec<RawPacket>, _>>()?;
        Ok(packets)
    }
}
