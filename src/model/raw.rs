//! Raw packets queued between the fetcher and the engine.
//!
//! The fetcher never interprets killmails beyond checking whether RedisQ handed it one; it
//! queues the whole response body and leaves parsing to the engine. Responses that are not
//! JSON at all are still queued as failure markers so a drain reports them as skipped
//! rather than losing them silently.

use serde::{Deserialize, Serialize};

use crate::util::time::unix_now;

/// One queued upstream response.
///
/// Packets are serialized to JSON individually and pushed onto the raw queue list in the
/// store, so the `kind` tag keeps both variants distinguishable after a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawPacket {
    /// A RedisQ response carrying a killmail package.
    Package {
        /// Wall-clock time the response was received (unix seconds).
        received_at: i64,
        /// The full response document, `{"package": {...}}`.
        body: serde_json::Value,
    },
    /// A response that could not be decoded as JSON.
    Failed {
        /// Wall-clock time the response was received (unix seconds).
        received_at: i64,
        /// The raw response body, kept for diagnostics.
        body: String,
    },
}

impl RawPacket {
    /// Wraps a decoded RedisQ response received now.
    pub fn package(body: serde_json::Value) -> Self {
        Self::Package {
            received_at: unix_now(),
            body,
        }
    }

    /// Records an undecodable response received now.
    pub fn failed(body: impl Into<String>) -> Self {
        Self::Failed {
            received_at: unix_now(),
            body: body.into(),
        }
    }

    /// Wall-clock time the packet was received.
    pub fn received_at(&self) -> i64 {
        match self {
            Self::Package { received_at, .. } | Self::Failed { received_at, .. } => *received_at,
        }
    }
}
