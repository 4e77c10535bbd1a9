//! Services driving the clustering core.
//!
//! - [`fetcher`] polls RedisQ and queues raw packets
//! - [`engine`] drains the queue into battles and renders the report
//! - [`reference`] resolves names and metadata for the report through ESI
//! - [`retry`] provides exponential backoff for transient upstream failures

pub mod engine;
pub mod fetcher;
pub mod reference;
pub mod retry;
