//! Error types for Valkyrie.
//!
//! This module provides the crate-wide [`Error`] type along with specialized error types for
//! configuration and reference-data lookups. All errors use `thiserror` for `Display` and
//! `Error` implementations, and library errors convert automatically through `#[from]` so
//! the `?` operator works across store, HTTP and scheduler boundaries.

pub mod config;
pub mod reference;
pub mod retry;

use thiserror::Error;

use crate::error::{config::ConfigError, reference::ReferenceError};

/// Main error type for Valkyrie.
///
/// Aggregates domain-specific error types and external library errors into a single type.
/// The engine surfaces store failures as hard failures of a run, while the resolver and
/// fetcher consult [`Error::to_retry_strategy`] to decide whether an error is transient.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Reference data errors (unexpected ESI payloads)
/// - Store errors (Valkey connection or command failures)
/// - HTTP errors (ESI and RedisQ requests)
/// - Serialization errors (persisted battles, queued packets, reports)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Reference data lookup returned something we could not use.
    #[error(transparent)]
    ReferenceError(#[from] ReferenceError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in Valkyrie's code.
    ///
    /// This error should never occur in normal operation and indicates a programming error
    /// that needs to be reported as a GitHub issue.
    #[error("Internal error with Valkyrie's code, please open a GitHub issue as this indicates a bug: {0:?}")]
    InternalError(String),
    /// ESI client error (API requests, rate limiting).
    #[error(transparent)]
    EsiError(#[from] eve_esi::Error),
    /// HTTP client error for requests made outside of the ESI client.
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// Valkey error (connection, command execution, script evaluation).
    #[error(transparent)]
    RedisError(#[from] fred::error::Error),
    /// JSON serialization error for stored battles, queued packets or reports.
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}
