//! Data models shared between the clustering core and the services.
//!
//! This module contains the parsed killmail representation consumed by battles, the raw
//! packet format queued between the fetcher and the engine, and the serializable report
//! structures written for the front-end.

pub mod killmail;
pub mod raw;
pub mod report;
