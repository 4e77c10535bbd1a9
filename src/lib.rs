//! Battle detection for EVE Online killmail streams.
//!
//! Valkyrie pulls killmails from zKillboard's RedisQ feed into a queue held in Valkey,
//! then periodically drains that queue and folds every killmail into a set of
//! in-progress battles. Each battle is an incrementally built cluster of sides
//! (characters, corporations and alliances fighting together) bound to one location in
//! one solar system. Battles with exactly two sufficiently large sides are rendered into
//! a JSON report alongside reference data resolved from ESI.
//!
//! The clustering core lives in [`battle`] and [`model`] and is entirely synchronous;
//! everything that touches the network or the shared store lives in [`service`],
//! [`store`] and [`scheduler`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod battle;
pub mod config;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod store;
pub mod util;
