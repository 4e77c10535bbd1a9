//! Shared test helpers for the valkyrie crate.
//!
//! Provides killmail fixture builders producing RedisQ-shaped JSON, a mockito-backed
//! [`TestSetup`] with an ESI client pointed at the mock server, and a [`RedisTest`] helper
//! handing out unique key prefixes on a local Valkey instance.

pub mod constant;
pub mod error;
pub mod fixtures;
pub mod redis;
pub mod setup;

pub use error::TestError;
pub use redis::RedisTest;
pub use setup::TestSetup;

pub mod prelude {
    pub use crate::{fixtures::killmail::KillmailFixture, RedisTest, TestError, TestSetup};
}
