//! Construction of the process-wide clients.

use std::time::Duration;

use fred::prelude::{ClientLike, Config as ValkeyConfig, PerformanceConfig, Pool};

use crate::{config::Config, error::Error};

/// Connections in the Valkey pool.
const VALKEY_POOL_SIZE: usize = 6;
/// Timeout applied to every Valkey command.
const VALKEY_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout of RedisQ and ESI universe requests. RedisQ holds a poll open for up to 10
/// seconds when nothing is waiting.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the ESI client used for corporation and alliance lookups
pub fn build_esi_client(config: &Config) -> Result<eve_esi::Client, Error> {
    let esi_config = eve_esi::Config::builder().esi_url(&config.esi_url).build()?;

    let esi_client = eve_esi::Client::builder()
        .config(esi_config)
        .user_agent(&config.user_agent)
        .build()?;

    Ok(esi_client)
}

/// Build the HTTP client used for RedisQ polls and ESI universe lookups
pub fn build_http_client(config: &Config) -> Result<reqwest::Client, Error> {
    let http_client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(HTTP_TIMEOUT)
        .build()?;

    Ok(http_client)
}

/// Connect to Valkey
pub async fn connect_to_valkey(config: &Config) -> Result<Pool, Error> {
    let valkey_config = ValkeyConfig::from_url(&config.valkey_url)?;
    let performance = PerformanceConfig {
        default_command_timeout: VALKEY_COMMAND_TIMEOUT,
        ..Default::default()
    };
    let pool = Pool::new(valkey_config, Some(performance), None, None, VALKEY_POOL_SIZE)?;

    pool.connect();
    pool.wait_for_connect().await?;

    Ok(pool)
}
