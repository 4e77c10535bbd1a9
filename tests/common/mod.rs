//! Helpers shared by integration tests.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use valkyrie::{
    config::FetcherConfig,
    error::{reference::ReferenceError, Error},
    service::{
        fetcher::Fetcher,
        reference::{ItemGroup, ItemType, ReferenceResolver, SolarSystem, Star},
        retry::RetryContext,
    },
    store::{KeyValueStore, PacketQueue, StoreKeys},
};
use valkyrie_test_utils::fixtures::killmail::KillmailFixture;

pub const SYSTEM_ID: i64 = 30000142;
pub const LOCATION_ID: i64 = 40009082;
pub const STAR_ID: i64 = 40009077;
pub const ATTACKER_SHIP_ID: i64 = 17738;
pub const VICTIM_SHIP_ID: i64 = 587;
pub const WEAPON_ID: i64 = 2929;

/// Killmail at the test location happening now.
pub fn recent(kill_id: i64) -> KillmailFixture {
    KillmailFixture::new(kill_id)
        .system(SYSTEM_ID)
        .location(LOCATION_ID)
        .victim_ship(VICTIM_SHIP_ID)
        .time(&Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Two killmails forming a battle with two sides of three members.
///
/// Side 0: characters 1, 5, 6 of corporation 100 and alliance 1000.
/// Side 1: characters 2, 3, 4 of corporation 200 and alliance 2000.
pub fn major_battle() -> [KillmailFixture; 2] {
    [
        recent(1)
            .victim(1, 100, Some(1000))
            .attacker(2, 200, Some(2000), ATTACKER_SHIP_ID, WEAPON_ID, 100.0)
            .attacker(3, 200, Some(2000), ATTACKER_SHIP_ID, WEAPON_ID, 100.0)
            .attacker(4, 200, Some(2000), ATTACKER_SHIP_ID, WEAPON_ID, 100.0),
        recent(2)
            .victim(2, 200, Some(2000))
            .attacker(1, 100, Some(1000), ATTACKER_SHIP_ID, WEAPON_ID, 100.0)
            .attacker(5, 100, Some(1000), ATTACKER_SHIP_ID, WEAPON_ID, 100.0)
            .attacker(6, 100, Some(1000), ATTACKER_SHIP_ID, WEAPON_ID, 100.0),
    ]
}

/// Fetcher polling `redisq_url` up to `fetch_max` times without delays or backoff.
pub fn fetcher<S>(store: &Arc<S>, keys: &StoreKeys, redisq_url: String, fetch_max: usize) -> Fetcher<S>
where
    S: KeyValueStore + PacketQueue,
{
    let config = FetcherConfig {
        redisq_url,
        fetch_max,
        poll_delay: Duration::ZERO,
        ..FetcherConfig::default()
    };

    Fetcher::new(store.clone(), reqwest::Client::new(), config, keys.clone())
        .with_retry(RetryContext::with_backoff(1, Duration::ZERO))
}

/// Resolver that knows nothing.
pub struct UnknownResolver;

fn not_found<T>(kind: &'static str, id: i64) -> Result<T, Error> {
    Err(ReferenceError::NotFound { kind, id }.into())
}

#[async_trait]
impl ReferenceResolver for UnknownResolver {
    async fn lookup_ship(&self, type_id: i64) -> Result<ItemType, Error> {
        not_found("type", type_id)
    }

    async fn lookup_item_group(&self, group_id: i64) -> Result<ItemGroup, Error> {
        not_found("group", group_id)
    }

    async fn lookup_system(&self, system_id: i64) -> Result<SolarSystem, Error> {
        not_found("system", system_id)
    }

    async fn lookup_star(&self, star_id: i64) -> Result<Star, Error> {
        not_found("star", star_id)
    }

    async fn lookup_corporation(&self, corporation_id: i64) -> Result<String, Error> {
        not_found("corporation", corporation_id)
    }

    async fn lookup_alliance(&self, alliance_id: i64) -> Result<String, Error> {
        not_found("alliance", alliance_id)
    }
}
