use std::{sync::Arc, time::Duration};

use valkyrie::{
    config::EngineConfig,
    model::report::Report,
    service::{
        engine::Engine,
        reference::{CachedResolver, EsiResolver},
        retry::RetryContext,
    },
    store::{get_json, MemoryStore, PacketQueue, StoreKeys},
};
use valkyrie_test_utils::{
    fixtures::{esi::mock_star, killmail::empty_package},
    prelude::*,
};

use crate::common::{
    fetcher, major_battle, ATTACKER_SHIP_ID, STAR_ID, SYSTEM_ID, VICTIM_SHIP_ID,
};

/// Registers every ESI endpoint the major battle report needs, each expected once.
fn mock_esi(test: &mut TestSetup) {
    let star = mock_star(432_000_000, "K7 V", 45041, 0.0474);
    let mocks = vec![
        test.create_system_endpoint(SYSTEM_ID, "Jita", Some(STAR_ID), 1),
        test.create_star_endpoint(STAR_ID, &star, 1),
        test.create_type_endpoint(ATTACKER_SHIP_ID, "Machariel", 27, 1),
        test.create_type_endpoint(VICTIM_SHIP_ID, "Rifter", 25, 1),
        test.create_group_endpoint(27, "Battleship", 6, 1),
        test.create_group_endpoint(25, "Frigate", 6, 1),
        test.create_corporation_endpoint(100, "Red Corp", 1),
        test.create_corporation_endpoint(200, "Blue Corp", 1),
        test.create_alliance_endpoint(1000, "Red Alliance", 1),
        test.create_alliance_endpoint(2000, "Blue Alliance", 1),
    ];
    test.mocks.extend(mocks);
}

/// Serves `body` at `path`, expected once.
fn mock_redisq(test: &mut TestSetup, path: &str, body: &str) {
    let mock = test
        .server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create();
    test.mocks.push(mock);
}

/// Tests the complete flow from RedisQ to the stored report.
///
/// Verifies that two fetched killmails form one major battle and that the report
/// carries names resolved from ESI, with every ESI entity requested exactly once.
///
/// Expected: one reported battle with two sides and complete reference tables
#[tokio::test]
async fn fetched_killmails_become_report() -> Result<(), TestError> {
    let mut test = TestSetup::new().await?;
    let [first, second] = major_battle();
    mock_redisq(&mut test, "/redisq/first", &first.to_json());
    mock_redisq(&mut test, "/redisq/second", &second.to_json());
    mock_redisq(&mut test, "/redisq/drained", &empty_package());
    mock_esi(&mut test);

    let store = Arc::new(MemoryStore::new());
    let keys = StoreKeys::new("pipeline");
    let base = test.server.url();

    for (path, fetch_max) in [("first", 1), ("second", 1), ("drained", 5)] {
        let url = format!("{}/redisq/{}", base, path);
        assert!(fetcher(&store, &keys, url, fetch_max).run().await.unwrap());
    }

    let resolver = CachedResolver::new(
        EsiResolver::new(test.esi_client.clone(), reqwest::Client::new(), &base)
            .with_retry(RetryContext::with_backoff(1, Duration::ZERO)),
    );
    let engine = Engine::new(
        store.clone(),
        Arc::new(resolver),
        EngineConfig::default(),
        keys.clone(),
    );
    assert!(engine.run().await.unwrap());

    assert!(store.drain(&keys.raw).await.unwrap().is_empty());

    let report: Report = get_json(&*store, &keys.report).await.unwrap().unwrap();
    assert_eq!(report.battles.len(), 1);
    let battle = &report.battles[0];
    assert_eq!(battle.sides.len(), 2);
    assert_eq!(battle.events.len(), 2);
    assert_eq!(battle.begin, battle.started_at - 120);

    let system = &report.sysref[&SYSTEM_ID];
    assert_eq!(system.name, "Jita");
    let star = system.star.as_ref().unwrap();
    assert_eq!(star.radius_km, 432000.0);
    assert_eq!(star.luminosity, 0.047);

    assert_eq!(report.ships[&ATTACKER_SHIP_ID].name, "Battleship");
    assert_eq!(report.ships[&VICTIM_SHIP_ID].name, "Frigate");
    assert_eq!(report.corps[&100].name, "Red Corp");
    assert_eq!(report.alliances[&2000].name, "Blue Alliance");

    // A second render is served from the resolver cache
    let again = engine.render_report().await.unwrap();
    assert_eq!(again.battles.len(), 1);

    test.assert_mocks();

    Ok(())
}

/// Tests that the report document uses the compact field names.
///
/// Expected: `ts`, `sid`, `locid`, `chars` and `event_types` keys in the stored JSON
#[tokio::test]
async fn stored_report_uses_wire_names() -> Result<(), TestError> {
    let mut test = TestSetup::new().await?;
    let [first, second] = major_battle();
    mock_redisq(&mut test, "/redisq/first", &first.to_json());
    mock_redisq(&mut test, "/redisq/second", &second.to_json());

    let store = Arc::new(MemoryStore::new());
    let keys = StoreKeys::new("wire");
    let base = test.server.url();
    for path in ["first", "second"] {
        let url = format!("{}/redisq/{}", base, path);
        fetcher(&store, &keys, url, 1).run().await.unwrap();
    }

    let engine = Engine::new(
        store.clone(),
        Arc::new(crate::common::UnknownResolver),
        EngineConfig::default(),
        keys.clone(),
    );
    engine.run().await.unwrap();

    let report: serde_json::Value = get_json(&*store, &keys.report).await.unwrap().unwrap();
    let battle = &report["battles"][0];
    for key in ["ts", "begin", "end", "sid", "locid", "sides", "chars", "events", "event_types"] {
        assert!(battle.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(battle["event_types"]["destroy"], 2);
    assert_eq!(battle["events"][0]["y"], 2);
    assert!(report["sysref"].as_object().unwrap().is_empty());

    test.assert_mocks();

    Ok(())
}
