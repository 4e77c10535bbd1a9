use std::sync::Arc;

use valkyrie::{
    battle::collection::BattleCollection,
    config::EngineConfig,
    model::{raw::RawPacket, report::Report},
    service::engine::Engine,
    store::{
        acquire_lock, get_json, release_lock, set_json, KeyValueStore, PacketQueue, StoreKeys,
        ValkeyStore,
    },
};
use valkyrie_test_utils::prelude::*;

use crate::common::{major_battle, UnknownResolver};

fn setup(redis: &RedisTest) -> (ValkeyStore, StoreKeys) {
    (
        ValkeyStore::new(redis.redis_pool.clone()),
        StoreKeys::new(&redis.prefix()),
    )
}

#[tokio::test]
async fn test_get_set_delete() {
    let redis = RedisTest::new().await.expect("Failed to create Redis test");
    let (store, keys) = setup(&redis);

    assert_eq!(store.get(&keys.report).await.unwrap(), None);

    store.set(&keys.report, "{}", None).await.unwrap();
    assert_eq!(store.get(&keys.report).await.unwrap().as_deref(), Some("{}"));

    store.delete(&keys.report).await.unwrap();
    assert_eq!(store.get(&keys.report).await.unwrap(), None);

    // Deleting an absent key is fine
    store.delete(&keys.report).await.unwrap();
}

#[tokio::test]
async fn test_lock_is_exclusive_until_released() {
    let redis = RedisTest::new().await.expect("Failed to create Redis test");
    let (store, keys) = setup(&redis);

    assert!(acquire_lock(&store, &keys.process_lock, 120).await.unwrap());
    assert!(!acquire_lock(&store, &keys.process_lock, 120).await.unwrap());

    // Locks are independent
    assert!(acquire_lock(&store, &keys.fetch_lock, 120).await.unwrap());

    release_lock(&store, &keys.process_lock).await.unwrap();
    assert!(acquire_lock(&store, &keys.process_lock, 120).await.unwrap());
}

#[tokio::test]
async fn test_drain_returns_packets_in_push_order() {
    let redis = RedisTest::new().await.expect("Failed to create Redis test");
    let (store, keys) = setup(&redis);

    assert!(store.drain(&keys.raw).await.unwrap().is_empty());

    let packets = vec![
        RawPacket::package(serde_json::json!({ "package": { "killID": 1 } })),
        RawPacket::failed("not json"),
        RawPacket::package(serde_json::json!({ "package": { "killID": 2 } })),
    ];
    for packet in &packets {
        store.push(&keys.raw, packet).await.unwrap();
    }

    assert_eq!(store.drain(&keys.raw).await.unwrap(), packets);
    assert!(store.drain(&keys.raw).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_json_round_trip_of_battles() {
    let redis = RedisTest::new().await.expect("Failed to create Redis test");
    let (store, keys) = setup(&redis);

    let missing: Option<BattleCollection> = get_json(&store, &keys.battles).await.unwrap();
    assert!(missing.is_none());

    set_json(&store, &keys.battles, &BattleCollection::new(), None)
        .await
        .unwrap();
    let stored: Option<BattleCollection> = get_json(&store, &keys.battles).await.unwrap();
    assert_eq!(stored, Some(BattleCollection::new()));
}

#[tokio::test]
async fn test_engine_run_against_valkey() {
    let redis = RedisTest::new().await.expect("Failed to create Redis test");
    let (store, keys) = setup(&redis);
    let store = Arc::new(store);

    for killmail in major_battle() {
        store
            .push(&keys.raw, &RawPacket::package(killmail.to_value()))
            .await
            .unwrap();
    }

    let engine = Engine::new(
        store.clone(),
        Arc::new(UnknownResolver),
        EngineConfig::default(),
        keys.clone(),
    );
    assert!(engine.run().await.unwrap());

    let battles = engine.load_battles().await.unwrap();
    assert_eq!(battles.len(), 1);

    let report: Report = get_json(&*store, &keys.report).await.unwrap().unwrap();
    assert_eq!(report.battles.len(), 1);
    assert!(report.corps.is_empty());

    // The lock was released
    assert!(acquire_lock(&*store, &keys.process_lock, 120).await.unwrap());
}
