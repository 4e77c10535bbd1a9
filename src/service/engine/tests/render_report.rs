use std::sync::Arc;

use crate::{
    config::EngineConfig,
    service::engine::tests::{engine, enqueue, keys, major_battle_packets, resolver, STAR_ID},
    store::{MemoryStore, PacketQueue},
    util::test::TEST_SYSTEM_ID,
};

/// Loads the major battle fixture into the store through one run.
async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    enqueue(&store, &major_battle_packets()).await;
    engine(&store, resolver(), EngineConfig::default())
        .run()
        .await
        .unwrap();
    store
}

/// Tests that only battles passing the major threshold are rendered.
///
/// Expected: the fixture battle is reported with threshold 2 and left out with 3
#[tokio::test]
async fn renders_only_major_battles() {
    let store = seeded_store().await;

    let report = engine(&store, resolver(), EngineConfig::default())
        .render_report()
        .await
        .unwrap();
    assert_eq!(report.battles.len(), 1);
    assert_eq!(report.battles[0].sides.len(), 2);

    let strict = EngineConfig {
        major_threshold: 3,
        ..EngineConfig::default()
    };
    let report = engine(&store, resolver(), strict)
        .render_report()
        .await
        .unwrap();
    assert!(report.battles.is_empty());
    assert!(report.sysref.is_empty());
}

/// Tests that reference lookup failures only drop the failing entries.
///
/// Verifies that a missing alliance and a missing star leave the rest of the report
/// intact.
///
/// Expected: alliance 2000 absent, alliance 1000 present, system without star
#[tokio::test]
async fn failed_lookups_are_left_out() {
    let store = seeded_store().await;
    let mut partial = resolver();
    partial.alliances.remove(&2000);
    partial.stars.remove(&STAR_ID);

    let report = engine(&store, partial, EngineConfig::default())
        .render_report()
        .await
        .unwrap();

    assert_eq!(report.battles.len(), 1);
    assert!(report.alliances.contains_key(&1000));
    assert!(!report.alliances.contains_key(&2000));
    let system = &report.sysref[&TEST_SYSTEM_ID];
    assert_eq!(system.star_id, Some(STAR_ID));
    assert!(system.star.is_none());
}

/// Tests that rendering leaves persisted state alone.
///
/// Expected: battles unchanged, nothing queued
#[tokio::test]
async fn rendering_does_not_modify_battles() {
    let store = seeded_store().await;
    let engine = engine(&store, resolver(), EngineConfig::default());
    let before = engine.load_battles().await.unwrap();

    engine.render_report().await.unwrap();

    assert_eq!(engine.load_battles().await.unwrap(), before);
    assert!(store.drain(&keys().raw).await.unwrap().is_empty());
}
