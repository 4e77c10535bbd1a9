mod render_report;

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use valkyrie_test_utils::fixtures::killmail::KillmailFixture;

use crate::{
    config::EngineConfig,
    model::raw::RawPacket,
    service::{
        engine::Engine,
        reference::{ItemGroup, ItemType, SolarSystem, Star},
    },
    store::{MemoryStore, PacketQueue, StoreKeys},
    util::test::{FakeResolver, TEST_LOCATION_ID, TEST_SHIP_ID, TEST_SYSTEM_ID, TEST_WEAPON_ID},
};

const TEST_PREFIX: &str = "test";
const VICTIM_SHIP_ID: i64 = 587;
const STAR_ID: i64 = 40009077;

fn keys() -> StoreKeys {
    StoreKeys::new(TEST_PREFIX)
}

fn engine(
    store: &Arc<MemoryStore>,
    resolver: FakeResolver,
    config: EngineConfig,
) -> Engine<MemoryStore, FakeResolver> {
    Engine::new(store.clone(), Arc::new(resolver), config, keys())
}

/// Resolver knowing everything the two fixture killmails reference.
fn resolver() -> FakeResolver {
    let mut resolver = FakeResolver::default();
    resolver.systems.insert(
        TEST_SYSTEM_ID,
        SolarSystem {
            system_id: TEST_SYSTEM_ID,
            name: "Jita".to_string(),
            star_id: Some(STAR_ID),
        },
    );
    resolver.stars.insert(
        STAR_ID,
        Star {
            radius_km: 696000.0,
            spectral_class: "K7 V".to_string(),
            type_id: 45041,
            luminosity: 0.047,
        },
    );
    resolver.types.insert(
        TEST_SHIP_ID,
        ItemType {
            type_id: TEST_SHIP_ID,
            name: "Machariel".to_string(),
            group_id: 27,
        },
    );
    resolver.types.insert(
        VICTIM_SHIP_ID,
        ItemType {
            type_id: VICTIM_SHIP_ID,
            name: "Rifter".to_string(),
            group_id: 25,
        },
    );
    resolver.groups.insert(
        27,
        ItemGroup {
            group_id: 27,
            name: "Battleship".to_string(),
            category_id: 6,
        },
    );
    resolver.groups.insert(
        25,
        ItemGroup {
            group_id: 25,
            name: "Frigate".to_string(),
            category_id: 6,
        },
    );
    for (id, name) in [(100, "Red Corp"), (200, "Blue Corp")] {
        resolver.corporations.insert(id, name.to_string());
    }
    for (id, name) in [(1000, "Red Alliance"), (2000, "Blue Alliance")] {
        resolver.alliances.insert(id, name.to_string());
    }
    resolver
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Killmail at the test location happening now.
fn recent(kill_id: i64) -> KillmailFixture {
    KillmailFixture::new(kill_id)
        .system(TEST_SYSTEM_ID)
        .location(TEST_LOCATION_ID)
        .victim_ship(VICTIM_SHIP_ID)
        .time(&now_rfc3339())
}

/// Two killmails building a battle with two sides of three members each.
///
/// Side 0 holds characters 1, 5 and 6 (corporation 100, alliance 1000), side 1 holds
/// characters 2, 3 and 4 (corporation 200, alliance 2000).
fn major_battle_packets() -> Vec<RawPacket> {
    let first = recent(1)
        .victim(1, 100, Some(1000))
        .attacker(2, 200, Some(2000), TEST_SHIP_ID, TEST_WEAPON_ID, 100.0)
        .attacker(3, 200, Some(2000), TEST_SHIP_ID, TEST_WEAPON_ID, 100.0)
        .attacker(4, 200, Some(2000), TEST_SHIP_ID, TEST_WEAPON_ID, 100.0);
    let second = recent(2)
        .victim(2, 200, Some(2000))
        .attacker(1, 100, Some(1000), TEST_SHIP_ID, TEST_WEAPON_ID, 100.0)
        .attacker(5, 100, Some(1000), TEST_SHIP_ID, TEST_WEAPON_ID, 100.0)
        .attacker(6, 100, Some(1000), TEST_SHIP_ID, TEST_WEAPON_ID, 100.0);

    vec![
        RawPacket::package(first.to_value()),
        RawPacket::package(second.to_value()),
    ]
}

async fn enqueue(store: &MemoryStore, packets: &[RawPacket]) {
    for packet in packets {
        store.push(&keys().raw, packet).await.unwrap();
    }
}
