//! Tests for Battle::is_relevant.

use crate::{
    battle::{Battle, MAX_BATTLE_TIMEOUT},
    util::test::{killmail, BASE_TIME, TEST_LOCATION_ID},
};

fn seeded_battle() -> Battle {
    let mut battle = Battle::new();
    battle.process_killmail(&killmail(1, (1, 2, 3), &[(4, 5, 6)]));
    battle
}

/// An unseeded battle bootstraps from any killmail.
#[test]
fn unseeded_battle_accepts_anything() {
    let mut km = killmail(1, (1, 2, 3), &[(4, 5, 6)]);
    km.system_id = 31000005;
    km.location_id = 0;

    assert!(Battle::new().is_relevant(&km));
}

/// Tests the time window boundary.
///
/// Expected: relevant one second before the timeout, not relevant at it
#[test]
fn accepts_one_second_before_timeout_and_rejects_at_timeout() {
    let battle = seeded_battle();

    let mut km = killmail(2, (7, 8, 9), &[(4, 5, 6)]);
    km.time = BASE_TIME + MAX_BATTLE_TIMEOUT - 1;
    assert!(battle.is_relevant(&km));

    km.time = BASE_TIME + MAX_BATTLE_TIMEOUT;
    assert!(!battle.is_relevant(&km));

    km.time = BASE_TIME + MAX_BATTLE_TIMEOUT + 1;
    assert!(!battle.is_relevant(&km));
}

/// Same system and time but another location is a different fight.
#[test]
fn rejects_different_location() {
    let battle = seeded_battle();

    let mut km = killmail(2, (7, 8, 9), &[(4, 5, 6)]);
    km.location_id = TEST_LOCATION_ID + 1;

    assert!(!battle.is_relevant(&km));
}

#[test]
fn rejects_different_system() {
    let battle = seeded_battle();

    let mut km = killmail(2, (7, 8, 9), &[(4, 5, 6)]);
    km.system_id = 30002187;

    assert!(!battle.is_relevant(&km));
}

/// Killmails arriving out of order are still part of the battle.
#[test]
fn accepts_older_killmail() {
    let battle = seeded_battle();

    let mut km = killmail(2, (7, 8, 9), &[(4, 5, 6)]);
    km.time = BASE_TIME - 600;

    assert!(battle.is_relevant(&km));
}
