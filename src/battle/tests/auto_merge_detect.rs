//! Tests for Battle::auto_merge_detect.

use super::side;
use crate::{
    battle::{Battle, OVERLAP_THRESHOLD},
    util::test::killmail,
};

#[test]
fn returns_none_for_disjoint_sides() {
    let mut battle = Battle::new();
    battle.sides.push(side(&[1], &[2], &[3]));
    battle.sides.push(side(&[4], &[5], &[6]));

    assert_eq!(battle.auto_merge_detect(OVERLAP_THRESHOLD), None);
}

/// Tests pair ordering.
///
/// Verifies that pairs are scanned by ascending first index, then ascending second
/// index, and the first qualifying pair is returned.
///
/// Expected: Some((1, 2)) since no pair starting at side 0 overlaps
#[test]
fn returns_first_qualifying_pair() {
    let mut battle = Battle::new();
    battle.sides.push(side(&[1], &[], &[]));
    battle.sides.push(side(&[2, 5], &[], &[]));
    battle.sides.push(side(&[5], &[], &[]));
    battle.sides.push(side(&[2], &[], &[]));

    assert_eq!(battle.auto_merge_detect(OVERLAP_THRESHOLD), Some((1, 2)));
}

/// Overlap is measured against the later side's IDs.
#[test]
fn uses_overlap_relative_to_later_side() {
    let mut battle = Battle::new();
    battle.sides.push(side(&[3, 4], &[], &[]));
    battle.sides.push(side(&[1, 2, 3, 4], &[], &[]));

    assert_eq!(battle.auto_merge_detect(0.6), None);
    assert_eq!(battle.auto_merge_detect(0.5), Some((0, 1)));
}

/// Tests detection after killmails bridge two previously separate sides.
///
/// Expected: the attacker side that absorbed the bridging attackers pairs with the side
/// they came from, and merging removes one side while keeping the union
#[test]
fn detects_sides_bridged_by_killmails() {
    let mut battle = Battle::new();
    battle.process_killmail(&killmail(1, (1, 2, 3), &[(4, 5, 6)]));
    battle.process_killmail(&killmail(2, (7, 8, 9), &[(10, 11, 12)]));
    battle.process_killmail(&killmail(3, (20, 21, 22), &[(4, 5, 6), (10, 11, 12)]));

    assert_eq!(battle.sides().len(), 5);
    assert_eq!(battle.auto_merge_detect(OVERLAP_THRESHOLD), Some((1, 3)));

    battle.merge_sides(1, 3);

    assert_eq!(battle.sides().len(), 4);
    let merged = &battle.sides()[1];
    assert_eq!(merged.members().as_slice(), &[4, 10]);
    assert_eq!(merged.corporations().as_slice(), &[5, 11]);
    assert_eq!(merged.alliances().as_slice(), &[6, 12]);
    assert_eq!(battle.auto_merge_detect(OVERLAP_THRESHOLD), None);
}
