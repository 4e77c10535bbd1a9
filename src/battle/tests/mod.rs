//! Battle clustering tests, one file per operation.

mod auto_merge_detect;
mod is_relevant;

use crate::battle::Side;

/// Side holding exactly the given IDs.
fn side(members: &[i64], corporations: &[i64], alliances: &[i64]) -> Side {
    let mut side = Side::new();
    side.add_character_ids(members.iter().copied());
    side.add_corporation_ids(corporations.iter().copied());
    side.add_alliance_ids(alliances.iter().copied());
    side
}
