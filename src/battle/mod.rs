//! Incremental battle clustering.
//!
//! A [`Battle`] is a cluster of killmails at one location within a time window. Each
//! incoming killmail is matched against the battle's [`Side`]s: the victim belongs to the
//! first side sharing any of their character, corporation or alliance, and the attackers
//! join the first side whose overlap with their combined identities reaches
//! [`OVERLAP_THRESHOLD`]. Unmatched parties start new sides. After every killmail, sides
//! that have come to overlap are merged, lowest index first, until no pair qualifies.
//!
//! Matching is first-match in side creation order and merging is greedy, so the final
//! partition depends on the order killmails arrive in.

pub mod collection;
pub mod output;
pub mod participant;
pub mod side;
pub mod timeline;

#[cfg(test)]
mod tests;

use std::{collections::BTreeMap, fmt};

use dioxus_logger::tracing;
use serde::{Deserialize, Serialize};

use crate::{model::killmail::KillmailEvent, util::time::unix_now};

pub use collection::BattleCollection;
pub use participant::Participant;
pub use side::{IdSet, Overlap, Side};
pub use timeline::{EventKind, TimelineEvent};

/// A killmail further than this many seconds after a battle's latest killmail starts a
/// new battle.
pub const MAX_BATTLE_TIMEOUT: i64 = 3600;

/// Minimum overlap for attackers to join an existing side, and the default threshold for
/// merging two sides.
pub const OVERLAP_THRESHOLD: f64 = 0.1;

/// Default minimum member count (exclusive) of both sides of a reportable battle.
pub const DEFAULT_MAJOR_THRESHOLD: usize = 2;

/// Seconds a battle report starts before the battle was first seen.
pub const REPORT_PRE_ROLL_SECS: i64 = 120;

/// Result of [`Battle::process_killmail_full`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Victim and attackers resolved to the same side; the battle was left untouched.
    Conflict,
    /// The killmail was folded in and `merges` side merges followed.
    Processed {
        /// Number of side merges performed.
        merges: usize,
    },
}

/// One battle.
///
/// Starts unseeded; the first processed killmail fixes its system and location for life.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    sides: Vec<Side>,
    participants: BTreeMap<i64, Participant>,
    events: Vec<TimelineEvent>,
    system_id: Option<i64>,
    location_id: Option<i64>,
    started_at: Option<i64>,
    latest_killmail_time: Option<i64>,
}

impl Battle {
    /// Creates an unseeded battle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sides in creation order.
    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    /// Participants keyed by character ID.
    pub fn participants(&self) -> &BTreeMap<i64, Participant> {
        &self.participants
    }

    /// Timeline in processing order.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// System the battle happens in, once seeded.
    pub fn system_id(&self) -> Option<i64> {
        self.system_id
    }

    /// Location the battle happens at, once seeded.
    pub fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    /// Wall-clock time the battle was first seen.
    pub fn started_at(&self) -> Option<i64> {
        self.started_at
    }

    /// Latest killmail time folded into the battle.
    pub fn latest_killmail_time(&self) -> Option<i64> {
        self.latest_killmail_time
    }

    /// Whether the battle has not processed any killmail yet.
    pub fn is_unseeded(&self) -> bool {
        self.system_id.is_none()
    }

    /// Whether a killmail belongs to this battle.
    ///
    /// An unseeded battle accepts anything. Otherwise system and location must match and
    /// the killmail must be less than [`MAX_BATTLE_TIMEOUT`] seconds after the latest one.
    pub fn is_relevant(&self, km: &KillmailEvent) -> bool {
        let (Some(system_id), Some(location_id)) = (self.system_id, self.location_id) else {
            return true;
        };
        let latest = self.latest_killmail_time.unwrap_or(km.time);

        system_id == km.system_id
            && location_id == km.location_id
            && km.time - latest < MAX_BATTLE_TIMEOUT
    }

    /// Index of the first side containing the character, its corporation or its alliance.
    pub fn which_side_is_character(
        &self,
        character_id: i64,
        corporation_id: i64,
        alliance_id: i64,
    ) -> Option<usize> {
        self.sides.iter().position(|side| {
            side.has_character_id(character_id)
                || side.has_alliance_id(alliance_id)
                || side.has_corporation_id(corporation_id)
        })
    }

    /// Index of the first side overlapping the killmail's attackers by at least
    /// [`OVERLAP_THRESHOLD`].
    pub fn which_side_is_attackers(&self, km: &KillmailEvent) -> Option<usize> {
        let associations = km.attacker_associations();

        self.sides.iter().position(|side| {
            side.percent_overlap_with(
                &associations.members,
                &associations.corporations,
                &associations.alliances,
            )
            .max()
                >= OVERLAP_THRESHOLD
        })
    }

    /// Whether processing the killmail would be a same-side kill.
    pub fn conflicts(&self, km: &KillmailEvent) -> bool {
        self.conflict_victim_is_same_side(km)
    }

    /// Whether victim and attackers already resolve to the same side.
    pub fn conflict_victim_is_same_side(&self, km: &KillmailEvent) -> bool {
        let victim = self.which_side_is_character(km.victim_id, km.corporation_id, km.alliance_id);
        let attackers = self.which_side_is_attackers(km);

        matches!((victim, attackers), (Some(v), Some(a)) if v == a)
    }

    /// Processes a killmail unless it conflicts, then merges sides until stable.
    pub fn process_killmail_full(
        &mut self,
        km: &KillmailEvent,
        merge_threshold: f64,
    ) -> ProcessOutcome {
        if self.conflicts(km) {
            tracing::debug!(
                "Killmail {} is a same-side kill in system {}, dropped",
                km.killmail_id,
                km.system_id
            );
            return ProcessOutcome::Conflict;
        }

        self.process_killmail(km);

        let mut merges = 0;
        while let Some((a, b)) = self.auto_merge_detect(merge_threshold) {
            tracing::debug!("Merging side {} into side {}", b, a);
            self.merge_sides(a, b);
            merges += 1;
        }

        ProcessOutcome::Processed { merges }
    }

    /// Folds a killmail into the battle without conflict checks or merging.
    pub fn process_killmail(&mut self, km: &KillmailEvent) {
        if self.started_at.is_none() {
            self.started_at = Some(unix_now());
            self.system_id = Some(km.system_id);
            self.location_id = Some(km.location_id);
        }
        self.latest_killmail_time = Some(match self.latest_killmail_time {
            Some(latest) => latest.max(km.time),
            None => km.time,
        });

        let victim_side =
            self.which_side_is_character(km.victim_id, km.corporation_id, km.alliance_id);
        let attacker_side = self.which_side_is_attackers(km);

        if victim_side.is_none() {
            let mut side = Side::new();
            side.add_character_ids([km.victim_id]);
            side.add_corporation_ids([km.corporation_id]);
            side.add_alliance_ids([km.alliance_id]);
            self.sides.push(side);
        }

        let associations = km.attacker_associations();
        let side = match attacker_side {
            Some(index) => &mut self.sides[index],
            None => {
                self.sides.push(Side::new());
                let last = self.sides.len() - 1;
                &mut self.sides[last]
            }
        };
        side.add_character_ids(associations.members);
        side.add_corporation_ids(associations.corporations);
        side.add_alliance_ids(associations.alliances);

        self.add_participants(km);
        self.add_event(EventKind::Destroy, km.time, km.victim_id);
    }

    /// First side pair `(i, j)`, `i < j`, where side `i` overlaps side `j` by at least
    /// `threshold`.
    pub fn auto_merge_detect(&self, threshold: f64) -> Option<(usize, usize)> {
        for (i, side) in self.sides.iter().enumerate() {
            for (j, other) in self.sides.iter().enumerate().skip(i + 1) {
                if side.percent_overlap(other).max() >= threshold {
                    return Some((i, j));
                }
            }
        }

        None
    }

    /// Merges side `b` into side `a` and removes `b`, shifting later sides down.
    pub fn merge_sides(&mut self, a: usize, b: usize) {
        if a == b || a >= self.sides.len() || b >= self.sides.len() {
            return;
        }

        let removed = self.sides.remove(b);
        let target = if b < a { a - 1 } else { a };
        self.sides[target].merge(&removed);
    }

    /// Records the victim and attackers of a killmail in the participant ledger.
    pub fn add_participants(&mut self, km: &KillmailEvent) {
        if !km.success {
            return;
        }

        if km.victim_id > 0 {
            self.participants.entry(km.victim_id).or_insert_with(|| {
                Participant::new(km.victim_id, km.corporation_id, km.alliance_id, km.ship_type_id)
            });
        }

        for attacker in km.attackers.iter().filter(|a| a.attacker_id > 0) {
            self.participants
                .entry(attacker.attacker_id)
                .or_insert_with(|| {
                    Participant::new(
                        attacker.attacker_id,
                        attacker.corporation_id,
                        attacker.alliance_id,
                        attacker.ship_type_id,
                    )
                })
                .observe_weapon(attacker.weapon_type_id);
        }
    }

    /// Appends a timeline entry.
    pub fn add_event(&mut self, kind: EventKind, time: i64, target_id: i64) {
        self.events.push(TimelineEvent::new(kind, time, target_id));
    }

    /// Whether the battle has exactly two sides, each with more than `threshold` members.
    pub fn is_major_and_valid(&self, threshold: usize) -> bool {
        match self.sides.as_slice() {
            [a, b] => a.members().len() > threshold && b.members().len() > threshold,
            _ => false,
        }
    }

    /// One-line summary: side count, participant count and seconds since the latest
    /// killmail.
    pub fn status(&self, now: i64) -> String {
        let age = now - self.latest_killmail_time.unwrap_or(now);
        format!(
            "[S:{} P:{} A:{}]",
            self.sides.len(),
            self.participants.len(),
            age
        )
    }
}

impl fmt::Display for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Battle")?;
        for (i, side) in self.sides.iter().enumerate() {
            write!(f, "\n  {}: {}", i, side)?;
        }
        Ok(())
    }
}
