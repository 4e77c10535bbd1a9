//! Killmail parsing.
//!
//! A [`KillmailEvent`] is the normalized, immutable form of one zKillboard RedisQ package.
//! Parsing never fails loudly: malformed packets, packets without a victim character and
//! packets flagged as awox all produce an event with `success = false`, which callers drop
//! through [`KillmailEvent::is_skippable`] before anything reaches a battle.

use dioxus_logger::tracing;
use serde::{Deserialize, Serialize};

use crate::{model::raw::RawPacket, util::time::parse_killmail_time};

/// Sentinel alliance ID for victims that are not in an alliance.
pub const NO_ALLIANCE: i64 = -1;

/// Victim position in space, in meters relative to the system's star.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

/// One attacker on a killmail.
///
/// Missing IDs (NPCs, structures, characters without an alliance) are stored as `0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttackerContribution {
    /// Attacking character ID.
    pub attacker_id: i64,
    /// Attacker corporation ID.
    pub corporation_id: i64,
    /// Attacker alliance ID.
    pub alliance_id: i64,
    /// Ship type the attacker was flying.
    pub ship_type_id: i64,
    /// Weapon type the attacker used.
    pub weapon_type_id: i64,
    /// Share of the victim's total damage taken dealt by this attacker, `0.0` if unknown.
    pub damage_share: f64,
    /// Whether this attacker landed the final blow.
    pub final_blow: bool,
}

/// Deduplicated attacker identities of a killmail, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttackerAssociations {
    /// Character IDs.
    pub members: Vec<i64>,
    /// Corporation IDs.
    pub corporations: Vec<i64>,
    /// Alliance IDs.
    pub alliances: Vec<i64>,
}

/// A parsed killmail.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KillmailEvent {
    /// Whether parsing produced a usable killmail.
    pub success: bool,
    /// zKillboard kill ID.
    pub killmail_id: i64,
    /// Victim character ID.
    pub victim_id: i64,
    /// Victim corporation ID.
    pub corporation_id: i64,
    /// Victim alliance ID, [`NO_ALLIANCE`] if none.
    pub alliance_id: i64,
    /// Solar system the kill happened in.
    pub system_id: i64,
    /// Closest celestial (gate, station, planet...) as reported by zKillboard, `0` if unknown.
    pub location_id: i64,
    /// Victim ship type ID.
    pub ship_type_id: i64,
    /// Victim position, if reported.
    pub position: Option<Position>,
    /// Kill time in unix seconds.
    pub time: i64,
    /// Kill involved NPC attackers only.
    pub is_npc: bool,
    /// Victim was killed by members of their own corporation.
    pub is_awox: bool,
    /// Single attacker kill.
    pub is_solo: bool,
    /// Attackers in the order reported.
    pub attackers: Vec<AttackerContribution>,
}

#[derive(Deserialize)]
struct RedisQResponse {
    package: Option<WirePackage>,
}

#[derive(Deserialize)]
struct WirePackage {
    #[serde(rename = "killID")]
    kill_id: i64,
    killmail: WireKillmail,
    zkb: WireZkb,
}

#[derive(Deserialize)]
struct WireKillmail {
    killmail_time: String,
    solar_system_id: i64,
    victim: WireVictim,
    #[serde(default)]
    attackers: Vec<WireAttacker>,
}

#[derive(Deserialize)]
struct WireVictim {
    character_id: Option<i64>,
    corporation_id: Option<i64>,
    alliance_id: Option<i64>,
    ship_type_id: Option<i64>,
    damage_taken: Option<f64>,
    position: Option<Position>,
}

#[derive(Deserialize)]
struct WireAttacker {
    character_id: Option<i64>,
    corporation_id: Option<i64>,
    alliance_id: Option<i64>,
    ship_type_id: Option<i64>,
    weapon_type_id: Option<i64>,
    damage_done: Option<f64>,
    #[serde(default)]
    final_blow: bool,
}

#[derive(Deserialize)]
struct WireZkb {
    #[serde(rename = "locationID")]
    location_id: Option<i64>,
    #[serde(default)]
    npc: bool,
    #[serde(default)]
    solo: bool,
    #[serde(default)]
    awox: bool,
}

impl AttackerContribution {
    fn from_wire(attacker: WireAttacker, total_damage: Option<f64>) -> Self {
        let damage_share = match (total_damage, attacker.damage_done) {
            (Some(total), Some(done)) if total > 0.0 => done / total,
            _ => 0.0,
        };

        Self {
            attacker_id: attacker.character_id.unwrap_or(0),
            corporation_id: attacker.corporation_id.unwrap_or(0),
            alliance_id: attacker.alliance_id.unwrap_or(0),
            ship_type_id: attacker.ship_type_id.unwrap_or(0),
            weapon_type_id: attacker.weapon_type_id.unwrap_or(0),
            damage_share,
            final_blow: attacker.final_blow,
        }
    }
}

impl KillmailEvent {
    /// Parses a RedisQ response body.
    ///
    /// # Returns
    /// A killmail event; `success` is `false` when the body is not JSON, carries no
    /// package, lacks the victim's character or corporation, has an unparseable
    /// timestamp, or is flagged as awox.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                tracing::debug!("Killmail body is not JSON: {}", e);
                Self::default()
            }
        }
    }

    /// Parses an already decoded RedisQ response document.
    pub fn from_value(value: serde_json::Value) -> Self {
        let response: RedisQResponse = match serde_json::from_value(value) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Killmail package is malformed: {}", e);
                return Self::default();
            }
        };

        match response.package {
            Some(package) => Self::from_package(package),
            None => Self::default(),
        }
    }

    /// Parses a queued packet. Failure markers always produce an unsuccessful event.
    pub fn from_packet(packet: &RawPacket) -> Self {
        match packet {
            RawPacket::Package { body, .. } => Self::from_value(body.clone()),
            RawPacket::Failed { .. } => Self::default(),
        }
    }

    fn from_package(package: WirePackage) -> Self {
        let WirePackage {
            kill_id,
            killmail,
            zkb,
        } = package;

        let total_damage = killmail.victim.damage_taken;
        let attackers = killmail
            .attackers
            .into_iter()
            .map(|a| AttackerContribution::from_wire(a, total_damage))
            .collect();

        let mut event = Self {
            success: false,
            killmail_id: kill_id,
            victim_id: killmail.victim.character_id.unwrap_or(0),
            corporation_id: killmail.victim.corporation_id.unwrap_or(0),
            alliance_id: killmail.victim.alliance_id.unwrap_or(NO_ALLIANCE),
            system_id: killmail.solar_system_id,
            location_id: zkb.location_id.unwrap_or(0),
            ship_type_id: killmail.victim.ship_type_id.unwrap_or(0),
            position: killmail.victim.position,
            time: 0,
            is_npc: zkb.npc,
            is_awox: zkb.awox,
            is_solo: zkb.solo,
            attackers,
        };

        if killmail.victim.character_id.is_none() || killmail.victim.corporation_id.is_none() {
            tracing::debug!("Killmail {} has no victim character, skipping", kill_id);
            return event;
        }

        event.time = match parse_killmail_time(&killmail.killmail_time) {
            Ok(time) => time,
            Err(e) => {
                tracing::debug!("Killmail {}: {}", kill_id, e);
                return event;
            }
        };

        if event.is_awox {
            tracing::debug!("Killmail {} flagged as awox, skipping", kill_id);
            return event;
        }

        event.success = true;
        event
    }

    /// Whether this killmail must be kept away from battle clustering.
    pub fn is_skippable(&self) -> bool {
        !self.success || self.is_npc
    }

    /// Collects the distinct non-zero character, corporation and alliance IDs of all
    /// attackers, preserving first-seen order.
    pub fn attacker_associations(&self) -> AttackerAssociations {
        let mut associations = AttackerAssociations::default();

        for attacker in &self.attackers {
            push_unique(&mut associations.members, attacker.attacker_id);
            push_unique(&mut associations.corporations, attacker.corporation_id);
            push_unique(&mut associations.alliances, attacker.alliance_id);
        }

        associations
    }
}

fn push_unique(ids: &mut Vec<i64>, id: i64) {
    if id != 0 && !ids.contains(&id) {
        ids.push(id);
    }
}
