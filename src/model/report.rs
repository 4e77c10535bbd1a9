//! Report document written for the battle viewer.
//!
//! A [`Report`] holds every major battle of one reporting pass plus shared lookup tables
//! (systems, ship groups, corporations, alliances) so each referenced entity is described
//! once per document. The tables are collected by a [`ReportAccumulator`] while battles are
//! rendered and filled in afterwards by the engine through the reference resolver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::battle::TimelineEvent;

/// Complete report document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    /// Wall-clock time the report was rendered.
    pub generated_at: i64,
    /// Rendered major battles.
    pub battles: Vec<BattleReport>,
    /// Systems referenced by the battles.
    pub sysref: BTreeMap<i64, SystemReference>,
    /// Ship types referenced by the battles.
    pub ships: BTreeMap<i64, ShipReference>,
    /// Corporations referenced by the battles.
    pub corps: BTreeMap<i64, NameReference>,
    /// Alliances referenced by the battles.
    pub alliances: BTreeMap<i64, NameReference>,
}

/// One rendered battle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BattleReport {
    /// Wall-clock time the battle was first seen.
    #[serde(rename = "ts")]
    pub started_at: i64,
    /// Start of the playback window.
    pub begin: i64,
    /// Latest killmail time.
    pub end: i64,
    /// Solar system ID.
    #[serde(rename = "sid")]
    pub system_id: i64,
    /// Location ID within the system.
    #[serde(rename = "locid")]
    pub location_id: i64,
    /// Sides in battle order.
    pub sides: Vec<SideReport>,
    /// Ship and weapon per character.
    #[serde(rename = "chars")]
    pub characters: BTreeMap<i64, CharacterReport>,
    /// Timeline.
    pub events: Vec<TimelineEvent>,
    /// Timeline legend, event name to numeric code.
    pub event_types: BTreeMap<String, u8>,
}

/// One rendered side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SideReport {
    /// Characters on the side with their ship.
    pub actors: BTreeMap<i64, ActorReport>,
    /// Corporation IDs.
    pub corps: Vec<i64>,
    /// Alliance IDs.
    pub alliances: Vec<i64>,
}

/// A character's ship assignment within a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActorReport {
    /// Ship type ID.
    #[serde(rename = "i")]
    pub ship_type_id: i64,
    /// Time the ship assignment applies from.
    #[serde(rename = "t")]
    pub time: i64,
}

/// Ship and weapon of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterReport {
    /// Ship type ID.
    pub ship_id: i64,
    /// Weapon type ID, present only when it differs from the ship.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wep_id: Option<i64>,
}

/// Solar system reference data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemReference {
    /// System name.
    pub name: String,
    /// Star ID of the system, if it has one.
    pub star_id: Option<i64>,
    /// Star details.
    pub star: Option<StarReference>,
}

/// Star reference data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StarReference {
    /// Radius in kilometers.
    pub radius_km: f64,
    /// Spectral class, e.g. `K2 V`.
    pub spectral_class: String,
    /// Star type ID.
    pub type_id: i64,
    /// Luminosity, rounded to three decimals.
    pub luminosity: f64,
}

/// Ship type reference data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShipReference {
    /// Item group ID.
    pub gid: i64,
    /// Item group name, e.g. `Battleship`.
    pub name: String,
    /// Item category ID.
    pub cid: i64,
}

/// Corporation or alliance reference data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameReference {
    /// Display name.
    pub name: String,
}

/// Lookup tables collected during a reporting pass.
///
/// Battles register every ID they reference; the engine resolves each pending ID exactly
/// once and then builds the [`Report`]. IDs that fail to resolve stay out of the report.
#[derive(Debug, Clone, Default)]
pub struct ReportAccumulator {
    systems: BTreeMap<i64, Option<SystemReference>>,
    ships: BTreeMap<i64, Option<ShipReference>>,
    corporations: BTreeMap<i64, Option<NameReference>>,
    alliances: BTreeMap<i64, Option<NameReference>>,
}

impl ReportAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a system ID. IDs `<= 0` are ignored.
    pub fn register_system(&mut self, id: i64) {
        register(&mut self.systems, id);
    }

    /// Registers a ship type ID. IDs `<= 0` are ignored.
    pub fn register_ship(&mut self, id: i64) {
        register(&mut self.ships, id);
    }

    /// Registers a corporation ID. IDs `<= 0` are ignored.
    pub fn register_corporation(&mut self, id: i64) {
        register(&mut self.corporations, id);
    }

    /// Registers an alliance ID. IDs `<= 0` are ignored.
    pub fn register_alliance(&mut self, id: i64) {
        register(&mut self.alliances, id);
    }

    /// System IDs not resolved yet.
    pub fn pending_systems(&self) -> Vec<i64> {
        pending(&self.systems)
    }

    /// Ship type IDs not resolved yet.
    pub fn pending_ships(&self) -> Vec<i64> {
        pending(&self.ships)
    }

    /// Corporation IDs not resolved yet.
    pub fn pending_corporations(&self) -> Vec<i64> {
        pending(&self.corporations)
    }

    /// Alliance IDs not resolved yet.
    pub fn pending_alliances(&self) -> Vec<i64> {
        pending(&self.alliances)
    }

    /// Stores resolved system data.
    pub fn resolve_system(&mut self, id: i64, reference: SystemReference) {
        self.systems.insert(id, Some(reference));
    }

    /// Stores resolved ship data.
    pub fn resolve_ship(&mut self, id: i64, reference: ShipReference) {
        self.ships.insert(id, Some(reference));
    }

    /// Stores a resolved corporation name.
    pub fn resolve_corporation(&mut self, id: i64, reference: NameReference) {
        self.corporations.insert(id, Some(reference));
    }

    /// Stores a resolved alliance name.
    pub fn resolve_alliance(&mut self, id: i64, reference: NameReference) {
        self.alliances.insert(id, Some(reference));
    }

    /// Builds the report, keeping only resolved entries in the lookup tables.
    pub fn into_report(self, battles: Vec<BattleReport>, generated_at: i64) -> Report {
        Report {
            generated_at,
            battles,
            sysref: resolved(self.systems),
            ships: resolved(self.ships),
            corps: resolved(self.corporations),
            alliances: resolved(self.alliances),
        }
    }
}

fn register<T>(map: &mut BTreeMap<i64, Option<T>>, id: i64) {
    if id > 0 {
        map.entry(id).or_insert(None);
    }
}

fn pending<T>(map: &BTreeMap<i64, Option<T>>) -> Vec<i64> {
    map.iter()
        .filter(|(_, value)| value.is_none())
        .map(|(id, _)| *id)
        .collect()
}

fn resolved<T>(map: BTreeMap<i64, Option<T>>) -> BTreeMap<i64, T> {
    map.into_iter()
        .filter_map(|(id, value)| value.map(|v| (id, v)))
        .collect()
}
