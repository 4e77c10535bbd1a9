use serde::{Deserialize, Serialize};

/// A character seen in a battle, as victim or attacker.
///
/// The ship is fixed by the first observation. The weapon is filled in lazily by the
/// first attacker observation that reports one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Character ID.
    pub character_id: i64,
    /// Corporation at first observation.
    pub corporation_id: i64,
    /// Alliance at first observation.
    pub alliance_id: i64,
    /// Ship type at first observation.
    pub ship_type_id: i64,
    /// Weapon type, once known.
    pub weapon_type_id: Option<i64>,
}

impl Participant {
    /// Creates a participant with no known weapon.
    pub fn new(character_id: i64, corporation_id: i64, alliance_id: i64, ship_type_id: i64) -> Self {
        Self {
            character_id,
            corporation_id,
            alliance_id,
            ship_type_id,
            weapon_type_id: None,
        }
    }

    /// Records a weapon observation; only the first non-zero weapon sticks.
    pub fn observe_weapon(&mut self, weapon_type_id: i64) {
        if self.weapon_type_id.is_none() && weapon_type_id > 0 {
            self.weapon_type_id = Some(weapon_type_id);
        }
    }
}
