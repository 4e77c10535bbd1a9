//! Builder for RedisQ killmail packages.
//!
//! Produces the `{"package": {...}}` document zKillboard's RedisQ endpoint returns, with
//! only the fields the parser reads. Defaults describe a valid killmail in Jita at a
//! fixed time with no attackers; chain builder calls to shape the case under test.
//!
//! # Example
//! ```ignore
//! let json = KillmailFixture::new(1)
//!     .victim(10, 20, Some(30))
//!     .attacker(40, 50, None, 17738, 2929, 1000.0)
//!     .to_json();
//! ```

use serde_json::{json, Value};

/// Default solar system (Jita).
pub const DEFAULT_SYSTEM_ID: i64 = 30000142;

/// Default killmail time, `1620565061` in unix seconds.
pub const DEFAULT_KILLMAIL_TIME: &str = "2021-05-09T12:57:41Z";

#[derive(Clone, Debug)]
pub struct KillmailFixture {
    kill_id: i64,
    victim: Value,
    system_id: i64,
    location_id: Option<i64>,
    time: String,
    attackers: Vec<Value>,
    npc: bool,
    solo: bool,
    awox: bool,
}

impl KillmailFixture {
    pub fn new(kill_id: i64) -> Self {
        Self {
            kill_id,
            victim: json!({
                "character_id": 90000001,
                "corporation_id": 98000001,
                "ship_type_id": 587,
                "position": {"x": 1.0, "y": 2.0, "z": 3.0}
            }),
            system_id: DEFAULT_SYSTEM_ID,
            location_id: None,
            time: DEFAULT_KILLMAIL_TIME.to_string(),
            attackers: Vec::new(),
            npc: false,
            solo: false,
            awox: false,
        }
    }

    /// Victim character, corporation and optional alliance.
    pub fn victim(mut self, character_id: i64, corporation_id: i64, alliance_id: Option<i64>) -> Self {
        self.victim["character_id"] = json!(character_id);
        self.victim["corporation_id"] = json!(corporation_id);
        match alliance_id {
            Some(id) => self.victim["alliance_id"] = json!(id),
            None => {
                if let Some(victim) = self.victim.as_object_mut() {
                    victim.remove("alliance_id");
                }
            }
        }
        self
    }

    /// Victim without a character, such as a structure owned by `corporation_id`.
    pub fn structure_victim(mut self, corporation_id: i64) -> Self {
        if let Some(victim) = self.victim.as_object_mut() {
            victim.remove("character_id");
            victim.remove("alliance_id");
        }
        self.victim["corporation_id"] = json!(corporation_id);
        self
    }

    pub fn victim_ship(mut self, ship_type_id: i64) -> Self {
        self.victim["ship_type_id"] = json!(ship_type_id);
        self
    }

    pub fn damage_taken(mut self, damage: f64) -> Self {
        self.victim["damage_taken"] = json!(damage);
        self
    }

    pub fn system(mut self, system_id: i64) -> Self {
        self.system_id = system_id;
        self
    }

    pub fn location(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }

    /// Killmail time as an RFC 3339 string.
    pub fn time(mut self, time: &str) -> Self {
        self.time = time.to_string();
        self
    }

    /// Adds a player attacker.
    pub fn attacker(
        mut self,
        character_id: i64,
        corporation_id: i64,
        alliance_id: Option<i64>,
        ship_type_id: i64,
        weapon_type_id: i64,
        damage_done: f64,
    ) -> Self {
        let mut attacker = json!({
            "character_id": character_id,
            "corporation_id": corporation_id,
            "ship_type_id": ship_type_id,
            "weapon_type_id": weapon_type_id,
            "damage_done": damage_done,
            "final_blow": self.attackers.is_empty(),
            "security_status": 0.0
        });
        if let Some(id) = alliance_id {
            attacker["alliance_id"] = json!(id);
        }
        self.attackers.push(attacker);
        self
    }

    /// Adds an NPC attacker: no character, only a corporation and ship.
    pub fn npc_attacker(mut self, corporation_id: i64, ship_type_id: i64) -> Self {
        self.attackers.push(json!({
            "corporation_id": corporation_id,
            "ship_type_id": ship_type_id,
            "damage_done": 0,
            "final_blow": false,
            "security_status": 0.0
        }));
        self
    }

    pub fn npc(mut self, npc: bool) -> Self {
        self.npc = npc;
        self
    }

    pub fn solo(mut self, solo: bool) -> Self {
        self.solo = solo;
        self
    }

    pub fn awox(mut self, awox: bool) -> Self {
        self.awox = awox;
        self
    }

    /// The complete RedisQ response document.
    pub fn to_value(&self) -> Value {
        let mut zkb = json!({
            "hash": "0123456789abcdef",
            "totalValue": 10000000.0,
            "npc": self.npc,
            "solo": self.solo,
            "awox": self.awox
        });
        if let Some(location_id) = self.location_id {
            zkb["locationID"] = json!(location_id);
        }

        json!({
            "package": {
                "killID": self.kill_id,
                "killmail": {
                    "killmail_id": self.kill_id,
                    "killmail_time": self.time,
                    "solar_system_id": self.system_id,
                    "victim": self.victim,
                    "attackers": self.attackers
                },
                "zkb": zkb
            }
        })
    }

    /// The complete RedisQ response document as a string.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

/// RedisQ response when no killmail is waiting.
pub fn empty_package() -> String {
    json!({ "package": null }).to_string()
}
