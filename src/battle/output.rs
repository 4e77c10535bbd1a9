//! Rendering battles into report structures.

use std::collections::BTreeMap;

use crate::{
    battle::{Battle, EventKind, REPORT_PRE_ROLL_SECS},
    model::report::{ActorReport, BattleReport, CharacterReport, ReportAccumulator, SideReport},
};

impl Battle {
    /// Renders the battle and registers every referenced system, ship, corporation and
    /// alliance in `accumulator`.
    ///
    /// Members without a participant record and IDs `<= 0` are left out.
    pub fn output(&self, accumulator: &mut ReportAccumulator) -> BattleReport {
        let started_at = self.started_at.unwrap_or_default();
        let system_id = self.system_id.unwrap_or_default();

        accumulator.register_system(system_id);

        let mut characters = BTreeMap::new();
        let mut sides = Vec::with_capacity(self.sides.len());

        for side in &self.sides {
            let mut report = SideReport::default();

            for id in side.members().iter().filter(|id| *id > 0) {
                let Some(participant) = self.participants.get(&id) else {
                    continue;
                };

                report.actors.insert(
                    id,
                    ActorReport {
                        ship_type_id: participant.ship_type_id,
                        time: started_at,
                    },
                );
                characters.insert(
                    id,
                    CharacterReport {
                        ship_id: participant.ship_type_id,
                        wep_id: participant
                            .weapon_type_id
                            .filter(|weapon| *weapon != participant.ship_type_id),
                    },
                );
                accumulator.register_ship(participant.ship_type_id);
            }

            for id in side.corporations().iter().filter(|id| *id > 0) {
                report.corps.push(id);
                accumulator.register_corporation(id);
            }

            for id in side.alliances().iter().filter(|id| *id > 0) {
                report.alliances.push(id);
                accumulator.register_alliance(id);
            }

            sides.push(report);
        }

        BattleReport {
            started_at,
            begin: started_at - REPORT_PRE_ROLL_SECS,
            end: self.latest_killmail_time.unwrap_or(started_at),
            system_id,
            location_id: self.location_id.unwrap_or_default(),
            sides,
            characters,
            events: self.events.clone(),
            event_types: EventKind::legend()
                .into_iter()
                .map(|(name, code)| (name.to_string(), code))
                .collect(),
        }
    }
}
