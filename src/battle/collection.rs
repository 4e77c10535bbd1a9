//! The set of in-progress battles persisted between engine runs.

use dioxus_logger::tracing;
use serde::{Deserialize, Serialize};

use crate::{
    battle::{Battle, ProcessOutcome},
    model::{
        killmail::KillmailEvent,
        report::{BattleReport, ReportAccumulator},
    },
};

/// Counters describing what folding one killmail did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestOutcome {
    /// Battles the killmail was processed into.
    pub processed: usize,
    /// Relevant battles that dropped it as a same-side kill.
    pub conflicts: usize,
    /// Whether a new battle was created for it.
    pub created: bool,
}

/// All in-progress battles, in creation order.
///
/// Serialized as a plain JSON list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattleCollection {
    battles: Vec<Battle>,
}

impl BattleCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of battles.
    pub fn len(&self) -> usize {
        self.battles.len()
    }

    /// Whether there are no battles.
    pub fn is_empty(&self) -> bool {
        self.battles.is_empty()
    }

    /// Battles in creation order.
    pub fn battles(&self) -> &[Battle] {
        &self.battles
    }

    /// Adds a battle.
    pub fn push(&mut self, battle: Battle) {
        self.battles.push(battle);
    }

    /// Folds a killmail into every relevant battle, or into a new battle when none is.
    ///
    /// A killmail relevant to several battles is processed by each of them.
    pub fn ingest(&mut self, km: &KillmailEvent, merge_threshold: f64) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();

        for battle in self.battles.iter_mut().filter(|b| b.is_relevant(km)) {
            match battle.process_killmail_full(km, merge_threshold) {
                ProcessOutcome::Conflict => outcome.conflicts += 1,
                ProcessOutcome::Processed { .. } => outcome.processed += 1,
            }
        }

        if outcome.processed + outcome.conflicts == 0 {
            let mut battle = Battle::new();
            battle.process_killmail_full(km, merge_threshold);
            self.battles.push(battle);
            outcome.processed = 1;
            outcome.created = true;
        } else if outcome.processed > 1 {
            tracing::debug!(
                "Killmail {} folded into {} battles",
                km.killmail_id,
                outcome.processed
            );
        }

        outcome
    }

    /// Removes battles whose latest killmail is more than `max_age_secs` before `now`.
    ///
    /// Battles that never processed a killmail are removed too. Returns the number of
    /// battles removed.
    pub fn expire(&mut self, now: i64, max_age_secs: i64) -> usize {
        let before = self.battles.len();
        self.battles.retain(|battle| match battle.latest_killmail_time() {
            Some(latest) => now - latest <= max_age_secs,
            None => false,
        });
        before - self.battles.len()
    }

    /// Battles eligible for reporting.
    pub fn major(&self, threshold: usize) -> impl Iterator<Item = &Battle> {
        self.battles
            .iter()
            .filter(move |battle| battle.is_major_and_valid(threshold))
    }

    /// Renders every major battle, registering references in `accumulator`.
    pub fn output_major(
        &self,
        threshold: usize,
        accumulator: &mut ReportAccumulator,
    ) -> Vec<BattleReport> {
        self.major(threshold)
            .map(|battle| battle.output(accumulator))
            .collect()
    }
}
