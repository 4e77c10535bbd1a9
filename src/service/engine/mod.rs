//! Battle processing runs.
//!
//! One run drains the raw packet queue, folds every usable killmail into the persisted
//! battle collection, expires quiet battles and writes a fresh report. Runs are
//! serialized across processes through an advisory lock in the store.

mod report;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use dioxus_logger::tracing;

use crate::{
    battle::collection::BattleCollection,
    config::EngineConfig,
    error::Error,
    model::{killmail::KillmailEvent, report::Report},
    service::reference::ReferenceResolver,
    store::{acquire_lock, get_json, release_lock, set_json, KeyValueStore, PacketQueue, StoreKeys},
    util::time::unix_now,
};

/// Counters describing one processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Packets drained from the queue.
    pub packets: usize,
    /// Packets that did not parse, or were NPC kills.
    pub skipped: usize,
    /// Battle folds, a killmail relevant to several battles counts once per battle.
    pub processed: usize,
    /// Killmails dropped by a battle as same-side kills.
    pub conflicts: usize,
    /// Battles created.
    pub created: usize,
    /// Battles expired.
    pub expired: usize,
    /// Battles kept after expiry.
    pub battles: usize,
    /// Battles in the written report.
    pub reported: usize,
}

/// Drains queued killmails into battles and renders reports.
pub struct Engine<S, R> {
    store: Arc<S>,
    resolver: Arc<R>,
    config: EngineConfig,
    keys: StoreKeys,
}

impl<S, R> Engine<S, R>
where
    S: KeyValueStore + PacketQueue,
    R: ReferenceResolver,
{
    /// Creates an engine.
    pub fn new(store: Arc<S>, resolver: Arc<R>, config: EngineConfig, keys: StoreKeys) -> Self {
        Self {
            store,
            resolver,
            config,
            keys,
        }
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Executes one processing run.
    ///
    /// # Returns
    /// - `Ok(true)` - A run executed; with zero packets nothing is written
    /// - `Ok(false)` - The engine is inactive or another run holds the lock
    /// - `Err(Error)` - A store operation failed; nothing was written and the lock is
    ///   left to expire
    pub async fn run(&self) -> Result<bool, Error> {
        if !self.config.active {
            tracing::debug!("Engine is inactive, skipping run");
            return Ok(false);
        }

        if !acquire_lock(&*self.store, &self.keys.process_lock, self.config.lock_ttl_secs).await? {
            tracing::info!("Processing lock is held, skipping run");
            return Ok(false);
        }

        let summary = self.process().await?;
        release_lock(&*self.store, &self.keys.process_lock).await?;

        tracing::info!(
            "Processed {} packets ({} skipped): {} folds, {} conflicts, {} new battles, {} expired, {} tracked, {} reported",
            summary.packets,
            summary.skipped,
            summary.processed,
            summary.conflicts,
            summary.created,
            summary.expired,
            summary.battles,
            summary.reported
        );

        Ok(true)
    }

    async fn process(&self) -> Result<RunSummary, Error> {
        let packets = self.store.drain(&self.keys.raw).await?;
        if packets.is_empty() {
            tracing::debug!("Raw queue is empty, nothing to process");
            return Ok(RunSummary::default());
        }

        let mut battles = self.load_battles().await?;

        let mut summary = RunSummary {
            packets: packets.len(),
            ..RunSummary::default()
        };

        for packet in &packets {
            let km = KillmailEvent::from_packet(packet);
            if km.is_skippable() {
                summary.skipped += 1;
                continue;
            }

            let outcome = battles.ingest(&km, self.config.merge_threshold);
            if outcome.conflicts > 0 {
                tracing::debug!(
                    "Killmail {} conflicts with {} battles",
                    km.killmail_id,
                    outcome.conflicts
                );
            }
            summary.processed += outcome.processed;
            summary.conflicts += outcome.conflicts;
            summary.created += usize::from(outcome.created);
        }

        let now = unix_now();
        summary.expired = battles.expire(now, self.config.battle_max_age_secs);
        summary.battles = battles.len();

        for battle in battles.battles() {
            tracing::debug!("{}", battle.status(now));
        }

        let report = self.build_report(&battles, now).await;
        summary.reported = report.battles.len();

        set_json(&*self.store, &self.keys.battles, &battles, None).await?;
        set_json(&*self.store, &self.keys.report, &report, None).await?;

        Ok(summary)
    }

    /// Reads the persisted battle collection, empty when none is stored.
    pub async fn load_battles(&self) -> Result<BattleCollection, Error> {
        Ok(get_json(&*self.store, &self.keys.battles)
            .await?
            .unwrap_or_default())
    }

    /// Removes persisted battles quiet for more than `max_age_secs`.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of battles removed
    /// - `Err(Error)` - Reading or writing the collection failed
    pub async fn expire_stale_battles(&self, max_age_secs: i64) -> Result<usize, Error> {
        let mut battles = self.load_battles().await?;
        let expired = battles.expire(unix_now(), max_age_secs);

        if expired > 0 {
            set_json(&*self.store, &self.keys.battles, &battles, None).await?;
            tracing::info!("Expired {} stale battles", expired);
        }

        Ok(expired)
    }

    /// Renders a report from the persisted battles without modifying them.
    pub async fn render_report(&self) -> Result<Report, Error> {
        let battles = self.load_battles().await?;
        Ok(self.build_report(&battles, unix_now()).await)
    }
}
