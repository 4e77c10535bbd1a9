//! Cron scheduling of fetch and processing runs.
//!
//! Two jobs run inside the process: the fetcher polls RedisQ every 10 seconds and the
//! engine processes the queue every minute. Both guard themselves with store locks, so
//! several instances can run the same schedule against one Valkey without overlapping.

use std::{future::Future, sync::Arc};

use dioxus_logger::tracing;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    error::Error,
    service::{engine::Engine, fetcher::Fetcher, reference::ReferenceResolver},
    store::{KeyValueStore, PacketQueue},
};

pub mod config;

use self::config::{fetch as fetch_config, process as process_config};

/// Job scheduler driving the fetcher and the engine.
pub struct Scheduler<S, R> {
    engine: Arc<Engine<S, R>>,
    fetcher: Arc<Fetcher<S>>,
    sched: JobScheduler,
}

impl<S, R> Scheduler<S, R>
where
    S: KeyValueStore + PacketQueue + 'static,
    R: ReferenceResolver + 'static,
{
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(engine: Arc<Engine<S, R>>, fetcher: Arc<Fetcher<S>>) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self {
            engine,
            fetcher,
            sched,
        })
    }

    /// Registers the fetch and process jobs and starts the scheduler.
    pub async fn start(&mut self) -> Result<(), Error> {
        let fetcher = Arc::clone(&self.fetcher);
        self.schedule_job(fetch_config::CRON_EXPRESSION, "fetch", move || {
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.run().await }
        })
        .await?;

        let engine = Arc::clone(&self.engine);
        self.schedule_job(process_config::CRON_EXPRESSION, "process", move || {
            let engine = Arc::clone(&engine);
            async move { engine.run().await }
        })
        .await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Stops all jobs.
    pub async fn shutdown(&mut self) -> Result<(), Error> {
        self.sched.shutdown().await?;
        Ok(())
    }

    /// Schedules a recurring run with the specified cron expression.
    ///
    /// `function` returns whether the run executed; skipped runs are logged at debug,
    /// failed runs at error.
    async fn schedule_job<F, Fut>(&mut self, cron: &str, name: &str, function: F) -> Result<(), Error>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, Error>> + Send + 'static,
    {
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function().await {
                        Ok(true) => tracing::debug!("Finished {} run", name),
                        Ok(false) => tracing::debug!("Skipped {} run", name),
                        Err(e) => tracing::error!("Error during {} run: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
