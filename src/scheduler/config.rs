//! Cron schedules of the scheduled jobs.

/// RedisQ fetch job.
pub mod fetch {
    /// Cron expression for RedisQ polling, every 10 seconds.
    pub const CRON_EXPRESSION: &str = "*/10 * * * * *";
}

/// Battle processing job.
pub mod process {
    /// Cron expression for battle processing, at the start of every minute.
    pub const CRON_EXPRESSION: &str = "0 * * * * *";
}
