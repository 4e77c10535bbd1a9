//! Time and date conversion utilities.
//!
//! Battles, timeline events and reports all store time as unix seconds so persisted JSON
//! stays compact and comparisons stay integer arithmetic. These helpers convert upstream
//! RFC 3339 killmail timestamps and the wall clock into that representation.

use chrono::{DateTime, Utc};

use crate::error::Error;

/// Parses an upstream killmail timestamp into unix seconds.
///
/// zKillboard forwards ESI's `killmail_time`, an RFC 3339 timestamp in UTC such as
/// `2021-05-09T12:57:41Z`. Offsets other than `Z` are accepted and normalized to UTC.
///
/// # Arguments
/// - `timestamp` - RFC 3339 timestamp string from the killmail
///
/// # Returns
/// - `Ok(i64)` - Seconds since the unix epoch
/// - `Err(Error::ParseError)` - The string is not a valid RFC 3339 timestamp
///
/// # Example
/// ```ignore
/// let ts = parse_killmail_time("2021-05-09T12:57:41Z")?;
/// assert_eq!(ts, 1620565061);
/// ```
pub fn parse_killmail_time(timestamp: &str) -> Result<i64, Error> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).map_err(|e| {
        Error::ParseError(format!(
            "Failed to parse killmail timestamp {:?}: {}",
            timestamp, e
        ))
    })?;

    Ok(parsed.with_timezone(&Utc).timestamp())
}

/// Current wall-clock time in unix seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}
