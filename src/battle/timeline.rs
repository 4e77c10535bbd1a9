//! Battle timeline entries.
//!
//! Entries serialize to the compact `{"t", "y", "i"}` form the report viewer reads, with the
//! event kind as its numeric code.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind of a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EventKind {
    /// A character entered the battle. Not produced by clustering.
    Arrive,
    /// A character was destroyed.
    Destroy,
}

impl EventKind {
    /// Numeric code used in persisted battles and reports.
    pub fn code(self) -> u8 {
        match self {
            Self::Arrive => 1,
            Self::Destroy => 2,
        }
    }

    /// Report legend: name to numeric code.
    pub fn legend() -> [(&'static str, u8); 2] {
        [("arrive", Self::Arrive.code()), ("destroy", Self::Destroy.code())]
    }
}

impl From<EventKind> for u8 {
    fn from(kind: EventKind) -> Self {
        kind.code()
    }
}

impl TryFrom<u8> for EventKind {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Arrive),
            2 => Ok(Self::Destroy),
            other => Err(Error::ParseError(format!(
                "Unknown timeline event code {}",
                other
            ))),
        }
    }
}

/// One immutable timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Killmail time, unix seconds.
    #[serde(rename = "t")]
    pub time: i64,
    /// Entry kind.
    #[serde(rename = "y")]
    pub kind: EventKind,
    /// Character the entry is about.
    #[serde(rename = "i")]
    pub target_id: i64,
}

impl TimelineEvent {
    /// Creates a timeline entry.
    pub fn new(kind: EventKind, time: i64, target_id: i64) -> Self {
        Self {
            time,
            kind,
            target_id,
        }
    }
}
