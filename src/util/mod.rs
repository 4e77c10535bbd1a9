//! Utility functions and helpers.
//!
//! This module provides small reusable helpers shared by the clustering core and the
//! services, currently time conversions between killmail timestamps, wall-clock time and
//! the unix seconds stored in battles and reports.

pub mod time;
