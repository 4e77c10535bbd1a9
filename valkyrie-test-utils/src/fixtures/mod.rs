//! Test data builders and mock endpoints.

pub mod esi;
pub mod killmail;
