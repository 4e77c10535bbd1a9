//! Reference data error types.
//!
//! These errors occur when ESI answers a reference lookup with a payload that is missing
//! the fields a report needs. Transport failures are reported through the HTTP error
//! variants of the main error type instead.

use thiserror::Error;

/// Reference data lookup error type.
#[derive(Error, Debug)]
pub enum ReferenceError {
    /// ESI returned a payload for the entity but a required field was absent.
    ///
    /// # Fields
    /// - `kind` - The kind of entity looked up (e.g. "solar system")
    /// - `id` - The ID that was looked up
    /// - `field` - The missing field name
    #[error("ESI {kind} {id} is missing required field `{field}`")]
    MissingField {
        kind: &'static str,
        id: i64,
        field: &'static str,
    },

    /// ESI does not know the entity.
    #[error("ESI {kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
}
