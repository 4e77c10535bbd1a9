//! Reference data lookups for report rendering.
//!
//! Reports describe each referenced system, ship, corporation and alliance once. The
//! engine resolves those through a [`ReferenceResolver`]: [`esi::EsiResolver`] queries ESI
//! and [`cached::CachedResolver`] memoizes any resolver for the life of the process.

pub mod cached;
pub mod esi;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use cached::CachedResolver;
pub use esi::EsiResolver;

/// Item type, e.g. a ship hull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemType {
    /// Type ID.
    pub type_id: i64,
    /// Type name.
    pub name: String,
    /// Item group the type belongs to.
    pub group_id: i64,
}

/// Item group, e.g. `Battleship`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGroup {
    /// Group ID.
    pub group_id: i64,
    /// Group name.
    pub name: String,
    /// Item category the group belongs to.
    pub category_id: i64,
}

/// Solar system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarSystem {
    /// System ID.
    pub system_id: i64,
    /// System name.
    pub name: String,
    /// Star of the system. Some wormhole systems have none.
    pub star_id: Option<i64>,
}

/// Star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// Radius in kilometers.
    pub radius_km: f64,
    /// Spectral class.
    pub spectral_class: String,
    /// Star type ID.
    pub type_id: i64,
    /// Luminosity, rounded to three decimals.
    pub luminosity: f64,
}

/// Source of reference data.
///
/// Lookups are idempotent, so implementations are free to cache them.
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    /// Looks up a ship (or any item) type.
    async fn lookup_ship(&self, type_id: i64) -> Result<ItemType, Error>;

    /// Looks up an item group.
    async fn lookup_item_group(&self, group_id: i64) -> Result<ItemGroup, Error>;

    /// Looks up a solar system.
    async fn lookup_system(&self, system_id: i64) -> Result<SolarSystem, Error>;

    /// Looks up a star.
    async fn lookup_star(&self, star_id: i64) -> Result<Star, Error>;

    /// Looks up a corporation name.
    async fn lookup_corporation(&self, corporation_id: i64) -> Result<String, Error>;

    /// Looks up an alliance name.
    async fn lookup_alliance(&self, alliance_id: i64) -> Result<String, Error>;
}
