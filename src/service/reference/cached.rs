use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, OnceCell};

use crate::{
    error::Error,
    service::reference::{ItemGroup, ItemType, ReferenceResolver, SolarSystem, Star},
};

/// Per-ID memo of one lookup kind.
///
/// Each ID owns a cell; concurrent callers for the same ID await the same fetch.
struct Memo<V> {
    entries: Mutex<HashMap<i64, Arc<OnceCell<V>>>>,
}

impl<V> Default for Memo<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> Memo<V> {
    async fn get_or_fetch<F, Fut>(&self, id: i64, fetch: F) -> Result<V, Error>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, Error>>,
    {
        let cell = self.entries.lock().await.entry(id).or_default().clone();

        // Failures leave the cell empty; the next caller tries again
        cell.get_or_try_init(fetch).await.cloned()
    }

    async fn len(&self) -> usize {
        self.entries
            .lock()
            .await
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}

/// Memoizes every successful lookup of an inner resolver for the life of the process.
///
/// Reference data is effectively static (ship groups, system names) or changes rarely
/// enough (corporation names) that a process restart is an acceptable refresh.
pub struct CachedResolver<R> {
    inner: R,
    types: Memo<ItemType>,
    groups: Memo<ItemGroup>,
    systems: Memo<SolarSystem>,
    stars: Memo<Star>,
    corporations: Memo<String>,
    alliances: Memo<String>,
}

impl<R> CachedResolver<R>
where
    R: ReferenceResolver,
{
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            types: Memo::default(),
            groups: Memo::default(),
            systems: Memo::default(),
            stars: Memo::default(),
            corporations: Memo::default(),
            alliances: Memo::default(),
        }
    }

    /// The wrapped resolver.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of memoized entries across all kinds.
    pub async fn cached_entries(&self) -> usize {
        self.types.len().await
            + self.groups.len().await
            + self.systems.len().await
            + self.stars.len().await
            + self.corporations.len().await
            + self.alliances.len().await
    }
}

#[async_trait]
impl<R> ReferenceResolver for CachedResolver<R>
where
    R: ReferenceResolver,
{
    async fn lookup_ship(&self, type_id: i64) -> Result<ItemType, Error> {
        self.types
            .get_or_fetch(type_id, || self.inner.lookup_ship(type_id))
            .await
    }

    async fn lookup_item_group(&self, group_id: i64) -> Result<ItemGroup, Error> {
        self.groups
            .get_or_fetch(group_id, || self.inner.lookup_item_group(group_id))
            .await
    }

    async fn lookup_system(&self, system_id: i64) -> Result<SolarSystem, Error> {
        self.systems
            .get_or_fetch(system_id, || self.inner.lookup_system(system_id))
            .await
    }

    async fn lookup_star(&self, star_id: i64) -> Result<Star, Error> {
        self.stars
            .get_or_fetch(star_id, || self.inner.lookup_star(star_id))
            .await
    }

    async fn lookup_corporation(&self, corporation_id: i64) -> Result<String, Error> {
        self.corporations
            .get_or_fetch(corporation_id, || self.inner.lookup_corporation(corporation_id))
            .await
    }

    async fn lookup_alliance(&self, alliance_id: i64) -> Result<String, Error> {
        self.alliances
            .get_or_fetch(alliance_id, || self.inner.lookup_alliance(alliance_id))
            .await
    }
}
