//! ESI-backed reference resolver.
//!
//! Corporation and alliance names go through the `eve_esi` client. Universe data (types,
//! groups, systems and stars) is requested directly from the public ESI routes with our
//! own HTTP client.

use dioxus_logger::tracing;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    error::{reference::ReferenceError, Error},
    service::{
        reference::{ItemGroup, ItemType, ReferenceResolver, SolarSystem, Star},
        retry::RetryContext,
    },
};

#[derive(Deserialize)]
struct WireType {
    name: String,
    group_id: Option<i64>,
}

#[derive(Deserialize)]
struct WireGroup {
    name: String,
    category_id: Option<i64>,
}

#[derive(Deserialize)]
struct WireSystem {
    name: String,
    star_id: Option<i64>,
}

#[derive(Deserialize)]
struct WireStar {
    /// Meters.
    radius: f64,
    spectral_class: String,
    type_id: i64,
    luminosity: f64,
}

/// Resolves reference data from ESI with retry on transient failures.
#[derive(Clone)]
pub struct EsiResolver {
    esi_client: eve_esi::Client,
    http_client: reqwest::Client,
    esi_url: String,
    retry: RetryContext,
}

impl EsiResolver {
    /// Creates a resolver.
    ///
    /// # Arguments
    /// - `esi_client` - Client used for corporation and alliance lookups
    /// - `http_client` - Client used for universe lookups, should carry our user agent
    /// - `esi_url` - ESI base URL, e.g. `https://esi.evetech.net/latest`
    pub fn new(esi_client: eve_esi::Client, http_client: reqwest::Client, esi_url: &str) -> Self {
        Self {
            esi_client,
            http_client,
            esi_url: esi_url.trim_end_matches('/').to_string(),
            retry: RetryContext::new(),
        }
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryContext) -> Self {
        self.retry = retry;
        self
    }

    async fn get_universe<T>(&self, kind: &'static str, route: &str, id: i64) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/universe/{}/{}", self.esi_url, route, id);
        let description = format!("{} {}", kind, id);
        let url = &url;
        let http_client = &self.http_client;

        self.retry
            .execute_with_retry(&description, move || async move {
                let response = http_client.get(url).send().await?;
                if response.status() == StatusCode::NOT_FOUND {
                    return Err(ReferenceError::NotFound { kind, id }.into());
                }

                Ok(response.error_for_status()?.json::<T>().await?)
            })
            .await
    }
}

#[async_trait::async_trait]
impl ReferenceResolver for EsiResolver {
    async fn lookup_ship(&self, type_id: i64) -> Result<ItemType, Error> {
        let wire: WireType = self.get_universe("type", "types", type_id).await?;
        let group_id = wire.group_id.ok_or(ReferenceError::MissingField {
            kind: "type",
            id: type_id,
            field: "group_id",
        })?;

        Ok(ItemType {
            type_id,
            name: wire.name,
            group_id,
        })
    }

    async fn lookup_item_group(&self, group_id: i64) -> Result<ItemGroup, Error> {
        let wire: WireGroup = self.get_universe("group", "groups", group_id).await?;
        let category_id = wire.category_id.ok_or(ReferenceError::MissingField {
            kind: "group",
            id: group_id,
            field: "category_id",
        })?;

        Ok(ItemGroup {
            group_id,
            name: wire.name,
            category_id,
        })
    }

    async fn lookup_system(&self, system_id: i64) -> Result<SolarSystem, Error> {
        let wire: WireSystem = self.get_universe("system", "systems", system_id).await?;

        Ok(SolarSystem {
            system_id,
            name: wire.name,
            star_id: wire.star_id,
        })
    }

    async fn lookup_star(&self, star_id: i64) -> Result<Star, Error> {
        let wire: WireStar = self.get_universe("star", "stars", star_id).await?;

        Ok(Star {
            radius_km: wire.radius / 1000.0,
            spectral_class: wire.spectral_class,
            type_id: wire.type_id,
            luminosity: (wire.luminosity * 1000.0).round() / 1000.0,
        })
    }

    async fn lookup_corporation(&self, corporation_id: i64) -> Result<String, Error> {
        let description = format!("corporation {}", corporation_id);
        let esi_client = &self.esi_client;
        let corporation = self
            .retry
            .execute_with_retry(&description, move || async move {
                Ok(esi_client
                    .corporation()
                    .get_corporation_information(corporation_id)
                    .await?)
            })
            .await?;

        Ok(corporation.name)
    }

    async fn lookup_alliance(&self, alliance_id: i64) -> Result<String, Error> {
        let description = format!("alliance {}", alliance_id);
        let esi_client = &self.esi_client;
        let alliance = self
            .retry
            .execute_with_retry(&description, move || async move {
                Ok(esi_client
                    .alliance()
                    .get_alliance_information(alliance_id)
                    .await?)
            })
            .await?;

        tracing::trace!("Resolved alliance {} as {}", alliance_id, alliance.name);

        Ok(alliance.name)
    }
}
