//! Report assembly: renders major battles and resolves their reference data.

use std::future::Future;

use dioxus_logger::tracing;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::{
    battle::collection::BattleCollection,
    error::Error,
    model::report::{
        NameReference, Report, ReportAccumulator, ShipReference, StarReference, SystemReference,
    },
    service::{engine::Engine, reference::ReferenceResolver},
    store::{KeyValueStore, PacketQueue},
};

/// Concurrent lookups per chunk.
const LOOKUP_CHUNK_SIZE: usize = 10;

impl<S, R> Engine<S, R>
where
    S: KeyValueStore + PacketQueue,
    R: ReferenceResolver,
{
    pub(super) async fn build_report(&self, battles: &BattleCollection, now: i64) -> Report {
        let mut accumulator = ReportAccumulator::new();
        let rendered = battles.output_major(self.config.major_threshold, &mut accumulator);

        let resolver = &*self.resolver;

        let systems = resolve_each("system", accumulator.pending_systems(), |id| {
            resolve_system(resolver, id)
        })
        .await;
        for (id, reference) in systems {
            accumulator.resolve_system(id, reference);
        }

        let ships = resolve_each("ship", accumulator.pending_ships(), |id| {
            resolve_ship(resolver, id)
        })
        .await;
        for (id, reference) in ships {
            accumulator.resolve_ship(id, reference);
        }

        let corporations = resolve_each("corporation", accumulator.pending_corporations(), |id| {
            async move {
                let name = resolver.lookup_corporation(id).await?;
                Ok::<_, Error>(NameReference { name })
            }
        })
        .await;
        for (id, reference) in corporations {
            accumulator.resolve_corporation(id, reference);
        }

        let alliances = resolve_each("alliance", accumulator.pending_alliances(), |id| {
            async move {
                let name = resolver.lookup_alliance(id).await?;
                Ok::<_, Error>(NameReference { name })
            }
        })
        .await;
        for (id, reference) in alliances {
            accumulator.resolve_alliance(id, reference);
        }

        accumulator.into_report(rendered, now)
    }
}

/// Looks up every ID, `LOOKUP_CHUNK_SIZE` at a time, returning those that resolved.
///
/// Failures are logged and left out.
async fn resolve_each<T, F, Fut>(kind: &str, ids: Vec<i64>, lookup: F) -> Vec<(i64, T)>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let mut resolved = Vec::with_capacity(ids.len());

    for chunk in ids.chunks(LOOKUP_CHUNK_SIZE) {
        let mut futures = FuturesUnordered::new();

        for &id in chunk {
            let lookup = lookup(id);
            futures.push(async move { (id, lookup.await) });
        }

        while let Some((id, result)) = futures.next().await {
            match result {
                Ok(reference) => resolved.push((id, reference)),
                Err(e) => tracing::warn!("Failed to resolve {} {}: {}", kind, id, e),
            }
        }
    }

    resolved
}

/// System name plus its star, if it has one.
///
/// A star that fails to resolve leaves `star` empty rather than dropping the system.
async fn resolve_system<R>(resolver: &R, system_id: i64) -> Result<SystemReference, Error>
where
    R: ReferenceResolver + ?Sized,
{
    let system = resolver.lookup_system(system_id).await?;

    let star = match system.star_id {
        Some(star_id) => match resolver.lookup_star(star_id).await {
            Ok(star) => Some(StarReference {
                radius_km: star.radius_km,
                spectral_class: star.spectral_class,
                type_id: star.type_id,
                luminosity: star.luminosity,
            }),
            Err(e) => {
                tracing::warn!("Failed to resolve star {} of system {}: {}", star_id, system_id, e);
                None
            }
        },
        None => None,
    };

    Ok(SystemReference {
        name: system.name,
        star_id: system.star_id,
        star,
    })
}

/// Ships are described by their group: group ID, group name and category.
async fn resolve_ship<R>(resolver: &R, type_id: i64) -> Result<ShipReference, Error>
where
    R: ReferenceResolver + ?Sized,
{
    let ship = resolver.lookup_ship(type_id).await?;
    let group = resolver.lookup_item_group(ship.group_id).await?;

    Ok(ShipReference {
        gid: ship.group_id,
        name: group.name,
        cid: group.category_id,
    })
}
