use std::collections::HashMap;

use foundation::math::{Projection, Projections};
use layers::{Attribution, AttributionId, CoverageArea};
use runtime::Metrics;
use tracing::trace;

pub const REPROJECTIONS: &str = "attribution.reprojections";

/// Coverage areas per attribution, already expressed in the viewport projection.
///
/// Entries are filled lazily on first lookup and stay until `discard` or
/// `clear`; coverage geometry is assumed immutable for an attribution's
/// lifetime. An attribution without coverage areas is cached as `None`.
#[derive(Debug, Default)]
pub struct CoverageGeometryCache {
    entries: HashMap<AttributionId, Option<Vec<CoverageArea>>>,
}

impl CoverageGeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached coverage areas for `attribution` in `target`, populating on miss.
    pub fn coverage_areas(
        &mut self,
        attribution: &Attribution,
        target: &Projection,
        projections: &Projections,
        metrics: &mut Metrics,
    ) -> Option<&[CoverageArea]> {
        self.entries
            .entry(attribution.id())
            .or_insert_with(|| reproject_coverage(attribution, target, projections, metrics))
            .as_deref()
    }

    pub fn contains(&self, id: AttributionId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Drops the entry for `id`; returns `false` if there was none.
    pub fn discard(&mut self, id: AttributionId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn reproject_coverage(
    attribution: &Attribution,
    target: &Projection,
    projections: &Projections,
    metrics: &mut Metrics,
) -> Option<Vec<CoverageArea>> {
    let areas = attribution.coverage_areas()?;
    if projections.equivalent(attribution.projection(), target) {
        return Some(areas.to_vec());
    }
    let transform = projections.get_transform(attribution.projection(), target);
    if transform.is_identity() {
        return Some(areas.to_vec());
    }

    metrics.inc_counter(REPROJECTIONS, 1);
    trace!(
        attribution = attribution.id().0,
        from = %attribution.projection(),
        to = %target,
        areas = areas.len(),
        "reprojecting coverage areas"
    );
    Some(areas.iter().map(|a| a.reproject(&transform)).collect())
}
