use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::Extent;
use foundation::math::Projections;
use layers::{Attribution, AttributionId, CoverageArea, Layer, StoreKind, TileCoverageArea};
use map::Viewport;
use runtime::Metrics;

use crate::cache::CoverageGeometryCache;

/// Per-attribution visibility for one layer.
pub type AttributionVisibilities = BTreeMap<AttributionId, bool>;

#[derive(Debug, Copy, Clone)]
enum IntersectionTest {
    Level(u32),
    Resolution(f64),
}

/// Decides which of a layer's attributions are in view.
#[derive(Debug)]
pub struct VisibilityCalculator {
    cache: CoverageGeometryCache,
    projections: Rc<Projections>,
}

impl VisibilityCalculator {
    pub fn new(projections: Rc<Projections>) -> Self {
        Self {
            cache: CoverageGeometryCache::new(),
            projections,
        }
    }

    pub fn cache(&self) -> &CoverageGeometryCache {
        &self.cache
    }

    pub fn forget(&mut self, id: AttributionId) -> bool {
        self.cache.discard(id)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Visibility of every attribution of `layer` under `viewport`.
    ///
    /// Returns `None` when the store has no attribution metadata. An
    /// attribution is visible when it has no coverage areas, or when at least
    /// one area intersects the viewport. Tile stores compare against the grid
    /// level nearest to the viewport resolution; continuous stores compare
    /// against the raw resolution.
    ///
    /// An undefined viewport yields all-visible without touching geometry;
    /// callers are expected to force-hide in that case instead of applying
    /// the result.
    ///
    /// # Panics
    ///
    /// If a tile store carries a non-tile coverage area. That is a wiring
    /// error between store and attribution data, not a runtime condition.
    pub fn compute(
        &mut self,
        layer: &Layer,
        viewport: &Viewport,
        metrics: &mut Metrics,
    ) -> Option<AttributionVisibilities> {
        let store = layer.store();
        let attributions = store.attributions()?;

        let frame = viewport.frame().map(|(extent, resolution)| {
            let test = match store.kind() {
                StoreKind::Tile(grid) => {
                    IntersectionTest::Level(grid.level_for_resolution(resolution))
                }
                StoreKind::Continuous => IntersectionTest::Resolution(resolution),
            };
            (extent, test)
        });

        let mut out = AttributionVisibilities::new();
        for attribution in attributions {
            let visible = match frame {
                None => true,
                Some((extent, test)) => {
                    match self.cache.coverage_areas(
                        attribution,
                        &viewport.projection,
                        &self.projections,
                        metrics,
                    ) {
                        None => true,
                        Some(areas) => any_intersects(attribution, areas, &extent, test),
                    }
                }
            };
            out.insert(attribution.id(), visible);
        }
        Some(out)
    }
}

fn any_intersects(
    attribution: &Attribution,
    areas: &[CoverageArea],
    extent: &Extent,
    test: IntersectionTest,
) -> bool {
    match test {
        IntersectionTest::Level(level) => {
            // Every area is checked so a bad area fails even when an earlier one matches.
            let mut hit = false;
            for area in areas {
                hit |= expect_tile_area(attribution, area).intersects(extent, level);
            }
            hit
        }
        IntersectionTest::Resolution(resolution) => areas
            .iter()
            .any(|a| a.intersects_extent_and_resolution(extent, resolution)),
    }
}

fn expect_tile_area<'a>(attribution: &Attribution, area: &'a CoverageArea) -> &'a TileCoverageArea {
    match area.as_tile() {
        Some(tile) => tile,
        None => panic!(
            "{} ({:?}) belongs to a tile store but has a {} coverage area; \
             tile stores require tile coverage areas",
            attribution.id(),
            attribution.html(),
            area.kind()
        ),
    }
}
