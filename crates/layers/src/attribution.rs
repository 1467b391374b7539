use foundation::IdSource;
use foundation::math::Projection;

use crate::coverage::CoverageArea;

static ATTRIBUTION_IDS: IdSource = IdSource::new();

/// Opaque attribution identity, stable for the attribution's lifetime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributionId(pub u64);

impl std::fmt::Display for AttributionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "attribution#{}", self.0)
    }
}

/// Credit notice for a data source.
///
/// `coverage_areas == None` means the notice applies everywhere the layer is
/// shown. Attributions are immutable; every `new` mints a fresh identity, so
/// the type is deliberately not `Clone`.
#[derive(Debug)]
pub struct Attribution {
    id: AttributionId,
    html: String,
    projection: Projection,
    coverage_areas: Option<Vec<CoverageArea>>,
}

impl Attribution {
    pub fn new(html: impl Into<String>, projection: Projection) -> Self {
        Self {
            id: AttributionId(ATTRIBUTION_IDS.next_id()),
            html: html.into(),
            projection,
            coverage_areas: None,
        }
    }

    pub fn with_coverage_areas(mut self, areas: Vec<CoverageArea>) -> Self {
        self.coverage_areas = Some(areas);
        self
    }

    pub fn id(&self) -> AttributionId {
        self.id
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn coverage_areas(&self) -> Option<&[CoverageArea]> {
        self.coverage_areas.as_deref()
    }
}
