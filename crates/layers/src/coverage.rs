use foundation::Extent;
use foundation::math::Transform;

/// Region scoped by extent and, optionally, an inclusive resolution band.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousCoverageArea {
    pub extent: Extent,
    pub min_resolution: Option<f64>,
    pub max_resolution: Option<f64>,
}

impl ContinuousCoverageArea {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            min_resolution: None,
            max_resolution: None,
        }
    }

    pub fn with_resolution_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_resolution = min;
        self.max_resolution = max;
        self
    }

    pub fn intersects(&self, extent: &Extent, resolution: f64) -> bool {
        if self.min_resolution.is_some_and(|min| resolution < min) {
            return false;
        }
        if self.max_resolution.is_some_and(|max| resolution > max) {
            return false;
        }
        self.extent.intersects(extent)
    }

    /// Resolution bounds are carried over as-is; only the extent moves.
    pub fn reproject(&self, transform: &Transform) -> Self {
        Self {
            extent: self.extent.transform(transform),
            ..self.clone()
        }
    }
}

/// Region of a tile pyramid: an extent valid for levels `min_level..=max_level`.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCoverageArea {
    pub extent: Extent,
    pub min_level: u32,
    pub max_level: u32,
}

impl TileCoverageArea {
    pub fn new(extent: Extent, min_level: u32, max_level: u32) -> Self {
        Self {
            extent,
            min_level,
            max_level,
        }
    }

    pub fn intersects(&self, extent: &Extent, level: u32) -> bool {
        self.min_level <= level && level <= self.max_level && self.extent.intersects(extent)
    }

    pub fn reproject(&self, transform: &Transform) -> Self {
        Self {
            extent: self.extent.transform(transform),
            ..self.clone()
        }
    }
}

/// Geographic region in which an attribution applies.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageArea {
    Continuous(ContinuousCoverageArea),
    Tile(TileCoverageArea),
}

impl CoverageArea {
    pub fn extent(&self) -> &Extent {
        match self {
            CoverageArea::Continuous(c) => &c.extent,
            CoverageArea::Tile(t) => &t.extent,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CoverageArea::Continuous(_) => "continuous",
            CoverageArea::Tile(_) => "tile",
        }
    }

    pub fn as_tile(&self) -> Option<&TileCoverageArea> {
        match self {
            CoverageArea::Tile(t) => Some(t),
            CoverageArea::Continuous(_) => None,
        }
    }

    /// Continuous-store test.
    ///
    /// A tile area has no level to compare against here, so only its extent
    /// is considered.
    pub fn intersects_extent_and_resolution(&self, extent: &Extent, resolution: f64) -> bool {
        match self {
            CoverageArea::Continuous(c) => c.intersects(extent, resolution),
            CoverageArea::Tile(t) => t.extent.intersects(extent),
        }
    }

    pub fn reproject(&self, transform: &Transform) -> CoverageArea {
        match self {
            CoverageArea::Continuous(c) => CoverageArea::Continuous(c.reproject(transform)),
            CoverageArea::Tile(t) => CoverageArea::Tile(t.reproject(transform)),
        }
    }
}

impl From<ContinuousCoverageArea> for CoverageArea {
    fn from(c: ContinuousCoverageArea) -> Self {
        CoverageArea::Continuous(c)
    }
}

impl From<TileCoverageArea> for CoverageArea {
    fn from(t: TileCoverageArea) -> Self {
        CoverageArea::Tile(t)
    }
}
