use std::collections::HashMap;

use super::Coordinate;

/// Radius of the sphere used by spherical mercator (WGS84 semi-major axis).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which spherical mercator becomes square.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

pub const EPSG_4326: &str = "EPSG:4326";
pub const EPSG_3857: &str = "EPSG:3857";

/// Coordinate reference identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Projection {
    code: String,
}

impl Projection {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

pub type TransformFn = fn(Coordinate) -> Coordinate;

/// Coordinate transform between two projections.
///
/// `Identity` is a recognizable sentinel so callers can skip reprojection
/// entirely instead of copying geometry through a no-op function.
#[derive(Debug, Copy, Clone)]
pub enum Transform {
    Identity,
    Function(TransformFn),
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        matches!(self, Transform::Identity)
    }

    pub fn apply(&self, c: Coordinate) -> Coordinate {
        match self {
            Transform::Identity => c,
            Transform::Function(f) => f(c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    UnknownCode(String),
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionError::UnknownCode(code) => write!(f, "unknown projection code: {code}"),
        }
    }
}

impl std::error::Error for ProjectionError {}

/// Registry of known projections, their aliases and pairwise transforms.
#[derive(Debug, Clone)]
pub struct Projections {
    // alias code -> canonical code
    canonical: HashMap<String, String>,
    transforms: HashMap<(String, String), TransformFn>,
}

impl Projections {
    /// Registry with no projections at all.
    pub fn empty() -> Self {
        Self {
            canonical: HashMap::new(),
            transforms: HashMap::new(),
        }
    }

    /// Registry preloaded with geographic WGS84 and spherical mercator.
    pub fn with_defaults() -> Self {
        let mut p = Self::empty();
        p.add_equivalent(&[
            EPSG_4326,
            "CRS:84",
            "urn:ogc:def:crs:EPSG::4326",
            "urn:ogc:def:crs:OGC:1.3:CRS84",
        ]);
        p.add_equivalent(&[
            EPSG_3857,
            "EPSG:102100",
            "EPSG:102113",
            "EPSG:900913",
            "urn:ogc:def:crs:EPSG::3857",
        ]);
        p.add_transform(EPSG_4326, EPSG_3857, lon_lat_to_mercator);
        p.add_transform(EPSG_3857, EPSG_4326, mercator_to_lon_lat);
        p
    }

    /// Registers `codes` as aliases of one projection; the first is canonical.
    pub fn add_equivalent(&mut self, codes: &[&str]) {
        let Some(&first) = codes.first() else {
            return;
        };
        let canonical = self.canonical_code(first).unwrap_or(first).to_string();
        for code in codes {
            self.canonical.insert((*code).to_string(), canonical.clone());
        }
    }

    pub fn add_transform(&mut self, from: &str, to: &str, f: TransformFn) {
        let from = self.canonical_code(from).unwrap_or(from).to_string();
        let to = self.canonical_code(to).unwrap_or(to).to_string();
        self.transforms.insert((from, to), f);
    }

    pub fn get(&self, code: &str) -> Result<Projection, ProjectionError> {
        if self.canonical.contains_key(code) {
            Ok(Projection::new(code))
        } else {
            Err(ProjectionError::UnknownCode(code.to_string()))
        }
    }

    fn canonical_code<'a>(&'a self, code: &'a str) -> Option<&'a str> {
        self.canonical.get(code).map(|s| s.as_str())
    }

    /// Two projections are equivalent when they share a canonical code.
    ///
    /// Unregistered codes are only equivalent to themselves.
    pub fn equivalent(&self, a: &Projection, b: &Projection) -> bool {
        let ca = self.canonical_code(a.code()).unwrap_or(a.code());
        let cb = self.canonical_code(b.code()).unwrap_or(b.code());
        ca == cb
    }

    /// Transform from `from` into `to`.
    ///
    /// Equivalent projections and pairs without a registered transform both
    /// yield `Transform::Identity`.
    pub fn get_transform(&self, from: &Projection, to: &Projection) -> Transform {
        if self.equivalent(from, to) {
            return Transform::Identity;
        }
        let key = (
            self.canonical_code(from.code()).unwrap_or(from.code()).to_string(),
            self.canonical_code(to.code()).unwrap_or(to.code()).to_string(),
        );
        match self.transforms.get(&key) {
            Some(f) => Transform::Function(*f),
            None => Transform::Identity,
        }
    }
}

impl Default for Projections {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Degrees longitude/latitude to spherical mercator meters.
pub fn lon_lat_to_mercator(c: Coordinate) -> Coordinate {
    let lat = c.y.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let x = EARTH_RADIUS * c.x.to_radians();
    let y = EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Coordinate::new(x, y)
}

/// Spherical mercator meters to degrees longitude/latitude.
pub fn mercator_to_lon_lat(c: Coordinate) -> Coordinate {
    let lon = (c.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    Coordinate::new(lon, lat)
}
