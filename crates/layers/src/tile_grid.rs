use foundation::math::EARTH_RADIUS;

/// Finest level `TileGrid::web_mercator` will build.
pub const MAX_WEB_MERCATOR_LEVEL: u32 = 42;

#[derive(Debug, Clone, PartialEq)]
pub enum TileGridError {
    NoResolutions,
    NonPositiveResolution { level: u32, value: f64 },
    NotDecreasing { level: u32 },
    TooManyLevels { max_level: u32, limit: u32 },
}

impl std::fmt::Display for TileGridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileGridError::NoResolutions => write!(f, "tile grid needs at least one resolution"),
            TileGridError::NonPositiveResolution { level, value } => {
                write!(f, "resolution at level {level} must be positive, got {value}")
            }
            TileGridError::NotDecreasing { level } => {
                write!(f, "resolutions must strictly decrease (level {level})")
            }
            TileGridError::TooManyLevels { max_level, limit } => {
                write!(f, "max level {max_level} exceeds the limit of {limit}")
            }
        }
    }
}

impl std::error::Error for TileGridError {}

/// Discrete resolution pyramid of a tiled store.
///
/// Level 0 is the coarsest; `resolutions[level]` strictly decreases.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    resolutions: Vec<f64>,
}

impl TileGrid {
    pub fn new(resolutions: Vec<f64>) -> Result<Self, TileGridError> {
        if resolutions.is_empty() {
            return Err(TileGridError::NoResolutions);
        }
        for (level, r) in resolutions.iter().enumerate() {
            if !(*r > 0.0) {
                return Err(TileGridError::NonPositiveResolution {
                    level: level as u32,
                    value: *r,
                });
            }
            if level > 0 && *r >= resolutions[level - 1] {
                return Err(TileGridError::NotDecreasing {
                    level: level as u32,
                });
            }
        }
        Ok(Self { resolutions })
    }

    /// Standard 256px spherical mercator pyramid with levels `0..=max_level`.
    pub fn web_mercator(max_level: u32) -> Result<Self, TileGridError> {
        if max_level > MAX_WEB_MERCATOR_LEVEL {
            return Err(TileGridError::TooManyLevels {
                max_level,
                limit: MAX_WEB_MERCATOR_LEVEL,
            });
        }
        let size = 2.0 * std::f64::consts::PI * EARTH_RADIUS;
        let resolutions = (0..=max_level)
            .map(|z| size / 256.0 / 2f64.powi(z as i32))
            .collect();
        Self::new(resolutions)
    }

    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    pub fn resolution(&self, level: u32) -> Option<f64> {
        self.resolutions.get(level as usize).copied()
    }

    pub fn max_level(&self) -> u32 {
        (self.resolutions.len() - 1) as u32
    }

    /// Level whose resolution is nearest to `resolution`, clamped to the grid.
    ///
    /// When `resolution` sits exactly halfway between two levels the finer
    /// level wins.
    pub fn level_for_resolution(&self, resolution: f64) -> u32 {
        let r = &self.resolutions;
        if resolution >= r[0] {
            return 0;
        }
        let last = r.len() - 1;
        if resolution <= r[last] {
            return last as u32;
        }
        for i in 1..r.len() {
            if r[i] == resolution {
                return i as u32;
            }
            if r[i] < resolution {
                return if r[i - 1] - resolution < resolution - r[i] {
                    (i - 1) as u32
                } else {
                    i as u32
                };
            }
        }
        last as u32
    }
}
