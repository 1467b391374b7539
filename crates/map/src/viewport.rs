use foundation::Extent;
use foundation::math::Projection;

/// Read-only snapshot of what the map currently shows.
///
/// `is_defined` implies both `extent` and `resolution` are present.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub is_defined: bool,
    pub extent: Option<Extent>,
    pub resolution: Option<f64>,
    pub projection: Projection,
}

impl Viewport {
    pub fn undefined(projection: Projection) -> Self {
        Self {
            is_defined: false,
            extent: None,
            resolution: None,
            projection,
        }
    }

    pub fn defined(extent: Extent, resolution: f64, projection: Projection) -> Self {
        Self {
            is_defined: true,
            extent: Some(extent),
            resolution: Some(resolution),
            projection,
        }
    }

    /// Extent and resolution, when the viewport is defined.
    pub fn frame(&self) -> Option<(Extent, f64)> {
        if !self.is_defined {
            return None;
        }
        Some((self.extent?, self.resolution?))
    }
}
