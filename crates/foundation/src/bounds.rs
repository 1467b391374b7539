use crate::math::{Coordinate, Transform};

/// Axis-aligned map extent.
///
/// Edges are inclusive: two extents that share only a border intersect.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Extent {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: Coordinate::new(min_x, min_y),
            max: Coordinate::new(max_x, max_y),
        }
    }

    /// Smallest extent containing both corners, in any order.
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Extent covered by a `size` pixel viewport centred on `center`.
    pub fn from_center_and_size(center: Coordinate, resolution: f64, size: [u32; 2]) -> Self {
        let half_w = resolution * f64::from(size[0]) / 2.0;
        let half_h = resolution * f64::from(size[1]) / 2.0;
        Self::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        self.min.x <= c.x && c.x <= self.max.x && self.min.y <= c.y && c.y <= self.max.y
    }

    pub fn intersects(&self, other: &Extent) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Bounding box of the four transformed corners.
    pub fn transform(&self, transform: &Transform) -> Extent {
        if transform.is_identity() {
            return *self;
        }
        let corners = [
            self.min,
            Coordinate::new(self.max.x, self.min.y),
            self.max,
            Coordinate::new(self.min.x, self.max.y),
        ];
        let mut out = Extent::from_corners(
            transform.apply(corners[0]),
            transform.apply(corners[2]),
        );
        for c in [corners[1], corners[3]] {
            let p = transform.apply(c);
            out.min.x = out.min.x.min(p.x);
            out.min.y = out.min.y.min(p.y);
            out.max.x = out.max.x.max(p.x);
            out.max.y = out.max.y.max(p.y);
        }
        out
    }
}

impl From<[f64; 4]> for Extent {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}
