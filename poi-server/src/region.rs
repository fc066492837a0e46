//! Drawn selection regions.
//!
//! A region is whatever closed shape the user drew on the map, already in
//! the working projection. The selection engine only asks two things of it:
//! does it contain a point, and what is its extent.

use geo::{BoundingRect, Coord, Intersects, LineString, Polygon, Rect};

/// Error returned when a drawn geometry cannot be used as a region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// Polygon ring has fewer than three vertices
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// A coordinate or radius is NaN or infinite
    #[error("region contains a non-finite coordinate")]
    NonFinite,

    /// Circle radius is negative
    #[error("circle radius must not be negative")]
    NegativeRadius,
}

/// A closed planar region in the working projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Polygon(Polygon<f64>),
    Box(Rect<f64>),
    Circle { center: Coord<f64>, radius: f64 },
}

impl Region {
    /// Polygon from its exterior ring. The ring is closed automatically.
    pub fn polygon(exterior: Vec<Coord<f64>>) -> Result<Self, RegionError> {
        if exterior.iter().any(|c| !is_finite(c)) {
            return Err(RegionError::NonFinite);
        }

        let mut ring = LineString::new(exterior);
        ring.close();
        // A closed ring repeats its first vertex
        let vertices = ring.0.len().saturating_sub(1);
        if vertices < 3 {
            return Err(RegionError::TooFewVertices(vertices));
        }

        Ok(Self::Polygon(Polygon::new(ring, vec![])))
    }

    /// Axis-aligned box spanned by two opposite corners, in any order.
    pub fn from_corners(a: Coord<f64>, b: Coord<f64>) -> Result<Self, RegionError> {
        if !is_finite(&a) || !is_finite(&b) {
            return Err(RegionError::NonFinite);
        }
        Ok(Self::Box(Rect::new(a, b)))
    }

    /// Circle around `center`.
    pub fn circle(center: Coord<f64>, radius: f64) -> Result<Self, RegionError> {
        if !is_finite(&center) || !radius.is_finite() {
            return Err(RegionError::NonFinite);
        }
        if radius < 0.0 {
            return Err(RegionError::NegativeRadius);
        }
        Ok(Self::Circle { center, radius })
    }

    /// Whether `point` lies inside the region or on its boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::Coord;
    /// use poi_server::region::Region;
    ///
    /// let region = Region::from_corners(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 10.0 }).unwrap();
    /// assert!(region.contains(Coord { x: 5.0, y: 5.0 }));
    /// assert!(region.contains(Coord { x: 10.0, y: 0.0 }));
    /// assert!(!region.contains(Coord { x: 11.0, y: 5.0 }));
    /// ```
    pub fn contains(&self, point: Coord<f64>) -> bool {
        match self {
            Region::Polygon(polygon) => polygon.intersects(&point),
            Region::Box(rect) => rect.intersects(&point),
            Region::Circle { center, radius } => {
                (point.x - center.x).hypot(point.y - center.y) <= *radius
            }
        }
    }

    /// Axis-aligned bounding box of the region.
    pub fn extent(&self) -> Rect<f64> {
        match self {
            Region::Polygon(polygon) => polygon
                .bounding_rect()
                .unwrap_or_else(|| Rect::new(Coord::zero(), Coord::zero())),
            Region::Box(rect) => *rect,
            Region::Circle { center, radius } => Rect::new(
                Coord {
                    x: center.x - radius,
                    y: center.y - radius,
                },
                Coord {
                    x: center.x + radius,
                    y: center.y + radius,
                },
            ),
        }
    }

    /// Where to anchor a popup for this region: the centre of its extent.
    pub fn anchor(&self) -> Coord<f64> {
        self.extent().center()
    }
}

fn is_finite(c: &Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}
