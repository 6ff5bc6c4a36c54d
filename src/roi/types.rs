//! Core geometry types for regions of interest
//!
//! Points live in canvas pixel space. A boundary is either a closed polygon
//! ring or a circle; both variants flow through the same rasterizer,
//! overlap test and hit test.

use rstar::AABB;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Stable handle for a committed region. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which shape a new draw produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Polygon,
    Circle,
}

impl ShapeKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "polygon" | "lasso" => Some(Self::Polygon),
            "circle" => Some(Self::Circle),
            _ => None,
        }
    }
}

/// Outline of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Boundary {
    /// Closed ring: the first point is repeated as the last one
    Polygon { ring: Vec<Point> },
    Circle { center: Point, radius: f64 },
}

impl Boundary {
    /// Build a polygon boundary, appending the first vertex if the ring is open.
    pub fn closed_polygon(mut points: Vec<Point>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }
        Boundary::Polygon { ring: points }
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Boundary::Circle {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Boundary::Polygon { .. } => ShapeKind::Polygon,
            Boundary::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Bounding box as [min_x, min_y, max_x, max_y]
    pub fn bounds(&self) -> [f64; 4] {
        match self {
            Boundary::Polygon { ring } => {
                let mut min_x = f64::MAX;
                let mut min_y = f64::MAX;
                let mut max_x = f64::MIN;
                let mut max_y = f64::MIN;
                for p in ring {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                [min_x, min_y, max_x, max_y]
            }
            Boundary::Circle { center, radius } => [
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ],
        }
    }

    pub fn envelope(&self) -> AABB<[f64; 2]> {
        let [min_x, min_y, max_x, max_y] = self.bounds();
        AABB::from_corners([min_x, min_y], [max_x, max_y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_polygon_appends_first_point_once() {
        let open = vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0)];
        let Boundary::Polygon { ring } = Boundary::closed_polygon(open) else {
            panic!("expected polygon");
        };
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);

        let Boundary::Polygon { ring } = Boundary::closed_polygon(ring.clone()) else {
            panic!("expected polygon");
        };
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_bounds() {
        let b = Boundary::closed_polygon(vec![
            Point::new(2.0, 5.0),
            Point::new(8.0, 1.0),
            Point::new(4.0, 9.0),
        ]);
        assert_eq!(b.bounds(), [2.0, 1.0, 8.0, 9.0]);

        let c = Boundary::circle(Point::new(10.0, 10.0), 3.0);
        assert_eq!(c.bounds(), [7.0, 7.0, 13.0, 13.0]);
    }

    #[test]
    fn test_shape_kind_parse() {
        assert_eq!(ShapeKind::parse("Circle"), Some(ShapeKind::Circle));
        assert_eq!(ShapeKind::parse(" polygon "), Some(ShapeKind::Polygon));
        assert_eq!(ShapeKind::parse("square"), None);
    }

    #[test]
    fn test_boundary_kind() {
        let tri = Boundary::closed_polygon(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]);
        assert_eq!(tri.kind(), ShapeKind::Polygon);
        assert_eq!(Boundary::circle(Point::new(0.0, 0.0), 2.0).kind(), ShapeKind::Circle);
    }
}
