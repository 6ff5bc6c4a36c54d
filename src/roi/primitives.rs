//! Geometry primitives for hit-testing and overlap detection
//!
//! Pure functions over rings of [`Point`]s. Rings handed to the edge scan
//! must be closed (first point repeated at the end); the point-in-polygon
//! test wraps around explicitly and accepts open or closed rings.

use super::types::{Boundary, Point};

/// Ray-casting parity test: a horizontal ray from `pt` towards +x crosses
/// the ring an odd number of times iff `pt` is inside.
///
/// Points exactly on an edge have no defined answer.
pub fn point_in_polygon(pt: Point, ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (pi, pj) = (ring[i], ring[j]);
        // The y-straddle check guarantees pj.y != pi.y before dividing
        if (pi.y > pt.y) != (pj.y > pt.y)
            && pt.x < (pj.x - pi.x) * (pt.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    let val = (b.y - a.y) * (c.x - b.x) - (b.x - a.x) * (c.y - b.y);
    if val == 0.0 {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether `q` lies inside the bounding box of segment `p`-`r`.
/// Only meaningful once `p`, `q`, `r` are known to be collinear.
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    p.x.min(r.x) <= q.x && q.x <= p.x.max(r.x) && p.y.min(r.y) <= q.y && q.y <= p.y.max(r.y)
}

/// Segment `p1`-`p2` against segment `p3`-`p4`, including touching endpoints
/// and collinear overlap.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, p3, p2))
        || (o2 == Orientation::Collinear && on_segment(p1, p4, p2))
        || (o3 == Orientation::Collinear && on_segment(p3, p1, p4))
        || (o4 == Orientation::Collinear && on_segment(p3, p2, p4))
}

/// All-pairs scan over consecutive edges. The closing edge is only covered
/// when the caller passes closed rings.
pub fn do_edges_intersect(ring_a: &[Point], ring_b: &[Point]) -> bool {
    ring_a.windows(2).any(|a| {
        ring_b
            .windows(2)
            .any(|b| segments_intersect(a[0], a[1], b[0], b[1]))
    })
}

/// Edge crossing, or either ring's first vertex inside the other.
///
/// The containment half samples one vertex per ring, so a ring nested inside
/// another whose sampled vertex sits exactly on the outer edge can slip
/// through the containment check (it is then usually caught by the edge scan).
pub fn polygons_overlap(ring_a: &[Point], ring_b: &[Point]) -> bool {
    let (Some(&first_a), Some(&first_b)) = (ring_a.first(), ring_b.first()) else {
        return false;
    };
    do_edges_intersect(ring_a, ring_b)
        || point_in_polygon(first_a, ring_b)
        || point_in_polygon(first_b, ring_a)
}

pub fn point_in_circle(pt: Point, center: Point, radius: f64) -> bool {
    pt.distance_to(center) <= radius
}

/// Shortest distance from `pt` to segment `a`-`b`
pub fn point_segment_distance(pt: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return pt.distance_to(a);
    }
    let t = (((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    pt.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

pub fn circles_overlap(c1: Point, r1: f64, c2: Point, r2: f64) -> bool {
    c1.distance_to(c2) <= r1 + r2
}

/// A disc overlaps a ring when some edge reaches into it or its center is
/// enclosed by the ring. A ring nested entirely inside the disc has every
/// edge within the radius, so it is caught by the first condition.
pub fn circle_polygon_overlap(center: Point, radius: f64, ring: &[Point]) -> bool {
    ring.windows(2)
        .any(|e| point_segment_distance(center, e[0], e[1]) <= radius)
        || point_in_polygon(center, ring)
}

impl Boundary {
    /// Hit test used for click-to-select
    pub fn contains(&self, pt: Point) -> bool {
        match self {
            Boundary::Polygon { ring } => point_in_polygon(pt, ring),
            Boundary::Circle { center, radius } => point_in_circle(pt, *center, *radius),
        }
    }

    /// Symmetric overlap test across both boundary variants
    pub fn overlaps(&self, other: &Boundary) -> bool {
        match (self, other) {
            (Boundary::Polygon { ring: a }, Boundary::Polygon { ring: b }) => polygons_overlap(a, b),
            (
                Boundary::Circle { center: c1, radius: r1 },
                Boundary::Circle { center: c2, radius: r2 },
            ) => circles_overlap(*c1, *r1, *c2, *r2),
            (Boundary::Circle { center, radius }, Boundary::Polygon { ring })
            | (Boundary::Polygon { ring }, Boundary::Circle { center, radius }) => {
                circle_polygon_overlap(*center, *radius, ring)
            }
        }
    }
}
