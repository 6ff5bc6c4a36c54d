//! Region store
//!
//! Insertion-ordered collection of committed regions keyed by stable
//! [`RegionId`]. Insertion order doubles as z-order: the last region is
//! topmost. An R-tree over region bounding boxes narrows hit-tests and
//! overlap checks to nearby candidates before the exact geometry test.

use super::grid::Grid;
use super::types::{Boundary, Point, RegionId};
use indexmap::IndexMap;
use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};
use serde::Serialize;

/// A committed region of interest. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub id: RegionId,
    pub boundary: Boundary,
    /// Covered cell indices, ascending. Computed once at commit time.
    pub cells: Vec<u32>,
}

/// Bounding box entry for the spatial index
#[derive(Debug, Clone, PartialEq)]
struct RegionEnvelope {
    id: RegionId,
    bounds: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for RegionEnvelope {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        Envelope::distance_2(&self.bounds, point)
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        Envelope::contains_point(&self.bounds, point)
    }
}

#[derive(Debug, Default)]
pub struct RegionStore {
    regions: IndexMap<RegionId, Region>,
    spatial_index: RTree<RegionEnvelope>,
    next_id: u64,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterize `boundary` on `grid` and append it as the topmost region.
    /// Validation is the caller's job; this never fails.
    pub fn add(&mut self, boundary: Boundary, grid: &Grid) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;

        let cells = grid.rasterize(&boundary);
        self.spatial_index.insert(RegionEnvelope {
            id,
            bounds: boundary.envelope(),
        });
        self.regions.insert(id, Region { id, boundary, cells });
        id
    }

    /// Remove by stable id; later regions keep their relative order.
    pub fn remove(&mut self, id: RegionId) -> Option<Region> {
        let region = self.regions.shift_remove(&id)?;
        self.spatial_index.remove(&RegionEnvelope {
            id,
            bounds: region.boundary.envelope(),
        });
        Some(region)
    }

    /// Remove by position; subsequent positions shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Option<Region> {
        let id = *self.regions.get_index(index)?.0;
        self.remove(id)
    }

    /// Most recently added region whose boundary contains `point`
    pub fn find_topmost_containing(&self, point: Point) -> Option<RegionId> {
        self.spatial_index
            .locate_all_at_point(&[point.x, point.y])
            .filter(|entry| {
                self.regions
                    .get(&entry.id)
                    .is_some_and(|r| r.boundary.contains(point))
            })
            .filter_map(|entry| self.regions.get_index_of(&entry.id).map(|pos| (pos, entry.id)))
            .max_by_key(|(pos, _)| *pos)
            .map(|(_, id)| id)
    }

    /// Earliest-created region that overlaps `boundary`, if any
    pub fn find_overlapping(&self, boundary: &Boundary) -> Option<RegionId> {
        self.spatial_index
            .locate_in_envelope_intersecting(&boundary.envelope())
            .filter(|entry| {
                self.regions
                    .get(&entry.id)
                    .is_some_and(|r| boundary.overlaps(&r.boundary))
            })
            .filter_map(|entry| self.regions.get_index_of(&entry.id).map(|pos| (pos, entry.id)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, id)| id)
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    /// Zero-based position in creation order
    pub fn position(&self, id: RegionId) -> Option<usize> {
        self.regions.get_index_of(&id)
    }

    /// Regions in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Per-region cell lists in creation order
    pub fn cell_sets(&self) -> Vec<Vec<u32>> {
        self.regions.values().map(|r| r.cells.clone()).collect()
    }
}
