//! Uniform grid spatial index.
//!
//! Items are kept in a flat `Vec` with an id lookup. Inserts mark the bucket
//! grid for a lazy rebuild before the next query; updates relink one item.

use fixedbitset::FixedBitSet;
use glam::Vec2;
use std::collections::HashMap;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Square bounds of half-width `extent` around a center.
    #[inline]
    pub fn from_center(center: Vec2, extent: f32) -> Self {
        Self {
            min_x: center.x - extent,
            min_y: center.y - extent,
            max_x: center.x + extent,
            max_y: center.y + extent,
        }
    }

    /// Closed-interval overlap test, so zero-extent points on an edge still match.
    #[inline]
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }
}

/// An item stored in the grid.
#[derive(Debug, Clone)]
pub struct GridItem {
    pub id: u32,
    pub position: Vec2,
    /// Half-width of the item's bounding square (0 for points).
    pub extent: f32,
    bound: Bounds,
}

impl GridItem {
    #[inline]
    pub fn new(id: u32, position: Vec2, extent: f32) -> Self {
        Self {
            id,
            position,
            extent,
            bound: Bounds::from_center(position, extent),
        }
    }
}

/// Spatial hash over a square world.
pub struct SpatialGrid {
    items: Vec<GridItem>,
    id_to_index: HashMap<u32, usize>,
    bounds: Bounds,
    dirty: bool,
    /// Buckets hold indices into `items`.
    buckets: Vec<Vec<usize>>,
    grid_size: usize,
    cell_size: f32,
    /// Reused across queries to de-duplicate items spanning several buckets.
    seen: FixedBitSet,
}

impl SpatialGrid {
    /// Create a grid covering `[0, world_size]²` with `grid_size²` buckets.
    pub fn new(world_size: f32, grid_size: usize) -> Self {
        let grid_size = grid_size.max(1);
        Self {
            items: Vec::with_capacity(1024),
            id_to_index: HashMap::with_capacity(1024),
            bounds: Bounds::new(0.0, 0.0, world_size, world_size),
            dirty: false,
            buckets: vec![Vec::new(); grid_size * grid_size],
            grid_size,
            cell_size: (world_size / grid_size as f32).max(f32::EPSILON),
            seen: FixedBitSet::with_capacity(1024),
        }
    }

    /// Bucket coordinate along one axis, clamped into the grid.
    #[inline]
    fn axis_cell(&self, value: f32, origin: f32) -> usize {
        let cell = ((value - origin) / self.cell_size).floor();
        if cell <= 0.0 {
            0
        } else {
            (cell as usize).min(self.grid_size - 1)
        }
    }

    /// Bucket span `(min_gx, max_gx, min_gy, max_gy)` covered by `bound`.
    #[inline]
    fn bucket_span(&self, bound: &Bounds) -> (usize, usize, usize, usize) {
        (
            self.axis_cell(bound.min_x, self.bounds.min_x),
            self.axis_cell(bound.max_x, self.bounds.min_x),
            self.axis_cell(bound.min_y, self.bounds.min_y),
            self.axis_cell(bound.max_y, self.bounds.min_y),
        )
    }

    fn link(&mut self, idx: usize) {
        let (min_gx, max_gx, min_gy, max_gy) = self.bucket_span(&self.items[idx].bound);
        for gy in min_gy..=max_gy {
            let row = gy * self.grid_size;
            for gx in min_gx..=max_gx {
                self.buckets[row + gx].push(idx);
            }
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (min_gx, max_gx, min_gy, max_gy) = self.bucket_span(&self.items[idx].bound);
        for gy in min_gy..=max_gy {
            let row = gy * self.grid_size;
            for gx in min_gx..=max_gx {
                let bucket = &mut self.buckets[row + gx];
                if let Some(pos) = bucket.iter().position(|&i| i == idx) {
                    bucket.swap_remove(pos);
                }
            }
        }
    }

    /// Insert or replace an item.
    pub fn insert(&mut self, item: GridItem) {
        if let Some(&idx) = self.id_to_index.get(&item.id) {
            self.items[idx] = item;
        } else {
            self.id_to_index.insert(item.id, self.items.len());
            self.items.push(item);
        }
        self.dirty = true;
    }

    /// Move an existing item. Only the buckets it leaves and enters are touched.
    pub fn update(&mut self, id: u32, position: Vec2, extent: f32) {
        let Some(&idx) = self.id_to_index.get(&id) else {
            return;
        };
        if self.dirty {
            self.items[idx] = GridItem::new(id, position, extent);
            return;
        }
        self.unlink(idx);
        self.items[idx] = GridItem::new(id, position, extent);
        self.link(idx);
    }

    fn rebuild(&mut self) {
        if !self.dirty {
            return;
        }
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        for idx in 0..self.items.len() {
            self.link(idx);
        }
        self.dirty = false;
    }

    /// Ids of all items whose bounds intersect `bound`.
    pub fn find_in_bounds(&mut self, bound: &Bounds) -> Vec<u32> {
        self.rebuild();

        let (min_gx, max_gx, min_gy, max_gy) = self.bucket_span(bound);

        self.seen.clear();
        self.seen.grow(self.items.len());

        let mut result = Vec::new();
        for gy in min_gy..=max_gy {
            let row = gy * self.grid_size;
            for gx in min_gx..=max_gx {
                for &idx in &self.buckets[row + gx] {
                    if self.seen.put(idx) {
                        continue;
                    }
                    let item = &self.items[idx];
                    if item.bound.intersects(bound) {
                        result.push(item.id);
                    }
                }
            }
        }
        result
    }

    /// Ids of all items whose bounds intersect the square enclosing a circle.
    /// Callers still do the exact distance test.
    #[inline]
    pub fn find_in_radius(&mut self, center: Vec2, radius: f32) -> Vec<u32> {
        self.find_in_bounds(&Bounds::from_center(center, radius))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.id_to_index.clear();
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.dirty = false;
    }
}

impl std::fmt::Debug for SpatialGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialGrid")
            .field("items", &self.items.len())
            .field("bounds", &self.bounds)
            .field("grid_size", &self.grid_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_intersects() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 15.0, 15.0);
        let c = Bounds::new(20.0, 20.0, 30.0, 30.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!c.intersects(&a));
    }

    #[test]
    fn test_grid_insert_find() {
        let mut grid = SpatialGrid::new(200.0, 8);

        grid.insert(GridItem::new(1, Vec2::new(100.0, 100.0), 0.0));
        grid.insert(GridItem::new(2, Vec2::new(150.0, 150.0), 0.0));
        grid.insert(GridItem::new(3, Vec2::new(50.0, 50.0), 0.0));
        assert_eq!(grid.len(), 3);

        let found = grid.find_in_radius(Vec2::new(100.0, 100.0), 20.0);
        assert_eq!(found, vec![1]);

        let found = grid.find_in_radius(Vec2::new(150.0, 150.0), 20.0);
        assert_eq!(found, vec![2]);
    }

    #[test]
    fn test_update_moves_item() {
        let mut grid = SpatialGrid::new(200.0, 8);
        grid.insert(GridItem::new(7, Vec2::new(10.0, 10.0), 0.0));
        assert_eq!(grid.find_in_radius(Vec2::new(10.0, 10.0), 5.0), vec![7]);

        grid.update(7, Vec2::new(190.0, 190.0), 0.0);
        assert!(grid.find_in_radius(Vec2::new(10.0, 10.0), 5.0).is_empty());
        assert_eq!(grid.find_in_radius(Vec2::new(190.0, 190.0), 5.0), vec![7]);
    }

    #[test]
    fn test_large_item_reported_once() {
        let mut grid = SpatialGrid::new(200.0, 8);
        grid.insert(GridItem::new(1, Vec2::new(100.0, 100.0), 90.0));
        let found = grid.find_in_radius(Vec2::new(100.0, 100.0), 100.0);
        assert_eq!(found, vec![1]);
    }

    #[test]
    fn test_update_after_build_relinks_only_moved_item() {
        let mut grid = SpatialGrid::new(200.0, 4);
        for id in 0..20 {
            grid.insert(GridItem::new(id, Vec2::new(10.0 * id as f32, 10.0), 0.0));
        }
        assert_eq!(grid.find_in_radius(Vec2::new(30.0, 10.0), 1.0), vec![3]);
        assert!(!grid.dirty);

        grid.update(3, Vec2::new(150.0, 150.0), 0.0);
        assert!(!grid.dirty);
        assert!(grid.find_in_radius(Vec2::new(30.0, 10.0), 1.0).is_empty());
        assert_eq!(grid.find_in_radius(Vec2::new(150.0, 150.0), 1.0), vec![3]);

        let mut all = grid.find_in_radius(Vec2::new(100.0, 100.0), 100.0);
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<u32>>());
    }
}
