use super::*;
use common::aabb::Aabb;
use fxhash::FxHashMap;

// Hierarchical spatial hash grid: a set of uniform hash grids ordered by
// ascending cell size, each handling objects within roughly one
// factor-of-two size band, plus the global entity registry.
pub struct Hshg {
    // Append-only so grid slots stay stable; traversal order lives in
    // `grid_order`, sorted ascending by cell size.
    pub(crate) grids: Vec<Grid>,
    pub(crate) grid_order: Vec<u32>,
    pub(crate) arena: EntityArena,
    pub(crate) registry: Vec<EntityHandle>,
    pub(crate) id_map: FxHashMap<EntityId, EntityHandle>,
    pub(crate) next_id: EntityId,
    pub(crate) config: Config,
}

pub(crate) fn clamped_object_size(aabb: &Aabb) -> f64 {
    let size = aabb.longest_edge();
    if size.is_nan() {
        MIN_OBJECT_SIZE
    } else {
        size.clamp(MIN_OBJECT_SIZE, MAX_OBJECT_SIZE)
    }
}

impl Hshg {
    fn push_grid(&mut self, cell_size: f64) -> u32 {
        let grid = Grid::new(cell_size, self.config.initial_cell_count)
            .expect("cell sizes derived from clamped object sizes are valid");
        let slot = self.grids.len() as u32;
        self.grids.push(grid);
        slot
    }

    fn insert_into_grid(&mut self, slot: u32, handle: EntityHandle) {
        self.arena.get_mut(handle).grid = slot;
        self.grids[slot as usize].insert(&mut self.arena, handle, None);
    }

    // Route the entity to the grid whose cell size matches its scale,
    // splicing or appending a new level when no existing band fits. New
    // levels land in ascending order before this returns.
    pub(crate) fn place(&mut self, handle: EntityHandle, object_size: f64) {
        if self.grid_order.is_empty() {
            let slot = self.push_grid(object_size * HIERARCHY_FACTOR_SQRT);
            self.grid_order.push(slot);
            self.insert_into_grid(slot, handle);
            return;
        }

        let mut x = 0.0;
        for position in 0..self.grid_order.len() {
            let slot = self.grid_order[position];
            x = self.grids[slot as usize].cell_size;
            if object_size < x {
                x /= HIERARCHY_FACTOR;
                if object_size < x {
                    // One more halving still fits: keep halving and splice a
                    // new, finer level immediately before this one.
                    while object_size < x {
                        x /= HIERARCHY_FACTOR;
                    }
                    let new_slot = self.push_grid(x * HIERARCHY_FACTOR);
                    self.grid_order.insert(position, new_slot);
                    self.insert_into_grid(new_slot, handle);
                } else {
                    self.insert_into_grid(slot, handle);
                }
                return;
            }
        }

        // Larger than every existing band: double up from the largest grid
        // and append.
        while object_size >= x {
            x *= HIERARCHY_FACTOR;
        }
        let new_slot = self.push_grid(x);
        self.grid_order.push(new_slot);
        self.insert_into_grid(new_slot, handle);
    }

    pub(crate) fn remove_handle(&mut self, handle: EntityHandle) {
        let (registry_index, grid_slot) = {
            let entity = self.arena.get(handle);
            (entity.registry_index, entity.grid)
        };

        debug_assert_eq!(self.registry[registry_index as usize], handle);
        self.registry.swap_remove(registry_index as usize);
        if let Some(&moved) = self.registry.get(registry_index as usize) {
            self.arena.get_mut(moved).registry_index = registry_index;
        }

        self.grids[grid_slot as usize].remove(&mut self.arena, handle);
        self.arena.remove(handle);
    }

    // Rehash pass: relocate entities whose bucket changed, within their
    // current grid. Entities are never moved between hierarchy levels, even
    // if their size has changed since insertion.
    pub(crate) fn rehash_all(&mut self) {
        for i in 0..self.registry.len() {
            let handle = self.registry[i];
            let (grid_slot, old_hash, min) = {
                let entity = self.arena.get(handle);
                (entity.grid, entity.hash, entity.aabb.min)
            };
            let grid = &mut self.grids[grid_slot as usize];
            let new_hash = grid.hash_point(min[0], min[1]);
            if new_hash != old_hash {
                grid.remove(&mut self.arena, handle);
                grid.insert(&mut self.arena, handle, Some(new_hash));
            }
        }
    }
}

#[cfg(test)]
impl Hshg {
    // Walks every recorded index and checks it against the element's true
    // position. Any mismatch is a bug in a compaction path.
    pub(crate) fn assert_index_consistency(&self) {
        assert_eq!(self.registry.len(), self.arena.len());
        for (i, &handle) in self.registry.iter().enumerate() {
            assert!(self.arena.contains(handle));
            let entity = self.arena.get(handle);
            assert_eq!(entity.registry_index as usize, i);
            assert_eq!(self.id_map.get(&entity.id), Some(&handle));

            let grid = &self.grids[entity.grid as usize];
            assert_eq!(grid.objects[entity.object_index as usize], handle);
            let cell = &grid.cells[entity.hash as usize];
            assert_eq!(cell.bucket[entity.bucket_index as usize], handle);
            assert_eq!(grid.occupied[cell.occupied_index as usize], entity.hash);
        }

        for &slot in &self.grid_order {
            let grid = &self.grids[slot as usize];
            assert!(
                grid.objects.len() as f64 / grid.cells.len() as f64 <= MAX_OBJECT_CELL_DENSITY
            );
            for (occupied_index, &cell_index) in grid.occupied.iter().enumerate() {
                let cell = &grid.cells[cell_index as usize];
                assert!(!cell.bucket.is_empty());
                assert_eq!(cell.occupied_index as usize, occupied_index);
            }
        }

        for pair in self.grid_order.windows(2) {
            let a = self.grids[pair[0] as usize].cell_size;
            let b = self.grids[pair[1] as usize].cell_size;
            assert!(a < b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_sizes(index: &Hshg) -> Vec<f64> {
        index
            .grid_order
            .iter()
            .map(|&slot| index.grids[slot as usize].cell_size)
            .collect()
    }

    #[test]
    fn test_first_insert_seeds_grid() {
        let mut index = Hshg::new();
        index.insert(Aabb::from_corners(0.0, 0.0, 1.0, 1.0), true);
        assert_eq!(level_sizes(&index), vec![HIERARCHY_FACTOR_SQRT]);
        index.assert_index_consistency();
    }

    #[test]
    fn test_same_band_shares_grid() {
        let mut index = Hshg::new();
        index.insert(Aabb::from_corners(0.0, 0.0, 1.0, 1.0), true);
        index.insert(Aabb::from_corners(10.0, 10.0, 11.0, 11.3), true);
        assert_eq!(index.level_stats().len(), 1);
        index.assert_index_consistency();
    }

    #[test]
    fn test_larger_object_appends_level() {
        let mut index = Hshg::new();
        index.insert(Aabb::from_corners(0.0, 0.0, 1.0, 1.0), true);
        index.insert(Aabb::from_corners(0.0, 0.0, 100.0, 100.0), true);

        let sizes = level_sizes(&index);
        assert_eq!(sizes.len(), 2);
        assert!(sizes[0] < sizes[1]);
        assert!(sizes[1] > 100.0);
        // The appended size is a power-of-two multiple of the seed.
        let ratio = sizes[1] / sizes[0];
        assert_eq!(ratio, ratio.round());
        assert!((ratio.round() as u64).is_power_of_two());
        index.assert_index_consistency();
    }

    #[test]
    fn test_smaller_object_splices_level() {
        let mut index = Hshg::new();
        index.insert(Aabb::from_corners(0.0, 0.0, 8.0, 8.0), true);
        index.insert(Aabb::from_corners(0.0, 0.0, 0.5, 0.5), true);

        let sizes = level_sizes(&index);
        assert_eq!(sizes.len(), 2);
        // The new level is finer, still coarse enough to hold the object.
        assert!(sizes[0] < sizes[1]);
        assert!(sizes[0] > 0.5);
        assert!(sizes[0] / HIERARCHY_FACTOR <= 0.5);
        index.assert_index_consistency();
    }

    #[test]
    fn test_in_band_object_reuses_existing_level() {
        let mut index = Hshg::new();
        index.insert(Aabb::from_corners(0.0, 0.0, 1.0, 1.0), true);
        // Half the seed's band lower bound goes to a new level, just above
        // it stays.
        index.insert(Aabb::from_corners(0.0, 0.0, 0.8, 0.8), true);
        assert_eq!(level_sizes(&index).len(), 1);
        index.insert(Aabb::from_corners(0.0, 0.0, 0.5, 0.5), true);
        assert_eq!(level_sizes(&index).len(), 2);
        index.assert_index_consistency();
    }

    #[test]
    fn test_mixed_sizes_stay_sorted() {
        let mut index = Hshg::new();
        for edge in [1.0, 40.0, 0.05, 7.0, 300.0, 0.4, 2.5] {
            index.insert(Aabb::from_corners(0.0, 0.0, edge, edge), true);
        }
        let sizes = level_sizes(&index);
        for pair in sizes.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        let total: usize = index
            .level_stats()
            .iter()
            .map(|stats| stats.entity_count)
            .sum();
        assert_eq!(total, index.len());
        index.assert_index_consistency();
    }

    #[test]
    fn test_degenerate_boxes_are_accepted() {
        let mut index = Hshg::new();
        index.insert(Aabb::from_corners(3.0, 3.0, 3.0, 3.0), true);
        index.insert(Aabb::from_corners(0.0, 0.0, f64::INFINITY, 1.0), true);
        index.insert(Aabb::from_corners(f64::NAN, 0.0, 1.0, 1.0), true);
        assert_eq!(index.len(), 3);
        index.assert_index_consistency();
    }

    #[test]
    fn test_index_consistency_under_churn() {
        let mut index = Hshg::new();
        let mut ids = Vec::new();
        for i in 0..40 {
            let x = (i % 7) as f64 * 3.0;
            let y = (i / 7) as f64 * 3.0;
            let edge = 0.5 + (i % 5) as f64;
            ids.push(index.insert(Aabb::from_corners(x, y, x + edge, y + edge), true));
        }
        index.assert_index_consistency();

        for &id in ids.iter().step_by(3) {
            index.remove(id).expect("tracked id");
        }
        index.assert_index_consistency();

        for &id in ids.iter().skip(1).step_by(3) {
            index
                .update_aabb(id, Aabb::from_corners(50.0, 50.0, 51.0, 51.0), true)
                .expect("tracked id");
        }
        index.update();
        index.assert_index_consistency();
    }
}
