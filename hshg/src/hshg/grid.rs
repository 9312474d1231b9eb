use super::*;
use crate::error::{HshgError, HshgResult};

// One hierarchy level: a square power-of-two hash grid with compacting
// occupied-cell and object lists. The occupied list holds indices into
// `cells`, never copies, so it can never diverge from the live buckets.
pub(crate) struct Grid {
    pub(crate) cell_size: f64,
    pub(crate) inverse_cell_size: f64,
    pub(crate) row_column_count: u32,
    pub(crate) hash_mask: u32,
    pub(crate) cells: Vec<Cell>,
    pub(crate) occupied: Vec<u32>,
    pub(crate) objects: Vec<EntityHandle>,
}

pub(crate) fn validate_cell_count(cell_count: usize) -> HshgResult<()> {
    let power_of_four = cell_count.is_power_of_two() && cell_count.trailing_zeros() % 2 == 0;
    if cell_count < 16 || !power_of_four {
        return Err(HshgError::InvalidCellCount { cell_count });
    }
    Ok(())
}

// Flat-array offsets to a cell's 3x3 Moore neighborhood, wrapping at the
// grid's outer edges so no bounds checks are needed when applying them.
fn neighbor_offsets(index: u32, row_column_count: u32) -> [i32; 9] {
    let wh = row_column_count as i32;
    let grid_length = wh * wh;
    let y = index as i32 / wh;
    let x = index as i32 - y * wh;

    let right = if x == wh - 1 { -wh + 1 } else { 1 };
    let left = if x == 0 { wh - 1 } else { -1 };
    let up = if y == wh - 1 { -grid_length + wh } else { wh };
    let down = if y == 0 { grid_length - wh } else { -wh };

    [
        left + up,
        up,
        right + up,
        left,
        0,
        right,
        left + down,
        down,
        right + down,
    ]
}

fn build_cells(row_column_count: u32) -> Vec<Cell> {
    let cell_count = (row_column_count * row_column_count) as usize;
    let mut cells = Vec::with_capacity(cell_count);
    for index in 0..cell_count as u32 {
        cells.push(Cell {
            bucket: Vec::new(),
            neighbor_offsets: neighbor_offsets(index, row_column_count),
            occupied_index: INVALID_INDEX,
        });
    }
    cells
}

impl Grid {
    pub(crate) fn new(cell_size: f64, cell_count: usize) -> HshgResult<Self> {
        validate_cell_count(cell_count)?;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(HshgError::InvalidCellSize { cell_size });
        }
        let row_column_count = (cell_count as f64).sqrt() as u32;
        Ok(Self {
            cell_size,
            inverse_cell_size: 1.0 / cell_size,
            row_column_count,
            hash_mask: row_column_count - 1,
            cells: build_cells(row_column_count),
            occupied: Vec::new(),
            objects: Vec::new(),
        })
    }

    // Scale by the inverse cell size, truncate toward zero, mask into range.
    // Negative coordinates mirror the masked value instead of taking a
    // modulo, which keeps the index valid for any finite magnitude. Callers
    // may rely on that exact boundary behavior.
    #[inline(always)]
    pub(crate) fn hash_point(&self, x: f64, y: f64) -> u32 {
        let x_hash = if x < 0.0 {
            self.row_column_count - 1 - ((-x * self.inverse_cell_size) as u32 & self.hash_mask)
        } else {
            (x * self.inverse_cell_size) as u32 & self.hash_mask
        };
        let y_hash = if y < 0.0 {
            self.row_column_count - 1 - ((-y * self.inverse_cell_size) as u32 & self.hash_mask)
        } else {
            (y * self.inverse_cell_size) as u32 & self.hash_mask
        };
        x_hash + y_hash * self.row_column_count
    }

    pub(crate) fn insert(
        &mut self,
        arena: &mut EntityArena,
        handle: EntityHandle,
        known_hash: Option<u32>,
    ) {
        let hash = match known_hash {
            Some(hash) => hash,
            None => {
                let aabb = arena.get(handle).aabb;
                self.hash_point(aabb.min[0], aabb.min[1])
            }
        };

        self.bucket_insert(arena, handle, hash);

        if self.objects.len() as f64 / self.cells.len() as f64 > MAX_OBJECT_CELL_DENSITY {
            self.expand(arena);
        }
    }

    fn bucket_insert(&mut self, arena: &mut EntityArena, handle: EntityHandle, hash: u32) {
        let cell = &mut self.cells[hash as usize];
        if cell.bucket.is_empty() {
            cell.occupied_index = self.occupied.len() as u32;
            self.occupied.push(hash);
        }

        let entity = arena.get_mut(handle);
        entity.hash = hash;
        entity.bucket_index = cell.bucket.len() as u32;
        entity.object_index = self.objects.len() as u32;
        cell.bucket.push(handle);
        self.objects.push(handle);
    }

    pub(crate) fn remove(&mut self, arena: &mut EntityArena, handle: EntityHandle) {
        let (hash, bucket_index, object_index) = {
            let entity = arena.get(handle);
            (entity.hash, entity.bucket_index, entity.object_index)
        };

        let cell = &mut self.cells[hash as usize];
        debug_assert_eq!(cell.bucket[bucket_index as usize], handle);
        cell.bucket.swap_remove(bucket_index as usize);
        if let Some(&moved) = cell.bucket.get(bucket_index as usize) {
            arena.get_mut(moved).bucket_index = bucket_index;
        }

        if cell.bucket.is_empty() {
            let occupied_index = cell.occupied_index;
            debug_assert_eq!(self.occupied[occupied_index as usize], hash);
            cell.occupied_index = INVALID_INDEX;
            self.occupied.swap_remove(occupied_index as usize);
            if let Some(&moved_cell) = self.occupied.get(occupied_index as usize) {
                self.cells[moved_cell as usize].occupied_index = occupied_index;
            }
        }

        debug_assert_eq!(self.objects[object_index as usize], handle);
        self.objects.swap_remove(object_index as usize);
        if let Some(&moved) = self.objects.get(object_index as usize) {
            arena.get_mut(moved).object_index = object_index;
        }
    }

    // Load-factor rehash: quadruple the cell count and double the cell size,
    // then re-bucket every tracked entity against the new layout. The object
    // list and the recorded object indices are preserved.
    pub(crate) fn expand(&mut self, arena: &mut EntityArena) {
        self.row_column_count *= 2;
        self.hash_mask = self.row_column_count - 1;
        self.cell_size *= HIERARCHY_FACTOR;
        self.inverse_cell_size = 1.0 / self.cell_size;
        self.cells = build_cells(self.row_column_count);
        self.occupied.clear();

        for object_index in 0..self.objects.len() {
            let handle = self.objects[object_index];
            let aabb = arena.get(handle).aabb;
            let hash = self.hash_point(aabb.min[0], aabb.min[1]);

            let cell = &mut self.cells[hash as usize];
            if cell.bucket.is_empty() {
                cell.occupied_index = self.occupied.len() as u32;
                self.occupied.push(hash);
            }
            let entity = arena.get_mut(handle);
            entity.hash = hash;
            entity.bucket_index = cell.bucket.len() as u32;
            debug_assert_eq!(entity.object_index as usize, object_index);
            cell.bucket.push(handle);
        }
    }
}
