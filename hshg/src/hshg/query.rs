use super::*;

impl Hshg {
    // Pair sweep. For every occupied cell: every distinct active pair within
    // the bucket, then every active cross pair against the four cells in the
    // leading half of the neighbor-offset list. The self offset is excluded
    // and the trailing half is covered when those cells take their own turn,
    // so every unordered pair is reported exactly once. Pairs across
    // hierarchy levels are never tested.
    pub fn for_each_pair<F>(&self, mut f: F)
    where
        F: FnMut(EntityId, EntityId),
    {
        for &slot in &self.grid_order {
            let grid = &self.grids[slot as usize];
            for &cell_index in &grid.occupied {
                let cell = &grid.cells[cell_index as usize];

                for k in 0..cell.bucket.len() {
                    let a = self.arena.get(cell.bucket[k]);
                    if !a.active {
                        continue;
                    }
                    for l in (k + 1)..cell.bucket.len() {
                        let b = self.arena.get(cell.bucket[l]);
                        if !b.active {
                            continue;
                        }
                        if a.aabb.overlaps(&b.aabb) {
                            f(a.id, b.id);
                        }
                    }
                }

                for &offset in &cell.neighbor_offsets[..4] {
                    let neighbor = &grid.cells[(cell_index as i32 + offset) as usize];
                    if neighbor.bucket.is_empty() {
                        continue;
                    }
                    for &handle_a in &cell.bucket {
                        let a = self.arena.get(handle_a);
                        if !a.active {
                            continue;
                        }
                        for &handle_b in &neighbor.bucket {
                            let b = self.arena.get(handle_b);
                            if !b.active {
                                continue;
                            }
                            if a.aabb.overlaps(&b.aabb) {
                                f(a.id, b.id);
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn query(&self) -> Vec<(EntityId, EntityId)> {
        let mut pairs = Vec::new();
        self.for_each_pair(|a, b| pairs.push((a, b)));
        pairs
    }

    pub fn count(&self) -> usize {
        let mut count = 0;
        self.for_each_pair(|_, _| count += 1);
        count
    }
}
