use super::*;
use common::aabb::Aabb;
use crate::error::{HshgError, HshgResult};
use fxhash::FxHashMap;

impl Hshg {
    pub fn new() -> Self {
        Self::with_config(Config::default()).expect("default config is valid")
    }

    pub fn with_config(config: Config) -> HshgResult<Self> {
        config.validate()?;
        Ok(Self {
            grids: Vec::new(),
            grid_order: Vec::new(),
            arena: EntityArena::with_capacity(config.entity_capacity),
            registry: Vec::with_capacity(config.entity_capacity),
            id_map: FxHashMap::default(),
            next_id: 0,
            config,
        })
    }

    // Ids are assigned monotonically and never reused for the lifetime of
    // the structure.
    pub fn insert(&mut self, aabb: Aabb, active: bool) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;

        let handle = self.arena.insert(Entity {
            id,
            aabb,
            active,
            hash: 0,
            bucket_index: 0,
            object_index: 0,
            registry_index: self.registry.len() as u32,
            grid: INVALID_INDEX,
        });
        self.registry.push(handle);
        self.id_map.insert(id, handle);

        let object_size = hierarchy::clamped_object_size(&aabb);
        self.place(handle, object_size);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> HshgResult<()> {
        let handle = match self.id_map.remove(&id) {
            Some(handle) => handle,
            None => {
                log::warn!("remove: entity {} is not tracked", id);
                return Err(HshgError::UnknownEntity { id });
            }
        };
        self.remove_handle(handle);
        Ok(())
    }

    // Replaces the box and active flag in place. Bucket placement is not
    // reconciled until the next update() pass.
    pub fn update_aabb(&mut self, id: EntityId, aabb: Aabb, active: bool) -> HshgResult<()> {
        let handle = match self.id_map.get(&id) {
            Some(&handle) => handle,
            None => {
                log::warn!("update_aabb: entity {} is not tracked", id);
                return Err(HshgError::UnknownEntity { id });
            }
        };
        let entity = self.arena.get_mut(handle);
        entity.aabb = aabb;
        entity.active = active;
        Ok(())
    }

    pub fn update(&mut self) {
        self.rehash_all();
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.id_map.contains_key(&id)
    }

    pub fn aabb(&self, id: EntityId) -> Option<Aabb> {
        self.id_map
            .get(&id)
            .map(|&handle| self.arena.get(handle).aabb)
    }

    pub fn level_stats(&self) -> Vec<LevelStats> {
        self.grid_order
            .iter()
            .map(|&slot| {
                let grid = &self.grids[slot as usize];
                LevelStats {
                    cell_size: grid.cell_size,
                    cell_count: grid.cells.len(),
                    occupied_cell_count: grid.occupied.len(),
                    entity_count: grid.objects.len(),
                }
            })
            .collect()
    }
}

impl Default for Hshg {
    fn default() -> Self {
        Self::new()
    }
}
