use super::*;

struct Slot {
    entity: Entity,
    generation: u32,
    next_free: u32,
}

pub(crate) struct EntityArena {
    slots: Vec<Slot>,
    free_head: u32,
    len: usize,
}

impl EntityArena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: INVALID_INDEX,
            len: 0,
        }
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> EntityHandle {
        self.len += 1;
        if self.free_head != INVALID_INDEX {
            let index = self.free_head;
            let slot = &mut self.slots[index as usize];
            self.free_head = slot.next_free;
            slot.next_free = INVALID_INDEX;
            slot.entity = entity;
            EntityHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                entity,
                generation: 0,
                next_free: INVALID_INDEX,
            });
            EntityHandle {
                index,
                generation: 0,
            }
        }
    }

    pub(crate) fn remove(&mut self, handle: EntityHandle) {
        debug_assert!(self.contains(handle));
        let slot = &mut self.slots[handle.index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.next_free = self.free_head;
        self.free_head = handle.index;
        self.len -= 1;
    }

    #[inline(always)]
    pub(crate) fn get(&self, handle: EntityHandle) -> &Entity {
        let slot = &self.slots[handle.index as usize];
        debug_assert_eq!(slot.generation, handle.generation);
        &slot.entity
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self, handle: EntityHandle) -> &mut Entity {
        let slot = &mut self.slots[handle.index as usize];
        debug_assert_eq!(slot.generation, handle.generation);
        &mut slot.entity
    }

    pub(crate) fn contains(&self, handle: EntityHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .map_or(false, |slot| slot.generation == handle.generation)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
