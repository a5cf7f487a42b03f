//! Object id allocation with FIFO reuse of freed ids.

use crate::geometry::limits;
use crate::model::ObjectId;
use std::collections::{HashSet, VecDeque};

/// Issues ids for objects in one document.
///
/// Freed ids are queued and handed out again, oldest first, before the
/// counter advances. The allocator tracks which ids are live so that an id is
/// never given to two objects at once, including ids adopted from decoded
/// streams through [`IdAllocator::claim`].
#[derive(Clone, Debug)]
pub struct IdAllocator {
    next: u32,
    free: VecDeque<ObjectId>,
    live: HashSet<ObjectId>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        // 0 belongs to the root.
        IdAllocator { next: 1, free: VecDeque::new(), live: HashSet::new() }
    }

    /// Rebuild allocator state for a loaded tree holding `ids`. Returns the
    /// first id that cannot be claimed (a duplicate, the root id or one past
    /// `limits::MAX_OBJECT_ID`) as an error.
    pub fn rebuild<I: IntoIterator<Item = ObjectId>>(ids: I) -> Result<Self, ObjectId> {
        let mut alloc = IdAllocator::new();
        for id in ids {
            if !alloc.claim(id) {
                return Err(id);
            }
        }
        Ok(alloc)
    }

    pub fn allocate(&mut self) -> ObjectId {
        let id = match self.free.pop_front() {
            Some(id) => id,
            None => {
                let id = ObjectId(self.next);
                self.next += 1;
                id
            }
        };
        self.live.insert(id);
        id
    }

    /// Release `id` for reuse. Returns false if it was not live.
    pub fn free(&mut self, id: ObjectId) -> bool {
        if self.live.remove(&id) {
            self.free.push_back(id);
            true
        } else {
            false
        }
    }

    /// Adopt an id that was assigned elsewhere (e.g. by a decoded stream).
    /// Fails if the id is already live, is the root id or lies above
    /// `limits::MAX_OBJECT_ID`; the allocator is left untouched then.
    pub fn claim(&mut self, id: ObjectId) -> bool {
        if id == ObjectId::ROOT || id.0 > limits::MAX_OBJECT_ID || self.live.contains(&id) {
            return false;
        }
        let Some(after) = id.0.checked_add(1) else { return false };
        self.free.retain(|f| *f != id);
        if after > self.next {
            self.next = after;
        }
        self.live.insert(id);
        true
    }

    /// Keep `wanted` when it is free to take, otherwise allocate a fresh id.
    pub fn claim_or_allocate(&mut self, wanted: Option<ObjectId>) -> ObjectId {
        match wanted {
            Some(id) if self.claim(id) => id,
            Some(id) => {
                let fresh = self.allocate();
                log::warn!("event=id_collision module=ids wanted={} assigned={}", id, fresh);
                fresh
            }
            None => self.allocate(),
        }
    }

    pub fn is_live(&self, id: ObjectId) -> bool {
        self.live.contains(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Ids waiting for reuse, in the order they will be handed out.
    pub fn free_queue(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.free.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_after_root() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), ObjectId(1));
        assert_eq!(ids.allocate(), ObjectId(2));
    }

    #[test]
    fn test_freed_ids_reused_oldest_first() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        let _c = ids.allocate();
        assert!(ids.free(b));
        assert!(ids.free(a));
        assert_eq!(ids.allocate(), b);
        assert_eq!(ids.allocate(), a);
        assert_eq!(ids.allocate(), ObjectId(4));
    }

    #[test]
    fn test_double_free_is_rejected() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        assert!(ids.free(a));
        assert!(!ids.free(a));
        assert_eq!(ids.free_queue().count(), 1);
    }

    #[test]
    fn test_claim_removes_from_free_queue_and_bumps_counter() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        ids.free(a);
        assert!(ids.claim(a));
        assert!(!ids.claim(a));
        assert!(ids.claim(ObjectId(10)));
        assert_eq!(ids.allocate(), ObjectId(11));
        assert!(!ids.claim(ObjectId::ROOT));
    }

    #[test]
    fn test_claim_rejects_ids_past_the_ceiling() {
        let mut ids = IdAllocator::new();
        assert!(!ids.claim(ObjectId(u32::MAX)));
        assert!(!ids.claim(ObjectId(limits::MAX_OBJECT_ID + 1)));
        assert_eq!(ids.live_count(), 0);
        assert_eq!(ids.allocate(), ObjectId(1));

        assert!(ids.claim(ObjectId(limits::MAX_OBJECT_ID)));
        assert_eq!(ids.allocate(), ObjectId(limits::MAX_OBJECT_ID + 1));
        assert_eq!(ids.claim_or_allocate(Some(ObjectId(u32::MAX))), ObjectId(limits::MAX_OBJECT_ID + 2));
        assert_eq!(IdAllocator::rebuild([ObjectId(3), ObjectId(u32::MAX)]).unwrap_err(), ObjectId(u32::MAX));
    }

    #[test]
    fn test_claim_or_allocate_on_collision() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        let got = ids.claim_or_allocate(Some(a));
        assert_ne!(got, a);
        assert!(ids.is_live(a) && ids.is_live(got));
    }

    #[test]
    fn test_rebuild_detects_duplicates() {
        assert_eq!(
            IdAllocator::rebuild([ObjectId(1), ObjectId(2), ObjectId(1)]).unwrap_err(),
            ObjectId(1)
        );
        let mut ids = IdAllocator::rebuild([ObjectId(3), ObjectId(1)]).unwrap();
        assert_eq!(ids.live_count(), 2);
        assert_eq!(ids.allocate(), ObjectId(4));
    }
}
