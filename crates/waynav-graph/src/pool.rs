//! Pooled neighbour-edge records.
//!
//! Graph repair churns edges every tick; allocating and freeing a record per
//! edge would thrash the allocator.  `EdgePool` keeps all records in one
//! arena and recycles slots through an index freelist: releasing a slot
//! pushes its index, allocating pops one and **overwrites both fields** —
//! a released record holds stale data until then, so nothing may read a
//! slot after releasing it.

use waynav_core::WaypointId;

/// Index of an edge record inside the pool.
pub type EdgeSlot = u32;

/// A directed neighbour edge: target waypoint plus the distance to it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub target: WaypointId,
    pub distance: f32,
}

/// Freelist arena of [`Edge`] records.
#[derive(Default)]
pub struct EdgePool {
    records: Vec<Edge>,
    free: Vec<EdgeSlot>,
}

impl EdgePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a slot holding `target`/`distance`, recycling a released
    /// slot when one is available.
    pub fn alloc(&mut self, target: WaypointId, distance: f32) -> EdgeSlot {
        match self.free.pop() {
            Some(slot) => {
                self.records[slot as usize] = Edge { target, distance };
                slot
            }
            None => {
                self.records.push(Edge { target, distance });
                (self.records.len() - 1) as EdgeSlot
            }
        }
    }

    /// Return `slot` to the freelist.  The record keeps its stale fields
    /// until the slot is reused.
    pub fn release(&mut self, slot: EdgeSlot) {
        self.free.push(slot);
    }

    #[inline]
    pub fn get(&self, slot: EdgeSlot) -> &Edge {
        &self.records[slot as usize]
    }

    /// Total records ever allocated (live + recycled).
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Slots currently on the freelist.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}
