/*!
 * CPU and Process Slots
 *
 * Fixed-size seat arrays addressed by index. A CPU slot holds at most one
 * running process; a process slot is the home anchor a process returns to
 * when it gives up its CPU. Claim and release are single-step updates.
 */

use crate::core::limits::{
    CPU_ROW_ORIGIN_X, CPU_ROW_ORIGIN_Y, PROCESS_GRID_COLUMNS, PROCESS_GRID_ORIGIN_X,
    PROCESS_GRID_ORIGIN_Y, PROCESS_VIEW_HEIGHT, PROCESS_VIEW_WIDTH, SLOT_SPACING,
};
use crate::core::types::{Pid, Position};
use serde::{Deserialize, Serialize};

/// A seat that at most one process occupies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub anchor: Position,
    occupant: Option<Pid>,
}

/// Seat representing a running process
pub type CpuSlot = Slot;

/// Home seat of an idle process
pub type ProcessSlot = Slot;

impl Slot {
    pub fn new(index: usize, anchor: Position) -> Self {
        Self {
            index,
            anchor,
            occupant: None,
        }
    }

    #[inline]
    pub fn occupant(&self) -> Option<Pid> {
        self.occupant
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    /// Seat `pid` unconditionally, returning the previous occupant
    pub fn occupy(&mut self, pid: Pid) -> Option<Pid> {
        self.occupant.replace(pid)
    }

    pub fn free(&mut self) -> Option<Pid> {
        self.occupant.take()
    }
}

/// Anchor of CPU slot `index`: one horizontal row
pub fn cpu_anchor(index: usize) -> Position {
    Position::new(
        CPU_ROW_ORIGIN_X + index as i32 * (PROCESS_VIEW_WIDTH + SLOT_SPACING),
        CPU_ROW_ORIGIN_Y,
    )
}

/// Anchor of process slot `index`: a grid filled row by row
pub fn process_slot_anchor(index: usize) -> Position {
    let column = (index % PROCESS_GRID_COLUMNS) as i32;
    let row = (index / PROCESS_GRID_COLUMNS) as i32;
    Position::new(
        PROCESS_GRID_ORIGIN_X + column * (PROCESS_VIEW_WIDTH + SLOT_SPACING),
        PROCESS_GRID_ORIGIN_Y + row * (PROCESS_VIEW_HEIGHT + SLOT_SPACING),
    )
}

/// Ordered, fixed-length list of slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotList {
    slots: Vec<Slot>,
}

impl SlotList {
    pub fn new(count: usize, anchor: impl Fn(usize) -> Position) -> Self {
        Self {
            slots: (0..count).map(|i| Slot::new(i, anchor(i))).collect(),
        }
    }

    pub fn cpus(count: usize) -> Self {
        Self::new(count, cpu_anchor)
    }

    pub fn process_slots(count: usize) -> Self {
        Self::new(count, process_slot_anchor)
    }

    /// First-fit claim in index order
    pub fn claim_first_free(&mut self, pid: Pid) -> Option<usize> {
        let slot = self.slots.iter_mut().find(|slot| slot.is_free())?;
        slot.occupy(pid);
        Some(slot.index)
    }

    /// Index of the slot holding `pid`
    pub fn position_of(&self, pid: Pid) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.occupant() == Some(pid))
    }

    /// Free whichever slot holds `pid`
    pub fn release(&mut self, pid: Pid) -> Option<usize> {
        let index = self.position_of(pid)?;
        self.slots[index].free();
        Some(index)
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_free()).count()
    }
}

impl std::ops::Index<usize> for SlotList {
    type Output = Slot;

    fn index(&self, index: usize) -> &Slot {
        &self.slots[index]
    }
}

impl std::ops::IndexMut<usize> for SlotList {
    fn index_mut(&mut self, index: usize) -> &mut Slot {
        &mut self.slots[index]
    }
}
