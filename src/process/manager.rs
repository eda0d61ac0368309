/*!
 * Process Management
 * Owns CPU slots, process slots, the IO queue and the live roster
 */

use super::io_queue::IoQueue;
use super::slots::SlotList;
use super::types::{ProcessError, ProcessResult, TerminationMode, TerminationStats};
use crate::core::config::SimConfig;
use crate::core::types::{Pid, Position, Timestamp};
use std::collections::BTreeSet;
use tracing::{debug, info, trace};

pub struct ProcessManager {
    cpu_list: SlotList,
    process_slots: SlotList,
    io_queue: IoQueue,
    roster: BTreeSet<Pid>,
    /// Ended but not yet removed from the roster
    terminated: BTreeSet<Pid>,
    stats: TerminationStats,
}

impl ProcessManager {
    pub fn new(num_cpus: usize, num_process_slots: usize, io_duration: u64) -> Self {
        info!(
            num_cpus,
            num_process_slots, io_duration, "Process manager initialized"
        );
        Self {
            cpu_list: SlotList::cpus(num_cpus),
            process_slots: SlotList::process_slots(num_process_slots),
            io_queue: IoQueue::new(io_duration),
            roster: BTreeSet::new(),
            terminated: BTreeSet::new(),
            stats: TerminationStats::default(),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.num_cpus, config.max_processes, config.io_duration_ms)
    }

    pub fn cpu_list(&self) -> &SlotList {
        &self.cpu_list
    }

    pub fn cpu_list_mut(&mut self) -> &mut SlotList {
        &mut self.cpu_list
    }

    pub fn process_slots(&self) -> &SlotList {
        &self.process_slots
    }

    pub fn process_slots_mut(&mut self) -> &mut SlotList {
        &mut self.process_slots
    }

    pub fn io_queue(&self) -> &IoQueue {
        &self.io_queue
    }

    pub fn io_queue_mut(&mut self) -> &mut IoQueue {
        &mut self.io_queue
    }

    /// Seat `pid` on the first free CPU
    pub fn claim_cpu(&mut self, pid: Pid) -> Option<usize> {
        let slot = self.cpu_list.claim_first_free(pid);
        match slot {
            Some(slot) => debug!(pid, slot, "CPU acquired"),
            None => trace!(pid, "No free CPU"),
        }
        slot
    }

    pub fn release_cpu(&mut self, pid: Pid) -> Option<usize> {
        let slot = self.cpu_list.release(pid);
        if let Some(slot) = slot {
            debug!(pid, slot, "CPU released");
        }
        slot
    }

    pub fn cpu_of(&self, pid: Pid) -> Option<usize> {
        self.cpu_list.position_of(pid)
    }

    pub fn cpu_anchor(&self, slot: usize) -> Option<Position> {
        self.cpu_list.get(slot).map(|s| s.anchor)
    }

    /// Give `pid` the first free process slot as its home
    pub fn assign_home_slot(&mut self, pid: Pid) -> Option<usize> {
        if let Some(existing) = self.process_slots.position_of(pid) {
            return Some(existing);
        }
        self.process_slots.claim_first_free(pid)
    }

    pub fn home_slot(&self, pid: Pid) -> Option<usize> {
        self.process_slots.position_of(pid)
    }

    pub fn home_anchor(&self, pid: Pid) -> Option<Position> {
        self.home_slot(pid)
            .and_then(|slot| self.process_slots.get(slot))
            .map(|slot| slot.anchor)
    }

    /// Add `pid` to the live roster
    pub fn register(&mut self, pid: Pid) -> ProcessResult<()> {
        if !self.roster.insert(pid) {
            return Err(ProcessError::AlreadyRegistered(pid));
        }
        Ok(())
    }

    pub fn is_registered(&self, pid: Pid) -> bool {
        self.roster.contains(&pid)
    }

    pub fn roster(&self) -> impl Iterator<Item = Pid> + '_ {
        self.roster.iter().copied()
    }

    /// Record that `pid` ended and free its seats
    pub fn terminate_process(
        &mut self,
        pid: Pid,
        by_user: bool,
        mode: TerminationMode,
        time: Timestamp,
    ) {
        self.cpu_list.release(pid);
        self.process_slots.release(pid);
        if !self.terminated.insert(pid) {
            return;
        }
        match mode {
            TerminationMode::Graceful => self.stats.graceful += 1,
            TerminationMode::Starved => self.stats.starved += 1,
        }
        if by_user {
            self.stats.by_user += 1;
        }
        info!(pid, by_user, ?mode, time, "Process terminated");
    }

    pub fn is_terminated(&self, pid: Pid) -> bool {
        self.terminated.contains(&pid)
    }

    /// Drop a terminated process from the live roster
    pub fn del_process(&mut self, pid: Pid) -> ProcessResult<()> {
        if !self.roster.contains(&pid) {
            return Err(ProcessError::NotFound(pid));
        }
        if !self.terminated.remove(&pid) {
            return Err(ProcessError::StillRunning(pid));
        }
        self.roster.remove(&pid);
        self.stats.removed += 1;
        debug!(pid, "Process removed from roster");
        Ok(())
    }

    pub fn stats(&self) -> TerminationStats {
        self.stats
    }
}
