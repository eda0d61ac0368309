/*!
 * Simulation Host
 *
 * Owns the configuration, the process table, the process manager, the page
 * manager and the random source, and lends them to processes as a
 * [`SimContext`].
 *
 * ## Tick order
 *
 * 1. Advance the IO queue to the tick time and deliver due completions
 * 2. Update every live process in ascending pid order
 * 3. Remove ended processes that have left the screen
 * 4. On an event check, roll for a new process
 *
 * Pid order matters: CPU acquisition is first-fit, so when two idle
 * processes race for the last free CPU the lower pid wins.
 */

use crate::core::config::SimConfig;
use crate::core::errors::SimResult;
use crate::core::random::RandomSource;
use crate::core::types::{InputEvent, Pid, Timestamp};
use crate::memory::{MemoryResult, MemoryStats, PageManager};
use crate::monitoring::tick_span;
use crate::process::{
    Process, ProcessManager, ProcessResult, ProcessSnapshot, ProcessTable, SimContext,
    TerminationStats,
};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// What happened during one [`Simulation::tick`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub time: Timestamp,
    pub io_delivered: usize,
    pub removed: Vec<Pid>,
    pub spawned: Option<Pid>,
}

/// Aggregate view of a running simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStats {
    pub time: Timestamp,
    pub live_processes: usize,
    pub running: usize,
    pub blocked: usize,
    pub pending_io: usize,
    pub terminations: TerminationStats,
    pub memory: MemoryStats,
}

pub struct Simulation<R: RandomSource> {
    config: SimConfig,
    processes: ProcessTable,
    manager: ProcessManager,
    pages: PageManager,
    random: R,
    next_pid: Pid,
    now: Timestamp,
    last_spawn_check: Timestamp,
}

impl<R: RandomSource> Simulation<R> {
    pub fn new(config: SimConfig, random: R) -> SimResult<Self> {
        config.validate()?;
        info!(name = %config.name, "Simulation created");
        Ok(Self {
            manager: ProcessManager::from_config(&config),
            pages: PageManager::from_config(&config),
            processes: ProcessTable::new(),
            config,
            random,
            next_pid: 1,
            now: 0,
            last_spawn_check: 0,
        })
    }

    /// Spawn the configured startup processes
    pub fn start(&mut self) -> Vec<Pid> {
        let spawned: Vec<Pid> = (0..self.config.num_processes_at_startup)
            .filter_map(|_| self.spawn_process())
            .collect();
        info!(count = spawned.len(), "Startup processes spawned");
        spawned
    }

    /// Create a process in the first free process slot
    ///
    /// Declined (None) when every slot is taken.
    pub fn spawn_process(&mut self) -> Option<Pid> {
        let pid = self.next_pid;
        let Some(slot) = self.manager.assign_home_slot(pid) else {
            trace!("No free process slot, spawn declined");
            return None;
        };
        let anchor = self.manager.process_slots()[slot].anchor;

        if let Err(err) = self.manager.register(pid) {
            warn!(pid, error = %err, "Spawn failed");
            self.manager.process_slots_mut().release(pid);
            return None;
        }
        if let Err(err) = self.processes.insert(Process::new(pid, self.now, anchor)) {
            warn!(pid, error = %err, "Spawn failed");
            return None;
        }
        self.next_pid += 1;
        debug!(pid, slot, "Process spawned");
        Some(pid)
    }

    /// Run `f` on one process with the shared resources lent out
    pub fn with_process<T>(
        &mut self,
        pid: Pid,
        f: impl FnOnce(&mut Process, &mut SimContext<'_>) -> T,
    ) -> ProcessResult<T> {
        let Self {
            config,
            processes,
            manager,
            pages,
            random,
            ..
        } = self;
        let process = processes.get_mut(pid)?;
        let mut ctx = SimContext {
            config,
            manager,
            pages,
            random,
        };
        Ok(f(process, &mut ctx))
    }

    pub fn use_cpu(&mut self, pid: Pid) -> ProcessResult<()> {
        self.with_process(pid, |process, ctx| process.use_cpu(ctx))
    }

    pub fn yield_cpu(&mut self, pid: Pid) -> ProcessResult<()> {
        self.with_process(pid, |process, ctx| process.yield_cpu(ctx))
    }

    pub fn toggle(&mut self, pid: Pid) -> ProcessResult<()> {
        self.with_process(pid, |process, ctx| process.toggle(ctx))
    }

    pub fn update_process(
        &mut self,
        pid: Pid,
        time: Timestamp,
        events: &[InputEvent],
    ) -> ProcessResult<()> {
        self.with_process(pid, |process, ctx| process.update(time, events, ctx))
    }

    /// Advance IO timers without delivering anything
    pub fn io_update(&mut self, time: Timestamp) {
        self.manager.io_queue_mut().update(time);
    }

    /// Deliver due IO completions to their processes
    pub fn io_process_events(&mut self) -> usize {
        self.manager
            .io_queue_mut()
            .process_events(&mut self.processes)
    }

    /// Host-side page swap (capacity aware)
    pub fn swap_page(&mut self, pid: Pid, index: u8) -> MemoryResult<bool> {
        self.pages.swap_page(pid, index)
    }

    pub fn tick(&mut self, time: Timestamp, events: &[InputEvent]) -> TickReport {
        let _span = tick_span(time).entered();
        self.now = self.now.max(time);

        self.io_update(time);
        let io_delivered = self.io_process_events();

        for pid in self.processes.pids() {
            if let Err(err) = self.update_process(pid, time, events) {
                warn!(pid, error = %err, "Process update skipped");
            }
        }

        let removed = self.remove_finished();
        let spawned = self.maybe_spawn(time);

        TickReport {
            time,
            io_delivered,
            removed,
            spawned,
        }
    }

    /// Drop ended processes that have left the screen
    pub fn remove_finished(&mut self) -> Vec<Pid> {
        let finished: Vec<Pid> = self
            .processes
            .iter()
            .filter(|process| process.is_off_screen())
            .map(Process::pid)
            .collect();

        finished
            .into_iter()
            .filter(|&pid| match self.manager.del_process(pid) {
                Ok(()) => self.processes.remove(pid).is_ok(),
                Err(err) => {
                    warn!(pid, error = %err, "Process removal refused");
                    false
                }
            })
            .collect()
    }

    fn maybe_spawn(&mut self, time: Timestamp) -> Option<Pid> {
        if time.saturating_sub(self.last_spawn_check) < self.config.event_check_interval_ms {
            return None;
        }
        self.last_spawn_check = time;
        if !self.random.chance(self.config.new_process_probability) {
            return None;
        }
        self.spawn_process()
    }

    pub fn process(&self, pid: Pid) -> ProcessResult<&Process> {
        self.processes.get(pid)
    }

    pub fn processes(&self) -> &ProcessTable {
        &self.processes
    }

    pub fn manager(&self) -> &ProcessManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ProcessManager {
        &mut self.manager
    }

    pub fn pages(&self) -> &PageManager {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut PageManager {
        &mut self.pages
    }

    pub fn random_mut(&mut self) -> &mut R {
        &mut self.random
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn snapshot(&self) -> Vec<ProcessSnapshot> {
        self.processes
            .iter()
            .map(|process| process.snapshot(&self.pages))
            .collect()
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            time: self.now,
            live_processes: self.processes.len(),
            running: self.processes.iter().filter(|p| p.has_cpu()).count(),
            blocked: self.processes.iter().filter(|p| p.is_blocked()).count(),
            pending_io: self.manager.io_queue().len(),
            terminations: self.manager.stats(),
            memory: self.pages.stats(),
        }
    }
}
