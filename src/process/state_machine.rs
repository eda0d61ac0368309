/*!
 * Process State Machine
 *
 * A simulated process competing for CPU slots and pages.
 *
 * # State
 *
 * - **CPU**: idle, or running on a slot with a block reason
 *   (none / waiting for a page / waiting for IO)
 * - **Lifecycle**: alive, or ended gracefully / by starvation (terminal)
 * - **Starvation**: `0` is content, `1..=last_alive` are alive levels,
 *   `last_alive + 1` means dead
 *
 * # Tick order
 *
 * [`Process::update`] handles clicks, steps the animation, re-evaluates
 * blocking (a swapped page beats a pending IO), rolls page growth, IO and
 * graceful termination on event checks, then accrues starvation or recovery.
 *
 * Shared resources are reached through [`SimContext`]; a process only keeps
 * identifiers (its pid, its CPU slot index, its IO ticket).
 */

use super::io_queue::IoTicket;
use super::manager::ProcessManager;
use super::types::{BlockReason, CpuState, Lifecycle, ProcessSnapshot, TerminationMode};
use super::view::ProcessView;
use crate::core::config::SimConfig;
use crate::core::random::RandomSource;
use crate::core::types::{InputEvent, Millis, Pid, Position, Timestamp};
use crate::memory::PageManager;
use tracing::{debug, info, warn};

/// Borrowed view of everything a process interacts with during a call
pub struct SimContext<'a> {
    pub config: &'a SimConfig,
    pub manager: &'a mut ProcessManager,
    pub pages: &'a mut PageManager,
    pub random: &'a mut dyn RandomSource,
}

#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    cpu: CpuState,
    lifecycle: Lifecycle,
    starvation_level: u8,
    /// Regime at the last update: running unblocked (true) or not
    progressing: bool,
    last_update_time: Timestamp,
    last_state_change_time: Timestamp,
    /// Time of a regime change made during the current update
    regime_changed_at: Option<Timestamp>,
    current_state_duration: Millis,
    last_event_check_time: Timestamp,
    last_blink_time: Timestamp,
    pending_io: Option<IoTicket>,
    /// Set by an IO trigger, cleared when the CPU is given up
    io_cooldown_since: Option<Timestamp>,
    page_cap: Option<usize>,
    view: ProcessView,
}

impl Process {
    pub fn new(pid: Pid, created_at: Timestamp, position: Position) -> Self {
        Self {
            pid,
            cpu: CpuState::Idle,
            lifecycle: Lifecycle::Alive,
            starvation_level: crate::core::limits::INITIAL_STARVATION_LEVEL,
            progressing: false,
            last_update_time: created_at,
            last_state_change_time: created_at,
            regime_changed_at: None,
            current_state_duration: 0,
            last_event_check_time: created_at,
            last_blink_time: created_at,
            pending_io: None,
            io_cooldown_since: None,
            page_cap: None,
            view: ProcessView::new(position),
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn cpu_state(&self) -> CpuState {
        self.cpu
    }

    #[inline]
    pub fn has_cpu(&self) -> bool {
        self.cpu.is_running()
    }

    #[inline]
    pub fn block_reason(&self) -> BlockReason {
        self.cpu.block_reason()
    }

    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.block_reason() != BlockReason::None
    }

    #[inline]
    pub fn is_waiting_for_io(&self) -> bool {
        self.block_reason() == BlockReason::WaitingForIo
    }

    #[inline]
    pub fn is_waiting_for_page(&self) -> bool {
        self.block_reason() == BlockReason::WaitingForPage
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    pub fn has_ended(&self) -> bool {
        !self.lifecycle.is_alive()
    }

    pub fn termination_mode(&self) -> Option<TerminationMode> {
        match self.lifecycle {
            Lifecycle::Alive => None,
            Lifecycle::Ended(mode) => Some(mode),
        }
    }

    #[inline]
    pub fn starvation_level(&self) -> u8 {
        self.starvation_level
    }

    /// Time spent in the current starvation regime as of the last update
    #[inline]
    pub fn current_state_duration(&self) -> Millis {
        self.current_state_duration
    }

    /// Running unblocked with starvation left to recover
    pub fn is_progressing_to_happiness(&self) -> bool {
        self.lifecycle.is_alive()
            && self.cpu.is_running()
            && !self.is_blocked()
            && self.starvation_level > 0
    }

    #[inline]
    pub fn display_blink_color(&self) -> bool {
        self.view.blink
    }

    pub fn pending_io(&self) -> Option<IoTicket> {
        self.pending_io
    }

    /// Page cap fixed at the first CPU acquisition
    pub fn page_cap(&self) -> Option<usize> {
        self.page_cap
    }

    pub fn view(&self) -> &ProcessView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ProcessView {
        &mut self.view
    }

    /// Ended and fully above the top edge
    pub fn is_off_screen(&self) -> bool {
        self.has_ended() && self.view.position.y <= -self.view.height
    }

    pub fn snapshot(&self, pages: &PageManager) -> ProcessSnapshot {
        ProcessSnapshot {
            pid: self.pid,
            position: self.view.position,
            target: self.view.target,
            blink: self.view.blink,
            starvation_level: self.starvation_level,
            cpu: self.cpu,
            lifecycle: self.lifecycle,
            page_count: pages.page_count(self.pid),
        }
    }

    /// Take the first free CPU; allocates the initial pages on first use
    pub fn use_cpu(&mut self, ctx: &mut SimContext<'_>) {
        if self.cpu.is_running() || !self.lifecycle.is_alive() {
            return;
        }
        let Some(slot) = ctx.manager.claim_cpu(self.pid) else {
            return;
        };
        self.cpu = CpuState::Running {
            slot,
            block: BlockReason::None,
        };
        if let Some(anchor) = ctx.manager.cpu_anchor(slot) {
            self.view.set_target(anchor);
        }

        let max_pages = ctx.pages.max_pages_per_process().max(1);
        self.page_cap.get_or_insert(max_pages);
        if !ctx.pages.has_pages(self.pid) {
            let count = ctx.random.get_number(1, max_pages as u32) as usize;
            for index in 0..count.clamp(1, max_pages) {
                if let Err(err) = ctx.pages.create_page(self.pid, index as u8) {
                    warn!(pid = self.pid, error = %err, "Initial page allocation failed");
                }
            }
        }
        ctx.pages.set_in_use(self.pid, true);
    }

    /// Give up the CPU and head back to the home slot
    pub fn yield_cpu(&mut self, ctx: &mut SimContext<'_>) {
        if !self.cpu.is_running() {
            return;
        }
        ctx.manager.release_cpu(self.pid);
        self.cpu = CpuState::Idle;
        self.pending_io = None;
        self.io_cooldown_since = None;
        ctx.pages.set_in_use(self.pid, false);
        if let Some(anchor) = ctx.manager.home_anchor(self.pid) {
            self.view.set_target(anchor);
        }
    }

    pub fn toggle(&mut self, ctx: &mut SimContext<'_>) {
        if self.cpu.is_running() {
            self.yield_cpu(ctx);
        } else {
            self.use_cpu(ctx);
        }
    }

    /// Deliver an IO completion; stale tickets are ignored
    pub fn complete_io(&mut self, ticket: IoTicket) -> bool {
        if self.pending_io != Some(ticket) {
            return false;
        }
        self.pending_io = None;
        if let CpuState::Running { block, .. } = &mut self.cpu {
            if *block == BlockReason::WaitingForIo {
                *block = BlockReason::None;
                debug!(pid = self.pid, "IO completed");
                return true;
            }
        }
        false
    }

    /// Advance the process to `time`
    pub fn update(&mut self, time: Timestamp, events: &[InputEvent], ctx: &mut SimContext<'_>) {
        let elapsed = time.saturating_sub(self.last_update_time);
        if !self.lifecycle.is_alive() {
            let exit = Position::new(self.view.position.x, -self.view.height);
            self.view.set_target(exit);
            self.view.move_toward_target(elapsed);
            self.last_update_time = time;
            return;
        }

        for event in events {
            match event {
                InputEvent::PointerClick { position } => {
                    if !self.view.is_moving() && self.view.bounds().contains(*position) {
                        self.toggle(ctx);
                        self.regime_changed_at = Some(time);
                    }
                }
                InputEvent::PointerMotion { .. } | InputEvent::KeyUp { .. } => {}
            }
        }

        self.view.step(elapsed);

        let event_check =
            time.saturating_sub(self.last_event_check_time) >= ctx.config.event_check_interval_ms;
        if event_check {
            self.last_event_check_time = time;
        }

        if self.cpu.is_running() {
            self.refresh_block(time, event_check, ctx);
        }

        if event_check
            && self.cpu.is_running()
            && !self.is_blocked()
            && ctx.random.chance(ctx.config.graceful_termination_probability)
        {
            self.end(TerminationMode::Graceful, time, ctx);
        }

        if self.lifecycle.is_alive() {
            self.accrue_starvation(time, ctx);
        }

        if self.is_waiting_for_page()
            && time.saturating_sub(self.last_blink_time) >= ctx.config.blink_interval_ms
        {
            self.view.toggle_blink();
            self.last_blink_time = time;
        }

        self.last_update_time = time;
        self.debug_check_invariants(ctx);
    }

    fn refresh_block(&mut self, time: Timestamp, event_check: bool, ctx: &mut SimContext<'_>) {
        let previous = self.block_reason();
        let block = if ctx.pages.has_swapped_page(self.pid) {
            BlockReason::WaitingForPage
        } else if self.pending_io.is_some() {
            BlockReason::WaitingForIo
        } else if event_check {
            self.try_grow_pages(ctx);
            if self.try_trigger_io(time, ctx) {
                self.regime_changed_at = Some(time);
                BlockReason::WaitingForIo
            } else {
                BlockReason::None
            }
        } else {
            BlockReason::None
        };

        // The swap happened some time after the previous update
        if block == BlockReason::WaitingForPage && previous != BlockReason::WaitingForPage {
            self.last_blink_time = self.last_update_time;
        }
        if let CpuState::Running { block: current, .. } = &mut self.cpu {
            *current = block;
        }
    }

    fn try_grow_pages(&mut self, ctx: &mut SimContext<'_>) {
        let cap = self.page_cap.unwrap_or(ctx.pages.max_pages_per_process());
        let count = ctx.pages.page_count(self.pid);
        if count >= cap || !ctx.random.chance(ctx.config.page_growth_probability) {
            return;
        }
        match ctx.pages.create_page(self.pid, count as u8) {
            Ok(page) => debug!(pid = self.pid, index = count, in_swap = page.in_swap, "Page added"),
            Err(err) => warn!(pid = self.pid, error = %err, "Page growth failed"),
        }
        ctx.pages.set_in_use(self.pid, true);
    }

    fn in_io_cooldown(&self, time: Timestamp, cooldown: Millis) -> bool {
        self.io_cooldown_since
            .is_some_and(|since| time < since.saturating_add(cooldown))
    }

    fn try_trigger_io(&mut self, time: Timestamp, ctx: &mut SimContext<'_>) -> bool {
        // A process on its last alive level either recovers or dies; it is not re-blocked.
        if self.starvation_level >= ctx.config.last_alive_starvation_level
            || self.in_io_cooldown(time, ctx.config.io_cooldown_ms)
            || !ctx.random.chance(ctx.config.io_probability)
        {
            return false;
        }
        let ticket = ctx.manager.io_queue_mut().enqueue(self.pid, time);
        self.pending_io = Some(ticket);
        self.io_cooldown_since = Some(time);
        debug!(pid = self.pid, ticket = ticket.0, "Waiting for IO");
        true
    }

    /// Flips made during this update are dated at `time`, others at the previous update
    fn accrue_starvation(&mut self, time: Timestamp, ctx: &mut SimContext<'_>) {
        let progressing = self.cpu.is_running() && !self.is_blocked();
        let changed_at = self.regime_changed_at.take();
        if progressing != self.progressing {
            let flip_at = changed_at
                .unwrap_or(self.last_update_time)
                .clamp(self.last_state_change_time, time.max(self.last_state_change_time));
            if !self.accrue_regime(flip_at, ctx) {
                return;
            }
            self.progressing = progressing;
            self.last_state_change_time = flip_at;
        }
        self.accrue_regime(time, ctx);
    }

    /// Apply whole intervals of the current regime up to `until`; false if the process starved
    fn accrue_regime(&mut self, until: Timestamp, ctx: &mut SimContext<'_>) -> bool {
        self.current_state_duration = until.saturating_sub(self.last_state_change_time);

        if self.progressing {
            let step = ctx.config.unstarve_ms;
            while self.starvation_level > 0 && self.current_state_duration >= step {
                self.starvation_level -= 1;
                self.last_state_change_time += step;
                self.current_state_duration -= step;
            }
        } else {
            let step = ctx.config.starvation_interval_ms;
            while self.current_state_duration >= step {
                if self.starvation_level >= ctx.config.last_alive_starvation_level {
                    self.end(TerminationMode::Starved, until, ctx);
                    return false;
                }
                self.starvation_level += 1;
                self.last_state_change_time += step;
                self.current_state_duration -= step;
            }
        }
        true
    }

    fn end(&mut self, mode: TerminationMode, time: Timestamp, ctx: &mut SimContext<'_>) {
        ctx.manager.release_cpu(self.pid);
        self.cpu = CpuState::Idle;
        self.pending_io = None;
        self.io_cooldown_since = None;
        self.regime_changed_at = None;
        ctx.pages.delete_process_pages(self.pid);

        self.lifecycle = Lifecycle::Ended(mode);
        self.starvation_level = match mode {
            TerminationMode::Graceful => 0,
            TerminationMode::Starved => ctx.config.dead_starvation_level(),
        };
        self.view
            .set_target(Position::new(self.view.position.x, -self.view.height));

        match mode {
            TerminationMode::Graceful => info!(pid = self.pid, time, "Process finished gracefully"),
            TerminationMode::Starved => info!(pid = self.pid, time, "Process starved to death"),
        }
        // Starvation is the player's neglect; a graceful finish is not
        let by_user = mode == TerminationMode::Starved;
        ctx.manager.terminate_process(self.pid, by_user, mode, time);
    }

    fn debug_check_invariants(&self, ctx: &SimContext<'_>) {
        debug_assert!(
            self.lifecycle.is_alive() || !self.cpu.is_running(),
            "ended process {} still holds a CPU",
            self.pid
        );
        debug_assert!(
            self.starvation_level != ctx.config.dead_starvation_level() || self.has_ended(),
            "process {} is dead but not ended",
            self.pid
        );
        debug_assert!(
            self.lifecycle.is_alive() || !ctx.pages.has_pages(self.pid),
            "ended process {} still owns pages",
            self.pid
        );
    }
}
