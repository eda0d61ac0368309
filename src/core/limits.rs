/*!
 * Simulation Limits and Constants
 *
 * Centralized location for default thresholds, capacities and layout numbers.
 * Runtime-tunable values are mirrored as defaults in `SimConfig`.
 */

use super::types::Millis;

// =============================================================================
// PROCESS LIMITS
// =============================================================================

/// Upper bound of pages a single process may own
pub const MAX_PAGES_PER_PROCESS: usize = 4;

/// Highest starvation level a process can survive
pub const LAST_ALIVE_STARVATION_LEVEL: u8 = 5;

/// Terminal starvation sentinel, always one past the last alive level
pub const DEAD_STARVATION_LEVEL: u8 = LAST_ALIVE_STARVATION_LEVEL + 1;

/// Starvation level a freshly spawned process starts at
pub const INITIAL_STARVATION_LEVEL: u8 = 1;

/// Default number of CPU slots
pub const DEFAULT_NUM_CPUS: usize = 4;

/// Default number of processes spawned at startup
pub const DEFAULT_PROCESSES_AT_STARTUP: usize = 14;

/// Default number of process slots (home anchors)
pub const DEFAULT_MAX_PROCESSES: usize = 42;

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Pages held by one RAM row
pub const PAGES_PER_RAM_ROW: usize = 16;

/// Default number of RAM rows
pub const DEFAULT_RAM_ROWS: usize = 8;

// =============================================================================
// TIMING (milliseconds of simulation time)
// =============================================================================

/// Idle or blocked time that costs one starvation level
pub const DEFAULT_STARVATION_INTERVAL: Millis = 10_000;

/// Unblocked CPU time that recovers one starvation level
pub const DEFAULT_UNSTARVE_DURATION: Millis = 5_000;

/// Time between an IO request and its resolution
pub const DEFAULT_IO_DURATION: Millis = 3_000;

/// Window after an IO trigger during which no new IO is rolled
pub const DEFAULT_IO_COOLDOWN: Millis = 5_000;

/// Minimum spacing between probability rolls of one process
pub const DEFAULT_EVENT_CHECK_INTERVAL: Millis = 1_000;

/// Blink toggle period while waiting for a page
pub const DEFAULT_BLINK_INTERVAL: Millis = 200;

// =============================================================================
// PROBABILITIES
// =============================================================================

/// Resolution of probability rolls (1 / 10_000)
pub const PROBABILITY_RESOLUTION: u32 = 10_000;

pub const DEFAULT_NEW_PROCESS_PROBABILITY: f64 = 0.05;
pub const DEFAULT_IO_PROBABILITY: f64 = 0.01;
pub const DEFAULT_GRACEFUL_TERMINATION_PROBABILITY: f64 = 0.01;
pub const DEFAULT_PAGE_GROWTH_PROBABILITY: f64 = 0.1;

// =============================================================================
// PRESENTATION LAYOUT
// =============================================================================

/// Process sprite size
pub const PROCESS_VIEW_WIDTH: i32 = 64;
pub const PROCESS_VIEW_HEIGHT: i32 = 64;

/// Pixels moved per animation frame while heading toward a target
pub const ANIMATION_SPEED: i32 = 35;

/// Nominal animation frame length
pub const ANIMATION_FRAME_MS: Millis = 16;

/// Cap on frames applied by a single update; every update moves at least one
pub const MAX_ANIMATION_FRAMES_PER_UPDATE: u64 = 2;

/// Gap between neighbouring slots
pub const SLOT_SPACING: i32 = 5;

/// Top-left of the CPU row
pub const CPU_ROW_ORIGIN_X: i32 = 50;
pub const CPU_ROW_ORIGIN_Y: i32 = 50;

/// Top-left of the process slot grid
pub const PROCESS_GRID_ORIGIN_X: i32 = 50;
pub const PROCESS_GRID_ORIGIN_Y: i32 = 150;

/// Process slots per grid row
pub const PROCESS_GRID_COLUMNS: usize = 7;
