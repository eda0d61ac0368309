/*!
 * Simulated OS Kernel Library
 * Process lifecycle simulation: CPUs, pages, IO and starvation
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod simulation;

// Re-exports
pub use crate::core::{
    Difficulty, InputEvent, Pid, Position, RandomSource, SeededRandom, SimConfig, SimError,
    SimResult, StubMode, StubRandom, Timestamp,
};
pub use memory::{MemoryError, MemoryStats, Page, PageManager};
pub use monitoring::init_tracing;
pub use process::{
    BlockReason, CpuState, IoQueue, Lifecycle, Process, ProcessError, ProcessManager,
    TerminationMode,
};
pub use simulation::{Simulation, SimulationStats, TickReport};
