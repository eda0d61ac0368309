/*!
 * Process Types
 * Common types for process management
 */

use crate::core::types::{Pid, Position};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ProcessError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(process::not_found),
        help("The process may have been removed or never existed. Check PID validity.")
    )]
    NotFound(Pid),

    #[error("Process {0} has not ended")]
    #[diagnostic(
        code(process::still_running),
        help("Only ended processes can be removed from the roster.")
    )]
    StillRunning(Pid),

    #[error("Process {0} is already registered")]
    #[diagnostic(code(process::already_registered))]
    AlreadyRegistered(Pid),
}

/// Why a CPU-holding process cannot make progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    #[default]
    None,
    WaitingForPage,
    WaitingForIo,
}

/// CPU occupancy; a block reason only exists while a CPU is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CpuState {
    #[default]
    Idle,
    Running { slot: usize, block: BlockReason },
}

impl CpuState {
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    #[inline]
    pub fn block_reason(&self) -> BlockReason {
        match self {
            Self::Idle => BlockReason::None,
            Self::Running { block, .. } => *block,
        }
    }

    #[inline]
    pub fn slot(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Running { slot, .. } => Some(*slot),
        }
    }
}

/// How a process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationMode {
    /// Finished on its own while healthy
    Graceful,
    /// Died of starvation
    Starved,
}

/// Terminal once it leaves `Alive`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "lifecycle", content = "mode", rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Alive,
    Ended(TerminationMode),
}

impl Lifecycle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// Aggregated termination counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerminationStats {
    pub graceful: usize,
    pub starved: usize,
    pub by_user: usize,
    pub removed: usize,
}

/// Per-process state exposed to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub pid: Pid,
    pub position: Position,
    pub target: Option<Position>,
    pub blink: bool,
    pub starvation_level: u8,
    pub cpu: CpuState,
    pub lifecycle: Lifecycle,
    pub page_count: usize,
}
