/*!
 * Memory Types
 * Common types for page management
 */

use crate::core::types::Pid;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Page {index} of process {pid} not found")]
    #[diagnostic(
        code(memory::page_not_found),
        help("The page was never allocated or its process has ended.")
    )]
    PageNotFound { pid: Pid, index: u8 },

    #[error("Page index {index} out of range for process {pid} (limit {limit})")]
    #[diagnostic(code(memory::page_index_out_of_range))]
    PageIndexOutOfRange { pid: Pid, index: u8, limit: usize },

    #[error("Page {index} of process {pid} already exists")]
    #[diagnostic(code(memory::page_already_exists))]
    PageAlreadyExists { pid: Pid, index: u8 },
}

/// Page identity: owning process and its per-process index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageId {
    pub pid: Pid,
    pub index: u8,
}

impl PageId {
    #[inline]
    pub const fn new(pid: Pid, index: u8) -> Self {
        Self { pid, index }
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.pid, self.index)
    }
}

/// Page table statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_pages: usize,
    pub resident_pages: usize,
    pub swapped_pages: usize,
    pub ram_capacity: usize,
}

impl MemoryStats {
    pub fn ram_free(&self) -> usize {
        self.ram_capacity.saturating_sub(self.resident_pages)
    }

    pub fn usage_percentage(&self) -> f64 {
        if self.ram_capacity == 0 {
            return 100.0;
        }
        self.resident_pages as f64 / self.ram_capacity as f64 * 100.0
    }
}
