/*!
 * Page
 * A single memory unit owned by one process
 */

use super::types::PageId;
use crate::core::types::Pid;
use serde::{Deserialize, Serialize};

/// Memory page metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    /// Paged out to secondary storage
    pub in_swap: bool,
    /// Owner currently holds a CPU
    pub in_use: bool,
}

impl Page {
    pub fn new(pid: Pid, index: u8, in_swap: bool) -> Self {
        Self {
            id: PageId::new(pid, index),
            in_swap,
            in_use: false,
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.id.pid
    }

    #[inline]
    pub fn index(&self) -> u8 {
        self.id.index
    }

    /// Toggle residency without any capacity check
    pub fn swap(&mut self) {
        self.in_swap = !self.in_swap;
    }
}
