/*!
 * Page Manager
 *
 * Owns every page in the simulation, keyed by `(pid, index)`.
 *
 * ## Residency
 *
 * - New pages land in RAM while resident pages are below capacity and are
 *   created already swapped out otherwise
 * - [`PageManager::swap_page`] moves a page between RAM and swap, declining
 *   to bring a page in when RAM is full
 * - [`Page::swap`] toggles residency unconditionally
 *
 * Processes never hold `Page` values; they address pages by pid.
 */

use super::page::Page;
use super::types::{MemoryError, MemoryResult, MemoryStats, PageId};
use crate::core::config::SimConfig;
use crate::core::types::Pid;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use tracing::{debug, trace};

/// Page table for all processes
#[derive(Debug, Clone)]
pub struct PageManager {
    pages: BTreeMap<PageId, Page>,
    ram_capacity: usize,
    max_pages_per_process: usize,
}

#[inline]
fn pid_range(pid: Pid) -> RangeInclusive<PageId> {
    PageId::new(pid, 0)..=PageId::new(pid, u8::MAX)
}

impl PageManager {
    pub fn new(ram_capacity: usize, max_pages_per_process: usize) -> Self {
        debug!(
            ram_capacity,
            max_pages_per_process, "Page manager initialized"
        );
        Self {
            pages: BTreeMap::new(),
            ram_capacity,
            max_pages_per_process,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.ram_capacity(), config.max_pages_per_process)
    }

    pub fn max_pages_per_process(&self) -> usize {
        self.max_pages_per_process
    }

    pub fn ram_capacity(&self) -> usize {
        self.ram_capacity
    }

    /// Allocate page `index` for `pid`
    pub fn create_page(&mut self, pid: Pid, index: u8) -> MemoryResult<&Page> {
        if index as usize >= self.max_pages_per_process {
            return Err(MemoryError::PageIndexOutOfRange {
                pid,
                index,
                limit: self.max_pages_per_process,
            });
        }
        let id = PageId::new(pid, index);
        if self.pages.contains_key(&id) {
            return Err(MemoryError::PageAlreadyExists { pid, index });
        }

        let in_swap = self.resident_count() >= self.ram_capacity;
        trace!(page = %id, in_swap, "Page created");
        Ok(self.pages.entry(id).or_insert(Page::new(pid, index, in_swap)))
    }

    pub fn get_page(&self, pid: Pid, index: u8) -> MemoryResult<&Page> {
        self.pages
            .get(&PageId::new(pid, index))
            .ok_or(MemoryError::PageNotFound { pid, index })
    }

    pub fn get_page_mut(&mut self, pid: Pid, index: u8) -> MemoryResult<&mut Page> {
        self.pages
            .get_mut(&PageId::new(pid, index))
            .ok_or(MemoryError::PageNotFound { pid, index })
    }

    /// Pages of one process in index order
    pub fn pages_of(&self, pid: Pid) -> impl Iterator<Item = &Page> {
        self.pages.range(pid_range(pid)).map(|(_, page)| page)
    }

    /// All pages in `(pid, index)` order
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    pub fn page_count(&self, pid: Pid) -> usize {
        self.pages_of(pid).count()
    }

    pub fn has_pages(&self, pid: Pid) -> bool {
        self.pages_of(pid).next().is_some()
    }

    /// Whether any page of `pid` is swapped out
    pub fn has_swapped_page(&self, pid: Pid) -> bool {
        self.pages_of(pid).any(|page| page.in_swap)
    }

    /// Mark every page of `pid` as (not) in use
    pub fn set_in_use(&mut self, pid: Pid, in_use: bool) {
        for (_, page) in self.pages.range_mut(pid_range(pid)) {
            page.in_use = in_use;
        }
    }

    /// Move a page between RAM and swap
    ///
    /// Returns `Ok(false)` when the page would enter a full RAM.
    pub fn swap_page(&mut self, pid: Pid, index: u8) -> MemoryResult<bool> {
        let ram_full = self.resident_count() >= self.ram_capacity;
        let page = self.get_page_mut(pid, index)?;
        if page.in_swap && ram_full {
            trace!(page = %page.id, "Swap-in declined, RAM full");
            return Ok(false);
        }
        page.swap();
        debug!(page = %page.id, in_swap = page.in_swap, "Page swapped");
        Ok(true)
    }

    /// Remove every page of `pid`; returns how many were freed
    pub fn delete_process_pages(&mut self, pid: Pid) -> usize {
        let ids: Vec<PageId> = self.pages.range(pid_range(pid)).map(|(id, _)| *id).collect();
        for id in &ids {
            self.pages.remove(id);
        }
        if !ids.is_empty() {
            debug!(pid, freed = ids.len(), "Process pages freed");
        }
        ids.len()
    }

    pub fn resident_count(&self) -> usize {
        self.pages.values().filter(|page| !page.in_swap).count()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn stats(&self) -> MemoryStats {
        let resident_pages = self.resident_count();
        MemoryStats {
            total_pages: self.pages.len(),
            resident_pages,
            swapped_pages: self.pages.len() - resident_pages,
            ram_capacity: self.ram_capacity,
        }
    }
}
