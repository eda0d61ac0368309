/*!
 * Process Table
 * Storage for live `Process` values, ordered by pid
 */

use super::io_queue::{IoCompletionSink, IoTicket};
use super::state_machine::Process;
use super::types::{ProcessError, ProcessResult};
use crate::core::types::Pid;
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    processes: BTreeMap<Pid, Process>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, process: Process) -> ProcessResult<()> {
        let pid = process.pid();
        if self.processes.contains_key(&pid) {
            return Err(ProcessError::AlreadyRegistered(pid));
        }
        self.processes.insert(pid, process);
        Ok(())
    }

    pub fn get(&self, pid: Pid) -> ProcessResult<&Process> {
        self.processes.get(&pid).ok_or(ProcessError::NotFound(pid))
    }

    pub fn get_mut(&mut self, pid: Pid) -> ProcessResult<&mut Process> {
        self.processes
            .get_mut(&pid)
            .ok_or(ProcessError::NotFound(pid))
    }

    pub fn remove(&mut self, pid: Pid) -> ProcessResult<Process> {
        self.processes
            .remove(&pid)
            .ok_or(ProcessError::NotFound(pid))
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    /// Pids in ascending order
    pub fn pids(&self) -> Vec<Pid> {
        self.processes.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

impl IoCompletionSink for ProcessTable {
    fn complete_io(&mut self, pid: Pid, ticket: IoTicket) -> bool {
        match self.processes.get_mut(&pid) {
            Some(process) => process.complete_io(ticket),
            None => {
                trace!(pid, ticket = ticket.0, "IO completion for a removed process dropped");
                false
            }
        }
    }
}
