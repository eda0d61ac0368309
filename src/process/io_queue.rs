/*!
 * IO Queue
 *
 * Pending IO completion timers. Time and delivery are separate steps:
 * [`IoQueue::update`] only advances the clock, [`IoQueue::process_events`]
 * hands every due request to its owner in FIFO order and drops it.
 */

use crate::core::types::{Millis, Pid, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Identifies one IO request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IoTicket(pub u64);

/// A pending IO completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoRequest {
    pub ticket: IoTicket,
    pub pid: Pid,
    pub enqueued_at: Timestamp,
    pub resolves_at: Timestamp,
}

/// Receiver of IO completions
pub trait IoCompletionSink {
    /// Deliver a completion; returns whether a waiting process was unblocked
    fn complete_io(&mut self, pid: Pid, ticket: IoTicket) -> bool;
}

#[derive(Debug, Clone)]
pub struct IoQueue {
    pending: VecDeque<IoRequest>,
    io_duration: Millis,
    now: Timestamp,
    next_ticket: u64,
}

impl IoQueue {
    pub fn new(io_duration: Millis) -> Self {
        Self {
            pending: VecDeque::new(),
            io_duration,
            now: 0,
            next_ticket: 1,
        }
    }

    /// Record an IO wait for `pid` resolving `io_duration` after `time`
    pub fn enqueue(&mut self, pid: Pid, time: Timestamp) -> IoTicket {
        let ticket = IoTicket(self.next_ticket);
        self.next_ticket += 1;

        let request = IoRequest {
            ticket,
            pid,
            enqueued_at: time,
            resolves_at: time.saturating_add(self.io_duration),
        };
        trace!(pid, ticket = ticket.0, resolves_at = request.resolves_at, "IO request queued");
        self.pending.push_back(request);
        ticket
    }

    /// Advance the queue clock
    pub fn update(&mut self, time: Timestamp) {
        self.now = self.now.max(time);
    }

    /// Current queue clock
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Requests whose resolution time has been reached
    pub fn ready(&self) -> impl Iterator<Item = &IoRequest> {
        let now = self.now;
        self.pending.iter().filter(move |req| req.resolves_at <= now)
    }

    /// Deliver every due request to `sink` in insertion order
    ///
    /// Returns the number of requests delivered.
    pub fn process_events<S: IoCompletionSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let now = self.now;
        let mut delivered = 0;
        let mut unblocked = 0;

        self.pending.retain(|req| {
            if req.resolves_at > now {
                return true;
            }
            if sink.complete_io(req.pid, req.ticket) {
                unblocked += 1;
            }
            delivered += 1;
            false
        });

        if delivered > 0 {
            debug!(delivered, unblocked, now, "IO completions delivered");
        }
        delivered
    }

    pub fn pending(&self) -> impl Iterator<Item = &IoRequest> {
        self.pending.iter()
    }

    pub fn has_pending_for(&self, pid: Pid) -> bool {
        self.pending.iter().any(|req| req.pid == pid)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn io_duration(&self) -> Millis {
        self.io_duration
    }
}
