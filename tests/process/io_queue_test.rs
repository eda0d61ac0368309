/*!
 * IO Queue Tests
 * Tests for timed IO completion, FIFO delivery and the process table sink
 */

use pretty_assertions::assert_eq;
use sim_os_kernel::process::{IoCompletionSink, IoQueue, IoTicket, Process, ProcessTable};
use sim_os_kernel::{Pid, Position};

/// Sink that records deliveries and unblocks only listed pids
struct SelectiveSink {
    accept: Vec<Pid>,
    delivered: Vec<Pid>,
}

impl IoCompletionSink for SelectiveSink {
    fn complete_io(&mut self, pid: Pid, _ticket: IoTicket) -> bool {
        self.delivered.push(pid);
        self.accept.contains(&pid)
    }
}

#[test]
fn test_tickets_are_unique_and_increasing() {
    let mut queue = IoQueue::new(3000);
    let tickets: Vec<IoTicket> = (1..=5).map(|pid| queue.enqueue(pid, 0)).collect();

    for pair in tickets.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    assert_eq!(queue.len(), 5);
}

#[test]
fn test_resolution_time_uses_duration() {
    let mut queue = IoQueue::new(3000);
    queue.enqueue(7, 1200);

    let request = queue.pending().next().copied().unwrap();
    assert_eq!(request.pid, 7);
    assert_eq!(request.enqueued_at, 1200);
    assert_eq!(request.resolves_at, 4200);
}

#[test]
fn test_partial_delivery_keeps_later_requests() {
    let mut queue = IoQueue::new(1000);
    queue.enqueue(1, 0);
    queue.enqueue(2, 500);
    queue.enqueue(3, 2000);

    queue.update(1500);
    assert_eq!(queue.ready().count(), 2);

    let mut sink = SelectiveSink {
        accept: vec![1],
        delivered: Vec::new(),
    };
    assert_eq!(queue.process_events(&mut sink), 2);
    assert_eq!(sink.delivered, vec![1, 2]);
    assert_eq!(queue.len(), 1);
    assert!(queue.has_pending_for(3));
    assert!(!queue.has_pending_for(1));
}

#[test]
fn test_delivery_to_missing_process_is_dropped() {
    let mut queue = IoQueue::new(0);
    let mut table = ProcessTable::new();
    table
        .insert(Process::new(1, 0, Position::new(0, 0)))
        .unwrap();

    queue.enqueue(42, 0);
    queue.update(0);

    assert_eq!(queue.process_events(&mut table), 1);
    assert!(queue.is_empty());
}

#[test]
fn test_idle_process_ignores_completion() {
    let mut table = ProcessTable::new();
    table
        .insert(Process::new(1, 0, Position::new(0, 0)))
        .unwrap();

    assert!(!table.complete_io(1, IoTicket(1)));
    assert!(!table.get(1).unwrap().is_waiting_for_io());
}
