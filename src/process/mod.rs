/*!
 * Process Module
 * Process state machine, CPU/process slots, IO queue and management
 */

pub mod io_queue;
pub mod manager;
pub mod slots;
pub mod state_machine;
pub mod table;
pub mod types;
pub mod view;

// Re-export for convenience
pub use io_queue::{IoCompletionSink, IoQueue, IoRequest, IoTicket};
pub use manager::ProcessManager;
pub use slots::{CpuSlot, ProcessSlot, Slot, SlotList};
pub use state_machine::{Process, SimContext};
pub use table::ProcessTable;
pub use types::*;
pub use view::ProcessView;
