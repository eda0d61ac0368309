/*!
 * Memory Module
 * Page ownership, residency and swap
 */

pub mod page;
pub mod page_manager;
pub mod types;

// Re-export for convenience
pub use page::Page;
pub use page_manager::PageManager;
pub use types::*;
