/*!
 * Page Manager Tests
 * Tests for page allocation, RAM capacity, swapping and per-process cleanup
 */

use pretty_assertions::assert_eq;
use sim_os_kernel::memory::{MemoryError, MemoryStats, PageManager};
use sim_os_kernel::SimConfig;

#[test]
fn test_from_config_capacity() {
    let config = SimConfig::default().with_ram_rows(2);
    let pm = PageManager::from_config(&config);

    assert_eq!(pm.ram_capacity(), 32);
    assert_eq!(pm.max_pages_per_process(), config.max_pages_per_process);
    assert!(pm.is_empty());
}

#[test]
fn test_create_and_get_page() {
    let mut pm = PageManager::new(16, 4);
    let page = pm.create_page(3, 1).unwrap();

    assert_eq!(page.pid(), 3);
    assert_eq!(page.index(), 1);
    assert!(!page.in_swap);
    assert_eq!(pm.page_count(3), 1);
    assert_eq!(pm.get_page(3, 1).unwrap().pid(), 3);
}

#[test]
fn test_create_page_errors() {
    let mut pm = PageManager::new(16, 4);
    pm.create_page(1, 0).unwrap();

    assert_eq!(
        pm.create_page(1, 0).unwrap_err(),
        MemoryError::PageAlreadyExists { pid: 1, index: 0 }
    );
    assert_eq!(
        pm.create_page(1, 4).unwrap_err(),
        MemoryError::PageIndexOutOfRange {
            pid: 1,
            index: 4,
            limit: 4
        }
    );
    assert_eq!(
        pm.get_page(2, 0).unwrap_err(),
        MemoryError::PageNotFound { pid: 2, index: 0 }
    );
}

#[test]
fn test_pages_overflow_into_swap() {
    let mut pm = PageManager::new(2, 4);
    pm.create_page(1, 0).unwrap();
    pm.create_page(1, 1).unwrap();
    let third = pm.create_page(2, 0).unwrap();

    assert!(third.in_swap);
    assert!(pm.has_swapped_page(2));
    assert!(!pm.has_swapped_page(1));
    assert_eq!(
        pm.stats(),
        MemoryStats {
            total_pages: 3,
            resident_pages: 2,
            swapped_pages: 1,
            ram_capacity: 2,
        }
    );
}

#[test]
fn test_swap_in_declined_when_ram_full() {
    let mut pm = PageManager::new(1, 4);
    pm.create_page(1, 0).unwrap();
    pm.create_page(2, 0).unwrap();

    assert_eq!(pm.swap_page(2, 0), Ok(false));
    assert!(pm.get_page(2, 0).unwrap().in_swap);

    // Make room, then the swap-in goes through
    assert_eq!(pm.swap_page(1, 0), Ok(true));
    assert_eq!(pm.swap_page(2, 0), Ok(true));
    assert!(!pm.get_page(2, 0).unwrap().in_swap);
    assert!(pm.get_page(1, 0).unwrap().in_swap);
}

#[test]
fn test_swap_missing_page() {
    let mut pm = PageManager::new(1, 4);
    assert_eq!(
        pm.swap_page(5, 2),
        Err(MemoryError::PageNotFound { pid: 5, index: 2 })
    );
}

#[test]
fn test_in_use_is_per_process() {
    let mut pm = PageManager::new(16, 4);
    pm.create_page(1, 0).unwrap();
    pm.create_page(1, 1).unwrap();
    pm.create_page(2, 0).unwrap();

    pm.set_in_use(1, true);

    assert!(pm.pages_of(1).all(|page| page.in_use));
    assert!(!pm.get_page(2, 0).unwrap().in_use);
}

#[test]
fn test_delete_process_pages() {
    let mut pm = PageManager::new(16, 4);
    for index in 0..3 {
        pm.create_page(1, index).unwrap();
    }
    pm.create_page(2, 0).unwrap();

    assert_eq!(pm.delete_process_pages(1), 3);
    assert_eq!(pm.delete_process_pages(1), 0);
    assert!(!pm.has_pages(1));
    assert_eq!(pm.len(), 1);
}

#[test]
fn test_iteration_order() {
    let mut pm = PageManager::new(16, 4);
    pm.create_page(2, 1).unwrap();
    pm.create_page(1, 3).unwrap();
    pm.create_page(2, 0).unwrap();

    let order: Vec<(u32, u8)> = pm.iter().map(|page| (page.pid(), page.index())).collect();
    assert_eq!(order, vec![(1, 3), (2, 0), (2, 1)]);
}

#[test]
fn test_stats_usage() {
    let mut pm = PageManager::new(4, 4);
    pm.create_page(1, 0).unwrap();

    let stats = pm.stats();
    assert_eq!(stats.ram_free(), 3);
    assert_eq!(stats.usage_percentage(), 25.0);
}
