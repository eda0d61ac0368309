/*!
 * Process Manager Tests
 * Tests for slot assignment, roster bookkeeping and termination statistics
 */

use pretty_assertions::assert_eq;
use sim_os_kernel::process::{ProcessError, ProcessManager, TerminationMode};
use sim_os_kernel::SimConfig;

fn manager() -> ProcessManager {
    ProcessManager::new(2, 3, 3000)
}

#[test]
fn test_from_config_sizes() {
    let config = SimConfig::default();
    let pm = ProcessManager::from_config(&config);

    assert_eq!(pm.cpu_list().len(), config.num_cpus);
    assert_eq!(pm.process_slots().len(), config.max_processes);
    assert_eq!(pm.io_queue().io_duration(), config.io_duration_ms);
}

#[test]
fn test_cpu_claims_are_first_fit() {
    let mut pm = manager();

    assert_eq!(pm.claim_cpu(10), Some(0));
    assert_eq!(pm.claim_cpu(11), Some(1));
    assert_eq!(pm.claim_cpu(12), None);

    assert_eq!(pm.release_cpu(10), Some(0));
    assert_eq!(pm.claim_cpu(12), Some(0));
    assert_eq!(pm.cpu_of(12), Some(0));
    assert_eq!(pm.cpu_of(10), None);
}

#[test]
fn test_home_slot_is_stable() {
    let mut pm = manager();

    assert_eq!(pm.assign_home_slot(1), Some(0));
    assert_eq!(pm.assign_home_slot(2), Some(1));
    assert_eq!(pm.assign_home_slot(1), Some(0));
    assert_eq!(pm.home_anchor(2), Some(pm.process_slots()[1].anchor));
}

#[test]
fn test_process_slots_run_out() {
    let mut pm = manager();
    for pid in 1..=3 {
        assert!(pm.assign_home_slot(pid).is_some());
    }
    assert_eq!(pm.assign_home_slot(4), None);
    assert_eq!(pm.process_slots().free_count(), 0);
}

#[test]
fn test_register_twice_fails() {
    let mut pm = manager();
    pm.register(1).unwrap();

    assert_eq!(pm.register(1), Err(ProcessError::AlreadyRegistered(1)));
    assert!(pm.is_registered(1));
}

#[test]
fn test_terminate_frees_seats() {
    let mut pm = manager();
    pm.register(1).unwrap();
    pm.assign_home_slot(1);
    pm.claim_cpu(1);

    pm.terminate_process(1, false, TerminationMode::Starved, 50_000);

    assert_eq!(pm.cpu_of(1), None);
    assert_eq!(pm.home_slot(1), None);
    assert!(pm.is_terminated(1));
    assert!(pm.is_registered(1));
}

#[test]
fn test_del_process_errors() {
    let mut pm = manager();

    assert_eq!(pm.del_process(9), Err(ProcessError::NotFound(9)));

    pm.register(9).unwrap();
    assert_eq!(pm.del_process(9), Err(ProcessError::StillRunning(9)));

    pm.terminate_process(9, false, TerminationMode::Graceful, 1000);
    assert_eq!(pm.del_process(9), Ok(()));
    assert!(!pm.is_registered(9));
    assert_eq!(pm.del_process(9), Err(ProcessError::NotFound(9)));
}

#[test]
fn test_termination_stats() {
    let mut pm = manager();
    for pid in 1..=4 {
        pm.register(pid).unwrap();
    }
    pm.terminate_process(1, false, TerminationMode::Graceful, 1000);
    pm.terminate_process(2, true, TerminationMode::Graceful, 2000);
    pm.terminate_process(3, false, TerminationMode::Starved, 3000);
    pm.del_process(1).unwrap();

    let stats = pm.stats();
    assert_eq!(stats.graceful, 2);
    assert_eq!(stats.starved, 1);
    assert_eq!(stats.by_user, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(pm.roster().collect::<Vec<_>>(), vec![2, 3, 4]);
    assert!(!pm.is_terminated(1));
    assert!(pm.is_terminated(2) && pm.is_terminated(3));
}

#[test]
fn test_repeated_termination_counts_once() {
    let mut pm = manager();
    pm.register(5).unwrap();
    pm.terminate_process(5, true, TerminationMode::Starved, 1000);
    pm.terminate_process(5, true, TerminationMode::Starved, 2000);

    assert_eq!(pm.stats().starved, 1);
    assert_eq!(pm.stats().by_user, 1);

    pm.del_process(5).unwrap();
    assert!(!pm.is_terminated(5));
    assert_eq!(pm.stats().removed, 1);
}
