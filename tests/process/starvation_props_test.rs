/*!
 * Starvation Property Tests
 * Level bounds and monotonicity over arbitrary update schedules
 */

use proptest::prelude::*;
use sim_os_kernel::core::limits::{DEAD_STARVATION_LEVEL, LAST_ALIVE_STARVATION_LEVEL};
use sim_os_kernel::{SeededRandom, SimConfig, Simulation, StubRandom};

fn quiet_config() -> SimConfig {
    SimConfig::default()
        .with_processes_at_startup(0)
        .with_new_process_probability(0.0)
        .with_io_probability(0.0)
        .with_graceful_termination_probability(0.0)
        .with_page_growth_probability(0.0)
}

proptest! {
    #[test]
    fn idle_level_tracks_elapsed_intervals(steps in prop::collection::vec(1u64..7_000, 1..60)) {
        let mut sim = Simulation::new(quiet_config(), StubRandom::max()).unwrap();
        let pid = sim.spawn_process().unwrap();
        let interval = sim.config().starvation_interval_ms;

        let mut time = 0;
        for step in steps {
            time += step;
            sim.update_process(pid, time, &[]).unwrap();
            let process = sim.process(pid).unwrap();

            let expected = 1 + time / interval;
            if expected > LAST_ALIVE_STARVATION_LEVEL as u64 {
                prop_assert!(process.has_ended());
                prop_assert_eq!(process.starvation_level(), DEAD_STARVATION_LEVEL);
                break;
            }
            prop_assert!(!process.has_ended());
            prop_assert_eq!(process.starvation_level() as u64, expected);
        }
    }

    #[test]
    fn running_never_starves(steps in prop::collection::vec(1u64..3_000, 1..80)) {
        let mut sim = Simulation::new(quiet_config(), StubRandom::max()).unwrap();
        let pid = sim.spawn_process().unwrap();
        sim.use_cpu(pid).unwrap();

        let mut time = 0;
        let mut previous = sim.process(pid).unwrap().starvation_level();
        for step in steps {
            time += step;
            sim.update_process(pid, time, &[]).unwrap();
            let level = sim.process(pid).unwrap().starvation_level();
            prop_assert!(level <= previous);
            previous = level;
        }
        prop_assert!(!sim.process(pid).unwrap().has_ended());
    }

    #[test]
    fn seeded_runs_keep_invariants(seed in any::<u64>(), ticks in 1u64..400) {
        let config = SimConfig::default().with_processes_at_startup(10);
        let mut sim = Simulation::new(config, SeededRandom::new(seed)).unwrap();
        sim.start();

        for tick in 1..=ticks {
            let pids = sim.processes().pids();
            if !pids.is_empty() {
                sim.toggle(pids[tick as usize % pids.len()]).unwrap();
            }
            sim.tick(tick * 250, &[]);

            let running = sim.processes().iter().filter(|p| p.has_cpu()).count();
            let alive = sim.processes().iter().filter(|p| !p.has_ended()).count();
            prop_assert!(running <= sim.config().num_cpus);
            prop_assert!(alive <= sim.config().max_processes);

            for process in sim.processes().iter() {
                prop_assert!(process.starvation_level() <= DEAD_STARVATION_LEVEL);
                if process.has_ended() {
                    prop_assert!(!process.has_cpu());
                    prop_assert!(!sim.pages().has_pages(process.pid()));
                } else {
                    prop_assert!(process.starvation_level() <= LAST_ALIVE_STARVATION_LEVEL);
                }
            }
        }
    }
}
