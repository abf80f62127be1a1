use std::time::Duration;

use splash_engine::{EngineConfig, EngineHandle};

#[test]
fn shutdown_is_idempotent_and_marks_the_handle() {
    let engine = EngineHandle::new(EngineConfig::default());
    assert!(!engine.is_shut_down());

    engine.shutdown();
    engine.shutdown();

    assert!(engine.is_shut_down());
    assert!(engine.try_recv().is_none());
}

#[cfg(target_os = "linux")]
fn thread_count() -> usize {
    let status = std::fs::read_to_string("/proc/self/status").unwrap();
    status
        .lines()
        .find_map(|line| line.strip_prefix("Threads:"))
        .and_then(|rest| rest.trim().parse().ok())
        .unwrap()
}

/// A manual retry tears one engine down and builds a fresh one, so shutdown
/// has to reclaim the worker and its runtime pool every time.
#[cfg(target_os = "linux")]
#[test]
fn repeated_boots_do_not_accumulate_threads() {
    let baseline = thread_count();

    for _ in 0..3 {
        let engine = EngineHandle::new(EngineConfig::default());
        engine.check_connectivity("relative/target.html");
        engine.shutdown();
    }

    // Sibling tests may briefly hold threads of their own.
    let mut now = thread_count();
    for _ in 0..100 {
        if now <= baseline {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
        now = thread_count();
    }
    assert!(
        now <= baseline,
        "thread count grew from {baseline} to {now} across dropped boots"
    );
}
