use std::time::Duration;

use tracing_test::traced_test;

use super::{
    Observer, Operation, OperationSnapshot, Statistics, TracingObserver,
};

#[test]
fn statistics_count_per_operation() {
    let statistics = Statistics::new();

    statistics.observe(Operation::Get, "t", Duration::from_millis(2), true);
    statistics.observe(Operation::Get, "t", Duration::from_millis(4), false);
    statistics.observe(Operation::Put, "t", Duration::from_millis(1), true);

    assert_eq!(
        statistics.snapshot(Operation::Get),
        OperationSnapshot {
            calls: 2,
            failures: 1,
            total_elapsed: Duration::from_millis(6),
        }
    );
    assert_eq!(
        statistics.snapshot(Operation::Get).mean_elapsed(),
        Some(Duration::from_millis(3))
    );
    assert_eq!(statistics.snapshot(Operation::Put).calls, 1);
    assert_eq!(statistics.snapshot(Operation::Scan).mean_elapsed(), None);
    assert_eq!(statistics.total_calls(), 3);

    statistics.reset();
    assert_eq!(statistics.total_calls(), 0);
}

#[test]
fn statistics_are_shared_between_threads() {
    let statistics = Statistics::new();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..250 {
                    statistics.observe(
                        Operation::Remove,
                        "t",
                        Duration::ZERO,
                        true,
                    );
                }
            });
        }
    });

    assert_eq!(statistics.snapshot(Operation::Remove).calls, 1000);
}

#[test]
#[traced_test]
fn tracing_observer_logs_the_call() {
    TracingObserver.observe(
        Operation::Scan,
        "people",
        Duration::from_micros(15),
        false,
    );

    assert!(logs_contain("remote call"));
    assert!(logs_contain("operation=scan"));
    assert!(logs_contain("succeeded=false"));
}
