//! Timing of remote calls.
//!
//! A [`RemoteTable`](crate::RemoteTable) reports every point call (and,
//! when [`Configuration::observe_scans`](crate::Configuration) is set, every
//! scan) to an [`Observer`] it was given at construction. Nothing here is
//! global; two tables may report to different observers.

use std::{
    fmt::Display,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

/// The kind of remote call being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// A point read.
    Get,

    /// A point write.
    Put,

    /// A point delete.
    Remove,

    /// A filtered scan.
    Scan,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 4] = [Self::Get, Self::Put, Self::Remove, Self::Scan];

    /// Returns the lowercase name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Remove => "remove",
            Self::Scan => "scan",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Get => 0,
            Self::Put => 1,
            Self::Remove => 2,
            Self::Scan => 3,
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives the duration and outcome of remote calls.
///
/// Called synchronously on the calling thread after each call returns, so
/// implementations should be cheap.
pub trait Observer: Send + Sync {
    /// Records one remote call.
    fn observe(
        &self,
        operation: Operation,
        table_name: &str,
        elapsed: Duration,
        succeeded: bool,
    );
}

/// Logs every call as a `tracing` event at `debug` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn observe(
        &self,
        operation: Operation,
        table_name: &str,
        elapsed: Duration,
        succeeded: bool,
    ) {
        tracing::debug!(
            %operation,
            table = table_name,
            elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
            succeeded,
            "remote call"
        );
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn observe(&self, _: Operation, _: &str, _: Duration, _: bool) {}
}

#[derive(Debug, Default)]
struct Counters {
    calls: AtomicU64,
    failures: AtomicU64,
    elapsed_nanos: AtomicU64,
}

/// Per-operation counters of calls, failures and time spent.
///
/// The counters are updated without locking and may be read while calls are
/// in flight; a [`snapshot`](Statistics::snapshot) is therefore only
/// approximately consistent across its fields.
#[derive(Debug, Default)]
pub struct Statistics {
    counters: [Counters; 4],
}

impl Statistics {
    /// Creates zeroed statistics.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the current counters of `operation`.
    #[must_use]
    pub fn snapshot(&self, operation: Operation) -> OperationSnapshot {
        let counters = &self.counters[operation.index()];

        OperationSnapshot {
            calls: counters.calls.load(Ordering::Relaxed),
            failures: counters.failures.load(Ordering::Relaxed),
            total_elapsed: Duration::from_nanos(
                counters.elapsed_nanos.load(Ordering::Relaxed),
            ),
        }
    }

    /// Returns the total number of calls across every operation.
    #[must_use]
    pub fn total_calls(&self) -> u64 {
        Operation::ALL
            .into_iter()
            .map(|operation| self.snapshot(operation).calls)
            .sum()
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        for counters in &self.counters {
            counters.calls.store(0, Ordering::Relaxed);
            counters.failures.store(0, Ordering::Relaxed);
            counters.elapsed_nanos.store(0, Ordering::Relaxed);
        }
    }
}

impl Observer for Statistics {
    fn observe(
        &self,
        operation: Operation,
        _: &str,
        elapsed: Duration,
        succeeded: bool,
    ) {
        let counters = &self.counters[operation.index()];

        counters.calls.fetch_add(1, Ordering::Relaxed);

        if !succeeded {
            counters.failures.fetch_add(1, Ordering::Relaxed);
        }

        counters.elapsed_nanos.fetch_add(
            u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            Ordering::Relaxed,
        );
    }
}

/// A point-in-time copy of one operation's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OperationSnapshot {
    /// The number of calls made.
    pub calls: u64,

    /// The number of calls that failed.
    pub failures: u64,

    /// The time spent in all calls.
    pub total_elapsed: Duration,
}

impl OperationSnapshot {
    /// Returns the mean duration of a call, or `None` if no call was made.
    #[must_use]
    pub fn mean_elapsed(&self) -> Option<Duration> {
        let calls = u32::try_from(self.calls).ok().filter(|calls| *calls > 0)?;
        Some(self.total_elapsed / calls)
    }
}

#[cfg(test)]
mod test;
