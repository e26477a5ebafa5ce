//! Scripted in-memory connection source for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::source::{Connection, ConnectionSource, SourceKind};
use crate::error::ReadinessError;

/// What a single attempt against [`ScriptedSource`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// `acquire` fails.
    AcquireFails,
    /// `acquire` succeeds, validation fails.
    Invalid,
    /// `acquire` succeeds, validation passes.
    Valid,
}

/// Counters shared between the source and the connections it hands out.
#[derive(Debug, Default)]
pub(crate) struct Stats {
    pub acquire_calls: AtomicUsize,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub open: AtomicUsize,
    pub max_open: AtomicUsize,
    pub attempt_times: Mutex<Vec<Instant>>,
    pub timeouts_seen: Mutex<Vec<Duration>>,
}

impl Stats {
    pub fn acquire_calls(&self) -> usize {
        self.acquire_calls.load(Ordering::SeqCst)
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn max_open(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }

    /// Gaps between consecutive attempts.
    pub fn waits(&self) -> Vec<Duration> {
        let times = self
            .attempt_times
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        times
            .windows(2)
            .filter_map(|pair| match pair {
                [earlier, later] => Some(*later - *earlier),
                _ => None,
            })
            .collect()
    }

    pub fn timeouts_seen(&self) -> Vec<Duration> {
        self.timeouts_seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

/// Source that plays back a fixed list of [`Step`]s, then repeats `fallback`.
#[derive(Debug)]
pub(crate) struct ScriptedSource {
    kind: SourceKind,
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    cancel_on: Option<(usize, CancellationToken)>,
    stats: Arc<Stats>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Step>, fallback: Step) -> Self {
        Self {
            kind: SourceKind::Pooled,
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            cancel_on: None,
            stats: Arc::new(Stats::default()),
        }
    }

    pub fn always(step: Step) -> Self {
        Self::new([], step)
    }

    pub fn direct(mut self) -> Self {
        self.kind = SourceKind::Direct;
        self
    }

    /// Trips `token` when the `nth` acquisition (1-based) happens.
    pub fn cancel_on(mut self, nth: usize, token: CancellationToken) -> Self {
        self.cancel_on = Some((nth, token));
        self
    }

    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }

    fn next_step(&self) -> Step {
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        script.pop_front().unwrap_or(self.fallback)
    }
}

impl ConnectionSource for ScriptedSource {
    type Connection = ScriptedConnection;

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn acquire(&self) -> Result<ScriptedConnection, ReadinessError> {
        let n = self.stats.acquire_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats
            .attempt_times
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Instant::now());

        if let Some((nth, token)) = &self.cancel_on {
            if *nth == n {
                token.cancel();
            }
        }

        let step = self.next_step();
        if step == Step::AcquireFails {
            return Err(ReadinessError::Acquire("connection refused".to_string()));
        }

        self.stats.acquired.fetch_add(1, Ordering::SeqCst);
        let open = self.stats.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_open.fetch_max(open, Ordering::SeqCst);

        Ok(ScriptedConnection {
            valid: step == Step::Valid,
            stats: Arc::clone(&self.stats),
        })
    }
}

#[derive(Debug)]
pub(crate) struct ScriptedConnection {
    valid: bool,
    stats: Arc<Stats>,
}

impl Connection for ScriptedConnection {
    async fn is_valid(&mut self, timeout: Duration) -> bool {
        self.stats
            .timeouts_seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(timeout);
        self.valid
    }
}

impl Drop for ScriptedConnection {
    fn drop(&mut self) {
        self.stats.released.fetch_add(1, Ordering::SeqCst);
        self.stats.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Asserts `actual` is within a few milliseconds of `expected`; the paused
/// clock rounds timer deadlines up to the next millisecond tick.
pub(crate) fn assert_approx(actual: Duration, expected: Duration) {
    let slack = Duration::from_millis(5);
    assert!(
        actual >= expected && actual <= expected + slack,
        "expected ~{expected:?}, got {actual:?}"
    );
}

/// Asserts the observed gaps between attempts match `expected_secs`, in order.
pub(crate) fn assert_waits(waits: &[Duration], expected_secs: &[u64]) {
    assert_eq!(waits.len(), expected_secs.len(), "waits: {waits:?}");
    for (wait, secs) in waits.iter().zip(expected_secs) {
        assert_approx(*wait, Duration::from_secs(*secs));
    }
}
