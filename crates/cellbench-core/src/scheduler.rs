//! Periodic refresh notifications.
//!
//! A [`Ticker`] runs a background thread that only sends `()` on a channel
//! every interval. It never touches session state: the receiving thread runs
//! the tick itself, so ticks cannot overlap.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default refresh period.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(5);
/// Shortest refresh period the dashboard offers.
pub const MIN_REFRESH: Duration = Duration::from_secs(1);
/// Longest refresh period the dashboard offers.
pub const MAX_REFRESH: Duration = Duration::from_secs(60);

/// How often the worker wakes to check for cancellation.
const POLL_SLICE: Duration = Duration::from_millis(10);

pub struct Ticker {
    rx: Receiver<()>,
    running: Arc<AtomicBool>,
    interval_ms: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Start ticking every `interval` (at least 1 ms).
    pub fn spawn(interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let interval_ms = Arc::new(AtomicU64::new(to_ms(interval)));

        let flag = Arc::clone(&running);
        let period = Arc::clone(&interval_ms);
        let handle = thread::spawn(move || {
            let mut last = Instant::now();
            while flag.load(Ordering::Relaxed) {
                let due = Duration::from_millis(period.load(Ordering::Relaxed));
                let elapsed = last.elapsed();
                if elapsed >= due {
                    if tx.send(()).is_err() {
                        break;
                    }
                    last = Instant::now();
                    continue;
                }
                thread::sleep((due - elapsed).min(POLL_SLICE));
            }
        });

        log::debug!("ticker started at {} ms", to_ms(interval));
        Self {
            rx,
            running,
            interval_ms,
            handle: Some(handle),
        }
    }

    /// `true` if at least one tick fired since the last call. Several pending
    /// ticks collapse into one.
    pub fn try_recv(&self) -> bool {
        let mut fired = false;
        while self.rx.try_recv().is_ok() {
            fired = true;
        }
        fired
    }

    /// Block up to `timeout` for the next tick, then drain any backlog.
    pub fn recv_timeout(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => {
                self.try_recv();
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Change the period for subsequent ticks.
    pub fn set_interval(&self, interval: Duration) {
        self.interval_ms.store(to_ms(interval), Ordering::Relaxed);
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.load(Ordering::Relaxed))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Cancel future ticks and wait for the worker to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            log::debug!("ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn to_ms(interval: Duration) -> u64 {
    (interval.as_millis() as u64).max(1)
}

/// Step the refresh period by whole seconds, clamped to the offered range.
pub fn adjust_refresh(current: Duration, delta_secs: i64) -> Duration {
    let secs = current.as_secs() as i64 + delta_secs;
    let clamped = secs.clamp(MIN_REFRESH.as_secs() as i64, MAX_REFRESH.as_secs() as i64);
    Duration::from_secs(clamped as u64)
}
