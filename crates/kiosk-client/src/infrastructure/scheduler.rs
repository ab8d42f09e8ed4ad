//! Timer implementations for the `Scheduler` port.
//!
//! [`TokioScheduler`] runs one tokio task per active timer.  Each task waits
//! on an `Interval` and posts `ClientEvent::Tick(kind)` into the client's
//! event channel; it never touches client state itself.  Stopping a timer
//! aborts its task.
//!
//! [`ManualScheduler`] only records what it was asked to do.  Tests deliver
//! ticks themselves by calling `SessionClient::handle`.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::application::ports::{Scheduler, TimerKind};
use crate::application::session_client::ClientEvent;

// ── TokioScheduler ────────────────────────────────────────────────────────────

/// Interval timers feeding the client event channel.  Must be used from
/// inside a tokio runtime.
pub struct TokioScheduler {
    tx: UnboundedSender<ClientEvent>,
    timers: Mutex<HashMap<TimerKind, JoinHandle<()>>>,
}

impl TokioScheduler {
    pub fn new(tx: UnboundedSender<ClientEvent>) -> Self {
        Self {
            tx,
            timers: Mutex::new(HashMap::new()),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn start(&self, kind: TimerKind, every: Duration) {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + every, every);
            // A late tick is delivered once; missed ticks are not replayed.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(ClientEvent::Tick(kind)).is_err() {
                    break;
                }
            }
        });

        let previous = self
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, task);
        if let Some(previous) = previous {
            previous.abort();
        }
        debug!(?kind, ?every, "timer started");
    }

    fn stop(&self, kind: TimerKind) {
        let removed = self
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
        if let Some(task) = removed {
            task.abort();
            debug!(?kind, "timer stopped");
        }
    }

    fn fire_once(&self, kind: TimerKind) {
        if self.tx.send(ClientEvent::Tick(kind)).is_err() {
            debug!(?kind, "client stopped; tick dropped");
        }
    }

    fn is_running(&self, kind: TimerKind) -> bool {
        self.timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        let timers = self.timers.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, task) in timers.drain() {
            task.abort();
        }
    }
}

// ── ManualScheduler ───────────────────────────────────────────────────────────

/// Records timer requests without running anything.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    running: Mutex<BTreeSet<TimerKindKey>>,
    fired: Mutex<Vec<TimerKind>>,
}

// `TimerKind` is not `Ord`; the set is keyed by its position in `ALL`.
type TimerKindKey = usize;

fn key(kind: TimerKind) -> TimerKindKey {
    TimerKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(usize::MAX)
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers currently started, in `TimerKind::ALL` order.
    pub fn running(&self) -> Vec<TimerKind> {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|i| TimerKind::ALL.get(*i).copied())
            .collect()
    }

    /// `fire_once` requests received so far.
    pub fn fired(&self) -> Vec<TimerKind> {
        self.fired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Scheduler for ManualScheduler {
    fn start(&self, kind: TimerKind, _every: Duration) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key(kind));
    }

    fn stop(&self, kind: TimerKind) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key(kind));
    }

    fn fire_once(&self, kind: TimerKind) {
        self.fired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(kind);
    }

    fn is_running(&self, kind: TimerKind) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key(kind))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn tick_kind(event: Option<ClientEvent>) -> Option<TimerKind> {
        match event {
            Some(ClientEvent::Tick(kind)) => Some(kind),
            _ => None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_arrives_after_one_period() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx);
        let started = Instant::now();

        // Act
        scheduler.start(TimerKind::Registration, Duration::from_secs(10));
        let first = tick_kind(rx.recv().await);
        let second = tick_kind(rx.recv().await);

        // Assert
        assert_eq!(first, Some(TimerKind::Registration));
        assert_eq!(second, Some(TimerKind::Registration));
        assert!(started.elapsed() >= Duration::from_secs(20));
        assert!(scheduler.is_running(TimerKind::Registration));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_timer_no_longer_ticks() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx);
        scheduler.start(TimerKind::UserData, Duration::from_secs(10));

        // Act
        scheduler.stop(TimerKind::UserData);
        let waited = tokio::time::timeout(Duration::from_secs(60), rx.recv()).await;

        // Assert
        assert!(waited.is_err());
        assert!(!scheduler.is_running(TimerKind::UserData));
    }

    #[tokio::test]
    async fn test_fire_once_delivers_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx);
        scheduler.fire_once(TimerKind::PrintUpload);
        assert_eq!(tick_kind(rx.recv().await), Some(TimerKind::PrintUpload));
    }

    #[test]
    fn test_manual_scheduler_tracks_running_timers() {
        // Arrange
        let scheduler = ManualScheduler::new();

        // Act
        scheduler.start(TimerKind::PrintUpload, TimerKind::PrintUpload.period());
        scheduler.start(TimerKind::Registration, TimerKind::Registration.period());
        scheduler.stop(TimerKind::PrintUpload);
        scheduler.fire_once(TimerKind::Connectivity);

        // Assert
        assert_eq!(scheduler.running(), vec![TimerKind::Registration]);
        assert_eq!(scheduler.fired(), vec![TimerKind::Connectivity]);
    }
}
