use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// What to do when the timer fires while the previous tick is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickOverlap {
    /// Start the new tick anyway; ticks may run side by side
    #[default]
    Allow,
    /// Drop the firing
    Skip,
}

type Handler = Arc<dyn Fn() + Send + Sync>;

/// Shorter intervals are raised to this; every firing spawns a thread
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Fires a handler on its own thread every `interval` until stopped.
///
/// Deadlines are counted from the start time, so a slow tick does not push
/// later ticks back.
pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(
        interval: Duration,
        overlap: TickOverlap,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        if interval < MIN_TICK_INTERVAL {
            warn!(
                "tick interval {:?} below minimum, using {:?}",
                interval, MIN_TICK_INTERVAL
            );
        }
        let interval = interval.max(MIN_TICK_INTERVAL);
        let handler: Handler = Arc::new(handler);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let busy = Arc::new(AtomicBool::new(false));

        let handle = thread::spawn(move || {
            let started = Instant::now();
            let mut fired: u32 = 0;
            loop {
                fired = fired.saturating_add(1);
                let deadline = started + interval * fired;
                let wait = deadline.saturating_duration_since(Instant::now());
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // stop requested or the ticker was dropped
                    _ => break,
                }
                fire(&handler, overlap, &busy);
            }
            debug!("ticker thread exiting after {} firings", fired - 1);
        });

        info!("ticker started, interval {:?}, overlap {:?}", interval, overlap);
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    /// Stops future firings. Ticks already in flight are left to finish.
    pub fn stop(&mut self) {
        let Some(stop_tx) = self.stop_tx.take() else {
            return;
        };
        let _ = stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("ticker thread panicked");
            }
        }
        info!("ticker stopped");
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn fire(handler: &Handler, overlap: TickOverlap, busy: &Arc<AtomicBool>) {
    if overlap == TickOverlap::Skip
        && busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
    {
        debug!("previous tick still running, skipping");
        return;
    }

    let handler = Arc::clone(handler);
    let busy = Arc::clone(busy);
    thread::spawn(move || {
        handler();
        if overlap == TickOverlap::Skip {
            busy.store(false, Ordering::Release);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn fires_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let mut ticker = Ticker::start(MIN_TICK_INTERVAL, TickOverlap::Allow, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(ticker.is_running());

        thread::sleep(Duration::from_millis(450));
        ticker.stop();
        assert!(!ticker.is_running());

        // let any tick spawned right before the stop land
        thread::sleep(Duration::from_millis(50));
        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop >= 3, "only {after_stop} ticks");

        thread::sleep(Duration::from_millis(250));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut ticker = Ticker::start(Duration::from_secs(60), TickOverlap::Allow, || {});
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());
    }

    #[test]
    fn allow_lets_slow_ticks_overlap() {
        let running = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let (r, m) = (Arc::clone(&running), Arc::clone(&max_seen));
        let mut ticker = Ticker::start(MIN_TICK_INTERVAL, TickOverlap::Allow, move || {
            let now = r.fetch_add(1, Ordering::SeqCst) + 1;
            m.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(350));
            r.fetch_sub(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(450));
        ticker.stop();
        assert!(max_seen.load(Ordering::SeqCst) > 1);
    }

    #[test]
    fn skip_never_runs_two_ticks_at_once() {
        let running = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let started = Arc::new(AtomicUsize::new(0));
        let (r, m, s) = (
            Arc::clone(&running),
            Arc::clone(&max_seen),
            Arc::clone(&started),
        );
        let mut ticker = Ticker::start(MIN_TICK_INTERVAL, TickOverlap::Skip, move || {
            s.fetch_add(1, Ordering::SeqCst);
            let now = r.fetch_add(1, Ordering::SeqCst) + 1;
            m.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(250));
            r.fetch_sub(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(1_050));
        ticker.stop();
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        // 10 firings fit in the window, at most 4 ticks can start
        assert!(started.load(Ordering::SeqCst) <= 5);
    }

    #[test]
    fn zero_interval_is_raised_to_minimum() {
        let running = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let (r, m) = (Arc::clone(&running), Arc::clone(&max_seen));
        let mut ticker = Ticker::start(Duration::ZERO, TickOverlap::Allow, move || {
            let now = r.fetch_add(1, Ordering::SeqCst) + 1;
            m.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(500));
            r.fetch_sub(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(250));
        ticker.stop();
        // one firing per 100ms, not a tight spawn loop
        assert!(max_seen.load(Ordering::SeqCst) <= 3);
    }
}
