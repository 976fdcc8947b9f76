use super::{RunningStats, Sample};
use log::trace;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Whatever ends up showing the numbers and charts
pub trait DisplaySink {
    fn set_memory_text(&mut self, text: String);
    fn set_cpu_text(&mut self, text: String);
    fn set_memory_series(&mut self, series: Vec<Sample>);
    fn set_cpu_series(&mut self, series: Vec<Sample>);

    fn set_memory_stats(&mut self, _stats: RunningStats) {}
}

/// One publish step, carried from a tick thread to the display thread
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
    Memory {
        text: String,
        series: Vec<Sample>,
        stats: RunningStats,
    },
    Cpu {
        text: String,
        series: Vec<Sample>,
    },
}

impl DisplayUpdate {
    pub fn apply(self, sink: &mut dyn DisplaySink) {
        match self {
            DisplayUpdate::Memory {
                text,
                series,
                stats,
            } => {
                sink.set_memory_text(text);
                sink.set_memory_series(series);
                sink.set_memory_stats(stats);
            }
            DisplayUpdate::Cpu { text, series } => {
                sink.set_cpu_text(text);
                sink.set_cpu_series(series);
            }
        }
    }
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Sending half: posts updates and wakes the display thread
#[derive(Clone)]
pub struct Publisher {
    tx: Sender<DisplayUpdate>,
    waker: Option<Waker>,
}

/// Receiving half, drained on the display thread
#[derive(Debug)]
pub struct DisplayQueue {
    rx: Receiver<DisplayUpdate>,
}

pub fn display_channel() -> (Publisher, DisplayQueue) {
    let (tx, rx) = mpsc::channel();
    (Publisher { tx, waker: None }, DisplayQueue { rx })
}

impl Publisher {
    /// Called after every posted update, e.g. to request a repaint
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Posting after the display side is gone does nothing
    pub fn publish(&self, update: DisplayUpdate) {
        if self.tx.send(update).is_err() {
            trace!("display queue closed, dropping update");
            return;
        }
        if let Some(wake) = &self.waker {
            wake();
        }
    }
}

impl DisplayQueue {
    /// Applies every pending update in arrival order, returns how many ran
    pub fn drain_into(&self, sink: &mut dyn DisplaySink) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.rx.try_recv() {
            update.apply(sink);
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingSink {
        memory_text: Option<String>,
        cpu_text: Option<String>,
        memory_series: Vec<Sample>,
        cpu_series: Vec<Sample>,
        stats: Option<RunningStats>,
    }

    impl DisplaySink for RecordingSink {
        fn set_memory_text(&mut self, text: String) {
            self.memory_text = Some(text);
        }
        fn set_cpu_text(&mut self, text: String) {
            self.cpu_text = Some(text);
        }
        fn set_memory_series(&mut self, series: Vec<Sample>) {
            self.memory_series = series;
        }
        fn set_cpu_series(&mut self, series: Vec<Sample>) {
            self.cpu_series = series;
        }
        fn set_memory_stats(&mut self, stats: RunningStats) {
            self.stats = Some(stats);
        }
    }

    #[test]
    fn updates_reach_the_sink_in_order() {
        let (publisher, queue) = display_channel();
        publisher.publish(DisplayUpdate::Cpu {
            text: "1".into(),
            series: vec![Sample::new(1.0)],
        });
        publisher.publish(DisplayUpdate::Cpu {
            text: "2".into(),
            series: vec![Sample::new(2.0)],
        });
        publisher.publish(DisplayUpdate::Memory {
            text: "64".into(),
            series: vec![Sample::new(64.0); 3],
            stats: RunningStats { peak: 9, lowest: 3 },
        });

        let mut sink = RecordingSink::default();
        assert_eq!(queue.drain_into(&mut sink), 3);
        assert_eq!(sink.cpu_text.as_deref(), Some("2"));
        assert_eq!(sink.cpu_series, vec![Sample::new(2.0)]);
        assert_eq!(sink.memory_text.as_deref(), Some("64"));
        assert_eq!(sink.memory_series.len(), 3);
        assert_eq!(sink.stats, Some(RunningStats { peak: 9, lowest: 3 }));
        assert_eq!(queue.drain_into(&mut sink), 0);
    }

    #[test]
    fn waker_runs_per_update() {
        let woken = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&woken);
        let (publisher, _queue) = display_channel();
        let publisher = publisher.with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        publisher.publish(DisplayUpdate::Cpu {
            text: "0".into(),
            series: Vec::new(),
        });
        assert_eq!(woken.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn publishing_after_teardown_is_a_noop() {
        let woken = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&woken);
        let (publisher, queue) = display_channel();
        let publisher = publisher.with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(queue);

        publisher.publish(DisplayUpdate::Cpu {
            text: "0".into(),
            series: Vec::new(),
        });
        assert_eq!(woken.load(Ordering::SeqCst), 0);
    }
}
