use log::{debug, info, warn};
mod publisher;
mod rolling_window;
mod sampler;
mod stats;
mod ticker;

pub use publisher::*;
pub use rolling_window::*;
pub use sampler::*;
pub use stats::*;
pub use ticker::*;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const PLACEHOLDER_LABEL: &str = "-";

/// A single charted point
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label: String,
    pub value: f32,
}

impl Sample {
    pub fn new(value: f32) -> Self {
        Self {
            label: PLACEHOLDER_LABEL.to_owned(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilerConfig {
    pub update_interval: Duration,
    pub settle_delay: Duration,
    pub history_len: usize,
    pub overlap: TickOverlap,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(1000),
            settle_delay: Duration::from_millis(500),
            history_len: 10,
            overlap: TickOverlap::Allow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// Everything a tick mutates
#[derive(Debug, Clone)]
pub struct ChartState {
    pub stats: RunningStats,
    pub memory: RollingWindow<Sample>,
    pub cpu: RollingWindow<Sample>,
}

impl ChartState {
    pub fn new(history_len: usize) -> Self {
        Self {
            stats: RunningStats::default(),
            memory: RollingWindow::new(history_len),
            cpu: RollingWindow::new(history_len),
        }
    }
}

/// Sample-and-publish cycle, independent of what triggers it
pub struct TickHandler {
    sampler: Arc<dyn Sampler>,
    publisher: Publisher,
    charts: Mutex<ChartState>,
}

impl TickHandler {
    pub fn new(sampler: Arc<dyn Sampler>, publisher: Publisher, history_len: usize) -> Self {
        Self {
            sampler,
            publisher,
            charts: Mutex::new(ChartState::new(history_len)),
        }
    }

    /// Memory first, then the slow CPU measurement
    pub fn tick(&self) {
        self.update_memory();
        self.update_cpu();
    }

    pub fn snapshot(&self) -> ChartState {
        self.charts().clone()
    }

    // Shared with overlapping ticks; never held across a sampler call.
    fn charts(&self) -> MutexGuard<'_, ChartState> {
        self.charts.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn update_memory(&self) {
        let used = match self.sampler.sample_memory() {
            Ok(used) => used,
            Err(e) => {
                warn!("skipping memory update: {}", e);
                return;
            }
        };

        let used_mb = to_megabytes(used);
        let line = {
            let mut charts = self.charts();
            charts.stats.record(used);
            charts.memory.push(Sample::new(used_mb as f32));

            self.publisher.publish(DisplayUpdate::Memory {
                text: used_mb.to_string(),
                series: charts.memory.contents(),
                stats: charts.stats,
            });
            memory_log_line(used, &charts.stats)
        };
        info!("{}", line);
    }

    fn update_cpu(&self) {
        let cpu = match self.sampler.sample_cpu() {
            Ok(cpu) => cpu,
            Err(e) => {
                warn!("skipping cpu update: {}", e);
                return;
            }
        };
        debug!("cpu usage {:.2}%", cpu);

        let mut charts = self.charts();
        charts.cpu.push(Sample::new(cpu));
        self.publisher.publish(DisplayUpdate::Cpu {
            text: cpu.to_string(),
            series: charts.cpu.contents(),
        });
    }
}

/// Live memory/CPU profiler for the current process.
///
/// Sampling starts on construction and stops for good on [`Profiler::dispose`]
/// or drop.
pub struct Profiler {
    config: ProfilerConfig,
    handler: Arc<TickHandler>,
    ticker: Ticker,
}

impl Profiler {
    pub fn start(config: ProfilerConfig, sampler: Arc<dyn Sampler>, publisher: Publisher) -> Self {
        let handler = Arc::new(TickHandler::new(sampler, publisher, config.history_len));

        let tick_handler = Arc::clone(&handler);
        let ticker = Ticker::start(config.update_interval, config.overlap, move || {
            tick_handler.tick()
        });

        info!("profiler running: {:?}", config);
        Self {
            config,
            handler,
            ticker,
        }
    }

    /// Starts a profiler that watches the calling process
    pub fn for_current_process(
        config: ProfilerConfig,
        publisher: Publisher,
    ) -> Result<Self, SampleError> {
        let sampler = ProcessSampler::current(config.settle_delay)?;
        Ok(Self::start(config, Arc::new(sampler), publisher))
    }

    pub fn state(&self) -> RunState {
        if self.ticker.is_running() {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ChartState {
        self.handler.snapshot()
    }

    pub fn dispose(&mut self) {
        if self.ticker.is_running() {
            self.ticker.stop();
            info!("profiler stopped");
        }
    }
}

impl Drop for Profiler {
    fn drop(&mut self) {
        self.dispose();
    }
}
