use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessesToUpdate, System};
use thiserror::Error;

/// Raised when a process counter cannot be read for this tick
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("current process id unavailable: {0}")]
    NoCurrentPid(String),

    #[error("process {0} not found in the process table")]
    ProcessGone(Pid),
}

/// Source of the two metrics charted by the profiler.
///
/// Implementations are shared between overlapping ticks, so they take `&self`.
pub trait Sampler: Send + Sync {
    /// Resident memory of the process in bytes
    fn sample_memory(&self) -> Result<u64, SampleError>;

    /// Process CPU usage as a percentage of wall time across all cores.
    ///
    /// Blocks for the settle delay between the two readings.
    fn sample_cpu(&self) -> Result<f32, SampleError>;
}

/// Readings needed for a two-phase CPU measurement
pub trait CpuClock {
    /// Total CPU time consumed by the process so far
    fn process_cpu_time(&self) -> Result<Duration, SampleError>;

    /// Monotonic wall time since an arbitrary origin
    fn wall_time(&self) -> Duration;

    fn settle(&self, delay: Duration);
}

/// Samples CPU time twice, `settle_delay` apart, and returns the share of the
/// elapsed wall time the process spent on the CPU. Not clamped to 100.
pub fn measure_cpu<C: CpuClock + ?Sized>(
    clock: &C,
    settle_delay: Duration,
    core_count: usize,
) -> Result<f32, SampleError> {
    let start_wall = clock.wall_time();
    let start_cpu = clock.process_cpu_time()?;

    clock.settle(settle_delay);

    let end_wall = clock.wall_time();
    let end_cpu = clock.process_cpu_time()?;

    let cpu_used_ms = end_cpu.saturating_sub(start_cpu).as_secs_f64() * 1000.0;
    let total_ms = end_wall.saturating_sub(start_wall).as_secs_f64() * 1000.0;
    Ok(cpu_percent(cpu_used_ms, total_ms, core_count))
}

fn cpu_percent(cpu_used_ms: f64, total_ms: f64, core_count: usize) -> f32 {
    let capacity_ms = core_count.max(1) as f64 * total_ms;
    if capacity_ms <= 0.0 {
        return 0.0;
    }
    (cpu_used_ms / capacity_ms * 100.0) as f32
}

/// Samples the process this code is running in via `sysinfo`
#[derive(Debug)]
pub struct ProcessSampler {
    system: Mutex<System>,
    pid: Pid,
    origin: Instant,
    settle_delay: Duration,
    core_count: usize,
}

impl ProcessSampler {
    pub fn current(settle_delay: Duration) -> Result<Self, SampleError> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| SampleError::NoCurrentPid(e.to_string()))?;
        let core_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Ok(Self {
            system: Mutex::new(System::new()),
            pid,
            origin: Instant::now(),
            settle_delay,
            core_count,
        })
    }

    pub fn core_count(&self) -> usize {
        self.core_count
    }

    fn with_process<R>(
        &self,
        read: impl FnOnce(&sysinfo::Process) -> R,
    ) -> Result<R, SampleError> {
        let mut system = self.system.lock().unwrap_or_else(|p| p.into_inner());
        system.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        system
            .process(self.pid)
            .map(read)
            .ok_or(SampleError::ProcessGone(self.pid))
    }
}

impl CpuClock for ProcessSampler {
    fn process_cpu_time(&self) -> Result<Duration, SampleError> {
        self.with_process(|p| Duration::from_millis(p.accumulated_cpu_time()))
    }

    fn wall_time(&self) -> Duration {
        self.origin.elapsed()
    }

    fn settle(&self, delay: Duration) {
        thread::sleep(delay);
    }
}

impl Sampler for ProcessSampler {
    fn sample_memory(&self) -> Result<u64, SampleError> {
        self.with_process(|p| p.memory())
    }

    fn sample_cpu(&self) -> Result<f32, SampleError> {
        measure_cpu(self, self.settle_delay, self.core_count)
    }
}
