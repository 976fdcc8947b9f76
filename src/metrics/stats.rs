const BYTES_PER_MB: u64 = 1024 * 1024;

/// Lifetime memory extrema of the monitored process, in bytes.
///
/// `lowest` stays at zero until the first reading arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningStats {
    pub peak: u64,
    pub lowest: u64,
}

impl RunningStats {
    pub fn record(&mut self, used: u64) {
        if used > self.peak {
            self.peak = used;
        }
        if self.lowest == 0 || used < self.lowest {
            self.lowest = used;
        }
    }

    pub fn max_consumed(&self) -> u64 {
        self.peak.saturating_sub(self.lowest)
    }
}

/// Whole megabytes, rounded down
pub fn to_megabytes(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}

pub fn memory_log_line(used: u64, stats: &RunningStats) -> String {
    format!(
        "Memory, Used: {} ({}MB), Peak: {}, Lowest: {}, MaxConsumed: {}",
        used,
        to_megabytes(used),
        stats.peak,
        stats.lowest,
        stats.max_consumed()
    )
}
