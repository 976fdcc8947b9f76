use crate::metrics::{DisplaySink, RunningStats, Sample};

/// Display-thread copy of the latest published values
#[derive(Debug, Clone, Default)]
pub struct ProfilerView {
    pub memory_text: String,
    pub cpu_text: String,
    pub memory_series: Vec<Sample>,
    pub cpu_series: Vec<Sample>,
    pub memory_stats: Option<RunningStats>,
}

impl DisplaySink for ProfilerView {
    fn set_memory_text(&mut self, text: String) {
        self.memory_text = text;
    }

    fn set_cpu_text(&mut self, text: String) {
        self.cpu_text = text;
    }

    fn set_memory_series(&mut self, series: Vec<Sample>) {
        self.memory_series = series;
    }

    fn set_cpu_series(&mut self, series: Vec<Sample>) {
        self.cpu_series = series;
    }

    fn set_memory_stats(&mut self, stats: RunningStats) {
        self.memory_stats = Some(stats);
    }
}
