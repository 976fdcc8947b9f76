use crate::metrics::{ProfilerConfig, TickOverlap};
use std::time::Duration;

#[derive(serde::Deserialize, serde::Serialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct Settings {
    pub scale: f32,
    pub font_size: f32,
    pub update_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub history_length: usize,
    pub skip_overlapping_ticks: bool,
    #[serde(skip)]
    show_window: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 1.2,
            font_size: 15.0,
            update_interval_ms: 1000,
            settle_delay_ms: 500,
            history_length: 10,
            skip_overlapping_ticks: false,
            show_window: false,
        }
    }
}

impl From<&Settings> for ProfilerConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            update_interval: Duration::from_millis(settings.update_interval_ms.max(1)),
            settle_delay: Duration::from_millis(settings.settle_delay_ms),
            history_len: settings.history_length.max(1),
            overlap: if settings.skip_overlapping_ticks {
                TickOverlap::Skip
            } else {
                TickOverlap::Allow
            },
        }
    }
}

impl Settings {
    pub fn open_window(&mut self) {
        self.show_window = true;
    }

    /// Handle for `egui::Window::open`, which clears it on close
    pub fn window_open(&mut self) -> &mut bool {
        &mut self.show_window
    }

    /// Pushes scale and font size into the egui context
    pub fn apply(&self, ctx: &egui::Context) {
        use egui::{FontFamily, FontId, TextStyle};

        ctx.set_pixels_per_point(self.scale);

        let size = self.font_size;
        ctx.style_mut(|style| {
            for (text_style, font) in [
                (TextStyle::Heading, FontId::new(size + 4.0, FontFamily::Proportional)),
                (TextStyle::Body, FontId::new(size, FontFamily::Proportional)),
                (TextStyle::Monospace, FontId::new(size, FontFamily::Monospace)),
                (TextStyle::Button, FontId::new(size, FontFamily::Proportional)),
                (TextStyle::Small, FontId::new(size - 2.0, FontFamily::Proportional)),
            ] {
                style.text_styles.insert(text_style, font);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_profiler_defaults() {
        let config = ProfilerConfig::from(&Settings::default());
        assert_eq!(config, ProfilerConfig::default());
    }

    #[test]
    fn skip_flag_selects_skip_policy() {
        let settings = Settings {
            skip_overlapping_ticks: true,
            history_length: 0,
            ..Default::default()
        };
        let config = ProfilerConfig::from(&settings);
        assert_eq!(config.overlap, TickOverlap::Skip);
        assert_eq!(config.history_len, 1);
    }

    #[test]
    fn window_flag_round_trips() {
        let mut settings = Settings::default();
        assert!(!*settings.window_open());
        settings.open_window();
        assert!(*settings.window_open());
        *settings.window_open() = false;
        assert!(!*settings.window_open());
    }
}
