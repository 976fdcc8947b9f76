use super::state::ProfilerView;
use crate::metrics::Sample;

const PLOT_HEIGHT: f32 = 100.0;

pub fn show_profiler(ui: &mut egui::Ui, view: &ProfilerView, history_len: usize) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label("Memory:");
            ui.strong(format!("{} MB", or_placeholder(&view.memory_text)));
        });
        series_plot(ui, "memory_plot", &view.memory_series, history_len, None);

        if let Some(stats) = view.memory_stats {
            ui.label(format!(
                "Peak: {:.1} MB  Lowest: {:.1} MB  Max consumed: {:.1} MB",
                as_mb(stats.peak),
                as_mb(stats.lowest),
                as_mb(stats.max_consumed())
            ));
        }
    });

    ui.add_space(8.0);

    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label("CPU:");
            ui.strong(format!("{} %", or_placeholder(&view.cpu_text)));
        });
        series_plot(ui, "cpu_plot", &view.cpu_series, history_len, Some(100.0));
    });
}

fn or_placeholder(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

fn as_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

fn series_plot(
    ui: &mut egui::Ui,
    id: impl std::hash::Hash,
    series: &[Sample],
    max_points: usize,
    y_max: Option<f64>,
) {
    let mut plot = egui_plot::Plot::new(id)
        .height(PLOT_HEIGHT)
        .show_axes(true)
        .set_margin_fraction(egui::Vec2::ZERO)
        .include_x(0.0)
        .include_x(max_points.saturating_sub(1) as f64)
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false);
    if let Some(y_max) = y_max {
        plot = plot.include_y(y_max);
    }

    plot.show(ui, |plot_ui| {
        let points: egui_plot::PlotPoints = series
            .iter()
            .enumerate()
            .map(|(i, sample)| [i as f64, sample.value as f64])
            .collect();
        plot_ui.line(egui_plot::Line::new(points));
    });
}
