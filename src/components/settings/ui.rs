use super::state::Settings;

pub fn show_settings_window(ctx: &egui::Context, settings: &mut Settings) {
    let mut open = *settings.window_open();
    if !open {
        return;
    }

    egui::Window::new("⚙ Settings")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            egui::Grid::new("settings_grid").num_columns(2).show(ui, |ui| {
                ui.label("UI scale");
                ui.add(egui::Slider::new(&mut settings.scale, 0.5..=2.0).step_by(0.1));
                ui.end_row();

                ui.label("Font size");
                ui.add(egui::Slider::new(&mut settings.font_size, 8.0..=32.0).step_by(1.0));
                ui.end_row();
            });

            ui.separator();
            ui.label("Sampling (applies on next launch)");

            egui::Grid::new("sampling_grid").num_columns(2).show(ui, |ui| {
                ui.label("Update interval (ms)");
                ui.add(egui::Slider::new(&mut settings.update_interval_ms, 100..=10_000));
                ui.end_row();

                ui.label("CPU settle delay (ms)");
                ui.add(egui::Slider::new(&mut settings.settle_delay_ms, 50..=5_000));
                ui.end_row();

                ui.label("History length");
                ui.add(egui::Slider::new(&mut settings.history_length, 2..=120));
                ui.end_row();
            });

            ui.checkbox(
                &mut settings.skip_overlapping_ticks,
                "Skip ticks while one is running",
            );
        });

    *settings.window_open() = open;
}
