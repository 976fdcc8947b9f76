use crate::components::profiler_view::{show_profiler, ProfilerView};
use crate::components::settings::{show_settings_window, Settings};
use crate::metrics::{display_channel, DisplayQueue, Profiler, ProfilerConfig};
use log::error;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct ProfilerApp {
    settings: Settings,
    #[serde(skip)]
    profiler: Option<Profiler>,
    #[serde(skip)]
    queue: Option<DisplayQueue>,
    #[serde(skip)]
    view: ProfilerView,
    #[serde(skip)]
    startup_error: Option<String>,
}

impl ProfilerApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous app state (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.start_profiler(cc.egui_ctx.clone());
        app
    }

    fn start_profiler(&mut self, ctx: egui::Context) {
        let (publisher, queue) = display_channel();
        let publisher = publisher.with_waker(move || ctx.request_repaint());

        match Profiler::for_current_process(ProfilerConfig::from(&self.settings), publisher) {
            Ok(profiler) => {
                self.profiler = Some(profiler);
                self.queue = Some(queue);
            }
            Err(e) => {
                error!("profiler unavailable: {}", e);
                self.startup_error = Some(e.to_string());
            }
        }
    }
}

impl eframe::App for ProfilerApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.settings.apply(ctx);

        if let Some(queue) = &self.queue {
            queue.drain_into(&mut self.view);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.add_space(16.0);
                egui::widgets::global_theme_preference_buttons(ui);

                ui.add_space(16.0);
                if ui.button("⚙").clicked() {
                    self.settings.open_window();
                }
            });
        });

        show_settings_window(ctx, &mut self.settings);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Profiler");

            if let Some(err) = &self.startup_error {
                ui.label(format!("Sampling unavailable: {}", err));
                return;
            }

            let history_len = self
                .profiler
                .as_ref()
                .map(|p| p.config().history_len)
                .unwrap_or(self.settings.history_length);
            show_profiler(ui, &self.view, history_len);
        });
    }
}
