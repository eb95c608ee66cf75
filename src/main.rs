use eframe::egui;

use luckystar::engine::{LotteryEngine, Phase};
use luckystar::roster::demo_roster;
use luckystar::texture::card::masked_id;
use luckystar::VisualConfigPatch;

const BACKDROP: egui::Color32 = egui::Color32::from_rgb(15, 23, 42);
const ACCENT: egui::Color32 = egui::Color32::from_rgb(29, 209, 161);

fn main() {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Lucky Star"),
        ..Default::default()
    };

    eframe::run_native(
        "Lucky Star — Lottery Planet",
        options,
        Box::new(|_cc| Ok(Box::new(LuckyStarApp::new()))),
    )
    .expect("Failed to start Lucky Star");
}

/// Mirror of the tunable config for the settings window; applied as one
/// patch so the engine classifies the change itself.
struct SettingsDraft {
    card_count: usize,
    radius: f32,
    card_scale: f32,
    avatar_size: f32,
    nickname_limit: usize,
    nickname_font_size: f32,
    spin_speed_max: f32,
    spin_duration_s: f64,
    swap_interval_s: f64,
    swap_count: usize,
    particle_count: usize,
    auto_start_next_round: bool,
    auto_start_delay_s: f64,
}

impl SettingsDraft {
    fn from_engine(engine: &LotteryEngine) -> Self {
        let c = engine.config();
        Self {
            card_count: c.card_count,
            radius: c.radius,
            card_scale: c.card_scale,
            avatar_size: c.avatar_size,
            nickname_limit: c.nickname_limit,
            nickname_font_size: c.nickname_font_size,
            spin_speed_max: c.spin_speed_max,
            spin_duration_s: c.spin_duration_s,
            swap_interval_s: c.swap_interval_s,
            swap_count: c.swap_count,
            particle_count: c.particle_count,
            auto_start_next_round: c.auto_start_next_round,
            auto_start_delay_s: c.auto_start_delay_s,
        }
    }

    fn to_patch(&self) -> VisualConfigPatch {
        VisualConfigPatch {
            card_count: Some(self.card_count),
            radius: Some(self.radius),
            card_scale: Some(self.card_scale),
            avatar_size: Some(self.avatar_size),
            nickname_limit: Some(self.nickname_limit),
            nickname_font_size: Some(self.nickname_font_size),
            spin_speed_max: Some(self.spin_speed_max),
            spin_duration_s: Some(self.spin_duration_s),
            swap_interval_s: Some(self.swap_interval_s),
            swap_count: Some(self.swap_count),
            particle_count: Some(self.particle_count),
            auto_start_next_round: Some(self.auto_start_next_round),
            auto_start_delay_s: Some(self.auto_start_delay_s),
            ..Default::default()
        }
    }
}

struct LuckyStarApp {
    engine: LotteryEngine,
    settings: SettingsDraft,
    settings_open: bool,
}

impl LuckyStarApp {
    fn new() -> Self {
        let mut engine = LotteryEngine::new((1280.0, 800.0));
        engine.set_roster(demo_roster(2000, &mut rand::thread_rng()));

        let settings = SettingsDraft::from_engine(&engine);
        Self { engine, settings, settings_open: false }
    }

    fn control_bar(&mut self, ui: &mut egui::Ui) {
        let now = self.engine.elapsed();
        let phase = self.engine.phase();

        ui.horizontal(|ui| {
            match phase {
                Phase::Idle => {
                    if ui.button("▶ Start").clicked() {
                        self.engine.start(now, true);
                    }
                }
                Phase::Countdown => {
                    ui.add_enabled(false, egui::Button::new("Starting…"));
                }
                Phase::Spinning => {
                    if ui.button("⏸ Pause").clicked() {
                        self.engine.pause(now);
                    }
                    if ui.button("⏹ Stop & focus").clicked() {
                        self.engine.stop(now);
                    }
                }
                Phase::Paused => {
                    if ui.button("▶ Resume").clicked() {
                        self.engine.pause(now);
                    }
                    if ui.button("⏹ Stop & focus").clicked() {
                        self.engine.stop(now);
                    }
                }
                Phase::Stopping => {
                    ui.add_enabled(false, egui::Button::new("Focusing…"));
                }
                Phase::Result => {
                    if ui.button("Next round").clicked() {
                        self.engine.dismiss_result(now, true);
                    }
                    if ui.button("Back to idle").clicked() {
                        self.engine.dismiss_result(now, false);
                    }
                }
            }

            if ui.button("Reset view").clicked() {
                self.engine.reset_view(now);
            }
            if ui.button("⚙ Settings").clicked() {
                self.settings_open = !self.settings_open;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("status: {}", phase.label())).color(ACCENT),
                );
                if self.engine.using_fallback() {
                    ui.label(egui::RichText::new("demo data").color(egui::Color32::YELLOW));
                }
            });
        });
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.settings_open;
        let mut apply = false;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                let s = &mut self.settings;
                ui.add(egui::Slider::new(&mut s.card_count, 10..=500).text("cards on sphere"));
                ui.add(egui::Slider::new(&mut s.radius, 200.0..=1200.0).text("sphere radius"));
                ui.add(egui::Slider::new(&mut s.card_scale, 0.2..=4.0).text("card scale"));
                ui.add(egui::Slider::new(&mut s.avatar_size, 0.1..=1.0).text("avatar size"));
                ui.add(egui::Slider::new(&mut s.nickname_limit, 1..=20).text("nickname limit"));
                ui.add(
                    egui::Slider::new(&mut s.nickname_font_size, 8.0..=32.0).text("nickname font"),
                );
                ui.separator();
                ui.add(egui::Slider::new(&mut s.spin_speed_max, 0.01..=0.3).text("spin speed"));
                ui.add(egui::Slider::new(&mut s.spin_duration_s, 0.0..=30.0).text("spin duration"));
                ui.add(egui::Slider::new(&mut s.swap_interval_s, 0.5..=30.0).text("swap interval"));
                ui.add(egui::Slider::new(&mut s.swap_count, 0..=20).text("swap count"));
                ui.add(egui::Slider::new(&mut s.particle_count, 0..=3000).text("particles"));
                ui.separator();
                ui.checkbox(&mut s.auto_start_next_round, "auto-start next round");
                ui.add(
                    egui::Slider::new(&mut s.auto_start_delay_s, 0.5..=10.0).text("auto delay"),
                );
                if ui.button("Apply").clicked() {
                    apply = true;
                }
            });
        self.settings_open = open;
        if apply {
            self.engine.update_visual_config(&self.settings.to_patch());
            // Read back clamped values.
            self.settings = SettingsDraft::from_engine(&self.engine);
        }
    }

    fn overlays(&mut self, ctx: &egui::Context) {
        let now = self.engine.elapsed();

        if let Some(n) = self.engine.countdown_remaining(now) {
            egui::Area::new(egui::Id::new("countdown"))
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{n}"))
                            .size(120.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                });
        }

        if self.engine.phase() == Phase::Result {
            if let Some(winner) = self.engine.winner().cloned() {
                egui::Window::new("Winner")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 140.0])
                    .show(ctx, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.label(
                                egui::RichText::new(&winner.display_name)
                                    .size(28.0)
                                    .strong()
                                    .color(ACCENT),
                            );
                            ui.label(masked_id(&winner.id));
                            ui.add_space(8.0);
                            ui.horizontal(|ui| {
                                if ui.button("Next round").clicked() {
                                    self.engine.dismiss_result(now, true);
                                }
                                if ui.button("Close").clicked() {
                                    self.engine.dismiss_result(now, false);
                                }
                            });
                        });
                    });
            }
        }
    }
}

impl eframe::App for LuckyStarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Lucky Star");
                ui.label(format!(
                    "participants: {}  ·  on sphere: {}  ·  rounds: {}",
                    self.engine.roster_len(),
                    self.engine.visible_count(),
                    self.engine.winner_history().len(),
                ));
            });
        });

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            self.control_bar(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKDROP))
            .show(ctx, |ui| {
                self.engine.frame(ui);
            });

        self.settings_window(ctx);
        self.overlays(ctx);
    }
}
