mod app;
mod color;
mod config;
mod data;
mod projection;
mod state;
mod ui;

use app::DashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load();
    log::debug!("Config: {config:?}");

    let mut app = DashboardApp::new(config);
    app.load_configured_inputs();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Lycées d'Île-de-France – Tableau de bord",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
