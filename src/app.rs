use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    pub config: DashboardConfig,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::default(),
            config,
        }
    }

    /// Load the configured input files if they are both on disk.
    pub fn load_configured_inputs(&mut self) {
        if !self.config.inputs_present() {
            log::info!(
                "Input files {} / {} not found, waiting for Fichier → Ouvrir",
                self.config.scores_path.display(),
                self.config.directory_path.display()
            );
            return;
        }
        panels::load_into_state(
            &mut self.state,
            &self.config,
            &self.config.scores_path,
            &self.config.directory_path,
        );
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.config);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: filtered rows ----
        egui::TopBottomPanel::bottom("rows_panel")
            .resizable(true)
            .default_height(180.0)
            .show(ctx, |ui| {
                table::rows_table(ui, &self.state);
            });

        // ---- Central panel: map and bar chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.working.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Ouvrez les indicateurs et l'annuaire  (Fichier → Ouvrir les données…)");
                });
                return;
            }
            let half = (ui.available_height() / 2.0 - 8.0).max(120.0);
            charts::map_plot(ui, &mut self.state, half);
            ui.separator();
            charts::bar_plot(ui, &self.state);
        });
    }
}

