use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::data::schema::Specialty;
use crate::data::working::WorkingSet;
use crate::state::AppState;

const CLEAR_LABEL: &str = "—";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtres");
    ui.separator();

    let Some(working) = &state.working else {
        ui.label("Aucune donnée chargée.");
        return;
    };

    let options = &working.options;
    let mut selection = state.selection.clone();
    let mut reset = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            dropdown(ui, "Département", &mut selection.department, &options.departments, |v| {
                v.clone()
            });
            dropdown(ui, "Commune", &mut selection.commune, &options.communes, |v| v.clone());
            dropdown(
                ui,
                "Établissement",
                &mut selection.establishment,
                &options.establishments,
                |v| v.clone(),
            );
            dropdown(
                ui,
                "Spécialité",
                &mut selection.specialty,
                options.specialties(),
                |s: &Specialty| s.label().to_string(),
            );
            dropdown(ui, "Année", &mut selection.year, &options.years, |y| y.to_string());

            ui.add_space(8.0);
            reset = ui.button("Réinitialiser").clicked();
        });

    // Recompute projections after any change.
    if reset {
        state.reset_filters();
    } else {
        state.set_selection(selection);
    }
}

/// A labelled combo box over `options`, with a leading entry that clears it.
fn dropdown<T: Clone + PartialEq>(
    ui: &mut Ui,
    label: &str,
    current: &mut Option<T>,
    options: &[T],
    text: impl Fn(&T) -> String,
) {
    ui.label(RichText::new(label).strong());
    let selected_text = current.as_ref().map_or_else(|| CLEAR_LABEL.to_string(), &text);
    egui::ComboBox::from_id_salt(label)
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(current, None, CLEAR_LABEL);
            for value in options {
                ui.selectable_value(current, Some(value.clone()), text(value));
            }
        });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, config: &DashboardConfig) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Fichier", |ui: &mut Ui| {
            if ui.button("Ouvrir les données…").clicked() {
                open_file_dialog(state, config);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ws) = &state.working {
            ui.label(format!(
                "{} lignes ({} / {}), {} affichées",
                ws.table.len(),
                config.region,
                config.establishment_type,
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

fn pick_table(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Fichiers pris en charge", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

pub fn open_file_dialog(state: &mut AppState, config: &DashboardConfig) {
    let Some(scores) = pick_table("Indicateurs de résultats") else {
        return;
    };
    let Some(directory) = pick_table("Annuaire de l'éducation") else {
        return;
    };
    load_into_state(state, config, &scores, &directory);
}

/// Load both inputs; failures land in the status line.
pub fn load_into_state(
    state: &mut AppState,
    config: &DashboardConfig,
    scores: &Path,
    directory: &Path,
) {
    match WorkingSet::load(scores, directory, config) {
        Ok(working) => {
            log::info!(
                "Working set ready: {} rows, {} establishments",
                working.table.len(),
                working.options.establishments.len()
            );
            state.set_working_set(working);
        }
        Err(e) => {
            log::error!("Failed to load data: {e:#}");
            state.status_message = Some(format!("Erreur : {e:#}"));
        }
    }
}
