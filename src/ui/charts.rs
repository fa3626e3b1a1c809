use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Text};

use crate::color::MISSING_COLOR;
use crate::data::schema::Specialty;
use crate::projection::{BarOutcome, RATE_AXIS, format_rate};
use crate::state::AppState;

/// Half extent of the recentered map view, in degrees.
const MAP_HALF_LAT: f64 = 0.12;
const MAP_HALF_LON: f64 = 0.20;

const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Map (upper half of the central panel)
// ---------------------------------------------------------------------------

/// Scatter of school positions, x = longitude, y = latitude.
pub fn map_plot(ui: &mut Ui, state: &mut AppState, height: f32) {
    let recenter = std::mem::take(&mut state.recenter);
    let center = state.map.center;
    let scale = state.color_scale;

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Taux de reussite - Toutes series");
        match &scale {
            Some(scale) => {
                for (label, color) in scale.legend_entries(5) {
                    ui.label(RichText::new(format!("● {label}")).color(color));
                }
            }
            None => {
                ui.label("aucune donnée");
            }
        }
    });

    Plot::new("map_plot")
        .height(height)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.5)
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{:.4}, {:.4}", value.y, value.x)
            } else {
                format!("{name}\n{:.4}, {:.4}", value.y, value.x)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for point in &state.map.points {
                let Some(pos) = point.position() else {
                    continue;
                };
                let color = scale
                    .map(|s| s.color_for(point.color))
                    .unwrap_or(MISSING_COLOR);
                plot_ui.points(
                    Points::new(PlotPoints::new(vec![[pos.longitude, pos.latitude]]))
                        .name(&point.label)
                        .color(color)
                        .radius(4.0),
                );
            }

            if recenter {
                match center {
                    Some(c) => plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [c.longitude - MAP_HALF_LON, c.latitude - MAP_HALF_LAT],
                        [c.longitude + MAP_HALF_LON, c.latitude + MAP_HALF_LAT],
                    )),
                    None => plot_ui.set_auto_bounds(true),
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart (lower half of the central panel)
// ---------------------------------------------------------------------------

/// Success rate per specialty, or the placeholder message.
pub fn bar_plot(ui: &mut Ui, state: &AppState) {
    let projection = match &state.bar {
        BarOutcome::Chart(p) => p,
        BarOutcome::Empty(empty) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(&empty.message);
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&projection.title);
    });

    let bars: Vec<Bar> = projection
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| Bar::new(i as f64, e.rate).name(e.specialty.label()).width(0.7))
        .collect();
    let n = bars.len() as f64;

    Plot::new("bar_plot")
        .x_axis_label("Série")
        .y_axis_label("Taux")
        .x_axis_formatter(|mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            Specialty::ALL
                .get(i as usize)
                .map(|s| s.label().to_string())
                .unwrap_or_default()
        })
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [-0.6, RATE_AXIS[0]],
                [n - 0.4, RATE_AXIS[1]],
            ));
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));

            for (i, e) in projection.entries.iter().enumerate() {
                // label sits inside the bar, clamped to the visible domain
                let y = (e.rate / 2.0).clamp(RATE_AXIS[0] + 3.0, RATE_AXIS[1] - 3.0);
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(i as f64, y),
                        RichText::new(format_rate(e.rate)).strong(),
                    ),
                );
            }
        });
}

