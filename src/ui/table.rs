use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::CellValue;
use crate::data::schema::{COL_COMMUNE, COL_DEPARTMENT, COL_ESTABLISHMENT, COL_YEAR, Specialty};
use crate::projection::format_rate;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Filtered rows, one line per school-year.
pub fn rows_table(ui: &mut Ui, state: &AppState) {
    let (Some(view), Some(ws)) = (state.visible_view(), state.working.as_ref()) else {
        return;
    };
    let rate_column = ws.specialty_columns.column(Specialty::AllSeries);

    ui.strong(format!("{} lignes", view.len()));

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(200.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(80.0))
        .header(ROW_HEIGHT, |mut header| {
            for title in ["Établissement", "Commune", "Département", "Année", "Réussite"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.len(), |mut row| {
                let record = &view.table.rows[view.indices[row.index()]];
                for column in [COL_ESTABLISHMENT, COL_COMMUNE, COL_DEPARTMENT, COL_YEAR] {
                    row.col(|ui| {
                        ui.label(cell_text(record.get(column)));
                    });
                }
                row.col(|ui| {
                    let rate = rate_column.and_then(|c| record.number(c));
                    ui.label(rate.map(format_rate).unwrap_or_default());
                });
            });
        });
}

fn cell_text(value: &CellValue) -> String {
    if value.is_null() {
        String::new()
    } else {
        value.to_string()
    }
}
