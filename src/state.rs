use crate::color::RateColorScale;
use crate::data::filter::FilterSelection;
use crate::data::model::TableView;
use crate::data::working::WorkingSet;
use crate::projection::{BarOutcome, MapProjection, build_bar, build_map};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until both files are loaded).
    pub working: Option<WorkingSet>,

    /// Current value of the five filter controls.
    pub selection: FilterSelection,

    /// Indices of working-table rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub map: MapProjection,
    pub bar: BarOutcome,

    /// Colour scale over the visible points' success rates.
    pub color_scale: Option<RateColorScale>,

    /// Set after each refresh; the map view consumes it to recenter.
    pub recenter: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded working set and reset the filters.
    pub fn set_working_set(&mut self, working: WorkingSet) {
        self.working = Some(working);
        self.selection = FilterSelection::default();
        self.status_message = None;
        self.refresh();
    }

    /// Re-run the query and rebuild both projections.
    pub fn refresh(&mut self) {
        let Some(ws) = &self.working else {
            self.visible_indices.clear();
            self.map = MapProjection::default();
            self.bar = BarOutcome::default();
            self.color_scale = None;
            return;
        };

        self.visible_indices = ws.query(&self.selection);
        let view = TableView::new(&ws.table, &self.visible_indices);

        self.map = build_map(view, &ws.specialty_columns);
        self.bar = build_bar(
            view,
            &ws.specialty_columns,
            self.selection.establishment.as_deref(),
            self.selection.year,
        );
        self.color_scale = RateColorScale::from_values(self.map.points.iter().filter_map(|p| p.color));
        self.recenter = true;
    }

    /// Replace the whole selection.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        if selection != self.selection {
            self.selection = selection;
            self.refresh();
        }
    }

    /// Clear every filter.
    pub fn reset_filters(&mut self) {
        self.set_selection(FilterSelection::default());
    }

    /// Borrow the rows currently passing the filters.
    pub fn visible_view(&self) -> Option<TableView<'_>> {
        self.working
            .as_ref()
            .map(|ws| TableView::new(&ws.table, &self.visible_indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Row, Table};
    use crate::data::schema::{
        COL_ESTABLISHMENT, COL_LATITUDE, COL_LONGITUDE, COL_YEAR, Specialty,
    };

    fn working() -> WorkingSet {
        let school = |name: &str, year: i64, lat: f64, lon: f64, rate: f64| {
            Row::new(
                [
                    (COL_ESTABLISHMENT.to_string(), CellValue::String(name.into())),
                    (COL_YEAR.to_string(), CellValue::Integer(year)),
                    (COL_LATITUDE.to_string(), CellValue::Float(lat)),
                    (COL_LONGITUDE.to_string(), CellValue::Float(lon)),
                    (Specialty::AllSeries.rate_column(), CellValue::Float(rate)),
                    (Specialty::S.rate_column(), CellValue::Float(rate)),
                ]
                .into_iter()
                .collect(),
            )
        };
        let columns = vec![
            COL_ESTABLISHMENT.to_string(),
            COL_YEAR.to_string(),
            COL_LATITUDE.to_string(),
            COL_LONGITUDE.to_string(),
            Specialty::AllSeries.rate_column(),
            Specialty::S.rate_column(),
        ];
        WorkingSet::from_table(Table::new(
            columns,
            vec![
                school("Lycée X", 2020, 48.0, 2.0, 80.0),
                school("Lycée X", 2021, 48.0, 2.0, 90.0),
                school("Lycée Y", 2021, 49.0, 3.0, 70.0),
            ],
        ))
    }

    #[test]
    fn new_state_has_placeholder_projections() {
        let mut state = AppState::default();
        state.refresh();
        assert!(state.visible_indices.is_empty());
        assert!(state.map.points.is_empty());
        assert!(matches!(state.bar, BarOutcome::Empty(_)));
    }

    #[test]
    fn loading_data_shows_everything() {
        let mut state = AppState::default();
        state.set_working_set(working());
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.map.points.len(), 3);
        assert!(state.map.center.is_some());
        assert!(matches!(state.bar, BarOutcome::Empty(_)));
        let scale = state.color_scale.unwrap();
        assert_eq!((scale.min, scale.max), (70.0, 90.0));
        assert!(state.recenter);
    }

    #[test]
    fn selecting_an_establishment_builds_the_bar_chart() {
        let mut state = AppState::default();
        state.set_working_set(working());
        state.set_selection(FilterSelection {
            establishment: Some("Lycée X".into()),
            year: Some(2021),
            ..Default::default()
        });
        assert_eq!(state.visible_indices, vec![1]);
        let BarOutcome::Chart(bar) = &state.bar else {
            panic!("expected a chart");
        };
        assert_eq!(bar.title, "Réussite - Lycée X (2021)");
        assert_eq!(bar.entries[0].rate, 90.0);

        state.reset_filters();
        assert_eq!(state.visible_indices.len(), 3);
        assert!(matches!(state.bar, BarOutcome::Empty(_)));
    }

    #[test]
    fn unmatched_selection_degrades_gracefully() {
        let mut state = AppState::default();
        state.set_working_set(working());
        state.set_selection(FilterSelection {
            establishment: Some("Lycée Z".into()),
            ..Default::default()
        });
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.map.center, None);
        assert!(matches!(state.bar, BarOutcome::Empty(_)));
        assert_eq!(state.color_scale, None);
        assert_eq!(state.visible_view().map(|v| v.len()), Some(0));
    }
}
