use crate::data::model::{CellValue, Row, TableView};
use crate::data::schema::{
    COL_ESTABLISHMENT, COL_LATITUDE, COL_LONGITUDE, COL_YEAR, Specialty, SpecialtyColumns,
};

/// Bar chart y-axis domain; rates are percentages.
pub const RATE_AXIS: [f64; 2] = [0.0, 100.0];

/// Title marker used when no year is selected.
pub const ALL_YEARS: &str = "Toutes années";

/// Placeholder shown in place of the bar chart.
pub const NO_ESTABLISHMENT_MESSAGE: &str = "Veuillez sélectionner un établissement";

// ---------------------------------------------------------------------------
// Map projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One school on the map. Coordinates may be missing in the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub label: String,
    /// Overall success rate, drives the point colour.
    pub color: Option<f64>,
}

impl MapPoint {
    pub fn position(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapProjection {
    pub points: Vec<MapPoint>,
    /// `None` when there is nothing to center on; keep the default view.
    pub center: Option<GeoPoint>,
}

/// One point per filtered row, centered on the mean position.
///
/// Null coordinates are left out of the mean, axis by axis. If either axis
/// has no value at all there is no center. A school without a name gets an
/// empty label.
pub fn build_map(view: TableView<'_>, specialty_columns: &SpecialtyColumns) -> MapProjection {
    let color_column = specialty_columns.column(Specialty::AllSeries);

    let points: Vec<MapPoint> = view
        .rows()
        .map(|row| MapPoint {
            latitude: row.number(COL_LATITUDE),
            longitude: row.number(COL_LONGITUDE),
            label: row.text(COL_ESTABLISHMENT).unwrap_or_default().to_string(),
            color: color_column.and_then(|c| row.number(c)),
        })
        .collect();

    let center = match (
        mean(points.iter().filter_map(|p| p.latitude)),
        mean(points.iter().filter_map(|p| p.longitude)),
    ) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    };

    MapProjection { points, center }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Bar projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarEntry {
    pub specialty: Specialty,
    pub rate: f64,
}

/// Success rate per specialty for a single school-year row.
#[derive(Debug, Clone, PartialEq)]
pub struct BarProjection {
    pub title: String,
    /// One entry per specialty, in enumeration order.
    pub entries: Vec<BarEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyState {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarOutcome {
    Chart(BarProjection),
    Empty(EmptyState),
}

impl Default for BarOutcome {
    fn default() -> Self {
        BarOutcome::Empty(EmptyState {
            message: NO_ESTABLISHMENT_MESSAGE.to_string(),
        })
    }
}

/// Build the per-specialty bar chart for the selected establishment.
///
/// Without an establishment, or with nothing left after filtering, the
/// result is the placeholder. Otherwise the chart shows the first row of
/// the year-deduplicated view. When no year is selected that row belongs to
/// whichever year came first, while the title still reads "all years".
pub fn build_bar(
    view: TableView<'_>,
    specialty_columns: &SpecialtyColumns,
    establishment: Option<&str>,
    year: Option<i64>,
) -> BarOutcome {
    let (Some(establishment), false) = (establishment, view.is_empty()) else {
        return BarOutcome::default();
    };
    let Some(representative) = first_row_per_year(view).into_iter().next() else {
        return BarOutcome::default();
    };

    let entries = Specialty::ALL
        .into_iter()
        .map(|specialty| BarEntry {
            specialty,
            rate: specialty_columns
                .column(specialty)
                .and_then(|c| representative.number(c))
                .unwrap_or(0.0),
        })
        .collect();

    let period = year.map_or_else(|| ALL_YEARS.to_string(), |y| y.to_string());

    BarOutcome::Chart(BarProjection {
        title: format!("Réussite - {establishment} ({period})"),
        entries,
    })
}

/// First row for each distinct year, in first-seen order. Null years share
/// one group.
pub fn first_row_per_year<'a>(view: TableView<'a>) -> Vec<&'a Row> {
    let mut seen: Vec<&CellValue> = Vec::new();
    let mut out = Vec::new();
    for row in view.rows() {
        let year = row.get(COL_YEAR);
        if !seen.contains(&year) {
            seen.push(year);
            out.push(row);
        }
    }
    out
}

/// Value label for a bar, e.g. `80.0%`.
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.1}%")
}
