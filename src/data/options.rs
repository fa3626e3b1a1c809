use std::collections::BTreeSet;

use super::model::Table;
use super::schema::{COL_COMMUNE, COL_DEPARTMENT, COL_ESTABLISHMENT, COL_YEAR, Specialty};

/// Sorted, distinct choices offered by each filter control.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub departments: Vec<String>,
    pub communes: Vec<String>,
    pub establishments: Vec<String>,
    pub years: Vec<i64>,
}

impl FilterOptions {
    pub fn from_table(table: &Table) -> Self {
        let years: BTreeSet<i64> = table
            .rows
            .iter()
            .filter_map(|row| row.get(COL_YEAR).as_i64())
            .collect();

        FilterOptions {
            departments: text_options(table, COL_DEPARTMENT),
            communes: text_options(table, COL_COMMUNE),
            establishments: text_options(table, COL_ESTABLISHMENT),
            years: years.into_iter().collect(),
        }
    }

    /// Specialty choices are fixed regardless of the data.
    pub fn specialties(&self) -> &'static [Specialty] {
        &Specialty::ALL
    }
}

fn text_options(table: &Table, column: &str) -> Vec<String> {
    let values: BTreeSet<String> = table
        .unique_values(column)
        .into_iter()
        .map(|v| v.to_string())
        .collect();
    values.into_iter().collect()
}
