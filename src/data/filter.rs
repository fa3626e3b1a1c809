use super::model::{CellValue, Row, Table};
use super::schema::{
    COL_COMMUNE, COL_DEPARTMENT, COL_ESTABLISHMENT, COL_YEAR, Specialty, SpecialtyColumns,
};

// ---------------------------------------------------------------------------
// Static filter: fixed region / establishment type
// ---------------------------------------------------------------------------

/// Keep the rows where every `(column, value)` pair matches exactly.
/// Returns a new table; the input is untouched.
pub fn restrict(table: &Table, criteria: &[(&str, &str)]) -> Table {
    for (col, _) in criteria {
        if !table.has_column(col) {
            log::warn!("Static filter column '{col}' missing: working table will be empty");
        }
    }
    let rows = table
        .rows
        .iter()
        .filter(|row| criteria.iter().all(|(col, val)| row.text(col) == Some(*val)))
        .cloned()
        .collect();
    Table::new(table.columns.clone(), rows)
}

// ---------------------------------------------------------------------------
// FilterSelection: the five user-facing filter dimensions
// ---------------------------------------------------------------------------

/// Current value of each filter control. `None` means "no selection".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub department: Option<String>,
    pub commune: Option<String>,
    pub establishment: Option<String>,
    pub specialty: Option<Specialty>,
    pub year: Option<i64>,
}

/// Return indices of rows that pass every present filter, in table order.
///
/// Text and year filters are exact-equality predicates. A specialty keeps
/// rows whose rate column is strictly positive; when the table has no column
/// for that specialty the predicate is skipped.
pub fn filtered_indices(
    table: &Table,
    specialty_columns: &SpecialtyColumns,
    selection: &FilterSelection,
) -> Vec<usize> {
    let text_filters: Vec<(&str, &str)> = [
        (COL_DEPARTMENT, selection.department.as_deref()),
        (COL_COMMUNE, selection.commune.as_deref()),
        (COL_ESTABLISHMENT, selection.establishment.as_deref()),
    ]
    .into_iter()
    .filter_map(|(col, val)| val.map(|v| (col, v)))
    .collect();

    let rate_column = selection
        .specialty
        .and_then(|s| specialty_columns.column(s));

    let indices: Vec<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            text_filters.iter().all(|(col, val)| matches_text(row, col, val))
                && selection.year.map_or(true, |y| row.get(COL_YEAR).as_i64() == Some(y))
                && rate_column.map_or(true, |col| row.number(col).is_some_and(|v| v > 0.0))
        })
        .map(|(i, _)| i)
        .collect();

    log::debug!("Query {selection:?} -> {} / {} rows", indices.len(), table.len());
    indices
}

/// Exact match on the cell's text. Numeric cells compare by their rendering so
/// that e.g. a commune code typed as an integer still matches its label.
fn matches_text(row: &Row, column: &str, value: &str) -> bool {
    match row.get(column) {
        CellValue::String(s) => s == value,
        CellValue::Null => false,
        other => other.to_string() == value,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::schema::RATE_PREFIX;

    fn school(dept: &str, commune: &str, name: &str, year: i64, s_rate: Option<f64>) -> Row {
        let mut cells = BTreeMap::new();
        cells.insert(COL_DEPARTMENT.to_string(), CellValue::String(dept.into()));
        cells.insert(COL_COMMUNE.to_string(), CellValue::String(commune.into()));
        cells.insert(COL_ESTABLISHMENT.to_string(), CellValue::String(name.into()));
        cells.insert(COL_YEAR.to_string(), CellValue::Integer(year));
        cells.insert(
            format!("{RATE_PREFIX}S"),
            s_rate.map_or(CellValue::Null, CellValue::Float),
        );
        Row::new(cells)
    }

    fn working_table() -> Table {
        let columns = vec![
            COL_DEPARTMENT.to_string(),
            COL_COMMUNE.to_string(),
            COL_ESTABLISHMENT.to_string(),
            COL_YEAR.to_string(),
            format!("{RATE_PREFIX}S"),
        ];
        Table::new(
            columns,
            vec![
                school("PARIS", "PARIS 05", "Lycée Henri IV", 2020, Some(98.0)),
                school("PARIS", "PARIS 05", "Lycée Henri IV", 2021, Some(99.0)),
                school("PARIS", "PARIS 06", "Lycée Fénelon", 2021, Some(0.0)),
                school("VAL-DE-MARNE", "CRETEIL", "Lycée Saint-Exupéry", 2021, None),
                school("VAL-DE-MARNE", "VITRY", "Lycée Jean Macé", 2020, Some(85.0)),
            ],
        )
    }

    fn run(table: &Table, sel: &FilterSelection) -> Vec<usize> {
        filtered_indices(table, &SpecialtyColumns::resolve(table), sel)
    }

    #[test]
    fn empty_selection_returns_everything() {
        let table = working_table();
        assert_eq!(run(&table, &FilterSelection::default()), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let table = working_table();
        let sel = FilterSelection {
            department: Some("PARIS".into()),
            year: Some(2021),
            ..Default::default()
        };
        assert_eq!(run(&table, &sel), vec![1, 2]);

        let sel = FilterSelection {
            commune: Some("PARIS 05".into()),
            establishment: Some("Lycée Henri IV".into()),
            ..Default::default()
        };
        assert_eq!(run(&table, &sel), vec![0, 1]);
    }

    #[test]
    fn unmatched_value_yields_empty_result() {
        let table = working_table();
        let sel = FilterSelection {
            department: Some("ESSONNE".into()),
            ..Default::default()
        };
        assert!(run(&table, &sel).is_empty());
    }

    #[test]
    fn empty_string_is_a_real_selection() {
        let table = working_table();
        let sel = FilterSelection {
            commune: Some(String::new()),
            ..Default::default()
        };
        assert!(run(&table, &sel).is_empty());
    }

    #[test]
    fn specialty_keeps_strictly_positive_rates() {
        let table = working_table();
        let sel = FilterSelection {
            specialty: Some(Specialty::S),
            ..Default::default()
        };
        // zero and null rates are dropped
        assert_eq!(run(&table, &sel), vec![0, 1, 4]);
    }

    #[test]
    fn specialty_without_column_is_a_no_op() {
        let table = working_table();
        let base = FilterSelection {
            department: Some("VAL-DE-MARNE".into()),
            ..Default::default()
        };
        let with_unknown = FilterSelection {
            specialty: Some(Specialty::Sthr),
            ..base.clone()
        };
        assert_eq!(run(&table, &with_unknown), run(&table, &base));
    }

    #[test]
    fn results_are_idempotent_subsets() {
        let table = working_table();
        let selections = [
            FilterSelection::default(),
            FilterSelection {
                year: Some(2020),
                ..Default::default()
            },
            FilterSelection {
                department: Some("PARIS".into()),
                specialty: Some(Specialty::S),
                ..Default::default()
            },
        ];
        for sel in &selections {
            let first = run(&table, sel);
            let second = run(&table, sel);
            assert_eq!(first, second);
            assert!(first.iter().all(|&i| i < table.len()));
            assert!(first.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn year_matches_integral_floats() {
        let mut table = working_table();
        table.rows[4]
            .cells
            .insert(COL_YEAR.to_string(), CellValue::Float(2020.0));
        let sel = FilterSelection {
            year: Some(2020),
            ..Default::default()
        };
        assert_eq!(run(&table, &sel), vec![0, 4]);
    }

    #[test]
    fn restrict_builds_a_new_table() {
        let table = working_table();
        let paris = restrict(&table, &[(COL_DEPARTMENT, "PARIS")]);
        assert_eq!(paris.len(), 3);
        assert_eq!(table.len(), 5);
        assert_eq!(paris.columns, table.columns);

        let none = restrict(&table, &[("Region", "ILE-DE-FRANCE")]);
        assert!(none.is_empty());
    }
}
