use std::collections::{BTreeMap, HashMap};

use super::error::DataError;
use super::model::{Row, Table};

const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// Inner-join two tables on `left_key == right_key`.
///
/// Rows come out in left order; for each left row, matching right rows follow
/// in right order. Keys compare by their text rendering and null keys never
/// match. Non-key columns present on both sides are suffixed `_x` / `_y`.
pub fn inner_join(
    left: &Table,
    right: &Table,
    left_key: &str,
    right_key: &str,
) -> Result<Table, DataError> {
    if !left.has_column(left_key) {
        return Err(DataError::MissingColumn {
            table: "left",
            column: left_key.to_string(),
        });
    }
    if !right.has_column(right_key) {
        return Err(DataError::MissingColumn {
            table: "right",
            column: right_key.to_string(),
        });
    }

    let shared_key = left_key == right_key;
    let clashes = |col: &str, other: &Table| {
        other.has_column(col) && !(shared_key && col == left_key)
    };

    // Output name for each input column.
    let left_names: Vec<(String, String)> = left
        .columns
        .iter()
        .map(|c| {
            let out = if clashes(c, right) { format!("{c}{LEFT_SUFFIX}") } else { c.clone() };
            (c.clone(), out)
        })
        .collect();
    let right_names: Vec<(String, String)> = right
        .columns
        .iter()
        .filter(|c| !(shared_key && c.as_str() == right_key))
        .map(|c| {
            let out = if clashes(c, left) { format!("{c}{RIGHT_SUFFIX}") } else { c.clone() };
            (c.clone(), out)
        })
        .collect();

    let columns: Vec<String> = left_names
        .iter()
        .chain(right_names.iter())
        .map(|(_, out)| out.clone())
        .collect();

    let mut right_index: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        if let Some(key) = row.get(right_key).key_text() {
            right_index.entry(key).or_default().push(i);
        }
    }

    let mut rows = Vec::new();
    for left_row in &left.rows {
        let Some(key) = left_row.get(left_key).key_text() else {
            continue;
        };
        let Some(matches) = right_index.get(&key) else {
            continue;
        };
        for &ri in matches {
            let right_row = &right.rows[ri];
            let mut cells = BTreeMap::new();
            for (src, out) in &left_names {
                cells.insert(out.clone(), left_row.get(src).clone());
            }
            for (src, out) in &right_names {
                cells.insert(out.clone(), right_row.get(src).clone());
            }
            rows.push(Row::new(cells));
        }
    }

    log::info!(
        "Joined {} x {} rows on {left_key} = {right_key}: {} rows, {} columns",
        left.len(),
        right.len(),
        rows.len(),
        columns.len()
    );

    Ok(Table::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table(columns: &[&str], rows: &[&[CellValue]]) -> Table {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|vals| Row::new(columns.iter().cloned().zip(vals.iter().cloned()).collect()))
            .collect();
        Table::new(columns, rows)
    }

    fn s(v: &str) -> CellValue {
        CellValue::String(v.into())
    }

    #[test]
    fn joins_in_left_order_and_drops_unmatched() {
        let scores = table(
            &["UAI", "Annee"],
            &[
                &[s("B"), CellValue::Integer(2020)],
                &[s("A"), CellValue::Integer(2021)],
                &[s("Z"), CellValue::Integer(2021)],
                &[s("B"), CellValue::Integer(2021)],
            ],
        );
        let directory = table(
            &["Identifiant_de_l_etablissement", "Nom_commune"],
            &[&[s("A"), s("PARIS")], &[s("B"), s("CRETEIL")]],
        );

        let joined =
            inner_join(&scores, &directory, "UAI", "Identifiant_de_l_etablissement").unwrap();

        assert_eq!(
            joined.columns,
            vec!["UAI", "Annee", "Identifiant_de_l_etablissement", "Nom_commune"]
        );
        let got: Vec<_> = joined
            .rows
            .iter()
            .map(|r| (r.get("UAI").to_string(), r.get("Annee").to_string()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("B".to_string(), "2020".to_string()),
                ("A".to_string(), "2021".to_string()),
                ("B".to_string(), "2021".to_string()),
            ]
        );
        assert_eq!(joined.rows[0].get("Nom_commune"), &s("CRETEIL"));
    }

    #[test]
    fn overlapping_columns_get_suffixes() {
        let left = table(&["UAI", "Nom"], &[&[s("A"), s("left")]]);
        let right = table(&["id", "Nom"], &[&[s("A"), s("right")]]);
        let joined = inner_join(&left, &right, "UAI", "id").unwrap();
        assert_eq!(joined.columns, vec!["UAI", "Nom_x", "id", "Nom_y"]);
        assert_eq!(joined.rows[0].get("Nom_x"), &s("left"));
        assert_eq!(joined.rows[0].get("Nom_y"), &s("right"));
    }

    #[test]
    fn shared_key_name_appears_once() {
        let left = table(&["UAI", "a"], &[&[s("A"), CellValue::Integer(1)]]);
        let right = table(&["UAI", "b"], &[&[s("A"), CellValue::Integer(2)]]);
        let joined = inner_join(&left, &right, "UAI", "UAI").unwrap();
        assert_eq!(joined.columns, vec!["UAI", "a", "b"]);
    }

    #[test]
    fn null_keys_never_match() {
        let left = table(&["k"], &[&[CellValue::Null]]);
        let right = table(&["k2"], &[&[CellValue::Null]]);
        let joined = inner_join(&left, &right, "k", "k2").unwrap();
        assert!(joined.is_empty());
    }

    #[test]
    fn missing_key_column_is_an_error() {
        let left = table(&["UAI"], &[]);
        let right = table(&["id"], &[]);
        let err = inner_join(&left, &right, "UAI", "missing").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { table: "right", .. }));
    }
}
