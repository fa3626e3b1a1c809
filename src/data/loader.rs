use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{CellValue, Row, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – semicolon-separated, header row (the open-data export format)
/// * `.json`    – `[{ "UAI": "0750650C", "Annee": 2021, ... }, ...]`
/// * `.parquet` – flat columns of strings, integers, floats or booleans
pub fn load_table(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse a semicolon-separated table with a header row.
///
/// Short rows are padded with nulls; a leading UTF-8 BOM is dropped from the
/// first header.
pub fn read_csv<R: Read>(input: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(input);

    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        // line 1 is the header
        let record = result.with_context(|| format!("CSV line {}", row_no + 2))?;

        let cells: BTreeMap<String, CellValue> = columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let value = record.get(i).map(guess_cell_type).unwrap_or(CellValue::Null);
                (col.clone(), value)
            })
            .collect();

        rows.push(Row::new(cells));
    }

    Ok(Table::new(columns, rows))
}

fn guess_cell_type(raw: &str) -> CellValue {
    let s = raw.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_nan() {
            return CellValue::Null;
        }
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Parse a records-oriented JSON array (`df.to_json(orient='records')`).
///
/// Column order follows first appearance across the records.
pub fn parse_json(text: &str) -> Result<Table> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
            cells.insert(key.clone(), json_to_cell(val));
        }
        rows.push(Row::new(cells));
    }

    Ok(Table::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
/// Every column becomes a table column; nested types are kept as debug text.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        if batch.num_columns() != columns.len() {
            bail!(
                "record batch has {} columns, schema has {}",
                batch.num_columns(),
                columns.len()
            );
        }

        for row in 0..batch.num_rows() {
            let cells: BTreeMap<String, CellValue> = columns
                .iter()
                .enumerate()
                .map(|(col_idx, name)| (name.clone(), extract_cell(batch.column(col_idx), row)))
                .collect();
            rows.push(Row::new(cells));
        }
    }

    Ok(Table::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => match col.as_any().downcast_ref::<StringArray>() {
            Some(s) => CellValue::String(s.value(row).to_string()),
            None => CellValue::Null,
        },
        DataType::LargeUtf8 => {
            let s = col.as_string::<i64>();
            CellValue::String(s.value(row).to_string())
        }
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map_or(CellValue::Null, |arr| CellValue::Integer(arr.value(row) as i64)),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Null, |arr| CellValue::Integer(arr.value(row))),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map_or(CellValue::Null, |arr| CellValue::Float(arr.value(row) as f64)),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Null, |arr| CellValue::Float(arr.value(row))),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map_or(CellValue::Null, |arr| CellValue::Bool(arr.value(row))),
        other => CellValue::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::ArrayRef;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    #[test]
    fn csv_cells_are_typed() {
        let input = "UAI;Annee;Taux de reussite - S;Nom_commune;latitude\n\
                     0750650C;2021;92.5;PARIS 05; 48.84 \n\
                     0750651D;2020;;PARIS 06;\n";
        let table = read_csv(input.as_bytes()).unwrap();

        assert_eq!(
            table.columns,
            vec!["UAI", "Annee", "Taux de reussite - S", "Nom_commune", "latitude"]
        );
        assert_eq!(table.len(), 2);

        let first = &table.rows[0];
        assert_eq!(first.get("UAI"), &CellValue::String("0750650C".into()));
        assert_eq!(first.get("Annee"), &CellValue::Integer(2021));
        assert_eq!(first.number("Taux de reussite - S"), Some(92.5));
        assert_eq!(first.number("latitude"), Some(48.84));

        let second = &table.rows[1];
        assert!(second.get("Taux de reussite - S").is_null());
        assert!(second.get("latitude").is_null());
    }

    #[test]
    fn csv_strips_bom_and_pads_short_rows() {
        let input = "\u{feff}UAI;Region;Annee\n0750650C;ILE-DE-FRANCE\n";
        let table = read_csv(input.as_bytes()).unwrap();
        assert_eq!(table.columns[0], "UAI");
        assert!(table.rows[0].get("Annee").is_null());
        assert!(table.has_column("Annee"));
    }

    #[test]
    fn csv_non_finite_numbers_are_not_floats() {
        let input = "a;b;c;d\nNaN;\"x;y\";inf;-2.5\n";
        let table = read_csv(input.as_bytes()).unwrap();
        let row = &table.rows[0];
        assert!(row.get("a").is_null());
        assert_eq!(row.get("b"), &CellValue::String("x;y".into()));
        assert_eq!(row.get("c"), &CellValue::String("inf".into()));
        assert_eq!(row.number("c"), None);
        assert_eq!(row.get("d"), &CellValue::Float(-2.5));
    }

    #[test]
    fn csv_errors_name_the_file_line() {
        let input: &[u8] = b"UAI;Annee\nA;2021\nB;\xff\n";
        let err = read_csv(input).unwrap_err();
        assert_eq!(err.to_string(), "CSV line 3");
    }

    #[test]
    fn json_records_keep_first_seen_column_order() {
        let text = r#"[
            {"UAI": "A", "Annee": 2021, "latitude": 48.8},
            {"UAI": "B", "Annee": null, "extra": true}
        ]"#;
        let table = parse_json(text).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_column("extra"));
        assert_eq!(table.rows[0].get("Annee"), &CellValue::Integer(2021));
        assert!(table.rows[1].get("Annee").is_null());
        assert_eq!(table.rows[1].get("extra"), &CellValue::Bool(true));
    }

    #[test]
    fn json_rejects_non_array_root() {
        assert!(parse_json(r#"{"UAI": "A"}"#).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_table(Path::new("scores.xlsx")).unwrap_err();
        assert!(err.to_string().contains("xlsx"));
    }

    #[test]
    fn parquet_columns_are_typed_and_nulls_kept() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("UAI", DataType::Utf8, false),
            Field::new("Annee", DataType::Int64, true),
            Field::new("latitude", DataType::Float64, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["0750650C", "0750651D"])),
            Arc::new(Int64Array::from(vec![Some(2021), None])),
            Arc::new(Float64Array::from(vec![Some(48.8), None])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let path = std::env::temp_dir().join(format!(
            "lycee-dashboard-loader-{}.parquet",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_table(&path);
        std::fs::remove_file(&path).ok();
        let table = table.unwrap();

        assert_eq!(table.columns, vec!["UAI", "Annee", "latitude"]);
        assert_eq!(table.len(), 2);

        let first = &table.rows[0];
        assert_eq!(first.get("UAI"), &CellValue::String("0750650C".into()));
        assert_eq!(first.get("Annee"), &CellValue::Integer(2021));
        assert_eq!(first.get("latitude"), &CellValue::Float(48.8));

        let second = &table.rows[1];
        assert_eq!(second.get("UAI"), &CellValue::String("0750651D".into()));
        assert!(second.get("Annee").is_null());
        assert!(second.get("latitude").is_null());
    }
}
