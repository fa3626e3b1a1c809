use thiserror::Error;

/// Structural problems with the input tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("column '{column}' not found in {table} table")]
    MissingColumn { table: &'static str, column: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}
