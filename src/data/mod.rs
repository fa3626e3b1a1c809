/// Data layer: core types, loading, joining and querying.
///
/// Architecture:
/// ```text
///  indicators.csv     directory.csv
///        │                 │
///        ▼                 ▼
///   ┌──────────────────────────┐
///   │  loader                  │  parse file → Table
///   └──────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  join     │  inner join on the school identifier
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  WorkingSet   │  region/type restriction, specialty columns, options
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSelection → filtered indices
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod join;
pub mod loader;
pub mod model;
pub mod options;
pub mod schema;
pub mod working;
