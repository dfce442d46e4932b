//! Spreadsheet-style site import: header normalization, lenient number
//! parsing, and row grouping into sites and sectors.

pub mod header;
pub mod importer;
pub mod number;
pub mod reader;
pub mod row;

pub use header::{normalize_header, CanonicalKey};
pub use importer::{canonicalize_rows, import_tabular, TabularImport};
pub use number::parse_number;
pub use reader::{read_csv, rows_from_json};
pub use row::Row;
