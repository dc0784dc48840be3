pub mod file;
pub mod memory;

use serde_json::{Map, Value};

use crate::error::AppResult;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub const SHEET_ORDERS: &str = "Orders";
pub const SHEET_CITIES: &str = "Cities";
pub const SHEET_SETTINGS: &str = "Settings";
pub const SHEET_ARCHIVE: &str = "Archive";

/// One sheet row. Index 0 of a sheet is the header row; the header defines
/// the schema for every row below it.
pub type Row = Vec<Value>;

/// Storage capability the handlers are written against. Row indices are
/// absolute sheet positions (0 = header row). Mutations are not
/// transactional; a read-scan-then-write sequence can race with another
/// writer, which matches the backing-sheet model this replaces.
pub trait RowStore: Send + Sync {
    /// All rows of the sheet, header included. Fails with `SheetMissing`
    /// if the sheet does not exist.
    fn read_rows(&self, sheet: &str) -> AppResult<Vec<Row>>;

    fn append_row(&self, sheet: &str, row: Row) -> AppResult<()>;

    fn write_row(&self, sheet: &str, index: usize, row: Row) -> AppResult<()>;

    fn delete_row(&self, sheet: &str, index: usize) -> AppResult<()>;

    /// Removes every data row, keeping the header row in place.
    fn clear_below_header(&self, sheet: &str) -> AppResult<()>;

    /// Creates the sheet with the given header row if it does not exist.
    fn ensure_sheet(&self, sheet: &str, header: &[&str]) -> AppResult<()>;
}

/// Converts a data row to a record keyed by the header row.
pub fn row_to_record(header: &Row, row: &Row) -> Map<String, Value> {
    let mut record = Map::new();
    for (i, name) in header.iter().enumerate() {
        if let Some(name) = name.as_str() {
            let cell = row.get(i).cloned().unwrap_or(Value::String(String::new()));
            record.insert(name.to_string(), cell);
        }
    }
    record
}

/// Converts a record back to a row laid out in header order. Missing keys
/// become empty cells.
pub fn record_to_row(header: &Row, record: &Map<String, Value>) -> Row {
    header
        .iter()
        .map(|name| {
            name.as_str()
                .and_then(|n| record.get(n))
                .cloned()
                .unwrap_or(Value::String(String::new()))
        })
        .collect()
}

pub fn header_row(names: &[&str]) -> Row {
    names.iter().map(|n| Value::String((*n).to_string())).collect()
}
