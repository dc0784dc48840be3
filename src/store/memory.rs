use std::collections::HashMap;
use std::sync::Mutex;

use crate::entities::{CITY_HEADERS, ORDER_HEADERS, SETTINGS_HEADERS};
use crate::error::{AppError, AppResult};

use super::{header_row, Row, RowStore, SHEET_CITIES, SHEET_ORDERS, SHEET_SETTINGS};

/// In-memory sheet store used by the test suite.
#[derive(Default)]
pub struct MemoryStore {
    sheets: Mutex<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the standard sheets and their header rows in place,
    /// matching what a fresh deployment looks like.
    pub fn with_standard_sheets() -> Self {
        let store = Self::new();
        let mut sheets = store.sheets.lock().expect("store lock poisoned");
        sheets.insert(SHEET_ORDERS.to_string(), vec![header_row(ORDER_HEADERS)]);
        sheets.insert(SHEET_CITIES.to_string(), vec![header_row(CITY_HEADERS)]);
        sheets.insert(SHEET_SETTINGS.to_string(), vec![header_row(SETTINGS_HEADERS)]);
        drop(sheets);
        store
    }

    fn with_sheet<T>(
        &self,
        sheet: &str,
        f: impl FnOnce(&mut Vec<Row>) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut sheets = self
            .sheets
            .lock()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))?;
        let rows = sheets
            .get_mut(sheet)
            .ok_or_else(|| AppError::SheetMissing(sheet.to_string()))?;
        f(rows)
    }
}

impl RowStore for MemoryStore {
    fn read_rows(&self, sheet: &str) -> AppResult<Vec<Row>> {
        self.with_sheet(sheet, |rows| Ok(rows.clone()))
    }

    fn append_row(&self, sheet: &str, row: Row) -> AppResult<()> {
        self.with_sheet(sheet, |rows| {
            rows.push(row);
            Ok(())
        })
    }

    fn write_row(&self, sheet: &str, index: usize, row: Row) -> AppResult<()> {
        self.with_sheet(sheet, |rows| {
            let slot = rows
                .get_mut(index)
                .ok_or_else(|| AppError::Internal(format!("row {index} out of range")))?;
            *slot = row;
            Ok(())
        })
    }

    fn delete_row(&self, sheet: &str, index: usize) -> AppResult<()> {
        self.with_sheet(sheet, |rows| {
            if index >= rows.len() {
                return Err(AppError::Internal(format!("row {index} out of range")));
            }
            rows.remove(index);
            Ok(())
        })
    }

    fn clear_below_header(&self, sheet: &str) -> AppResult<()> {
        self.with_sheet(sheet, |rows| {
            rows.truncate(1);
            Ok(())
        })
    }

    fn ensure_sheet(&self, sheet: &str, header: &[&str]) -> AppResult<()> {
        let mut sheets = self
            .sheets
            .lock()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))?;
        sheets
            .entry(sheet.to_string())
            .or_insert_with(|| vec![header_row(header)]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_sheet_is_a_sheet_missing_error() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.read_rows("Orders"),
            Err(AppError::SheetMissing(_))
        ));
    }

    #[test]
    fn append_write_delete_keep_positions() {
        let store = MemoryStore::with_standard_sheets();
        store.append_row(SHEET_ORDERS, vec![json!("a")]).unwrap();
        store.append_row(SHEET_ORDERS, vec![json!("b")]).unwrap();
        store.append_row(SHEET_ORDERS, vec![json!("c")]).unwrap();

        store.write_row(SHEET_ORDERS, 2, vec![json!("b2")]).unwrap();
        store.delete_row(SHEET_ORDERS, 1).unwrap();

        let rows = store.read_rows(SHEET_ORDERS).unwrap();
        assert_eq!(rows.len(), 3); // header + 2 data rows
        assert_eq!(rows[1], vec![json!("b2")]);
        assert_eq!(rows[2], vec![json!("c")]);
    }

    #[test]
    fn clear_below_header_keeps_the_header() {
        let store = MemoryStore::with_standard_sheets();
        store.append_row(SHEET_CITIES, vec![json!("עיר"), json!(3)]).unwrap();
        store.clear_below_header(SHEET_CITIES).unwrap();

        let rows = store.read_rows(SHEET_CITIES).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], json!("city"));
    }

    #[test]
    fn ensure_sheet_is_idempotent() {
        let store = MemoryStore::new();
        store.ensure_sheet("Archive", &["id"]).unwrap();
        store.append_row("Archive", vec![json!("x")]).unwrap();
        store.ensure_sheet("Archive", &["id"]).unwrap();

        assert_eq!(store.read_rows("Archive").unwrap().len(), 2);
    }
}
