use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::entities::{CITY_HEADERS, ORDER_HEADERS, SETTINGS_HEADERS};
use crate::error::{AppError, AppResult};

use super::{header_row, Row, RowStore, SHEET_CITIES, SHEET_ORDERS, SHEET_SETTINGS};

type Workbook = BTreeMap<String, Vec<Row>>;

/// Sheet store persisted as one JSON file: an object mapping sheet names to
/// row arrays. The whole workbook is rewritten after every mutation, which
/// is fine at this data volume and keeps recovery trivial (the file is
/// always a complete, valid snapshot).
pub struct JsonFileStore {
    path: PathBuf,
    workbook: Mutex<Workbook>,
}

impl JsonFileStore {
    /// Loads the workbook from `path`, creating it with the standard sheets
    /// (header rows only) when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let workbook: Workbook = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            let mut workbook = Workbook::new();
            workbook.insert(SHEET_ORDERS.to_string(), vec![header_row(ORDER_HEADERS)]);
            workbook.insert(SHEET_CITIES.to_string(), vec![header_row(CITY_HEADERS)]);
            workbook.insert(SHEET_SETTINGS.to_string(), vec![header_row(SETTINGS_HEADERS)]);
            let store = Self {
                path: path.clone(),
                workbook: Mutex::new(workbook),
            };
            store.persist()?;
            return Ok(store);
        };

        Ok(Self {
            path,
            workbook: Mutex::new(workbook),
        })
    }

    fn persist(&self) -> AppResult<()> {
        let workbook = self.lock()?;
        let raw = serde_json::to_string_pretty(&*workbook)?;
        drop(workbook);
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Workbook>> {
        self.workbook
            .lock()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
    }

    fn mutate<T>(
        &self,
        sheet: &str,
        f: impl FnOnce(&mut Vec<Row>) -> AppResult<T>,
    ) -> AppResult<T> {
        let result = {
            let mut workbook = self.lock()?;
            let rows = workbook
                .get_mut(sheet)
                .ok_or_else(|| AppError::SheetMissing(sheet.to_string()))?;
            f(rows)?
        };
        self.persist()?;
        Ok(result)
    }
}

impl RowStore for JsonFileStore {
    fn read_rows(&self, sheet: &str) -> AppResult<Vec<Row>> {
        let workbook = self.lock()?;
        workbook
            .get(sheet)
            .cloned()
            .ok_or_else(|| AppError::SheetMissing(sheet.to_string()))
    }

    fn append_row(&self, sheet: &str, row: Row) -> AppResult<()> {
        self.mutate(sheet, |rows| {
            rows.push(row);
            Ok(())
        })
    }

    fn write_row(&self, sheet: &str, index: usize, row: Row) -> AppResult<()> {
        self.mutate(sheet, |rows| {
            let slot = rows
                .get_mut(index)
                .ok_or_else(|| AppError::Internal(format!("row {index} out of range")))?;
            *slot = row;
            Ok(())
        })
    }

    fn delete_row(&self, sheet: &str, index: usize) -> AppResult<()> {
        self.mutate(sheet, |rows| {
            if index >= rows.len() {
                return Err(AppError::Internal(format!("row {index} out of range")));
            }
            rows.remove(index);
            Ok(())
        })
    }

    fn clear_below_header(&self, sheet: &str) -> AppResult<()> {
        self.mutate(sheet, |rows| {
            rows.truncate(1);
            Ok(())
        })
    }

    fn ensure_sheet(&self, sheet: &str, header: &[&str]) -> AppResult<()> {
        {
            let mut workbook = self.lock()?;
            workbook
                .entry(sheet.to_string())
                .or_insert_with(|| vec![header_row(header)]);
        }
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creates_standard_sheets_on_first_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm_data.json");

        let store = JsonFileStore::open(&path).unwrap();
        let rows = store.read_rows(SHEET_ORDERS).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], json!("id"));
        assert!(path.exists());
    }

    #[test]
    fn mutations_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm_data.json");

        let store = JsonFileStore::open(&path).unwrap();
        store
            .append_row(SHEET_SETTINGS, vec![json!("apiToken"), json!("secret")])
            .unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        let rows = reopened.read_rows(SHEET_SETTINGS).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec![json!("apiToken"), json!("secret")]);
    }
}
