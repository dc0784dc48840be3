use serde_json::Value;

use crate::entities::City;
use crate::error::{AppError, AppResult};
use crate::store::{record_to_row, row_to_record, SHEET_CITIES};
use crate::AppState;

pub fn list_cities(state: &AppState) -> AppResult<Vec<City>> {
    let rows = state.store.read_rows(SHEET_CITIES)?;
    let Some(header) = rows.first() else {
        return Ok(Vec::new());
    };

    rows.iter()
        .skip(1)
        .map(|row| {
            let record = row_to_record(header, row);
            serde_json::from_value(Value::Object(record)).map_err(AppError::from)
        })
        .collect()
}

/// Wholesale replace: every data row below the header is dropped and the
/// sheet is rewritten from the input. No merge, no per-row identity.
pub fn save_cities(state: &AppState, cities: Vec<City>) -> AppResult<String> {
    let rows = state.store.read_rows(SHEET_CITIES)?;
    let header = rows.first().ok_or_else(|| {
        AppError::Internal(format!("sheet \"{SHEET_CITIES}\" has no header row"))
    })?;

    let mut new_rows = Vec::with_capacity(cities.len());
    for city in &cities {
        match serde_json::to_value(city)? {
            Value::Object(record) => new_rows.push(record_to_row(header, &record)),
            _ => return Err(AppError::Internal("city did not serialize to an object".to_string())),
        }
    }

    state.store.clear_below_header(SHEET_CITIES)?;
    for row in new_rows {
        state.store.append_row(SHEET_CITIES, row)?;
    }

    tracing::info!("Cities data saved ({} rows)", cities.len());
    Ok("Cities data saved successfully.".to_string())
}
