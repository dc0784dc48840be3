use serde_json::{Map, Value};

use crate::error::AppResult;
use crate::store::SHEET_SETTINGS;
use crate::AppState;

/// The whole Settings sheet as one name → value map. Rows with an empty
/// name cell are skipped.
pub fn get_settings(state: &AppState) -> AppResult<Map<String, Value>> {
    let rows = state.store.read_rows(SHEET_SETTINGS)?;

    let mut settings = Map::new();
    for row in rows.iter().skip(1) {
        let Some(name) = row.first().and_then(Value::as_str) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let value = row.get(1).cloned().unwrap_or(Value::String(String::new()));
        settings.insert(name.to_string(), value);
    }
    Ok(settings)
}

/// Merges the payload into the current settings (existing keys overwritten,
/// new keys added, nothing removed), then rewrites the whole sheet.
pub fn save_settings(state: &AppState, updates: Map<String, Value>) -> AppResult<String> {
    let mut settings = get_settings(state)?;
    for (name, value) in updates {
        settings.insert(name, value);
    }

    state.store.clear_below_header(SHEET_SETTINGS)?;
    for (name, value) in settings {
        state
            .store
            .append_row(SHEET_SETTINGS, vec![Value::String(name), value])?;
    }

    tracing::info!("Settings saved");
    Ok("Settings saved successfully.".to_string())
}
