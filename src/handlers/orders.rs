use chrono::{SecondsFormat, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::{Map, Value};

use crate::entities::Order;
use crate::error::{AppError, AppResult};
use crate::store::{record_to_row, row_to_record, Row, SHEET_ARCHIVE, SHEET_ORDERS};
use crate::AppState;

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Random order identifier. Not checked for collisions against existing
/// rows; the id space is large enough for a table this size.
fn new_order_id() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    let millis = Utc::now().timestamp_millis();
    format!("ORD_{}{:05}", token, millis % 100_000)
}

fn sheet_header(rows: &[Row]) -> AppResult<&Row> {
    rows.first()
        .ok_or_else(|| AppError::Internal(format!("sheet \"{SHEET_ORDERS}\" has no header row")))
}

fn column_index(header: &Row, name: &str) -> AppResult<usize> {
    header
        .iter()
        .position(|cell| cell.as_str() == Some(name))
        .ok_or_else(|| {
            AppError::Internal(format!("missing \"{name}\" column in {SHEET_ORDERS} sheet"))
        })
}

/// Absolute index of the data row whose id cell matches, if any.
fn find_order_row(rows: &[Row], id_col: usize, id: &str) -> Option<usize> {
    rows.iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| row.get(id_col).and_then(Value::as_str) == Some(id))
        .map(|(index, _)| index)
}

fn order_record(order: &Order) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(order)? {
        Value::Object(record) => Ok(record),
        _ => Err(AppError::Internal("order did not serialize to an object".to_string())),
    }
}

/// Full-table scan of the Orders sheet, header-driven conversion.
pub fn list_orders(state: &AppState) -> AppResult<Vec<Order>> {
    let rows = state.store.read_rows(SHEET_ORDERS)?;
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

/// Upsert. An order without an id gets a fresh one and a `createdAt` stamp;
/// `updatedAt` is stamped on every save.
pub fn save_order(state: &AppState, mut order: Order) -> AppResult<Order> {
    let rows = state.store.read_rows(SHEET_ORDERS)?;
    let header = sheet_header(&rows)?;
    let id_col = column_index(header, "id")?;

    if order.id.is_empty() {
        order.id = new_order_id();
        order.created_at = now_iso();
    }
    order.updated_at = now_iso();

    let row = record_to_row(header, &order_record(&order)?);

    match find_order_row(&rows, id_col, &order.id) {
        Some(index) => {
            state.store.write_row(SHEET_ORDERS, index, row)?;
            tracing::info!("Order {} updated", order.id);
        }
        None => {
            state.store.append_row(SHEET_ORDERS, row)?;
            tracing::info!("New order {} added", order.id);
        }
    }

    Ok(order)
}

/// Sets the given columns plus `updatedAt` on the matching row and writes
/// the single row back. Shared by the status and delivery-note updates.
fn update_order_cells(
    state: &AppState,
    id: &str,
    updates: &[(&str, &str)],
) -> AppResult<Map<String, Value>> {
    let rows = state.store.read_rows(SHEET_ORDERS)?;
    let header = sheet_header(&rows)?;
    let id_col = column_index(header, "id")?;
    let updated_at_col = column_index(header, "updatedAt")?;

    let index = find_order_row(&rows, id_col, id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let mut row = rows[index].clone();
    for (name, value) in updates {
        let col = column_index(header, name)?;
        if row.len() <= col {
            row.resize(col + 1, Value::String(String::new()));
        }
        row[col] = Value::String((*value).to_string());
    }
    if row.len() <= updated_at_col {
        row.resize(updated_at_col + 1, Value::String(String::new()));
    }
    row[updated_at_col] = Value::String(now_iso());

    let record = row_to_record(header, &row);
    state.store.write_row(SHEET_ORDERS, index, row)?;
    Ok(record)
}

pub fn update_status(state: &AppState, id: &str, status: &str) -> AppResult<Map<String, Value>> {
    let record = update_order_cells(state, id, &[("status", status)])?;
    tracing::info!("Status for order {id} updated to {status}");
    Ok(record)
}

pub fn assign_delivery_note(
    state: &AppState,
    id: &str,
    delivery_note_no: &str,
) -> AppResult<Map<String, Value>> {
    let record = update_order_cells(state, id, &[("deliveryNoteNo", delivery_note_no)])?;
    tracing::info!("Delivery note {delivery_note_no} assigned to order {id}");
    Ok(record)
}

pub fn delete_order(state: &AppState, id: &str) -> AppResult<String> {
    let rows = state.store.read_rows(SHEET_ORDERS)?;
    let header = sheet_header(&rows)?;
    let id_col = column_index(header, "id")?;

    let index = find_order_row(&rows, id_col, id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    state.store.delete_row(SHEET_ORDERS, index)?;
    tracing::info!("Order {id} deleted");
    Ok(format!("Order {id} deleted successfully."))
}

/// Copies the row verbatim into the Archive sheet (creating its header from
/// the Orders header on first use), then deletes it from Orders. The two
/// steps are not atomic: a failure in between can leave the row in both
/// sheets or in neither.
pub fn archive_order(state: &AppState, id: &str) -> AppResult<String> {
    let rows = state.store.read_rows(SHEET_ORDERS)?;
    let header = sheet_header(&rows)?;
    let id_col = column_index(header, "id")?;

    let index = find_order_row(&rows, id_col, id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let header_names: Vec<&str> = header.iter().filter_map(Value::as_str).collect();
    state.store.ensure_sheet(SHEET_ARCHIVE, &header_names)?;

    state.store.append_row(SHEET_ARCHIVE, rows[index].clone())?;
    state.store.delete_row(SHEET_ORDERS, index)?;
    tracing::info!("Order {id} archived");
    Ok(format!("Order {id} archived successfully."))
}
