use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::entities::{City, Order, TOKEN_SETTING};
use crate::error::{AppError, AppResult};
use crate::handlers::{cities, orders, report, settings};
use crate::AppState;

/// Header carrying the shared-secret token on every RPC call.
pub const TOKEN_HEADER: &str = "x-crm-token";

/// Raw inbound body: `{ "action": string, "payload": any }`. Parsed into an
/// [`Action`] only after the auth gate has passed, so an invalid action on
/// an unauthenticated request still fails Unauthorized.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub action: String,
    #[serde(default)]
    pub payload: Value,
}

/// The dispatch table: one variant per action tag, payload shape included.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "camelCase")]
pub enum Action {
    ListOrders,
    SaveOrder(Order),
    UpdateStatus {
        id: String,
        status: String,
    },
    DeleteOrder {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    AssignDeliveryNote {
        id: String,
        delivery_note_no: String,
    },
    ArchiveOrder {
        id: String,
    },
    ListCities,
    SaveCities(Vec<City>),
    GetSettings,
    SaveSettings(Map<String, Value>),
    MorningReport {
        date: String,
    },
}

impl Action {
    pub fn from_request(req: RpcRequest) -> AppResult<Self> {
        let RpcRequest { action, payload } = req;
        serde_json::from_value(json!({ "action": action, "payload": payload })).map_err(|e| {
            if e.to_string().contains("unknown variant") {
                AppError::BadRequest(format!("Unknown action: {action}"))
            } else {
                AppError::BadRequest(format!("Invalid payload for \"{action}\": {e}"))
            }
        })
    }
}

/// The shared-secret gate. The server-side token is itself a Settings row;
/// the request must carry an equal, non-empty `x-crm-token` header.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<()> {
    let client_token = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok());

    let server_token = settings::get_settings(state)?;
    let server_token = server_token.get(TOKEN_SETTING).and_then(Value::as_str);

    match (client_token, server_token) {
        (Some(client), Some(server)) if !client.is_empty() && client == server => Ok(()),
        _ => Err(AppError::Unauthorized(
            "Invalid or missing token".to_string(),
        )),
    }
}

/// Routes one authorized action to its handler and returns the raw `data`
/// value for the envelope.
pub fn dispatch(state: &AppState, action: Action) -> AppResult<Value> {
    match action {
        Action::ListOrders => Ok(serde_json::to_value(orders::list_orders(state)?)?),
        Action::SaveOrder(order) => Ok(serde_json::to_value(orders::save_order(state, order)?)?),
        Action::UpdateStatus { id, status } => {
            Ok(Value::Object(orders::update_status(state, &id, &status)?))
        }
        Action::DeleteOrder { id } => Ok(Value::String(orders::delete_order(state, &id)?)),
        Action::AssignDeliveryNote {
            id,
            delivery_note_no,
        } => Ok(Value::Object(orders::assign_delivery_note(
            state,
            &id,
            &delivery_note_no,
        )?)),
        Action::ArchiveOrder { id } => Ok(Value::String(orders::archive_order(state, &id)?)),
        Action::ListCities => Ok(serde_json::to_value(cities::list_cities(state)?)?),
        Action::SaveCities(list) => Ok(Value::String(cities::save_cities(state, list)?)),
        Action::GetSettings => {
            let mut map = settings::get_settings(state)?;
            // Never hand the shared secret back to a caller.
            map.remove(TOKEN_SETTING);
            Ok(Value::Object(map))
        }
        Action::SaveSettings(updates) => {
            Ok(Value::String(settings::save_settings(state, updates)?))
        }
        Action::MorningReport { date } => {
            let orders = orders::list_orders(state)?;
            Ok(Value::String(report::morning_report(
                &orders,
                &date,
                &state.config.crm_base_url,
            )?))
        }
    }
}

/// The single RPC endpoint: auth gate, then tag dispatch, then envelope.
pub async fn handle_rpc(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RpcRequest>,
) -> AppResult<Json<Value>> {
    authenticate(&state, &headers)?;
    let action = Action::from_request(req)?;
    let data = dispatch(&state, action)?;
    Ok(Json(json!({ "ok": true, "data": data })))
}

/// No-auth liveness probe.
pub async fn probe(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "message": "Delivery CRM backend is running",
        "parameters": params,
    }))
}
