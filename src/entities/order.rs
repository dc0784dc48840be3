use serde::{Deserialize, Serialize};

/// Orders sheet columns, in sheet order. The header row of the sheet is the
/// authoritative schema; this constant only seeds new sheets.
pub const ORDER_HEADERS: &[&str] = &[
    "id",
    "date",
    "time",
    "driver",
    "warehouse",
    "customer",
    "city",
    "address",
    "status",
    "deliveryNoteNo",
    "createdAt",
    "updatedAt",
];

pub const DRIVER_ALI: &str = "ALI";
pub const DRIVER_HIKMAT: &str = "HIKMAT";

pub const WAREHOUSE_HARASH: &str = "HARASH";
pub const WAREHOUSE_TALMID: &str = "TALMID";

/// One order row. Every field is a sheet cell; absent cells are empty
/// strings, so there are no `Option`s here. An empty `id` means the order
/// has not been saved yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub driver: String,
    pub warehouse: String,
    pub customer: String,
    pub city: String,
    pub address: String,
    pub status: String,
    pub delivery_note_no: String,
    pub created_at: String,
    pub updated_at: String,
}
