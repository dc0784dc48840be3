pub mod city;
pub mod order;

pub use city::{City, CITY_HEADERS};
pub use order::{Order, ORDER_HEADERS};

/// Settings sheet columns: one name/value pair per row.
pub const SETTINGS_HEADERS: &[&str] = &["settingName", "settingValue"];

/// Settings key holding the shared-secret API token. Stripped from every
/// settings payload returned to a caller.
pub const TOKEN_SETTING: &str = "apiToken";
