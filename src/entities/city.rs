use serde::{Deserialize, Serialize};

pub const CITY_HEADERS: &[&str] = &["city", "distanceKmFromHodHasharon"];

/// One row of the city/distance lookup table. The whole table is replaced
/// wholesale on save; there is no per-row identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub city: String,
    pub distance_km_from_hod_hasharon: f64,
}
