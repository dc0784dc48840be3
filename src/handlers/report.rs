use crate::entities::order::{
    Order, DRIVER_ALI, DRIVER_HIKMAT, WAREHOUSE_HARASH, WAREHOUSE_TALMID,
};
use crate::error::{AppError, AppResult};
use crate::utils::time::{at_hour, in_window, parse_date, parse_date_time};

const MORNING_PEAK_START_HOUR: u32 = 6;
const MORNING_PEAK_END_HOUR: u32 = 9;

fn driver_label(code: &str) -> &'static str {
    if code == DRIVER_ALI { "עלי" } else { "חכמת" }
}

fn warehouse_label(code: &str) -> &str {
    match code {
        WAREHOUSE_HARASH => "החרש",
        WAREHOUSE_TALMID => "התלמיד",
        other => other,
    }
}

fn format_order(order: &Order) -> String {
    let mut block = format!(
        "📝 {} - דוח בוקר\n📅 {} ⏰ {} 🏠 {} 📄 מתכונן ליציאה\n👤 {} 📍 {}",
        driver_label(&order.driver),
        order.date,
        order.time,
        warehouse_label(&order.warehouse),
        order.customer,
        order.city,
    );
    if !order.address.is_empty() {
        block.push_str(&format!(" – {}", order.address));
    }
    block.push_str("\n-----");
    block
}

/// Renders the plain-text morning summary for one calendar date.
///
/// Orders are matched by exact `date` string; the peak count covers the
/// half-open window [06:00, 09:00) of that date. Driver buckets are emitted
/// in fixed order (ALI first), and empty buckets are omitted entirely.
pub fn morning_report(orders: &[Order], date_str: &str, crm_base_url: &str) -> AppResult<String> {
    let date = parse_date(date_str)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {date_str}")))?;

    let day_orders: Vec<&Order> = orders.iter().filter(|o| o.date == date_str).collect();
    let ali_orders: Vec<&Order> =
        day_orders.iter().copied().filter(|o| o.driver == DRIVER_ALI).collect();
    let hikmat_orders: Vec<&Order> =
        day_orders.iter().copied().filter(|o| o.driver == DRIVER_HIKMAT).collect();

    let harash = day_orders.iter().filter(|o| o.warehouse == WAREHOUSE_HARASH).count();
    let talmid = day_orders.iter().filter(|o| o.warehouse == WAREHOUSE_TALMID).count();

    let peak_start = at_hour(date, MORNING_PEAK_START_HOUR);
    let peak_end = at_hour(date, MORNING_PEAK_END_HOUR);
    let peak = day_orders
        .iter()
        .filter(|o| match parse_date_time(&o.date, &o.time) {
            Some(ts) => in_window(ts, peak_start, peak_end, true, false),
            None => false,
        })
        .count();

    let mut report = format!("סיכום הזמנות ליום {}:\n", date.format("%d/%m/%Y"));
    report.push_str(&format!("🚚 עלי: {} הזמנות\n", ali_orders.len()));
    report.push_str(&format!("🚛 חכמת: {} הזמנות\n", hikmat_orders.len()));
    report.push_str(&format!("📦 סה\"כ הזמנות: {}\n", day_orders.len()));
    report.push_str(&format!("🏫 מחסן התלמיד: {talmid} הזמנות\n"));
    report.push_str(&format!("🔨 מחסן החרש: {harash} הזמנות\n"));
    report.push_str(&format!("☀️ הזמנות 06:00-09:00: {peak} הזמנות\n\n"));
    report.push_str("--------------------\nדוחות בוקר מפורטים\n\n");

    for bucket in [&ali_orders, &hikmat_orders] {
        if bucket.is_empty() {
            continue;
        }
        let blocks: Vec<String> = bucket.iter().map(|o| format_order(o)).collect();
        report.push_str(&blocks.join("\n"));
        report.push_str("\n\n");
    }

    report.push_str(&format!("🔗 לוח בקרה CRM: {crm_base_url}"));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, time: &str, driver: &str, warehouse: &str, customer: &str) -> Order {
        Order {
            id: id.to_string(),
            date: "2024-05-01".to_string(),
            time: time.to_string(),
            driver: driver.to_string(),
            warehouse: warehouse.to_string(),
            customer: customer.to_string(),
            city: "X".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn counts_and_bucket_order() {
        let mut second = order("2", "10:00", DRIVER_HIKMAT, WAREHOUSE_TALMID, "B");
        second.city = "Y".to_string();
        let orders = vec![
            order("1", "07:00", DRIVER_ALI, WAREHOUSE_HARASH, "A"),
            second,
        ];

        let report = morning_report(&orders, "2024-05-01", "https://crm.example.com").unwrap();

        assert!(report.starts_with("סיכום הזמנות ליום 01/05/2024:\n"));
        assert!(report.contains("🚚 עלי: 1 הזמנות"));
        assert!(report.contains("🚛 חכמת: 1 הזמנות"));
        assert!(report.contains("📦 סה\"כ הזמנות: 2"));
        assert!(report.contains("🏫 מחסן התלמיד: 1 הזמנות"));
        assert!(report.contains("🔨 מחסן החרש: 1 הזמנות"));
        assert!(report.contains("☀️ הזמנות 06:00-09:00: 1 הזמנות"));

        // both detail blocks, ALI's before HIKMAT's
        let ali_block = report.find("👤 A 📍 X").expect("ALI block missing");
        let hikmat_block = report.find("👤 B 📍 Y").expect("HIKMAT block missing");
        assert!(ali_block < hikmat_block);

        assert!(report.ends_with("🔗 לוח בקרה CRM: https://crm.example.com"));
    }

    #[test]
    fn morning_peak_boundaries() {
        let orders = vec![
            order("1", "06:00", DRIVER_ALI, WAREHOUSE_HARASH, "A"),
            order("2", "08:59:59", DRIVER_ALI, WAREHOUSE_HARASH, "B"),
            order("3", "09:00", DRIVER_ALI, WAREHOUSE_HARASH, "C"),
        ];

        let report = morning_report(&orders, "2024-05-01", "url").unwrap();
        assert!(report.contains("☀️ הזמנות 06:00-09:00: 2 הזמנות"));
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let orders = vec![order("1", "07:00", DRIVER_ALI, WAREHOUSE_HARASH, "A")];

        let report = morning_report(&orders, "2024-05-01", "url").unwrap();
        assert!(report.contains("📝 עלי - דוח בוקר"));
        assert!(!report.contains("📝 חכמת"));
    }

    #[test]
    fn address_is_appended_when_present() {
        let mut with_address = order("1", "07:00", DRIVER_ALI, WAREHOUSE_HARASH, "A");
        with_address.address = "הרחוב 5".to_string();

        let report = morning_report(&[with_address], "2024-05-01", "url").unwrap();
        assert!(report.contains("📍 X – הרחוב 5"));
    }

    #[test]
    fn other_dates_are_filtered_out() {
        let mut other_day = order("1", "07:00", DRIVER_ALI, WAREHOUSE_HARASH, "A");
        other_day.date = "2024-05-02".to_string();

        let report = morning_report(&[other_day], "2024-05-01", "url").unwrap();
        assert!(report.contains("📦 סה\"כ הזמנות: 0"));
        assert!(!report.contains("📝"));
    }

    #[test]
    fn invalid_date_is_a_bad_request() {
        assert!(matches!(
            morning_report(&[], "yesterday", "url"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn unknown_warehouse_falls_back_to_its_code() {
        let odd = order("1", "07:00", DRIVER_ALI, "DEPOT9", "A");

        let report = morning_report(&[odd], "2024-05-01", "url").unwrap();
        assert!(report.contains("🏠 DEPOT9"));
    }
}
