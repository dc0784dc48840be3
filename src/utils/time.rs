use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Composes an order's `date` and `time` cells into one timestamp.
/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = parse_date(date)?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()?;
    Some(date.and_time(time))
}

/// The timestamp at `hour:00:00` on the given date.
pub fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

/// Window membership with an explicit boundary policy on each end.
pub fn in_window(
    value: NaiveDateTime,
    start: NaiveDateTime,
    end: NaiveDateTime,
    include_start: bool,
    include_end: bool,
) -> bool {
    let after_start = if include_start { value >= start } else { value > start };
    let before_end = if include_end { value <= end } else { value < end };
    after_start && before_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn half_open_morning_window() {
        let day = parse_date("2024-05-01").unwrap();
        let start = at_hour(day, 6);
        let end = at_hour(day, 9);

        assert!(in_window(ts("2024-05-01 06:00:00"), start, end, true, false));
        assert!(in_window(ts("2024-05-01 08:59:59"), start, end, true, false));
        assert!(!in_window(ts("2024-05-01 09:00:00"), start, end, true, false));
        assert!(!in_window(ts("2024-05-01 05:59:59"), start, end, true, false));
    }

    #[test]
    fn closed_end_includes_the_boundary() {
        let day = parse_date("2024-05-01").unwrap();
        let start = at_hour(day, 6);
        let end = at_hour(day, 9);

        assert!(in_window(ts("2024-05-01 09:00:00"), start, end, true, true));
        assert!(!in_window(ts("2024-05-01 06:00:00"), start, end, false, true));
    }

    #[test]
    fn composes_date_and_time_cells() {
        assert_eq!(
            parse_date_time("2024-05-01", "07:30"),
            Some(ts("2024-05-01 07:30:00"))
        );
        assert_eq!(
            parse_date_time("2024-05-01", "07:30:15"),
            Some(ts("2024-05-01 07:30:15"))
        );
        assert_eq!(parse_date_time("2024-05-01", "late"), None);
        assert_eq!(parse_date_time("not a date", "07:30"), None);
    }
}
