use chrono::{DateTime, Utc};

/// This is the standard way of rendering a moment in checktick. It is used
/// both for the live clock line and for the `formattedTime` field of a stored
/// check-in, which is rendered once at creation and never recomputed.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::format_timestamp;

    #[test]
    fn formats_zero_padded_24_hour() {
        let time = Utc.with_ymd_and_hms(2018, 7, 4, 9, 5, 3).unwrap();
        assert_eq!(format_timestamp(time), "2018-07-04 09:05:03");
    }

    #[test]
    fn formats_afternoon_without_am_pm() {
        let time = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_timestamp(time), "2025-12-31 23:59:59");
    }
}
