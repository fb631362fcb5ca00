//! Derived "time since" labels for the check-in table.

use crate::store::entities::CheckinRecord;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Renders one elapsed-time label. Moments in the future clamp to zero
/// instead of going negative, so a backwards clock jump shows `00 h 00 m`
/// until reality catches up. Hours are not wrapped at any bound.
pub fn elapsed_label(now_ms: i64, timestamp_ms: i64) -> String {
    let diff = now_ms - timestamp_ms;
    if diff < 0 {
        return "00 h 00 m".to_owned();
    }
    let total_minutes = diff / MILLIS_PER_MINUTE;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{hours:02} h {minutes:02} m")
}

/// Projects the whole store into labels, index-aligned with the records. The
/// projection is recomputed from scratch on every tick and on every store
/// change, nothing is cached.
pub fn project(now_ms: i64, records: &[CheckinRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| elapsed_label(now_ms, record.timestamp))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::{store::entities::CheckinRecord, tags::EmojiTag};

    use super::{elapsed_label, project};

    const MINUTE: i64 = 60_000;

    #[test]
    fn now_is_zero() {
        assert_eq!(elapsed_label(5000, 5000), "00 h 00 m");
    }

    #[test]
    fn ninety_minutes_ago() {
        assert_eq!(elapsed_label(90 * MINUTE, 0), "01 h 30 m");
    }

    #[test]
    fn seconds_round_down_to_the_minute() {
        assert_eq!(elapsed_label(MINUTE - 1, 0), "00 h 00 m");
        assert_eq!(elapsed_label(MINUTE, 0), "00 h 01 m");
    }

    #[test]
    fn future_timestamp_clamps_to_zero() {
        assert_eq!(elapsed_label(1000, 60 * MINUTE), "00 h 00 m");
    }

    #[test]
    fn hours_are_unbounded() {
        assert_eq!(elapsed_label(1000 * 60 * MINUTE + 5 * MINUTE, 0), "1000 h 05 m");
    }

    #[test]
    fn projection_aligns_with_records() {
        let base = Utc.with_ymd_and_hms(2018, 7, 4, 12, 0, 0).unwrap();
        let records = vec![
            CheckinRecord::at(base, EmojiTag::Rocket),
            CheckinRecord::at(base - chrono::Duration::minutes(90), EmojiTag::Pizza),
        ];

        let labels = project(base.timestamp_millis(), &records);

        assert_eq!(labels, vec!["00 h 00 m", "01 h 30 m"]);
    }

    #[test]
    fn empty_store_projects_to_nothing() {
        assert!(project(0, &[]).is_empty());
    }
}
