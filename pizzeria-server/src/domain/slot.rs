use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::domain::error::DomainError;

const LABEL_FORMAT: &str = "%H:%M";

/// Delivery window of the shop: evenly spaced labels between opening and
/// closing time, each accepting at most `capacity` orders per day.
///
/// The closing time itself is offered as the last slot whenever it falls on a
/// step boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSchedule {
    open: NaiveTime,
    close: NaiveTime,
    step: Duration,
    capacity: u32,
}

impl SlotSchedule {
    pub fn new(
        open: NaiveTime,
        close: NaiveTime,
        step_minutes: u32,
        capacity: u32,
    ) -> Result<Self, DomainError> {
        if step_minutes == 0 {
            return Err(DomainError::Validation("slot step must be positive".into()));
        }
        if close < open {
            return Err(DomainError::Validation(
                "closing time must not precede opening time".into(),
            ));
        }
        Ok(Self {
            open,
            close,
            step: Duration::minutes(i64::from(step_minutes)),
            capacity,
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Every slot label of a day in chronological order.
    pub fn candidates(&self) -> Vec<String> {
        let mut slots = Vec::new();
        let mut current = self.open;
        while current <= self.close {
            slots.push(current.format(LABEL_FORMAT).to_string());
            let (next, wrapped) = current.overflowing_add_signed(self.step);
            if wrapped != 0 {
                break;
            }
            current = next;
        }
        slots
    }

    /// Whether a slot that already holds `booked` orders can take another.
    pub fn has_room(&self, booked: i64) -> bool {
        booked < i64::from(self.capacity)
    }
}

impl Default for SlotSchedule {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(18, 30, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(22, 30, 0).unwrap_or(NaiveTime::MIN),
            step: Duration::minutes(15),
            capacity: 5,
        }
    }
}

pub fn parse_time(value: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value.trim(), LABEL_FORMAT)
        .map_err(|_| DomainError::Validation(format!("expected HH:MM, got {value:?}")))
}

/// Validates a client supplied delivery time and returns it zero padded.
pub fn normalize_label(value: &str) -> Result<String, DomainError> {
    parse_time(value).map(|t| t.format(LABEL_FORMAT).to_string())
}

/// First and last instant of `date` in `tz`, expressed in UTC.
pub fn day_window<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date
        .and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or(start);
    (to_utc(tz, start), to_utc(tz, end))
}

fn to_utc<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
        LocalResult::None => local.and_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn default_schedule_runs_from_open_to_close_inclusive() {
        let slots = SlotSchedule::default().candidates();
        assert_eq!(slots.len(), 17);
        assert_eq!(slots.first().map(String::as_str), Some("18:30"));
        assert_eq!(slots.last().map(String::as_str), Some("22:30"));
        assert!(slots.contains(&"19:00".to_string()));
    }

    #[test]
    fn slots_are_strictly_increasing_and_evenly_spaced() {
        let times: Vec<NaiveTime> = SlotSchedule::default()
            .candidates()
            .iter()
            .map(|s| parse_time(s).unwrap())
            .collect();
        for pair in times.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[1] - pair[0], Duration::minutes(15));
        }
    }

    #[test]
    fn close_off_the_step_grid_is_not_offered() {
        let schedule = SlotSchedule::new(hm(18, 30), hm(19, 10), 15, 5).unwrap();
        assert_eq!(schedule.candidates(), vec!["18:30", "18:45", "19:00"]);
    }

    #[test]
    fn schedule_stops_at_midnight() {
        let schedule = SlotSchedule::new(hm(23, 30), hm(23, 59), 15, 5).unwrap();
        assert_eq!(schedule.candidates(), vec!["23:30", "23:45"]);
    }

    #[test]
    fn rejects_zero_step_and_inverted_window() {
        assert!(SlotSchedule::new(hm(18, 30), hm(22, 30), 0, 5).is_err());
        assert!(SlotSchedule::new(hm(22, 30), hm(18, 30), 15, 5).is_err());
    }

    #[test]
    fn capacity_is_a_strict_upper_bound() {
        let schedule = SlotSchedule::default();
        assert!(schedule.has_room(4));
        assert!(!schedule.has_room(5));
        assert!(!schedule.has_room(6));
    }

    #[test]
    fn labels_are_normalized() {
        assert_eq!(normalize_label("9:05").unwrap(), "09:05");
        assert_eq!(normalize_label(" 19:30 ").unwrap(), "19:30");
        assert!(normalize_label("7pm").is_err());
        assert!(normalize_label("25:00").is_err());
    }

    #[test]
    fn day_window_covers_the_local_day() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let (start, end) = day_window(&tz, date);
        assert_eq!(start.to_rfc3339(), "2026-10-17T22:00:00+00:00");
        assert_eq!(end - start, Duration::days(1) - Duration::nanoseconds(1));
    }
}
