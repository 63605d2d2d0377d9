use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

/// Distance between an event's date and a single "now" snapshot.
///
/// `diff_days` counts calendar days in the time zone of `now`, so an event
/// dated tomorrow is always `1` no matter how close midnight is. The
/// decomposed `days`/`hours`/`minutes`/`seconds` come from the exact
/// millisecond distance between the event instant (local midnight for
/// date-only input) and `now`.
///
/// An unparseable date yields [`Countdown::INVALID`]. Its numeric fields are
/// all zero, exactly like an event happening today, so callers must check
/// [`Countdown::event_date`] (or [`Countdown::phase`]) rather than the numbers
/// to tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub diff_days: i64,
    pub absolute_days: i64,
    pub is_past: bool,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub event_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Invalid,
    Today,
    Upcoming,
    Past,
}

impl Countdown {
    pub const INVALID: Countdown = Countdown {
        diff_days: 0,
        absolute_days: 0,
        is_past: false,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        event_date: None,
    };

    pub fn compute<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> Self {
        let Some(instant) = parse_event_instant(raw, &now.timezone()) else {
            return Self::INVALID;
        };

        let event_day = instant.date_naive();
        let diff_days = event_day.signed_duration_since(now.date_naive()).num_days();
        let delta = instant.signed_duration_since(now);

        let mut rest = delta.num_milliseconds().abs();
        let days = rest / MS_PER_DAY;
        rest %= MS_PER_DAY;
        let hours = rest / MS_PER_HOUR;
        rest %= MS_PER_HOUR;
        let minutes = rest / MS_PER_MINUTE;
        rest %= MS_PER_MINUTE;
        let seconds = rest / MS_PER_SECOND;

        Self {
            diff_days,
            absolute_days: diff_days.abs(),
            is_past: delta < TimeDelta::zero(),
            days,
            hours,
            minutes,
            seconds,
            event_date: Some(event_day),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.event_date.is_some()
    }

    pub fn phase(&self) -> Phase {
        match (self.event_date, self.diff_days) {
            (None, _) => Phase::Invalid,
            (Some(_), 0) => Phase::Today,
            (Some(_), d) if d > 0 => Phase::Upcoming,
            _ => Phase::Past,
        }
    }

    /// `4d 08:30:00` style remaining/elapsed time.
    pub fn clock_display(&self) -> String {
        format!(
            "{}d {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM[:SS[.fff]]`, or a full
/// RFC 3339 timestamp. Naive forms are read in `tz`.
pub fn parse_event_instant<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return resolve_local(tz, naive);
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        // Midnight can fall inside a DST gap; take the first instant after it.
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn shanghai() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn now_at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        shanghai().with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn same_calendar_day_is_today() {
        let now = now_at(2026, 10, 19, 23, 59, 59);
        let c = Countdown::compute("2026-10-19", &now);
        assert_eq!(c.diff_days, 0);
        assert_eq!(c.absolute_days, 0);
        assert_eq!(c.event_date, NaiveDate::from_ymd_opt(2026, 10, 19));
        assert_eq!(c.phase(), Phase::Today);
        // Local midnight already passed.
        assert!(c.is_past);
    }

    #[test]
    fn invalid_date_is_sentinel_not_today() {
        let now = now_at(2026, 10, 19, 12, 0, 0);
        let invalid = Countdown::compute("not-a-date", &now);
        let today = Countdown::compute("2026-10-19", &now);

        assert_eq!(invalid, Countdown::INVALID);
        assert_eq!(invalid.diff_days, today.diff_days);
        assert_eq!(invalid.phase(), Phase::Invalid);
        assert!(!invalid.is_valid());
        assert!(today.is_valid());
    }

    #[test]
    fn impossible_calendar_dates_are_invalid() {
        let now = now_at(2026, 10, 19, 12, 0, 0);
        assert_eq!(Countdown::compute("2026-02-30", &now), Countdown::INVALID);
        assert_eq!(Countdown::compute("   ", &now), Countdown::INVALID);
    }

    #[test]
    fn consecutive_days_differ_by_one() {
        let now = now_at(2026, 10, 19, 0, 0, 1);
        let mut day = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        while day < NaiveDate::from_ymd_opt(2026, 12, 31).unwrap() {
            let next = day.succ_opt().unwrap();
            let a = Countdown::compute(&day.format("%Y-%m-%d").to_string(), &now);
            let b = Countdown::compute(&next.format("%Y-%m-%d").to_string(), &now);
            assert_eq!(a.diff_days, b.diff_days - 1, "{day}");
            day = next;
        }
    }

    #[test]
    fn five_days_ahead_decomposes_remaining_time() {
        let now = now_at(2026, 10, 19, 15, 30, 0);
        let c = Countdown::compute("2026-10-24", &now);

        assert_eq!(c.diff_days, 5);
        assert!(!c.is_past);
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (4, 8, 30, 0));
        assert_eq!(c.clock_display(), "4d 08:30:00");
        assert_eq!(c.phase(), Phase::Upcoming);
    }

    #[test]
    fn five_days_ahead_fields_stay_in_range_all_day() {
        for hour in 0..24 {
            let now = now_at(2026, 10, 19, hour, 17, 42);
            let c = Countdown::compute("2026-10-24", &now);
            assert!(c.days == 4 || c.days == 5);
            assert!((0..=23).contains(&c.hours));
            assert!((0..=59).contains(&c.minutes));
            assert!((0..=59).contains(&c.seconds));
            assert!(!c.is_past);
        }
    }

    #[test]
    fn past_events_report_elapsed_time() {
        let now = now_at(2026, 10, 19, 15, 30, 0);
        let c = Countdown::compute("2026-10-17", &now);

        assert_eq!(c.diff_days, -2);
        assert_eq!(c.absolute_days, 2);
        assert!(c.is_past);
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (2, 15, 30, 0));
        assert_eq!(c.phase(), Phase::Past);
    }

    #[test]
    fn timestamps_use_the_calendar_day_of_now() {
        // 20:00 UTC is already 04:00 the next morning at +08:00.
        let now = now_at(2026, 10, 19, 12, 0, 0);
        let c = Countdown::compute("2026-10-19T20:00:00.000Z", &now);
        assert_eq!(c.diff_days, 1);
        assert_eq!(c.event_date, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert_eq!((c.days, c.hours), (0, 16));
    }

    #[test]
    fn naive_timestamps_are_local() {
        let now = now_at(2026, 10, 19, 12, 0, 0);
        let c = Countdown::compute("2026-10-19T18:45", &now);
        assert_eq!(c.diff_days, 0);
        assert!(!c.is_past);
        assert_eq!((c.hours, c.minutes), (6, 45));
    }
}
