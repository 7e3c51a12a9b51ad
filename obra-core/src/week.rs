//! Week-window arithmetic: Monday-anchored planning weeks.
//!
//! All math is timezone-naive by design. Task planning is day-of-week based,
//! so local calendar days are the unit, not instants.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Monday of `d`'s week. A Sunday resolves to the *previous* Monday.
pub fn week_start(d: NaiveDate) -> NaiveDate {
    let back = d.weekday().num_days_from_monday() as i64;
    d - Duration::days(back)
}

/// Parse a `YYYY-MM-DD` week anchor. Malformed input fails here; an invalid
/// date never propagates into the window math.
pub fn parse_week_anchor(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))
}

/// One planning week: Monday start plus the last instant of its Sunday.
///
/// `end` is 23:59:59.999 so inclusive range checks against timestamps are
/// correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDateTime,
}

impl WeekWindow {
    /// Window of the week containing `d`.
    pub fn containing(d: NaiveDate) -> Self {
        Self::from_start(week_start(d))
    }

    fn from_start(start: NaiveDate) -> Self {
        let last_instant = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .expect("23:59:59.999 is a valid time of day");
        Self {
            start,
            end: (start + Duration::days(6)).and_time(last_instant),
        }
    }

    pub fn previous_week(&self) -> Self {
        Self::from_start(self.start - Duration::days(7))
    }

    pub fn next_week(&self) -> Self {
        Self::from_start(self.start + Duration::days(7))
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.start.and_time(NaiveTime::MIN) && ts <= self.end
    }

    pub fn contains_day(&self, d: NaiveDate) -> bool {
        d >= self.start && d <= self.end.date()
    }

    /// Display label `DD/MM - DD/MM`. No year component: the planning horizon
    /// is a single year, a known limitation of the format.
    pub fn format_range(&self) -> String {
        format!(
            "{:02}/{:02} - {:02}/{:02}",
            self.start.day(),
            self.start.month(),
            self.end.day(),
            self.end.month()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sunday_resolves_to_previous_monday() {
        // 2024-01-07 is a Sunday
        assert_eq!(week_start(date(2024, 1, 7)), date(2024, 1, 1));
    }

    #[test]
    fn week_start_is_idempotent_and_always_monday() {
        for offset in 0..21 {
            let d = date(2024, 1, 1) + Duration::days(offset);
            let ws = week_start(d);
            assert_eq!(ws.weekday(), chrono::Weekday::Mon);
            assert_eq!(week_start(ws), ws);
        }
    }

    #[test]
    fn window_spans_monday_to_sunday_last_instant() {
        let w = WeekWindow::containing(date(2024, 1, 3));
        assert_eq!(w.start, date(2024, 1, 1));
        assert_eq!(w.end.date(), date(2024, 1, 7));
        assert_eq!(w.end.time(), NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());
    }

    #[test]
    fn navigation_round_trips() {
        let w = WeekWindow::containing(date(2024, 6, 12));
        assert_eq!(w.next_week().previous_week(), w);
        assert_eq!(w.previous_week().next_week(), w);
        assert_eq!(w.next_week().start, w.start + Duration::days(7));
    }

    #[test]
    fn contains_is_inclusive_at_both_ends() {
        let w = WeekWindow::containing(date(2024, 1, 1));
        assert!(w.contains(date(2024, 1, 1).and_time(NaiveTime::MIN)));
        assert!(w.contains(w.end));
        assert!(!w.contains(date(2024, 1, 8).and_time(NaiveTime::MIN)));
        assert!(w.contains_day(date(2024, 1, 7)));
        assert!(!w.contains_day(date(2024, 1, 8)));
    }

    #[test]
    fn format_range_zero_pads() {
        let w = WeekWindow::containing(date(2024, 1, 1));
        assert_eq!(w.format_range(), "01/01 - 07/01");

        // Month boundary
        let w = WeekWindow::containing(date(2024, 1, 29));
        assert_eq!(w.format_range(), "29/01 - 04/02");
    }

    #[test]
    fn parse_week_anchor_rejects_garbage() {
        assert!(parse_week_anchor("2024-01-01").is_ok());
        assert!(parse_week_anchor("01/01/2024").is_err());
        assert!(parse_week_anchor("2024-13-40").is_err());
        assert!(parse_week_anchor("not a date").is_err());
    }
}
