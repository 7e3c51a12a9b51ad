//! Weekly PCP history: a rolling 4-point trend series.
//!
//! The caller owns a map of week-start keys to recorded percentages. Weeks
//! without a recorded value render a placeholder so the chart has something
//! to show before real history accumulates. A recorded value is
//! authoritative: once written it is never displaced by a placeholder.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::week::WeekWindow;

/// Recorded percentages keyed by ISO week-start date (`YYYY-MM-DD`).
pub type HistoryMap = BTreeMap<String, f64>;

/// Points in a trend series: current week plus the three preceding weeks.
pub const SERIES_LEN: usize = 4;

/// One point of the weekly trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPcp {
    /// `DD/MM - DD/MM` label of the week.
    pub week_label: String,
    pub percentage: f64,
    pub week_start: NaiveDate,
    pub is_current_week: bool,
}

pub fn history_key(week_start: NaiveDate) -> String {
    week_start.format("%Y-%m-%d").to_string()
}

/// Record a real computed percentage for a week.
///
/// Caller contract: only computed values go through here, never synthetic
/// ones. Re-recording a week with a fresh computation is fine; that
/// supersedes the old point.
pub fn record_week(history: &mut HistoryMap, week_start: NaiveDate, percentage: f64) {
    history.insert(history_key(week_start), percentage);
}

/// Source of synthetic percentages for weeks with no recorded history.
pub trait PlaceholderSource {
    fn placeholder(&mut self, week_start: NaiveDate) -> f64;
}

/// Draws a placeholder percentage seeded by the week anchor, so the same
/// missing week renders the same value across runs.
///
/// Product caveat carried over from the source system: these synthetic
/// points render exactly like real trend data.
#[derive(Debug, Clone, Copy)]
pub struct SeededPlaceholder {
    low: f64,
    high: f64,
}

impl SeededPlaceholder {
    pub fn new() -> Self {
        Self::with_range(10.0, 80.0)
    }

    pub fn with_range(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

impl Default for SeededPlaceholder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderSource for SeededPlaceholder {
    fn placeholder(&mut self, week_start: NaiveDate) -> f64 {
        let mut rng = rand::rngs::StdRng::seed_from_u64(week_start.num_days_from_ce() as u64);
        rng.gen_range(self.low..=self.high)
    }
}

/// Build the 4-point series ending at the current week.
///
/// The current week always uses the freshly computed percentage, regardless
/// of what the map holds; older weeks use their recorded value when present
/// and a placeholder otherwise. Exactly the last point carries
/// `is_current_week`.
pub fn build_series(
    current_week_start: NaiveDate,
    current_week_percentage: f64,
    history: &HistoryMap,
    placeholders: &mut impl PlaceholderSource,
) -> Vec<WeeklyPcp> {
    let mut series: Vec<WeeklyPcp> = Vec::with_capacity(SERIES_LEN);

    for i in (0..SERIES_LEN).rev() {
        let start = current_week_start - Duration::days(7 * i as i64);

        // Fixed 7-day stride cannot collide; keep the first point if it ever does.
        if series.iter().any(|p| p.week_start == start) {
            continue;
        }

        let is_current = i == 0;
        let percentage = if is_current {
            current_week_percentage
        } else {
            match history.get(&history_key(start)) {
                Some(p) => *p,
                None => placeholders.placeholder(start),
            }
        };

        series.push(WeeklyPcp {
            week_label: WeekWindow::containing(start).format_range(),
            percentage,
            week_start: start,
            is_current_week: is_current,
        });
    }

    series
}
