//! obra-core: pure PCP engine for weekly construction-site planning.
//!
//! No I/O lives here. The surrounding application loads a week's task
//! records, calls into this crate for breakdowns and trend series, and owns
//! the history map between calls.

pub mod history;
pub mod pcp;
pub mod task;
pub mod week;

pub use history::{
    HistoryMap, PlaceholderSource, SERIES_LEN, SeededPlaceholder, WeeklyPcp, build_series,
    history_key, record_week,
};
pub use pcp::{Breakdown, BucketStats, UNASSIGNED_BUCKET, cause_summary, compute_breakdown};
pub use task::{DayStatus, PlanDay, Task};
pub use week::{WeekWindow, parse_week_anchor, week_start};
