//! Task model for weekly site planning.

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Day of the planning week. Closed 7-value set, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl PlanDay {
    pub const ALL: [PlanDay; 7] = [
        PlanDay::Mon,
        PlanDay::Tue,
        PlanDay::Wed,
        PlanDay::Thu,
        PlanDay::Fri,
        PlanDay::Sat,
        PlanDay::Sun,
    ];

    pub fn token(self) -> &'static str {
        match self {
            PlanDay::Mon => "mon",
            PlanDay::Tue => "tue",
            PlanDay::Wed => "wed",
            PlanDay::Thu => "thu",
            PlanDay::Fri => "fri",
            PlanDay::Sat => "sat",
            PlanDay::Sun => "sun",
        }
    }

    /// Exact lowercase three-letter token. Tolerant forms live in the ingest layer.
    pub fn from_token(s: &str) -> Option<PlanDay> {
        PlanDay::ALL.iter().copied().find(|d| d.token() == s)
    }
}

/// Status of one planned day. Days outside `planned_days` are implicitly
/// not-planned and never enter completion math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Planned,
    Completed,
    NotDone,
}

/// One weekly task record.
///
/// The engine only reads these; creation and storage belong to the caller.
/// Classification labels are free text; empty means unassigned and lands in
/// the "undefined" aggregation bucket rather than being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,

    pub sector: String,
    pub discipline: String,
    pub team: String,
    pub responsible: String,
    pub executor: String,

    /// Days of this task's week the work is scheduled on. Deduplicated,
    /// insertion order preserved.
    pub planned_days: Vec<PlanDay>,

    /// Per-day status, one entry per planned day.
    pub daily_status: Vec<(PlanDay, DayStatus)>,

    /// Derived: true iff every planned day is `Completed`. Recomputed on every
    /// status mutation, never trusted stale.
    pub is_fully_completed: bool,

    /// Only meaningful while the task is not fully completed.
    pub cause_if_not_done: Option<String>,

    /// Monday anchoring the week this task belongs to.
    pub week_start_date: NaiveDate,
}

impl Task {
    pub fn new(id: impl Into<String>, week_start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            sector: String::new(),
            discipline: String::new(),
            team: String::new(),
            responsible: String::new(),
            executor: String::new(),
            planned_days: Vec::new(),
            daily_status: Vec::new(),
            is_fully_completed: false,
            cause_if_not_done: None,
            week_start_date,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = sector.into();
        self
    }

    pub fn with_discipline(mut self, discipline: impl Into<String>) -> Self {
        self.discipline = discipline.into();
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }

    pub fn with_responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = responsible.into();
        self
    }

    pub fn with_executor(mut self, executor: impl Into<String>) -> Self {
        self.executor = executor.into();
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause_if_not_done = Some(cause.into());
        self
    }

    /// Set the planned days, resetting every day to `Planned`.
    pub fn with_planned_days(mut self, days: &[PlanDay]) -> Self {
        self.planned_days = Vec::with_capacity(days.len());
        for d in days {
            if !self.planned_days.contains(d) {
                self.planned_days.push(*d);
            }
        }
        self.daily_status = self
            .planned_days
            .iter()
            .map(|d| (*d, DayStatus::Planned))
            .collect();
        self.recompute_completion();
        self
    }

    /// Whether this task participates in completion ratios at all.
    pub fn has_plan(&self) -> bool {
        !self.planned_days.is_empty()
    }

    pub fn day_status(&self, day: PlanDay) -> Option<DayStatus> {
        self.daily_status
            .iter()
            .find(|(d, _)| *d == day)
            .map(|(_, s)| *s)
    }

    /// Update one planned day's status. Unplanned days are rejected.
    pub fn set_day_status(&mut self, day: PlanDay, status: DayStatus) -> Result<()> {
        let Some(entry) = self.daily_status.iter_mut().find(|(d, _)| *d == day) else {
            bail!("task {}: day {} is not planned", self.id, day.token());
        };
        entry.1 = status;
        self.recompute_completion();
        Ok(())
    }

    fn recompute_completion(&mut self) {
        self.is_fully_completed = self.has_plan()
            && self
                .daily_status
                .iter()
                .all(|(_, s)| *s == DayStatus::Completed);
    }

    /// Structural validation, applied at the ingest boundary.
    ///
    /// Checks: the week anchor is a Monday, `daily_status` covers exactly the
    /// planned days, and the derived completion flag agrees with the statuses.
    pub fn validate(&self) -> Result<()> {
        if self.week_start_date.weekday() != Weekday::Mon {
            bail!(
                "task {}: week_start_date {} is not a Monday",
                self.id,
                self.week_start_date
            );
        }

        for (day, _) in &self.daily_status {
            if !self.planned_days.contains(day) {
                bail!(
                    "task {}: status recorded for unplanned day {}",
                    self.id,
                    day.token()
                );
            }
        }
        for day in &self.planned_days {
            let n = self
                .daily_status
                .iter()
                .filter(|(d, _)| d == day)
                .count();
            if n != 1 {
                bail!(
                    "task {}: planned day {} has {} status entries, expected 1",
                    self.id,
                    day.token(),
                    n
                );
            }
        }

        let derived = self.has_plan()
            && self
                .daily_status
                .iter()
                .all(|(_, s)| *s == DayStatus::Completed);
        if self.is_fully_completed != derived {
            bail!(
                "task {}: is_fully_completed={} disagrees with daily statuses",
                self.id,
                self.is_fully_completed
            );
        }

        Ok(())
    }
}
