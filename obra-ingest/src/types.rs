//! Raw export record shapes, as the backend actually emits them.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::Deserialize;

use obra_core::{DayStatus, PlanDay, Task, parse_week_anchor};

/// One task row from a backend export, before validation.
///
/// Label fields may be absent; `plannedDays` may not. A record with no
/// `plannedDays` key at all is a data-integrity problem upstream and fails
/// deserialization rather than being coerced to an empty list. (An empty
/// list is legal: the task simply contributes to no ratio.)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTaskRecord {
    pub id: String,

    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub discipline: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(default)]
    pub executor: Option<String>,

    pub planned_days: Vec<String>,

    /// Day token -> status token. Planned days missing here default to
    /// "planned"; entries for unplanned days are rejected.
    #[serde(default)]
    pub daily_status: BTreeMap<String, String>,

    /// The exported flag is not trusted; completion is recomputed from the
    /// day statuses.
    #[serde(default)]
    pub is_fully_completed: Option<bool>,

    #[serde(default)]
    pub cause_if_not_done: Option<String>,

    pub week_start_date: String,
}

fn day_from_token(id: &str, token: &str) -> Result<PlanDay> {
    let normalized = token.trim().to_lowercase();
    match PlanDay::from_token(&normalized) {
        Some(d) => Ok(d),
        None => bail!("task {id}: unknown day token '{token}'"),
    }
}

fn status_from_token(id: &str, day: PlanDay, token: &str) -> Result<DayStatus> {
    match token.trim().to_lowercase().as_str() {
        "planned" => Ok(DayStatus::Planned),
        "completed" => Ok(DayStatus::Completed),
        "not_done" => Ok(DayStatus::NotDone),
        other => bail!(
            "task {id}: unknown status '{other}' for day {}",
            day.token()
        ),
    }
}

impl RawTaskRecord {
    /// Validate and convert into a core task.
    ///
    /// Fails fast on unknown day/status tokens, statuses for unplanned days,
    /// and non-Monday week anchors, naming the offending record.
    pub fn into_task(self) -> Result<Task> {
        let week_start = parse_week_anchor(&self.week_start_date)
            .map_err(|e| anyhow::anyhow!("task {}: {e}", self.id))?;

        let mut days = Vec::with_capacity(self.planned_days.len());
        for token in &self.planned_days {
            days.push(day_from_token(&self.id, token)?);
        }

        let mut task = Task::new(self.id.clone(), week_start)
            .with_sector(self.sector.unwrap_or_default())
            .with_discipline(self.discipline.unwrap_or_default())
            .with_team(self.team.unwrap_or_default())
            .with_responsible(self.responsible.unwrap_or_default())
            .with_executor(self.executor.unwrap_or_default())
            .with_planned_days(&days);
        task.cause_if_not_done = self.cause_if_not_done;

        for (day_token, status_token) in &self.daily_status {
            let day = day_from_token(&task.id, day_token)?;
            let status = status_from_token(&task.id, day, status_token)?;
            // Rejects statuses for days outside the plan.
            task.set_day_status(day, status)?;
        }

        task.validate()?;
        Ok(task)
    }
}
