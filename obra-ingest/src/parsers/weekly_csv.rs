//! Weekly-plan CSV parser.
//!
//! Site managers keep hand-maintained weekly sheets with one row per task:
//!
//!   id,sector,discipline,team,responsible,executor,week_start,planned_days,completed_days,cause
//!
//! Day-list cells are free-form ("mon,tue", "Mon Tue", "monday; tuesday").
//! Days listed in `completed_days` must be a subset of `planned_days`; the
//! rest keep their planned status (the sheet records progress, not failure).

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use obra_core::{DayStatus, PlanDay, Task, parse_week_anchor};

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    #[serde(default)]
    sector: String,
    #[serde(default)]
    discipline: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    responsible: String,
    #[serde(default)]
    executor: String,
    week_start: String,
    #[serde(default)]
    planned_days: String,
    #[serde(default)]
    completed_days: String,
    #[serde(default)]
    cause: String,
}

fn day_from_word(id: &str, word: &str) -> Result<PlanDay> {
    let day = match word.to_lowercase().as_str() {
        "mon" | "monday" => PlanDay::Mon,
        "tue" | "tues" | "tuesday" => PlanDay::Tue,
        "wed" | "wednesday" => PlanDay::Wed,
        "thu" | "thur" | "thurs" | "thursday" => PlanDay::Thu,
        "fri" | "friday" => PlanDay::Fri,
        "sat" | "saturday" => PlanDay::Sat,
        "sun" | "sunday" => PlanDay::Sun,
        other => bail!("task {id}: unknown day token '{other}'"),
    };
    Ok(day)
}

/// Split a free-form day-list cell into weekday tokens.
fn parse_day_list(word_re: &Regex, id: &str, cell: &str) -> Result<Vec<PlanDay>> {
    let mut days = Vec::new();
    for m in word_re.find_iter(cell) {
        let day = day_from_word(id, m.as_str())?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

pub fn parse_weekly_csv(path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;

    let word_re = Regex::new(r"[A-Za-z]+")?;
    let mut tasks = Vec::new();

    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.with_context(|| format!("row {}", i + 1))?;
        tasks.push(
            row_to_task(&word_re, row).with_context(|| format!("row {}", i + 1))?,
        );
    }

    Ok(tasks)
}

fn row_to_task(word_re: &Regex, row: CsvRow) -> Result<Task> {
    let week_start = parse_week_anchor(&row.week_start)
        .map_err(|e| anyhow::anyhow!("task {}: {e}", row.id))?;

    let planned = parse_day_list(word_re, &row.id, &row.planned_days)?;
    let completed = parse_day_list(word_re, &row.id, &row.completed_days)?;

    let mut task = Task::new(row.id, week_start)
        .with_sector(row.sector)
        .with_discipline(row.discipline)
        .with_team(row.team)
        .with_responsible(row.responsible)
        .with_executor(row.executor)
        .with_planned_days(&planned);
    if !row.cause.is_empty() {
        task.cause_if_not_done = Some(row.cause);
    }

    for day in completed {
        // Rejects completed days outside the plan.
        task.set_day_status(day, DayStatus::Completed)?;
    }

    task.validate()?;
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_cell(cell: &str) -> Result<Vec<PlanDay>> {
        let re = Regex::new(r"[A-Za-z]+").unwrap();
        parse_day_list(&re, "t1", cell)
    }

    #[test]
    fn day_lists_accept_mixed_separators_and_names() {
        assert_eq!(
            parse_cell("mon,tue").unwrap(),
            vec![PlanDay::Mon, PlanDay::Tue]
        );
        assert_eq!(
            parse_cell("Monday; Wednesday").unwrap(),
            vec![PlanDay::Mon, PlanDay::Wed]
        );
        assert_eq!(parse_cell("Fri Sat").unwrap(), vec![PlanDay::Fri, PlanDay::Sat]);
        assert_eq!(parse_cell("").unwrap(), vec![]);
    }

    #[test]
    fn unknown_day_words_fail() {
        let err = parse_cell("mon,someday").unwrap_err().to_string();
        assert!(err.contains("someday"));
    }

    #[test]
    fn completed_outside_plan_is_rejected() {
        let re = Regex::new(r"[A-Za-z]+").unwrap();
        let row = CsvRow {
            id: "t1".into(),
            sector: "Fundação".into(),
            discipline: String::new(),
            team: String::new(),
            responsible: String::new(),
            executor: String::new(),
            week_start: "2024-01-01".into(),
            planned_days: "mon".into(),
            completed_days: "mon,fri".into(),
            cause: String::new(),
        };
        let err = row_to_task(&re, row).unwrap_err().to_string();
        assert!(err.contains("fri"));
    }

    #[test]
    fn row_converts_with_partial_completion() {
        let re = Regex::new(r"[A-Za-z]+").unwrap();
        let row = CsvRow {
            id: "t1".into(),
            sector: "Fundação".into(),
            discipline: "Concreto".into(),
            team: "Equipe A".into(),
            responsible: "Marcos".into(),
            executor: String::new(),
            week_start: "2024-01-01".into(),
            planned_days: "mon,tue,wed".into(),
            completed_days: "mon".into(),
            cause: "Falta de material".into(),
        };
        let t = row_to_task(&re, row).unwrap();
        assert!(!t.is_fully_completed);
        assert_eq!(t.day_status(PlanDay::Mon), Some(DayStatus::Completed));
        assert_eq!(t.day_status(PlanDay::Tue), Some(DayStatus::Planned));
        assert_eq!(t.cause_if_not_done.as_deref(), Some("Falta de material"));
    }
}
