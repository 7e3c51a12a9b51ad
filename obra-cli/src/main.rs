use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use obra_core::{
    Breakdown, SeededPlaceholder, Task, WeekWindow, build_series, cause_summary,
    compute_breakdown, parse_week_anchor, record_week, week_start,
};
use obra_ingest::{parse_json_export, parse_weekly_csv};

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "obra", version, about = "Weekly plan completion (PCP) for site exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the PCP breakdown for an export (JSON or weekly CSV)
    Pcp {
        /// Task export: .json (backend export) or .csv (weekly plan sheet)
        #[arg(long)]
        file: PathBuf,

        /// Restrict to the week containing this date (YYYY-MM-DD)
        #[arg(long)]
        week: Option<String>,

        /// Print unrounded percentages
        #[arg(long)]
        exact: bool,
    },

    /// Record this week's PCP and print the 4-week trend series
    Series {
        #[arg(long)]
        file: PathBuf,

        /// Week to treat as current (YYYY-MM-DD; default: today)
        #[arg(long)]
        week: Option<String>,
    },

    /// Show a week window and its label
    Week {
        /// Anchor date (YYYY-MM-DD; default: today)
        #[arg(long)]
        date: Option<String>,

        /// Navigate N weeks back
        #[arg(long, default_value_t = 0)]
        prev: u32,

        /// Navigate N weeks forward
        #[arg(long, default_value_t = 0)]
        next: u32,
    },

    /// Write a default ~/.obra/config.toml
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Pcp { file, week, exact } => {
            let cfg = config::load_config()?;
            let rounded = !exact && cfg.display.rounded;
            run_pcp(&file, week.as_deref(), rounded)?;
        }

        Command::Series { file, week } => {
            run_series(&file, week.as_deref())?;
        }

        Command::Week { date, prev, next } => {
            let anchor = resolve_anchor(date.as_deref())?;
            let mut window = WeekWindow::containing(anchor);
            for _ in 0..prev {
                window = window.previous_week();
            }
            for _ in 0..next {
                window = window.next_week();
            }
            println!("Week {}", window.format_range());
            println!("  start: {} (Monday)", window.start);
            println!("  end:   {}", window.end);
        }

        Command::InitConfig => {
            config::init_config()?;
        }
    }

    Ok(())
}

fn resolve_anchor(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_week_anchor(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    if !path.exists() {
        bail!("export not found: {} (pass --file <path>)", path.display());
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json_export(path),
        Some("csv") => parse_weekly_csv(path),
        _ => bail!("unsupported export format: {} (expected .json or .csv)", path.display()),
    }
}

/// Keep only tasks anchored to the week containing `anchor`.
fn filter_week(tasks: Vec<Task>, anchor: NaiveDate) -> Vec<Task> {
    let start = week_start(anchor);
    tasks
        .into_iter()
        .filter(|t| t.week_start_date == start)
        .collect()
}

fn fmt_pct(p: f64, rounded: bool) -> String {
    if rounded {
        format!("{}%", p.round() as i64)
    } else {
        format!("{:.2}%", p)
    }
}

fn print_category(
    title: &str,
    buckets: &std::collections::BTreeMap<String, obra_core::BucketStats>,
    rounded: bool,
) {
    if buckets.is_empty() {
        return;
    }
    println!("\nBy {title}:");
    for (label, stats) in buckets {
        println!(
            "  {:<24} {:>8}  ({}/{})",
            label,
            fmt_pct(stats.percentage, rounded),
            stats.completed_tasks,
            stats.total_tasks
        );
    }
}

fn print_breakdown(b: &Breakdown, rounded: bool) {
    println!(
        "Overall PCP: {} ({}/{})",
        fmt_pct(b.overall.percentage, rounded),
        b.overall.completed_tasks,
        b.overall.total_tasks
    );

    print_category("sector", &b.by_sector, rounded);
    print_category("discipline", &b.by_discipline, rounded);
    print_category("team", &b.by_team, rounded);
    print_category("responsible", &b.by_responsible, rounded);
    print_category("executor", &b.by_executor, rounded);
}

fn run_pcp(file: &Path, week: Option<&str>, rounded: bool) -> Result<()> {
    let mut tasks = load_tasks(file).with_context(|| format!("loading {}", file.display()))?;

    if let Some(s) = week {
        let anchor = parse_week_anchor(s)?;
        tasks = filter_week(tasks, anchor);
        println!("Week {}", WeekWindow::containing(anchor).format_range());
    }
    println!("{} task(s) loaded\n", tasks.len());

    let breakdown = compute_breakdown(&tasks);
    print_breakdown(&breakdown, rounded);

    let causes = cause_summary(&tasks);
    if !causes.is_empty() {
        println!("\nCauses (not done):");
        for (cause, count) in &causes {
            println!("  {:<24} {}", cause, count);
        }
    }

    Ok(())
}

fn run_series(file: &Path, week: Option<&str>) -> Result<()> {
    let cfg = config::load_config()?;

    let anchor = resolve_anchor(week)?;
    let start = week_start(anchor);

    let tasks = filter_week(
        load_tasks(file).with_context(|| format!("loading {}", file.display()))?,
        start,
    );
    let breakdown = compute_breakdown(&tasks);

    // Persist the freshly computed value before rendering, so revisiting the
    // week later shows this number instead of a placeholder.
    let mut history = state::read_history()?;
    record_week(&mut history, start, breakdown.overall.percentage);
    state::write_history(&history)?;

    let mut placeholders =
        SeededPlaceholder::with_range(cfg.placeholder.low, cfg.placeholder.high);
    let series = build_series(start, breakdown.overall.percentage, &history, &mut placeholders);

    println!("PCP trend (last {} weeks):", series.len());
    for point in &series {
        let marker = if point.is_current_week { "  <- current" } else { "" };
        println!(
            "  {}  {:>6}{}",
            point.week_label,
            fmt_pct(point.percentage, cfg.display.rounded),
            marker
        );
    }

    Ok(())
}
