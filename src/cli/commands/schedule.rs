//! Schedule command: tasks of one period, grouped by date and department.

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;

use crate::cli::app::App;
use crate::cli::output::{list_table, output, truncate, CommandOutput};
use crate::domain::models::{parse_anchor, DepartmentFilter, GroupedView, PeriodKind};
use crate::services::{aggregation, BoardSnapshot, FetchOutcome};

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Period kind: day, week, month, quarter, half-year, year
    #[arg(short, long, default_value = "day")]
    pub view: PeriodKind,

    /// Anchor date (YYYY-MM-DD), today when omitted
    #[arg(short, long)]
    pub date: Option<String>,

    /// Department name, exact and case-sensitive; "all" for every department
    #[arg(short = 'D', long, default_value = "all")]
    pub department: String,

    /// Move this many periods forward (negative for back)
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    pub shift: i32,
}

#[derive(Debug, Serialize)]
pub struct ScheduleOutput {
    pub view: PeriodKind,
    pub label: String,
    pub start: String,
    pub end: String,
    pub department: String,
    pub total: usize,
    pub departments: Vec<String>,
    pub dates: GroupedView,
}

impl ScheduleOutput {
    fn from_snapshot(snapshot: BoardSnapshot) -> Option<Self> {
        let period = snapshot.period?;
        let departments = aggregation::departments_in(&snapshot.view);
        Some(Self {
            view: period.kind,
            label: period.label,
            start: period.start.to_string(),
            end: period.end.to_string(),
            department: snapshot.department.to_string(),
            total: snapshot.total,
            departments,
            dates: snapshot.view,
        })
    }
}

impl CommandOutput for ScheduleOutput {
    fn to_human(&self) -> String {
        let heading = format!(
            "{} ({} to {})",
            style(&self.label).bold(),
            self.start,
            self.end
        );
        if self.total == 0 {
            return format!("{heading}\nNo tasks scheduled.");
        }

        let mut table = list_table(&["date", "department", "activity", "frequency", "comments"]);
        for day in self.dates.iter() {
            let mut first_row_of_date = true;
            for group in &day.departments {
                let mut first_row_of_department = true;
                for task in &group.tasks {
                    table.add_row(vec![
                        if first_row_of_date { day.date.to_string() } else { String::new() },
                        if first_row_of_department { group.department.clone() } else { String::new() },
                        truncate(&task.activity, 48),
                        task.frequency.as_str().to_string(),
                        task.comments.as_deref().map(|c| truncate(c, 32)).unwrap_or_default(),
                    ]);
                    first_row_of_date = false;
                    first_row_of_department = false;
                }
            }
        }

        format!(
            "{heading}\n{} task(s), department: {}\n\n{table}",
            style(self.total).bold(),
            self.department
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(app: &App, args: ScheduleArgs, json_mode: bool) -> Result<()> {
    app.require_access("/").await?;

    let anchor = match args.date {
        Some(ref text) => parse_anchor(text)?,
        None => app.today(),
    };

    let board = app.board();
    board.set_department(DepartmentFilter::parse(&args.department));
    if let FetchOutcome::Superseded = board.select_shifted(args.view, anchor, args.shift).await? {
        anyhow::bail!("schedule request was superseded");
    }

    let snapshot = board.snapshot();
    let Some(out) = ScheduleOutput::from_snapshot(snapshot) else {
        anyhow::bail!("no period was loaded");
    };
    output(&out, json_mode);
    Ok(())
}
