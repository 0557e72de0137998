//! Cultivation plans and their per-session task schedule.

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Status of one materialized cultivation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Soon,
    InProcess,
    Completed,
    Skipped,
}

impl StepStatus {
    pub const ALL: [StepStatus; 4] = [
        StepStatus::Soon,
        StepStatus::InProcess,
        StepStatus::Completed,
        StepStatus::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Soon => "soon",
            StepStatus::InProcess => "in_process",
            StepStatus::Completed => "completed",
            StepStatus::Skipped => "skipped",
        }
    }

    /// Status a freshly created task gets from its date relative to today.
    pub fn initial(task_date: NaiveDate, today: NaiveDate) -> Self {
        if task_date < today {
            StepStatus::Skipped
        } else if task_date == today {
            StepStatus::InProcess
        } else {
            StepStatus::Soon
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown step status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for StepStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Offsets may be negative (e.g. nursery work before transplanting).
pub fn offset_date(base: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        base.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        base.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(base)
}

pub fn harvest_date(planting_date: NaiveDate, harvest_day_offset: i64) -> NaiveDate {
    offset_date(planting_date, harvest_day_offset)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub task_name: String,
    pub days_offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub task_name: String,
    pub start_date: NaiveDate,
    pub status: StepStatus,
}

pub fn materialize(
    planting_date: NaiveDate,
    steps: &[PlanStep],
    today: NaiveDate,
) -> Vec<PlannedStep> {
    steps
        .iter()
        .map(|step| {
            let start_date = offset_date(planting_date, step.days_offset);
            PlannedStep {
                task_name: step.task_name.clone(),
                start_date,
                status: StepStatus::initial(start_date, today),
            }
        })
        .collect()
}

/// A cultivation plan from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanTemplate {
    pub name: String,
    pub description: String,
    pub harvest_day_offset: i64,
    pub steps: Vec<PlanStep>,
}

fn step(days_offset: i64, task_name: &str) -> PlanStep {
    PlanStep {
        task_name: task_name.to_string(),
        days_offset,
    }
}

/// Catalog seeded into an empty store.
pub fn default_catalog() -> Vec<PlanTemplate> {
    vec![
        PlanTemplate {
            name: "MR297 direct seeding (110 days)".to_string(),
            description: "Short-season variety, direct seeded, AWD irrigation from early tillering."
                .to_string(),
            harvest_day_offset: 110,
            steps: vec![
                step(-14, "Land preparation and first ploughing"),
                step(-3, "Field levelling and flooding"),
                step(0, "Direct seeding"),
                step(3, "Pre-emergence herbicide"),
                step(15, "1st fertilization (NPK compound)"),
                step(20, "Start AWD irrigation cycle"),
                step(35, "2nd fertilization (urea)"),
                step(50, "3rd fertilization (NPK + K top-up)"),
                step(55, "Pest and disease inspection"),
                step(65, "Panicle initiation - keep field flooded (stop AWD)"),
                step(90, "Drain field for ripening"),
                step(110, "Harvest"),
            ],
        },
        PlanTemplate {
            name: "MR219 transplanting (120 days)".to_string(),
            description: "Standard-season variety, nursery raised and transplanted, AWD irrigation."
                .to_string(),
            harvest_day_offset: 120,
            steps: vec![
                step(-21, "Nursery sowing"),
                step(-7, "Land preparation and puddling"),
                step(0, "Transplanting"),
                step(10, "Gap filling"),
                step(20, "1st fertilization (NPK compound)"),
                step(25, "Start AWD irrigation cycle"),
                step(40, "2nd fertilization (urea)"),
                step(55, "3rd fertilization (NPK + K top-up)"),
                step(60, "Pest and disease inspection"),
                step(75, "Flowering - keep field flooded (stop AWD)"),
                step(100, "Drain field for ripening"),
                step(120, "Harvest"),
            ],
        },
    ]
}
