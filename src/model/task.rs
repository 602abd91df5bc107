use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Task assignment as owned by the task subsystem. Only the assignment
/// instant and title matter to timesheet compliance.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TaskAssignment {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "Prepare January campaign brief")]
    pub title: String,

    #[schema(example = "2026-01-05T10:30:00Z", value_type = String, format = "date-time")]
    pub assigned_at: DateTime<Utc>,
}

/// Submitted timesheet entry. References a task either by id or by
/// title + date.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TimesheetEntry {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 42, nullable = true)]
    pub task_id: Option<u64>,

    #[schema(example = "Prepare January campaign brief", nullable = true)]
    pub task_title: Option<String>,

    #[schema(example = "2026-01-05")]
    pub date: String,
}
