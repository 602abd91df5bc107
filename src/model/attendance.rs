use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Attendance status buckets as captured by the attendance subsystem.
/// `present`, `checked_out` and `work_from_home` all count as a present day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
    sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    CheckedOut,
    WorkFromHome,
    Absent,
    HalfDay,
    Leave,
    SickLeave,
    CasualLeave,
    Weekoff,
    Holiday,
}

impl AttendanceStatus {
    pub fn counts_as_present(&self) -> bool {
        matches!(
            self,
            AttendanceStatus::Present | AttendanceStatus::CheckedOut | AttendanceStatus::WorkFromHome
        )
    }

    pub fn is_paid_leave(&self) -> bool {
        matches!(
            self,
            AttendanceStatus::Leave | AttendanceStatus::SickLeave | AttendanceStatus::CasualLeave
        )
    }
}

/// One attendance record per employee per date. Owned by the attendance
/// subsystem; the engine only reads these.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    /// Fixed `YYYY-MM-DD` form; lexical order is date order
    #[schema(example = "2026-01-05")]
    pub date: String,

    #[schema(example = "present", value_type = String)]
    pub status: AttendanceStatus,

    /// Clock value (`HH:MM` or `HH:MM:SS`) or a full timestamp; unparsable
    /// values mean no timing data for the day
    #[schema(example = "09:58", nullable = true)]
    pub check_in: Option<String>,

    #[schema(example = "18:05", nullable = true)]
    pub check_out: Option<String>,

    pub is_late: bool,

    #[schema(example = 0)]
    pub late_minutes: i64,

    pub is_early_checkout: bool,
}
