use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
    sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PayrollStatus {
    Draft,
    Locked,
    Approved,
    Paid,
}

/// Persisted payroll result, unique on (employee_id, month). Once `locked`
/// is set the engine never overwrites the computed fields.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01")]
    pub month: String,

    pub has_policy: bool,

    // day counts
    #[schema(example = 31)]
    pub total_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
    pub half_days: i64,
    pub paid_leave_days: i64,
    pub weekoff_days: i64,
    pub holiday_days: i64,
    pub late_days: i64,
    pub early_checkout_days: i64,
    pub unpaid_absent_days: i64,
    pub not_marked_days: i64,
    #[schema(example = 29.5)]
    pub paid_days: f64,

    // earnings
    pub earned_basic: f64,
    pub earned_hra: f64,
    pub earned_travel: f64,
    pub earned_children_education: f64,
    pub earned_fixed_incentive: f64,
    pub employer_incentive: f64,
    pub base_salary: f64,

    // deductions
    pub pf_employee: f64,
    pub pf_employer: f64,
    pub esi: f64,
    pub lwf: f64,
    pub ex_gratia: f64,
    pub late_penalty: f64,
    pub absent_deduction: f64,
    pub timesheet_penalty: f64,
    pub advance_recovery: f64,
    pub adjustment_deductions: f64,

    // additions
    pub adjustment_additions: f64,
    /// Sum of per-day timing deductions; always <= 0
    pub attendance_adjustments: f64,

    pub net_salary: f64,
    pub ctc: f64,

    #[schema(example = "draft", value_type = String)]
    pub status: PayrollStatus,
    pub locked: bool,

    #[schema(example = 7, nullable = true)]
    pub computed_by: Option<u64>,
}
