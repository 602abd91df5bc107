use serde::Serialize;
use utoipa::ToSchema;

/// One day's timing deduction with its human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TimingAdjustment {
    #[schema(example = "2026-01-05")]
    pub date: String,

    /// Always <= 0
    #[schema(example = -500.0)]
    pub amount: f64,

    #[schema(example = "Late check-in at 11:15 (50% of daily rate)")]
    pub reason: String,
}

/// The full computed payroll for one employee and month. Pure value: two
/// invocations over identical inputs produce identical computations.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayrollComputation {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2026-01")]
    pub month: String,

    /// False when no active compensation policy exists; every monetary field
    /// is zero in that case and only the day counts are meaningful
    pub has_policy: bool,

    // day counts
    #[schema(example = 31)]
    pub total_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub half_days: u32,
    pub paid_leave_days: u32,
    pub weekoff_days: u32,
    pub holiday_days: u32,
    pub late_days: u32,
    pub early_checkout_days: u32,
    pub unpaid_absent_days: u32,
    pub not_marked_days: u32,
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
    /// Sum of the timing log amounts; always <= 0
    pub attendance_adjustments: f64,

    pub net_salary: f64,
    pub ctc: f64,

    pub timing_log: Vec<TimingAdjustment>,
}
