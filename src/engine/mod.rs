//! The payroll computation engine. Everything in this module tree is pure:
//! inputs are explicit record slices, output is a `PayrollComputation`.
//! Persistence and HTTP live in `store` and `api`.

pub mod adjustments;
pub mod advances;
pub mod attendance;
pub mod deductions;
pub mod earnings;
pub mod policy;
pub mod result;
pub mod timesheet;
pub mod timing;

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;

use crate::model::adjustment::AdjustmentRecord;
use crate::model::advance::AdvanceRecord;
use crate::model::attendance::AttendanceRecord;
use crate::model::policy::CompensationPolicy;
use crate::model::task::{TaskAssignment, TimesheetEntry};

use result::PayrollComputation;

#[derive(Debug, Display)]
#[display(fmt = "invalid month '{}', expected YYYY-MM", _0)]
pub struct InvalidMonth(pub String);

impl std::error::Error for InvalidMonth {}

/// A validated target month: fixed-width `YYYY-MM` key plus its calendar
/// day count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Month {
    pub year: i32,
    pub month: u32,
    pub key: String,
    pub days: u32,
}

impl Month {
    pub fn parse(raw: &str) -> Result<Self, InvalidMonth> {
        let invalid = || InvalidMonth(raw.to_string());

        if !raw.is_ascii() || raw.len() != 7 || raw.as_bytes()[4] != b'-' {
            return Err(invalid());
        }
        let year: i32 = raw[..4].parse().map_err(|_| invalid())?;
        let month: u32 = raw[5..7].parse().map_err(|_| invalid())?;

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;

        Ok(Month {
            year,
            month,
            key: raw.to_string(),
            days: next.signed_duration_since(first).num_days() as u32,
        })
    }

    /// `"YYYY-MM-"` — attendance dates for this month start with this.
    pub fn date_prefix(&self) -> String {
        format!("{}-", self.key)
    }
}

/// The month's shared read sets, fetched once per invocation and borrowed by
/// every per-employee computation (the fan-out shares no mutable state).
pub struct ComputeInputs<'a> {
    pub policies: &'a [CompensationPolicy],
    pub attendance: &'a [AttendanceRecord],
    pub adjustments: &'a [AdjustmentRecord],
    pub advances: &'a [AdvanceRecord],
    pub tasks: &'a [TaskAssignment],
    pub timesheets: &'a [TimesheetEntry],
}

/// Computes one employee's payroll for the month. `as_of` anchors the
/// timesheet grace window; callers pass it explicitly so the computation
/// stays reproducible.
pub fn compute_employee(
    employee_id: u64,
    month: &Month,
    inputs: &ComputeInputs,
    as_of: DateTime<Utc>,
) -> PayrollComputation {
    let policy = policy::resolve_active(employee_id, inputs.policies);
    let has_policy = policy.is_some();
    let daily_rate = policy
        .map(|p| p.monthly_gross() / month.days as f64)
        .unwrap_or(0.0);

    let date_prefix = month.date_prefix();
    let mut all_attendance: Vec<&AttendanceRecord> = inputs
        .attendance
        .iter()
        .filter(|r| r.employee_id == employee_id && r.date.starts_with(&date_prefix))
        .collect();
    all_attendance.sort_by(|a, b| a.date.cmp(&b.date));

    let employee_adjustments: Vec<&AdjustmentRecord> = inputs
        .adjustments
        .iter()
        .filter(|a| a.employee_id == employee_id && a.month == month.key)
        .collect();
    let employee_advances: Vec<&AdvanceRecord> = inputs
        .advances
        .iter()
        .filter(|a| a.employee_id == employee_id)
        .collect();
    let employee_tasks: Vec<&TaskAssignment> = inputs
        .tasks
        .iter()
        .filter(|t| t.employee_id == employee_id)
        .collect();
    let employee_timesheets: Vec<&TimesheetEntry> = inputs
        .timesheets
        .iter()
        .filter(|t| t.employee_id == employee_id)
        .collect();

    // penalized dates both fine the employee and drop the day from the
    // effective attendance set
    let waived = adjustments::waiver_dates(&employee_adjustments);
    let penalized = timesheet::delinquent_dates(
        &employee_tasks,
        &employee_timesheets,
        &waived,
        &month.key,
        as_of,
    );
    let penalized_set: HashSet<&str> = penalized.iter().map(String::as_str).collect();
    let effective: Vec<&AttendanceRecord> = all_attendance
        .into_iter()
        .filter(|r| !penalized_set.contains(r.date.as_str()))
        .collect();

    let summary = attendance::aggregate(&effective, month.days);

    // a missing policy short-circuits every monetary figure to zero while
    // the day counts above stay meaningful
    let timing = if has_policy {
        timing::evaluate(&effective, daily_rate)
    } else {
        timing::TimingOutcome::default()
    };
    let earned = earnings::calculate(policy, month.days, summary.paid_days);
    let deducted = deductions::calculate(policy, &earned, &summary, month.days);
    let adjustment_totals = if has_policy {
        adjustments::aggregate(&employee_adjustments)
    } else {
        adjustments::AdjustmentTotals::default()
    };
    let advance_recovery = if has_policy {
        advances::recovery_due(&employee_advances, &month.key)
    } else {
        0.0
    };
    let timesheet_penalty = penalized.len() as f64 * daily_rate;

    let net_salary = earned.base_salary + adjustment_totals.additions + timing.total
        - (deducted.late_penalty
            + deducted.absent_deduction
            + deducted.statutory_employee_total()
            + advance_recovery
            + adjustment_totals.deductions
            + timesheet_penalty);
    let ctc = earned.base_salary + deducted.pf_employer;

    PayrollComputation {
        employee_id,
        month: month.key.clone(),
        has_policy,
        total_days: summary.total_days,
        present_days: summary.present_days,
        absent_days: summary.absent_days,
        half_days: summary.half_days,
        paid_leave_days: summary.paid_leave_days,
        weekoff_days: summary.weekoff_days,
        holiday_days: summary.holiday_days,
        late_days: summary.late_days,
        early_checkout_days: summary.early_checkout_days,
        unpaid_absent_days: summary.unpaid_absent_days,
        not_marked_days: summary.not_marked_days,
        paid_days: summary.paid_days,
        earned_basic: earned.basic,
        earned_hra: earned.hra,
        earned_travel: earned.travel,
        earned_children_education: earned.children_education,
        earned_fixed_incentive: earned.fixed_incentive,
        employer_incentive: earned.employer_incentive,
        base_salary: earned.base_salary,
        pf_employee: deducted.pf_employee,
        pf_employer: deducted.pf_employer,
        esi: deducted.esi,
        lwf: deducted.lwf,
        ex_gratia: deducted.ex_gratia,
        late_penalty: deducted.late_penalty,
        absent_deduction: deducted.absent_deduction,
        timesheet_penalty,
        advance_recovery,
        adjustment_deductions: adjustment_totals.deductions,
        adjustment_additions: adjustment_totals.additions,
        attendance_adjustments: timing.total,
        net_salary,
        ctc,
        timing_log: timing.entries,
    }
}
