//! sqlx read/write layer. All month-scoped reads happen once per compute
//! invocation; the engine itself never touches the pool.

use anyhow::Context;
use serde::Serialize;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use strum_macros::{AsRefStr, Display};

use crate::engine::Month;
use crate::engine::advances;
use crate::engine::result::PayrollComputation;
use crate::model::adjustment::AdjustmentRecord;
use crate::model::advance::{AdvanceRecord, AdvanceStatus};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::model::payroll::PayrollRecord;
use crate::model::policy::CompensationPolicy;
use crate::model::task::{TaskAssignment, TimesheetEntry};

/// Everything the engine reads for one invocation.
pub struct MonthInputs {
    pub employees: Vec<Employee>,
    pub policies: Vec<CompensationPolicy>,
    pub attendance: Vec<AttendanceRecord>,
    pub adjustments: Vec<AdjustmentRecord>,
    pub advances: Vec<AdvanceRecord>,
    pub tasks: Vec<TaskAssignment>,
    pub timesheets: Vec<TimesheetEntry>,
}

/// Fetches the month's shared read sets, optionally narrowed to one
/// employee. Each table is read exactly once; the employee predicate is
/// appended and bound conditionally.
pub async fn load_month_inputs(
    pool: &MySqlPool,
    month: &Month,
    employee_id: Option<u64>,
) -> anyhow::Result<MonthInputs> {
    let mut sql = String::from("SELECT id, first_name, last_name, status FROM employees WHERE 1=1");
    if employee_id.is_some() {
        sql.push_str(" AND id = ?");
    }
    let mut q = sqlx::query_as::<_, Employee>(&sql);
    if let Some(id) = employee_id {
        q = q.bind(id);
    }
    let employees = q.fetch_all(pool).await.context("fetch employees")?;

    let mut sql = String::from(
        "SELECT id, employee_id, basic_salary, hra, travel_allowance, children_education, \
         fixed_incentive, employer_incentive, \
         pf_employee_mode, pf_employee_value, pf_employer_mode, pf_employer_value, \
         esi_mode, esi_value, lwf_mode, lwf_value, ex_gratia_mode, ex_gratia_value, \
         late_penalty_per_minute, is_active \
         FROM compensation_policies WHERE 1=1",
    );
    if employee_id.is_some() {
        sql.push_str(" AND employee_id = ?");
    }
    let mut q = sqlx::query_as::<_, CompensationPolicy>(&sql);
    if let Some(id) = employee_id {
        q = q.bind(id);
    }
    let policies = q.fetch_all(pool).await.context("fetch compensation policies")?;

    let mut sql = String::from(
        "SELECT id, employee_id, date, status, check_in, check_out, is_late, late_minutes, \
         is_early_checkout \
         FROM attendance_records WHERE date LIKE ?",
    );
    if employee_id.is_some() {
        sql.push_str(" AND employee_id = ?");
    }
    let mut q =
        sqlx::query_as::<_, AttendanceRecord>(&sql).bind(format!("{}%", month.date_prefix()));
    if let Some(id) = employee_id {
        q = q.bind(id);
    }
    let attendance = q.fetch_all(pool).await.context("fetch attendance records")?;

    let mut sql = String::from(
        "SELECT id, employee_id, month, kind, amount, status, date, reason \
         FROM adjustment_records WHERE month = ?",
    );
    if employee_id.is_some() {
        sql.push_str(" AND employee_id = ?");
    }
    let mut q = sqlx::query_as::<_, AdjustmentRecord>(&sql).bind(&month.key);
    if let Some(id) = employee_id {
        q = q.bind(id);
    }
    let adjustments = q.fetch_all(pool).await.context("fetch adjustment records")?;

    let mut sql = String::from(
        "SELECT id, employee_id, installment_amount, remaining_balance, recovery_start_month, \
         status FROM advance_records WHERE status = 'active'",
    );
    if employee_id.is_some() {
        sql.push_str(" AND employee_id = ?");
    }
    let mut q = sqlx::query_as::<_, AdvanceRecord>(&sql);
    if let Some(id) = employee_id {
        q = q.bind(id);
    }
    let advances = q.fetch_all(pool).await.context("fetch advance records")?;

    let mut sql = String::from(
        "SELECT id, employee_id, title, assigned_at FROM task_assignments \
         WHERE DATE_FORMAT(assigned_at, '%Y-%m') = ?",
    );
    if employee_id.is_some() {
        sql.push_str(" AND employee_id = ?");
    }
    let mut q = sqlx::query_as::<_, TaskAssignment>(&sql).bind(&month.key);
    if let Some(id) = employee_id {
        q = q.bind(id);
    }
    let tasks = q.fetch_all(pool).await.context("fetch task assignments")?;

    let mut sql = String::from(
        "SELECT id, employee_id, task_id, task_title, date FROM timesheet_entries WHERE 1=1",
    );
    if employee_id.is_some() {
        sql.push_str(" AND employee_id = ?");
    }
    let mut q = sqlx::query_as::<_, TimesheetEntry>(&sql);
    if let Some(id) = employee_id {
        q = q.bind(id);
    }
    let timesheets = q.fetch_all(pool).await.context("fetch timesheet entries")?;

    Ok(MonthInputs {
        employees,
        policies,
        attendance,
        adjustments,
        advances,
        tasks,
        timesheets,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpsertAction {
    Created,
    Updated,
    SkippedLocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlannedWrite {
    Insert,
    Update,
    Skip,
}

fn plan_write(existing: Option<(u64, bool)>) -> PlannedWrite {
    match existing {
        None => PlannedWrite::Insert,
        Some((_, true)) => PlannedWrite::Skip,
        Some((_, false)) => PlannedWrite::Update,
    }
}

/// Computed columns in bind order, shared by the insert and the guarded
/// update. `computed_by` and the key columns are bound by the callers.
const COMPUTED_SET_CLAUSE: &str = "has_policy = ?, total_days = ?, present_days = ?, \
     absent_days = ?, half_days = ?, paid_leave_days = ?, weekoff_days = ?, holiday_days = ?, \
     late_days = ?, early_checkout_days = ?, unpaid_absent_days = ?, not_marked_days = ?, \
     paid_days = ?, earned_basic = ?, earned_hra = ?, earned_travel = ?, \
     earned_children_education = ?, earned_fixed_incentive = ?, employer_incentive = ?, \
     base_salary = ?, pf_employee = ?, pf_employer = ?, esi = ?, lwf = ?, ex_gratia = ?, \
     late_penalty = ?, absent_deduction = ?, timesheet_penalty = ?, advance_recovery = ?, \
     adjustment_deductions = ?, adjustment_additions = ?, attendance_adjustments = ?, \
     net_salary = ?, ctc = ?";

fn bind_computed<'q>(
    query: Query<'q, sqlx::MySql, MySqlArguments>,
    comp: &'q PayrollComputation,
) -> Query<'q, sqlx::MySql, MySqlArguments> {
    query
        .bind(comp.has_policy)
        .bind(comp.total_days)
        .bind(comp.present_days)
        .bind(comp.absent_days)
        .bind(comp.half_days)
        .bind(comp.paid_leave_days)
        .bind(comp.weekoff_days)
        .bind(comp.holiday_days)
        .bind(comp.late_days)
        .bind(comp.early_checkout_days)
        .bind(comp.unpaid_absent_days)
        .bind(comp.not_marked_days)
        .bind(comp.paid_days)
        .bind(comp.earned_basic)
        .bind(comp.earned_hra)
        .bind(comp.earned_travel)
        .bind(comp.earned_children_education)
        .bind(comp.earned_fixed_incentive)
        .bind(comp.employer_incentive)
        .bind(comp.base_salary)
        .bind(comp.pf_employee)
        .bind(comp.pf_employer)
        .bind(comp.esi)
        .bind(comp.lwf)
        .bind(comp.ex_gratia)
        .bind(comp.late_penalty)
        .bind(comp.absent_deduction)
        .bind(comp.timesheet_penalty)
        .bind(comp.advance_recovery)
        .bind(comp.adjustment_deductions)
        .bind(comp.adjustment_additions)
        .bind(comp.attendance_adjustments)
        .bind(comp.net_salary)
        .bind(comp.ctc)
}

/// Overwrites the computed fields of an unlocked record. The
/// `locked = FALSE` predicate keeps the lock check atomic with the write:
/// a record locked concurrently is simply not matched.
async fn run_guarded_update(
    pool: &MySqlPool,
    comp: &PayrollComputation,
    computed_by: Option<u64>,
) -> Result<u64, sqlx::Error> {
    let sql = format!(
        "UPDATE payroll_records SET {COMPUTED_SET_CLAUSE}, computed_by = ? \
         WHERE employee_id = ? AND month = ? AND locked = FALSE",
    );
    let query = bind_computed(sqlx::query(&sql), comp)
        .bind(computed_by)
        .bind(comp.employee_id)
        .bind(&comp.month);
    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

async fn insert_payroll(
    pool: &MySqlPool,
    comp: &PayrollComputation,
    computed_by: Option<u64>,
) -> Result<(), sqlx::Error> {
    let sql = "INSERT INTO payroll_records \
        (employee_id, month, has_policy, total_days, present_days, absent_days, half_days, \
         paid_leave_days, weekoff_days, holiday_days, late_days, early_checkout_days, \
         unpaid_absent_days, not_marked_days, paid_days, earned_basic, earned_hra, earned_travel, \
         earned_children_education, earned_fixed_incentive, employer_incentive, base_salary, \
         pf_employee, pf_employer, esi, lwf, ex_gratia, late_penalty, absent_deduction, \
         timesheet_penalty, advance_recovery, adjustment_deductions, adjustment_additions, \
         attendance_adjustments, net_salary, ctc, status, locked, computed_by) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
         ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'draft', FALSE, ?)";
    let query = sqlx::query(sql).bind(comp.employee_id).bind(&comp.month);
    bind_computed(query, comp)
        .bind(computed_by)
        .execute(pool)
        .await?;
    Ok(())
}

/// Persists one computed payroll, honoring the record lock. A duplicate-key
/// failure on insert (a concurrent invocation won the create race) retries
/// as the guarded update.
pub async fn upsert_payroll(
    pool: &MySqlPool,
    comp: &PayrollComputation,
    computed_by: Option<u64>,
) -> Result<UpsertAction, sqlx::Error> {
    let existing: Option<(u64, bool)> =
        sqlx::query_as("SELECT id, locked FROM payroll_records WHERE employee_id = ? AND month = ?")
            .bind(comp.employee_id)
            .bind(&comp.month)
            .fetch_optional(pool)
            .await?;

    match plan_write(existing) {
        PlannedWrite::Skip => Ok(UpsertAction::SkippedLocked),
        PlannedWrite::Update => {
            if run_guarded_update(pool, comp, computed_by).await? == 0 {
                // a concurrent lock-set won; the record is frozen
                Ok(UpsertAction::SkippedLocked)
            } else {
                Ok(UpsertAction::Updated)
            }
        }
        PlannedWrite::Insert => match insert_payroll(pool, comp, computed_by).await {
            Ok(()) => Ok(UpsertAction::Created),
            Err(e) => {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.code().as_deref() == Some("23000") {
                        return if run_guarded_update(pool, comp, computed_by).await? == 0 {
                            Ok(UpsertAction::SkippedLocked)
                        } else {
                            Ok(UpsertAction::Updated)
                        };
                    }
                }
                Err(e)
            }
        },
    }
}

const PAYROLL_COLUMNS: &str = "id, employee_id, month, has_policy, total_days, present_days, \
     absent_days, half_days, paid_leave_days, weekoff_days, holiday_days, late_days, \
     early_checkout_days, unpaid_absent_days, not_marked_days, paid_days, earned_basic, \
     earned_hra, earned_travel, earned_children_education, earned_fixed_incentive, \
     employer_incentive, base_salary, pf_employee, pf_employer, esi, lwf, ex_gratia, \
     late_penalty, absent_deduction, timesheet_penalty, advance_recovery, \
     adjustment_deductions, adjustment_additions, attendance_adjustments, net_salary, ctc, \
     status, locked, computed_by";

pub async fn get_payroll(
    pool: &MySqlPool,
    payroll_id: u64,
) -> Result<Option<PayrollRecord>, sqlx::Error> {
    let sql = format!("SELECT {PAYROLL_COLUMNS} FROM payroll_records WHERE id = ?");
    sqlx::query_as::<_, PayrollRecord>(&sql)
        .bind(payroll_id)
        .fetch_optional(pool)
        .await
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
}

pub struct PayrollListFilter {
    pub month: Option<String>,
    pub employee_id: Option<u64>,
    pub status: Option<String>,
}

/// Paginated payroll listing with the same dynamic WHERE pattern the read
/// queries use.
pub async fn list_payrolls(
    pool: &MySqlPool,
    filter: &PayrollListFilter,
    page: u64,
    per_page: u64,
) -> Result<(Vec<PayrollRecord>, i64), sqlx::Error> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(month) = &filter.month {
        where_sql.push_str(" AND month = ?");
        args.push(FilterValue::Str(month.clone()));
    }
    if let Some(emp_id) = filter.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }
    if let Some(status) = &filter.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.clone()));
    }

    let count_sql = format!("SELECT COUNT(*) FROM payroll_records{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.clone()),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let offset = (page - 1) * per_page;
    let data_sql = format!(
        "SELECT {PAYROLL_COLUMNS} FROM payroll_records{} \
         ORDER BY month DESC, employee_id ASC LIMIT ? OFFSET ?",
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, PayrollRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }
    let records = data_q.bind(per_page).bind(offset).fetch_all(pool).await?;

    Ok((records, total))
}

/// Freezes a draft record against further recomputation.
pub async fn lock_payroll(pool: &MySqlPool, payroll_id: u64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE payroll_records SET locked = TRUE, status = 'locked' \
         WHERE id = ? AND locked = FALSE",
    )
    .bind(payroll_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn unlock_payroll(pool: &MySqlPool, payroll_id: u64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE payroll_records SET locked = FALSE, status = 'draft' \
         WHERE id = ? AND status = 'locked'",
    )
    .bind(payroll_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn approve_payroll(pool: &MySqlPool, payroll_id: u64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE payroll_records SET status = 'approved' \
         WHERE id = ? AND status IN ('draft', 'locked')",
    )
    .bind(payroll_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Marks an approved record as paid and applies the month's advance
/// recovery: each contributing advance's balance drops by its installment
/// and closes at zero. Runs in one transaction so a failed balance write
/// never leaves the record half-paid.
pub async fn mark_paid(pool: &MySqlPool, payroll_id: u64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let target: Option<(u64, String)> = sqlx::query_as(
        "SELECT employee_id, month FROM payroll_records WHERE id = ? AND status = 'approved'",
    )
    .bind(payroll_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((employee_id, month)) = target else {
        return Ok(false);
    };

    let rows = sqlx::query("UPDATE payroll_records SET status = 'paid' WHERE id = ? AND status = 'approved'")
        .bind(payroll_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if rows == 0 {
        return Ok(false);
    }

    let advances: Vec<AdvanceRecord> = sqlx::query_as(
        "SELECT id, employee_id, installment_amount, remaining_balance, recovery_start_month, \
         status FROM advance_records WHERE employee_id = ? AND status = 'active'",
    )
    .bind(employee_id)
    .fetch_all(&mut *tx)
    .await?;

    let refs: Vec<&AdvanceRecord> = advances.iter().collect();
    for (advance_id, amount) in advances::installments_due(&refs, &month) {
        let Some(advance) = advances.iter().find(|a| a.id == advance_id) else {
            continue;
        };
        let new_balance = (advance.remaining_balance - amount).max(0.0);
        let new_status = if new_balance <= 0.0 {
            AdvanceStatus::Closed
        } else {
            AdvanceStatus::Active
        };
        sqlx::query("UPDATE advance_records SET remaining_balance = ?, status = ? WHERE id = ?")
            .bind(new_balance)
            .bind(new_status.as_ref())
            .bind(advance_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(true)
}
